use crate::{
    add_builtin_word,
    runtime::{error, interpreter::Interpreter},
};

/// Print the top value followed by a space.
///
/// Signature: `value -- `
fn word_print(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require(".", 1)?;

    let value = interpreter.pop()?;
    interpreter.write_output(&format!("{} ", value));

    Ok(())
}

fn word_cr(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.write_output("\n");
    Ok(())
}

/// Print a character by its code.  Codes that aren't valid characters print the replacement
/// character.
///
/// Signature: `code -- `
fn word_emit(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("EMIT", 1)?;

    let code = interpreter.pop()?;
    let character = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER);

    interpreter.write_output(&character.to_string());

    Ok(())
}

fn word_space(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.write_output(" ");
    Ok(())
}

/// Print the whole stack without changing it.
///
/// Signature: ` -- `
fn word_print_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let text = interpreter.stack().to_string();

    interpreter.write_output(&text);

    Ok(())
}

/// Print the names of every word in the dictionary.
fn word_words(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let text = format!("{}\n", interpreter.dictionary().names().join(" "));

    interpreter.write_output(&text);

    Ok(())
}

/// Register the output words.
pub fn register_io_words(interpreter: &mut dyn Interpreter) {
    add_builtin_word!(
        interpreter,
        ".",
        word_print,
        "Print the top value followed by a space.",
        "value -- "
    );

    add_builtin_word!(interpreter, "CR", word_cr, "Print a new line.", " -- ");

    add_builtin_word!(interpreter, "EMIT", word_emit, "Print a character by its code.", "code -- ");

    add_builtin_word!(interpreter, "SPACE", word_space, "Print a space.", " -- ");

    add_builtin_word!(
        interpreter,
        ".S",
        word_print_stack,
        "Print the stack without changing it.",
        " -- "
    );

    add_builtin_word!(
        interpreter,
        "WORDS",
        word_words,
        "Print the names of all known words.",
        " -- "
    );
}
