use crate::{
    add_builtin_word,
    runtime::{error, interpreter::Interpreter},
};

/// The canonical flag values.
pub const TRUE_FLAG: i64 = -1;
pub const FALSE_FLAG: i64 = 0;

fn flag(value: bool) -> i64 {
    if value { TRUE_FLAG } else { FALSE_FLAG }
}

fn comparison(
    interpreter: &mut dyn Interpreter,
    word: &str,
    test: fn(i64, i64) -> bool,
) -> error::Result<()> {
    interpreter.require(word, 2)?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(flag(test(a, b)));

    Ok(())
}

fn bitwise(
    interpreter: &mut dyn Interpreter,
    word: &str,
    op: fn(i64, i64) -> i64,
) -> error::Result<()> {
    interpreter.require(word, 2)?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(op(a, b));

    Ok(())
}

fn word_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, "=", |a, b| a == b)
}

fn word_not_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, "<>", |a, b| a != b)
}

fn word_less(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, "<", |a, b| a < b)
}

fn word_greater(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, ">", |a, b| a > b)
}

fn word_zero_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("0=", 1)?;

    let a = interpreter.pop()?;
    interpreter.push(flag(a == 0));

    Ok(())
}

fn word_zero_less(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("0<", 1)?;

    let a = interpreter.pop()?;
    interpreter.push(flag(a < 0));

    Ok(())
}

fn word_and(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    bitwise(interpreter, "AND", |a, b| a & b)
}

fn word_or(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    bitwise(interpreter, "OR", |a, b| a | b)
}

fn word_xor(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    bitwise(interpreter, "XOR", |a, b| a ^ b)
}

fn word_invert(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("INVERT", 1)?;

    let a = interpreter.pop()?;
    interpreter.push(!a);

    Ok(())
}

pub fn register_math_logic_and_bit_words(interpreter: &mut dyn Interpreter) {
    add_builtin_word!(
        interpreter,
        "=",
        word_equal,
        "True if the top 2 values are equal.",
        "a b -- flag"
    );

    add_builtin_word!(
        interpreter,
        "<>",
        word_not_equal,
        "True if the top 2 values differ.",
        "a b -- flag"
    );

    add_builtin_word!(interpreter, "<", word_less, "True if a is less than b.", "a b -- flag");

    add_builtin_word!(
        interpreter,
        ">",
        word_greater,
        "True if a is greater than b.",
        "a b -- flag"
    );

    add_builtin_word!(
        interpreter,
        "0=",
        word_zero_equal,
        "True if the top value is zero.",
        "a -- flag"
    );

    add_builtin_word!(
        interpreter,
        "0<",
        word_zero_less,
        "True if the top value is negative.",
        "a -- flag"
    );

    add_builtin_word!(
        interpreter,
        "AND",
        word_and,
        "Bitwise and of the top 2 values.",
        "a b -- a&b"
    );

    add_builtin_word!(interpreter, "OR", word_or, "Bitwise or of the top 2 values.", "a b -- a|b");

    add_builtin_word!(
        interpreter,
        "XOR",
        word_xor,
        "Bitwise exclusive or of the top 2 values.",
        "a b -- a^b"
    );

    add_builtin_word!(
        interpreter,
        "INVERT",
        word_invert,
        "Invert every bit of the top value.",
        "a -- ~a"
    );
}
