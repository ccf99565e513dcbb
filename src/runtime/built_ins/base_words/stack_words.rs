use crate::{
    add_builtin_word,
    runtime::{
        error::{self, ErrorKind, script_error},
        interpreter::Interpreter,
    },
};

/// Duplicate the top value on the number stack.
///
/// Signature: `a -- a a`
fn word_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("DUP", 1)?;

    let value = interpreter.pop()?;

    interpreter.push(value);
    interpreter.push(value);

    Ok(())
}

/// Drop the top value on the number stack.
///
/// Signature: `a -- `
fn word_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("DROP", 1)?;

    let _ = interpreter.pop()?;

    Ok(())
}

/// Swap the top 2 values on the number stack.
///
/// Signature: `a b -- b a`
fn word_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("SWAP", 2)?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b);
    interpreter.push(a);

    Ok(())
}

/// Copy the second value over the top one.
///
/// Signature: `a b -- a b a`
fn word_over(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("OVER", 2)?;

    let a = interpreter.stack().pick(1)?;
    interpreter.push(a);

    Ok(())
}

/// Rotate the third value to the top.
///
/// Signature: `a b c -- b c a`
fn word_rot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("ROT", 3)?;

    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b);
    interpreter.push(c);
    interpreter.push(a);

    Ok(())
}

/// Signature: `a b -- b`
fn word_nip(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("NIP", 2)?;

    let b = interpreter.pop()?;
    let _ = interpreter.pop()?;

    interpreter.push(b);

    Ok(())
}

/// Signature: `a b -- b a b`
fn word_tuck(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("TUCK", 2)?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(b);
    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Signature: `a b -- a b a b`
fn word_two_dup(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("2DUP", 2)?;

    let a = interpreter.stack().pick(1)?;
    let b = interpreter.stack().pick(0)?;

    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Signature: `a b -- `
fn word_two_drop(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("2DROP", 2)?;

    let _ = interpreter.pop()?;
    let _ = interpreter.pop()?;

    Ok(())
}

/// Signature: `a b c d -- c d a b`
fn word_two_swap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("2SWAP", 4)?;

    let d = interpreter.pop()?;
    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(c);
    interpreter.push(d);
    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Signature: `a b c d -- a b c d a b`
fn word_two_over(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("2OVER", 4)?;

    let a = interpreter.stack().pick(3)?;
    let b = interpreter.stack().pick(2)?;

    interpreter.push(a);
    interpreter.push(b);

    Ok(())
}

/// Get the depth of the number stack before calling this word.
///
/// Signature: ` -- depth`
fn word_depth(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let depth = interpreter.stack().depth() as i64;

    interpreter.push(depth);

    Ok(())
}

/// Copy the value `n` places below the top, not counting `n` itself.  The index is checked before
/// anything is popped.
///
/// Signature: `xn ... x0 n -- xn ... x0 xn`
fn word_pick(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("PICK", 1)?;

    let index = interpreter.stack().pick(0)?;
    let available = interpreter.stack().depth() - 1;

    if index < 0 || index as usize >= available {
        let message = format!("PICK index {} out of range of stack size {}.", index, available);
        return script_error(interpreter, ErrorKind::StackUnderflow, message);
    }

    let _ = interpreter.pop()?;
    let value = interpreter.stack().pick(index as usize)?;

    interpreter.push(value);

    Ok(())
}

fn word_clear_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.stack_mut().clear();
    Ok(())
}

/// Register the number stack words.
pub fn register_stack_words(interpreter: &mut dyn Interpreter) {
    add_builtin_word!(
        interpreter,
        "DUP",
        word_dup,
        "Duplicate the top value on the stack.",
        "a -- a a"
    );

    add_builtin_word!(
        interpreter,
        "DROP",
        word_drop,
        "Discard the top value on the stack.",
        "a -- "
    );

    add_builtin_word!(
        interpreter,
        "SWAP",
        word_swap,
        "Swap the top 2 values on the stack.",
        "a b -- b a"
    );

    add_builtin_word!(
        interpreter,
        "OVER",
        word_over,
        "Copy the second value on the stack to the top.",
        "a b -- a b a"
    );

    add_builtin_word!(
        interpreter,
        "ROT",
        word_rot,
        "Rotate the third value on the stack to the top.",
        "a b c -- b c a"
    );

    add_builtin_word!(
        interpreter,
        "NIP",
        word_nip,
        "Discard the second value on the stack.",
        "a b -- b"
    );

    add_builtin_word!(
        interpreter,
        "TUCK",
        word_tuck,
        "Copy the top value under the second.",
        "a b -- b a b"
    );

    add_builtin_word!(
        interpreter,
        "2DUP",
        word_two_dup,
        "Duplicate the top 2 values on the stack.",
        "a b -- a b a b"
    );

    add_builtin_word!(
        interpreter,
        "2DROP",
        word_two_drop,
        "Discard the top 2 values on the stack.",
        "a b -- "
    );

    add_builtin_word!(
        interpreter,
        "2SWAP",
        word_two_swap,
        "Swap the top 2 pairs of values on the stack.",
        "a b c d -- c d a b"
    );

    add_builtin_word!(
        interpreter,
        "2OVER",
        word_two_over,
        "Copy the second pair of values to the top.",
        "a b c d -- a b c d a b"
    );

    add_builtin_word!(
        interpreter,
        "DEPTH",
        word_depth,
        "Push the depth of the stack before the call.",
        " -- depth"
    );

    add_builtin_word!(
        interpreter,
        "PICK",
        word_pick,
        "Copy the value n places below the top.",
        "xn ... x0 n -- xn ... x0 xn"
    );

    add_builtin_word!(
        interpreter,
        "CLEARSTACK",
        word_clear_stack,
        "Remove every value from the stack.",
        "... -- "
    );
}
