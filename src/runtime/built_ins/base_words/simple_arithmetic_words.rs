use crate::{
    add_builtin_word,
    runtime::{
        error::{self, ErrorKind, script_error_str},
        interpreter::Interpreter,
    },
};

/// Pop two values, apply the operation and push the result.  The arity is checked first so a
/// failure leaves the stack untouched.
fn binary_op(
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

fn unary_op(
    interpreter: &mut dyn Interpreter,
    word: &str,
    op: fn(i64) -> i64,
) -> error::Result<()> {
    interpreter.require(word, 1)?;

    let a = interpreter.pop()?;
    interpreter.push(op(a));

    Ok(())
}

/// Fail before any pop if the divisor on top of the stack is zero.
fn check_divisor(interpreter: &mut dyn Interpreter, word: &str, count: usize) -> error::Result<()> {
    interpreter.require(word, count)?;

    if interpreter.stack().pick(0)? == 0 {
        return script_error_str(interpreter, ErrorKind::DivisionByZero, "Division by zero.");
    }

    Ok(())
}

fn word_add(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_op(interpreter, "+", i64::wrapping_add)
}

fn word_subtract(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_op(interpreter, "-", i64::wrapping_sub)
}

fn word_multiply(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_op(interpreter, "*", i64::wrapping_mul)
}

/// Signature: `a b -- a/b`, truncated toward zero.
fn word_divide(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    check_divisor(interpreter, "/", 2)?;
    binary_op(interpreter, "/", i64::wrapping_div)
}

/// Signature: `a b -- remainder`, the remainder takes the sign of `a`.
fn word_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    check_divisor(interpreter, "MOD", 2)?;
    binary_op(interpreter, "MOD", i64::wrapping_rem)
}

/// Signature: `a b -- remainder quotient`
fn word_divide_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    check_divisor(interpreter, "/MOD", 2)?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(a.wrapping_rem(b));
    interpreter.push(a.wrapping_div(b));

    Ok(())
}

/// Multiply then divide with a 128 bit intermediate product.
///
/// Signature: `a b c -- a*b/c`
fn word_multiply_divide(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    check_divisor(interpreter, "*/", 3)?;

    let c = interpreter.pop()?;
    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    let product = a as i128 * b as i128;
    interpreter.push((product / c as i128) as i64);

    Ok(())
}

fn word_negate(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    unary_op(interpreter, "NEGATE", i64::wrapping_neg)
}

fn word_abs(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    unary_op(interpreter, "ABS", i64::wrapping_abs)
}

fn word_min(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_op(interpreter, "MIN", i64::min)
}

fn word_max(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_op(interpreter, "MAX", i64::max)
}

pub fn register_simple_arithmetic_words(interpreter: &mut dyn Interpreter) {
    add_builtin_word!(interpreter, "+", word_add, "Add the top 2 values.", "a b -- a+b");

    add_builtin_word!(
        interpreter,
        "-",
        word_subtract,
        "Subtract the top value from the second.",
        "a b -- a-b"
    );

    add_builtin_word!(interpreter, "*", word_multiply, "Multiply the top 2 values.", "a b -- a*b");

    add_builtin_word!(
        interpreter,
        "/",
        word_divide,
        "Divide the second value by the top, truncating toward zero.",
        "a b -- a/b"
    );

    add_builtin_word!(
        interpreter,
        "MOD",
        word_mod,
        "The remainder of dividing the second value by the top.",
        "a b -- remainder"
    );

    add_builtin_word!(
        interpreter,
        "/MOD",
        word_divide_mod,
        "Divide, pushing both the remainder and the quotient.",
        "a b -- remainder quotient"
    );

    add_builtin_word!(
        interpreter,
        "*/",
        word_multiply_divide,
        "Multiply a and b, then divide by c without overflowing the product.",
        "a b c -- a*b/c"
    );

    add_builtin_word!(interpreter, "NEGATE", word_negate, "Negate the top value.", "a -- -a");

    add_builtin_word!(
        interpreter,
        "ABS",
        word_abs,
        "The absolute value of the top value.",
        "a -- |a|"
    );

    add_builtin_word!(
        interpreter,
        "MIN",
        word_min,
        "The smaller of the top 2 values.",
        "a b -- min"
    );

    add_builtin_word!(
        interpreter,
        "MAX",
        word_max,
        "The larger of the top 2 values.",
        "a b -- max"
    );
}
