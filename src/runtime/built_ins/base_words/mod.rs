/// Words that manipulate the number stack.
mod stack_words;

/// Integer arithmetic.
mod simple_arithmetic_words;

/// Comparison and bitwise logic words.
mod math_logic_and_bit_words;

/// Simple constants.
mod constant_words;

use crate::runtime::{
    built_ins::base_words::{
        constant_words::register_constant_words,
        math_logic_and_bit_words::register_math_logic_and_bit_words,
        simple_arithmetic_words::register_simple_arithmetic_words,
        stack_words::register_stack_words,
    },
    interpreter::Interpreter,
};

/// Called to register all of the core words of the language.
pub fn register_base_words(interpreter: &mut dyn Interpreter) {
    register_stack_words(interpreter);
    register_simple_arithmetic_words(interpreter);
    register_math_logic_and_bit_words(interpreter);
    register_constant_words(interpreter);
}
