use crate::{
    add_builtin_word,
    runtime::{
        built_ins::base_words::math_logic_and_bit_words::{FALSE_FLAG, TRUE_FLAG},
        error,
        interpreter::Interpreter,
    },
};

pub fn register_constant_words(interpreter: &mut dyn Interpreter) {
    add_builtin_word!(
        interpreter,
        "TRUE",
        |interpreter: &mut dyn Interpreter| -> error::Result<()> {
            interpreter.push(TRUE_FLAG);
            Ok(())
        },
        "Push the true flag, all bits set.",
        " -- -1"
    );

    add_builtin_word!(
        interpreter,
        "FALSE",
        |interpreter: &mut dyn Interpreter| -> error::Result<()> {
            interpreter.push(FALSE_FLAG);
            Ok(())
        },
        "Push the false flag.",
        " -- 0"
    );
}
