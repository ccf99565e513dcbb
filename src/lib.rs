/// Module for the managing source code and the generation of instructions.
#[macro_use]
pub mod lang;

/// Module for the runtime and the data structures used by the interpreter.  As well as the
/// interpreter itself.
#[macro_use]
pub mod runtime;

pub use lang::tokenizing::{
    Token, TokenKind, TokenList, tokenize, tokenize_from_file, tokenize_from_source,
};
pub use runtime::{
    config::InterpreterConfig,
    error::{ErrorKind, Result, ScriptError},
    interpreter::{
        CodeManagement, Evaluation, Interpreter, InterpreterMemory, InterpreterOutput,
        InterpreterStack, WordManagement, forth_interpreter::ForthInterpreter,
    },
};
