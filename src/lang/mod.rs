/// Module for managing the original source code.
#[macro_use]
pub mod source_buffer;

/// Module for managing the turning of the source code into a list of tokens for further processing.
pub mod tokenizing;

/// Module for defining the instructions and operations the interpreter executes.
pub mod code;

/// Lowering of tokens into instructions, the structure check, and the compilation of colon
/// definitions against the dictionary.
pub mod compilation;
