use crate::runtime::interpreter::{Interpreter, WordHandler};
use std::fmt::{self, Debug, Formatter};

/// The core words of the language.
pub mod base_words;

/// Words that read and write the memory segment.
pub mod memory_words;

/// Words that write to the output buffer.
pub mod io_words;

/// A primitive word implemented in Rust.  Built-ins are bound into compiled definitions by value,
/// so shadowing a built-in later doesn't change code that was already compiled.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    handler: WordHandler,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Builtin {
    pub fn new(name: &'static str, handler: WordHandler) -> Builtin {
        Builtin { name, handler }
    }

    /// The name the built-in was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn handler(&self) -> WordHandler {
        self.handler
    }
}

/// Register every built-in word with an interpreter.
pub fn register_builtin_words(interpreter: &mut dyn Interpreter) {
    base_words::register_base_words(interpreter);
    memory_words::register_memory_words(interpreter);
    io_words::register_io_words(interpreter);
}
