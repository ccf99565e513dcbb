use crate::{
    lang::{code::Code, source_buffer::SourceLocation, tokenizing::TokenList},
    runtime::{
        config::InterpreterConfig,
        data_structures::{
            control_stack::ControlStack,
            dictionary::{Dictionary, WordInfo, WordKind},
            memory_segment::MemorySegment,
            number_stack::NumberStack,
        },
        error,
    },
};
use std::fmt::{self, Display, Formatter};

pub mod forth_interpreter;

mod control_flow;

/// A call stack item is a record of the executing word's name and the location within the original
/// source code from which it was called.
#[derive(Clone)]
pub struct CallItem {
    location: SourceLocation,
    word: String,
}

impl CallItem {
    /// Create a new call stack item.
    pub fn new(word: String, location: SourceLocation) -> CallItem {
        CallItem { location, word }
    }

    /// Where in the source code was the execution of this word found?
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    // The name of the word being executed.
    pub fn word(&self) -> &String {
        &self.word
    }
}

impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.word)
    }
}

/// The user words currently executing, innermost last.  Used to give errors a trace.
pub type CallStack = Vec<CallItem>;

/// The result of a successful evaluation: the number stack from bottom to top and the text written
/// by the output words.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub stack: Vec<i64>,
    pub output: String,
}

/// Trait for managing the interpreter's number stack.  Intended to be called by the built-in words.
pub trait InterpreterStack {
    /// Examine the full number stack, for example for `.S`.
    fn stack(&self) -> &NumberStack;

    fn stack_mut(&mut self) -> &mut NumberStack;

    /// Push a value onto the stack.  This never fails.
    fn push(&mut self, value: i64);

    /// Pop a value from the stack.  If the stack is empty a stack underflow error is returned.
    fn pop(&mut self) -> error::Result<i64>;

    /// Make sure at least `count` values are on the stack before a word starts consuming them.  A
    /// word that fails this check leaves the stack untouched.
    fn require(&self, word: &str, count: usize) -> error::Result<()>;
}

/// Access to the memory segment that backs variables and allotted cells.
pub trait InterpreterMemory {
    fn memory(&self) -> &MemorySegment;

    fn memory_mut(&mut self) -> &mut MemorySegment;
}

/// The output buffer of the current evaluation.
pub trait InterpreterOutput {
    /// Append text to the output.
    fn write_output(&mut self, text: &str);

    /// Everything written so far during the current evaluation.
    fn output(&self) -> &str;
}

/// Trait for tokenizing and executing code.
pub trait CodeManagement {
    /// Tokenize and evaluate a Forth script from a source file.
    fn process_source_file(&mut self, path: &str) -> error::Result<Evaluation>;

    /// Tokenize and evaluate an in memory source string.
    ///
    /// The path parameter is used to represent the source code in things like call stacks and error
    /// reporting.  For example, the repl uses a path of "\<repl\>" to represent source code entered
    /// by the user.
    fn process_source(&mut self, path: &str, source: &str) -> error::Result<Evaluation>;

    /// Evaluate a list of tokens.  On success the resulting stack and the output text are returned.
    /// On failure the evaluation is aborted, the control-flow stack is emptied and any pending
    /// definition is discarded.  The number stack and memory keep whatever state they reached.
    fn evaluate(&mut self, tokens: &TokenList) -> error::Result<Evaluation>;

    /// Execute a block of code and associate a name with that code for use in error reporting.
    fn execute_code(&mut self, name: &str, code: &Code) -> error::Result<()>;
}

/// Definition of a built-in word handler.
pub type WordHandler = fn(&mut dyn Interpreter) -> error::Result<()>;

/// Simplify registering a built-in word with the interpreter.
///
/// Required parameters are, the interpreter instance to register with.  The name of the word to
/// register.  The handler function for the word.  A simple description of the word.  As well as
/// the word's stack signature.
#[macro_export]
macro_rules! add_builtin_word {
    (
        $interpreter:expr ,
        $name:literal ,
        $function:expr ,
        $description:literal ,
        $signature:literal
    ) => {{
        use $crate::runtime::{built_ins::Builtin, data_structures::dictionary::WordKind};

        // Record where in the Rust source the word was registered from.
        $interpreter.add_word(
            file!().to_string(),
            line!() as usize,
            column!() as usize,
            $name.to_string(),
            WordKind::Builtin(Builtin::new($name, $function)),
            $description.to_string(),
            $signature.to_string(),
        );
    }};
}

/// Trait for managing and executing words known to the interpreter.
pub trait WordManagement {
    /// If currently set, this represents the current executing location in the original Forth
    /// source code.
    fn current_location(&self) -> &Option<SourceLocation>;

    /// Add a new word to the interpreter's dictionary, replacing any word of the same name.
    #[allow(clippy::too_many_arguments)]
    fn add_word(
        &mut self,
        file: String,
        line: usize,
        column: usize,
        name: String,
        kind: WordKind,
        description: String,
        signature: String,
    );

    /// Find a word in the interpreter's dictionary by name, case-insensitive.
    fn find_word(&self, word: &str) -> Option<&WordInfo>;

    /// The current script execution call stack.
    fn call_stack(&self) -> &CallStack;

    /// Push a new name and location onto the call stack.
    fn call_stack_push(&mut self, name: String, location: SourceLocation);

    /// Pop the last name and location from the call stack.
    fn call_stack_pop(&mut self) -> error::Result<()>;
}

/// Core interpreter trait.
///
/// This trait brings together the number stack, memory, output, word management and code execution
/// of the interpreter.  Built-in words are handed a `&mut dyn Interpreter`.
pub trait Interpreter:
    InterpreterStack + InterpreterMemory + InterpreterOutput + CodeManagement + WordManagement
{
    /// The current word dictionary of words known to the interpreter.
    fn dictionary(&self) -> &Dictionary;

    /// The control-flow markers of the constructs currently running.
    fn control_stack(&self) -> &ControlStack;

    /// The limits the interpreter was created with.
    fn config(&self) -> &InterpreterConfig;

    /// Is a colon definition waiting for its `;`?
    fn is_defining(&self) -> bool;

    /// Clear the number stack, the control-flow stack, the output and any pending definition.  The
    /// dictionary and memory are kept.
    fn reset(&mut self);
}
