use crate::{lang::source_buffer::SourceLocation, runtime::interpreter::CallStack};
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
    process::{ExitCode, Termination},
};

use super::interpreter::Interpreter;

pub type Result<T> = std::result::Result<T, ScriptError>;

/// The class of failure that aborted an evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source text could not be read.
    Tokenize,

    /// A word needed more values than the number stack held.
    StackUnderflow,

    /// A division or remainder by zero was attempted.
    DivisionByZero,

    /// Unmatched IF/ELSE/THEN, DO/LOOP or BEGIN constructs, or a malformed definition.
    ControlFlow,

    /// An identifier that is neither a number nor a known word.
    UnknownWord,

    /// An address outside of the allocated memory segment, or an invalid allocation.
    Memory,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let text = match self {
            ErrorKind::Tokenize => "Tokenize error",
            ErrorKind::StackUnderflow => "Stack underflow",
            ErrorKind::DivisionByZero => "Division by zero",
            ErrorKind::ControlFlow => "Control flow error",
            ErrorKind::UnknownWord => "Unknown word",
            ErrorKind::Memory => "Memory error",
        };

        write!(f, "{}", text)
    }
}

/// Any error that occurs while tokenizing or evaluating a script.
#[derive(Clone)]
pub struct ScriptError {
    /// What went wrong.
    kind: ErrorKind,

    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// The description of the error.
    error: String,

    /// The user words being executed at the time of the error, if available.
    call_stack: Option<CallStack>,
}

impl Error for ScriptError {}

/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError {
    fn report(self) -> ExitCode {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}

/// Print the error kind and description, prefixed by the location when we know it.  The call stack
/// follows if the error happened inside of user words.
impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}: {}", location, self.kind, self.error)?,
            None => write!(f, "{}: {}", self.kind, self.error)?,
        }

        if let Some(call_stack) = &self.call_stack
            && !call_stack.is_empty()
        {
            write!(f, "\n\nCall stack\n")?;

            for item in call_stack.iter().rev() {
                writeln!(f, "  {}", item)?;
            }
        }

        Ok(())
    }
}

impl Debug for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl ScriptError {
    /// Create a new ScriptError.
    pub fn new(
        kind: ErrorKind,
        location: Option<SourceLocation>,
        error: String,
        call_stack: Option<CallStack>,
    ) -> ScriptError {
        ScriptError {
            kind,
            location,
            error,
            call_stack,
        }
    }

    /// Create a new ScriptError and wrap it in a Result::Err.
    pub fn new_as_result<T>(
        kind: ErrorKind,
        location: Option<SourceLocation>,
        error: String,
        call_stack: Option<CallStack>,
    ) -> Result<T> {
        Err(ScriptError::new(kind, location, error, call_stack))
    }

    /// Create an error that has no location yet.  The dispatch loop stamps it with the location of
    /// the instruction that was executing.
    pub fn unlocated<T>(kind: ErrorKind, error: String) -> Result<T> {
        ScriptError::new_as_result(kind, None, error, None)
    }

    /// Fill in the location and call stack if nobody closer to the failure has done so already.
    pub fn located(mut self, location: &SourceLocation, call_stack: &CallStack) -> ScriptError {
        if self.location.is_none() {
            self.location = Some(location.clone());
            self.call_stack = Some(call_stack.clone());
        }

        self
    }

    /// The class of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation> {
        &self.location
    }

    /// The description of the error.
    pub fn error(&self) -> &String {
        &self.error
    }

    /// If available, the user word call stack at the time of the error.
    pub fn call_stack(&self) -> &Option<CallStack> {
        &self.call_stack
    }
}

/// I/O failures are filed under Tokenize, the input could not be read.  The location is the Rust
/// code that converted the error.
impl From<std::io::Error> for ScriptError {
    fn from(error: std::io::Error) -> ScriptError {
        ScriptError::new(
            ErrorKind::Tokenize,
            Some(crate::location_here!()),
            format!("I/O error: {}", error),
            None,
        )
    }
}

/// Create a ScriptError wrapped in a Result::Err using the interpreter's current location and call
/// stack.
pub fn script_error<T>(
    interpreter: &dyn Interpreter,
    kind: ErrorKind,
    message: String,
) -> Result<T> {
    let location = interpreter.current_location().clone();
    let call_stack = interpreter.call_stack().clone();

    ScriptError::new_as_result(kind, location, message, Some(call_stack))
}

pub fn script_error_str<T>(
    interpreter: &dyn Interpreter,
    kind: ErrorKind,
    message: &str,
) -> Result<T> {
    script_error(interpreter, kind, message.to_string())
}
