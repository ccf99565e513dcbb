use core::str::Chars;
use std::{
    fmt::{self, Display, Formatter},
    hash::{Hash, Hasher},
};

/// The location in the source code where a token was found.  Every token carries one so that the
/// interpreter can report where a failing word came from.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, Debug, PartialEq, PartialOrd, Eq)]
pub struct SourceLocation {
    /// Either the path to the file or a description of the source code.  For example code entered
    /// in the REPL will have a tag of "\<repl\>".
    path: String,

    /// The 1 based line number in the source code where the token was found.
    line: usize,

    /// The 1 based column number in the source code where the token was found.
    column: usize,
}

impl Hash for SourceLocation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
        self.line.hash(state);
        self.column.hash(state);
    }
}

/// Used for error reporting to show where in the source code an error originated.
impl Display for SourceLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceLocation {
    /// Create a new SourceLocation with default values.
    pub fn new() -> SourceLocation {
        SourceLocation {
            path: "unspecified".to_string(),
            line: 1,
            column: 1,
        }
    }

    /// Create a new SourceLocation at the start of the given source.
    pub fn new_from_path(path: &str) -> Self {
        SourceLocation {
            path: path.to_owned(),
            line: 1,
            column: 1,
        }
    }

    /// Create a new SourceLocation with all of the needed information.  This is useful in
    /// conjunction with the location_here! macro.
    pub fn new_from_info(path: &str, line: usize, column: usize) -> Self {
        SourceLocation {
            path: path.to_owned(),
            line,
            column,
        }
    }

    /// The path to the source code or a meaningful description of the source code.
    pub fn path(&self) -> &String {
        &self.path
    }

    /// The 1 based line number in the source code.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 1 based column number in the source code.
    pub fn column(&self) -> usize {
        self.column
    }
}

/// Get the location of the macro invocation within the Rust source.
#[macro_export]
macro_rules! location_here {
    () => {
        $crate::lang::source_buffer::SourceLocation::new_from_info(
            file!(),
            line!() as usize,
            column!() as usize,
        )
    };
}

/// A forward only cursor over source text.  As characters are consumed the location of the cursor
/// is maintained so the tokenizer can stamp each token with where it started.
///
/// The SourceBuffer only holds a reference to the source code, the code is not copied.
pub struct SourceBuffer<'a> {
    /// An iterator over the source code being processed.
    chars: Chars<'a>,

    /// The logical location of the cursor in the source code.
    location: SourceLocation,

    /// A character that has been peeked at but not yet consumed.
    current: Option<char>,
}

impl<'a> SourceBuffer<'a> {
    /// Create a new SourceBuffer with the path to, or meaningful tag for the source code and the
    /// source code itself.
    pub fn new(path: &str, source: &'a str) -> Self {
        SourceBuffer {
            chars: source.chars(),
            location: SourceLocation::new_from_path(path),
            current: None,
        }
    }

    /// The location the cursor is at in the source code being processed.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Take a peek at the next character in the source code without consuming it.
    pub fn peek_next(&mut self) -> Option<char> {
        match self.current {
            Some(_) => self.current,
            None => {
                let next = self.chars.next();

                self.current = next;
                next
            }
        }
    }

    /// Get and consume the next character in the source code.
    pub fn next_char(&mut self) -> Option<char> {
        let next = match self.current.take() {
            Some(peeked) => Some(peeked),
            None => self.chars.next(),
        };

        if let Some(next_char) = next {
            self.increment_location(next_char);
        }

        next
    }

    /// Advance one column for regular characters.  Reset the column to 1 and increment the line for
    /// new line characters.
    fn increment_location(&mut self, next: char) {
        if next == '\n' {
            self.location.line += 1;
            self.location.column = 1;
        } else {
            self.location.column += 1;
        }
    }
}
