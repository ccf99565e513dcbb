use crate::{
    lang::{source_buffer::SourceLocation, tokenizing::Token},
    runtime::built_ins::Builtin,
};
use std::{
    fmt::{self, Debug, Display, Formatter},
    rc::Rc,
};

/// The structural words of the language.  These are handled by the dispatch loop itself, they never
/// live in the dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Colon,
    Semicolon,
    If,
    Else,
    Then,
    Do,
    Loop,
    PlusLoop,
    I,
    J,
    Begin,
    Until,
    While,
    Repeat,
    Variable,
    Constant,
}

impl Keyword {
    /// Look up the keyword for a word name.  The name is expected to already be upper case.
    pub fn from_name(name: &str) -> Option<Keyword> {
        let keyword = match name {
            ":" => Keyword::Colon,
            ";" => Keyword::Semicolon,
            "IF" => Keyword::If,
            "ELSE" => Keyword::Else,
            "THEN" => Keyword::Then,
            "DO" => Keyword::Do,
            "LOOP" => Keyword::Loop,
            "+LOOP" => Keyword::PlusLoop,
            "I" => Keyword::I,
            "J" => Keyword::J,
            "BEGIN" => Keyword::Begin,
            "UNTIL" => Keyword::Until,
            "WHILE" => Keyword::While,
            "REPEAT" => Keyword::Repeat,
            "VARIABLE" => Keyword::Variable,
            "CONSTANT" => Keyword::Constant,
            _ => return None,
        };

        Some(keyword)
    }

    /// Keywords that read the following token as the name they define.
    pub fn takes_name(&self) -> bool {
        matches!(self, Keyword::Colon | Keyword::Variable | Keyword::Constant)
    }
}

/// A compiled user word.  The body was bound against the dictionary as it stood when the definition
/// was committed.
pub struct ScriptWord {
    /// The name the word was defined under.
    pub name: String,

    /// Where the definition started.
    pub location: SourceLocation,

    /// The bound body of the word.
    pub code: Code,
}

impl Debug for ScriptWord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "ScriptWord({}, {} instructions)", self.name, self.code.len())
    }
}

/// The operations the dispatch loop can perform.
#[derive(Clone, Debug)]
pub enum Op {
    /// Push a number literal.
    Literal(i64),

    /// Append the text of a `."` literal to the output.
    Print(String),

    /// A structural word.
    Control(Keyword),

    /// The name operand following `:`, `VARIABLE` or `CONSTANT`.
    Name(String),

    /// Resolve the word in the dictionary when it is executed.  Used for top level code so that
    /// every evaluation sees the latest binding.
    Lookup(String),

    /// A built-in primitive bound at definition time.
    Builtin(Builtin),

    /// A user word bound at definition time.
    Call(Rc<ScriptWord>),

    /// A constant's value, inlined at definition time.
    Constant(i64),

    /// A variable's address, bound at definition time.
    Variable(usize),
}

/// A single instruction: the operation along with the token it was lowered from.
#[derive(Clone, Debug)]
pub struct Instruction {
    /// The original token, kept for capture mode and error locations.
    pub token: Token,

    /// The operation to perform.
    pub op: Op,
}

impl Instruction {
    /// Create a new instruction from a token and an operation.
    pub fn new(token: Token, op: Op) -> Instruction {
        Instruction { token, op }
    }

    /// Where in the source this instruction came from.
    pub fn location(&self) -> &SourceLocation {
        self.token.location()
    }

    /// The keyword, if this is a structural instruction.
    pub fn keyword(&self) -> Option<Keyword> {
        match self.op {
            Op::Control(keyword) => Some(keyword),
            _ => None,
        }
    }
}

/// Pretty print the instruction for debugging.
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.op {
            Op::Literal(value) => write!(f, "Literal   {}", value),
            Op::Print(text) => write!(f, "Print     {:?}", text),
            Op::Control(keyword) => write!(f, "Control   {:?}", keyword),
            Op::Name(name) => write!(f, "Name      {}", name),
            Op::Lookup(name) => write!(f, "Lookup    {}", name),
            Op::Builtin(builtin) => write!(f, "Builtin   {:?}", builtin),
            Op::Call(word) => write!(f, "Call      {}", word.name),
            Op::Constant(value) => write!(f, "Constant  {}", value),
            Op::Variable(address) => write!(f, "Variable  {}", address),
        }
    }
}

/// A list of instructions executed with an explicit program counter.
pub type Code = Vec<Instruction>;

/// Pretty print a code block, one numbered instruction per line.
pub fn pretty_print_code(code: &Code) -> String {
    use std::fmt::Write;

    let mut result = String::with_capacity(code.len() * 20);

    for (index, instruction) in code.iter().enumerate() {
        let _ = writeln!(&mut result, "{:4}: {}", index, instruction);
    }

    result
}
