use crate::{
    lang::source_buffer::{SourceBuffer, SourceLocation},
    runtime::error::{self, ErrorKind, ScriptError},
};
use lazy_static::lazy_static;
use std::{
    collections::HashSet,
    fmt::{self, Debug, Display, Formatter},
    fs::read_to_string,
};

/// How the tokenizer classified a piece of source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Hash)]
pub enum TokenKind {
    /// A signed decimal integer literal.
    Number,

    /// A symbolic word such as `+`, `<>` or `!`, or one of the `(` `)` markers.
    Operator,

    /// A word with structural meaning: definitions, control flow and the defining words.
    Keyword,

    /// Any other word.  It is resolved against the dictionary when executed.
    Identifier,

    /// The text of a `."` literal, without its delimiters.
    StringLiteral,
}

/// A token is a classified unit of the source text along with the location where it started.
///
/// Tokens are immutable once produced, use the accessor methods to read their fields.
#[derive(Clone, PartialEq, Eq, PartialOrd, Hash)]
pub struct Token {
    content: String,
    kind: TokenKind,
    location: SourceLocation,
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::StringLiteral => write!(f, ".\" {}\"", self.content),
            _ => write!(f, "{}", self.content),
        }
    }
}

/// Include the location and the classification for debugging.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {:?} {}", self.location, self.kind, self)
    }
}

impl Token {
    pub fn new(content: String, kind: TokenKind, location: SourceLocation) -> Token {
        Token {
            content,
            kind,
            location,
        }
    }

    /// The source text of the token, or the literal's text for string literals.
    pub fn content(&self) -> &String {
        &self.content
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The dictionary key for this token.  Word names are not case sensitive.
    pub fn name(&self) -> String {
        self.content.to_ascii_uppercase()
    }

    /// The value of a number token.
    pub fn number(&self) -> Option<i64> {
        match self.kind {
            TokenKind::Number => self.content.parse().ok(),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }

    pub fn is_keyword(&self) -> bool {
        self.kind == TokenKind::Keyword
    }

    pub fn is_string(&self) -> bool {
        self.kind == TokenKind::StringLiteral
    }
}

lazy_static! {
    /// Words the interpreter handles structurally rather than through the dictionary.
    pub static ref KEYWORDS: HashSet<&'static str> = [
        ":", ";", "IF", "ELSE", "THEN", "DO", "LOOP", "+LOOP", "I", "J", "BEGIN", "UNTIL", "WHILE",
        "REPEAT", "VARIABLE", "CONSTANT",
    ]
    .into_iter()
    .collect();

    /// Symbolic built-in words.
    static ref OPERATORS: HashSet<&'static str> = [
        "+", "-", "*", "/", "*/", "/MOD", "=", "<>", "<", ">", "0=", "0<", "@", "!", "+!", "?",
        ".", ".S", "(", ")",
    ]
    .into_iter()
    .collect();
}

/// Check if the given character is considered whitespace.
fn is_whitespace(next: &char) -> bool {
    *next == ' ' || *next == '\t' || *next == '\r' || *next == '\n'
}

/// Parenthesis markers are always tokens of their own.
fn is_marker(next: &char) -> bool {
    *next == '(' || *next == ')'
}

/// The single character arithmetic operators.
fn is_operator_char(next: &char) -> bool {
    matches!(*next, '+' | '-' | '*' | '/')
}

/// Does the text look like a decimal integer literal?  An optional sign followed by digits.
fn is_number(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);

    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Decide what kind of token a finished word is.  Literals too large for a cell fall through to
/// identifiers and fail as unknown words.
fn classify(text: &str) -> TokenKind {
    let upper = text.to_ascii_uppercase();

    if is_number(text) && text.parse::<i64>().is_ok() {
        TokenKind::Number
    } else if KEYWORDS.contains(upper.as_str()) {
        TokenKind::Keyword
    } else if OPERATORS.contains(upper.as_str()) {
        TokenKind::Operator
    } else {
        TokenKind::Identifier
    }
}

/// The word currently being accumulated by the tokenizer.
struct PendingWord {
    text: String,
    location: SourceLocation,
}

impl PendingWord {
    fn new() -> PendingWord {
        PendingWord {
            text: String::new(),
            location: SourceLocation::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Add a character, remembering where the word started.
    fn push(&mut self, next: char, location: &SourceLocation) {
        if self.is_empty() {
            self.location = location.clone();
        }

        self.text.push(next);
    }

    /// An operator character splits off from text that already holds a letter or digit.  Text made
    /// only of symbols keeps growing, so `*/` and `+!` stay whole.
    fn closes_on_operator(&self) -> bool {
        self.text.chars().any(|c| c.is_alphanumeric())
    }

    /// Emit the accumulated word, if any, and start over.
    fn flush(&mut self, tokens: &mut TokenList) {
        if !self.is_empty() {
            let text = std::mem::take(&mut self.text);
            let kind = classify(&text);

            tokens.push(Token::new(text, kind, self.location.clone()));
        }
    }

    fn clear(&mut self) {
        self.text.clear();
    }
}

/// Skip the remainder of the current line, including the newline itself.
fn skip_line(buffer: &mut SourceBuffer) {
    while let Some(next) = buffer.next_char() {
        if next == '\n' {
            break;
        }
    }
}

/// Read the text of a `."` literal.  The opening quote has already been consumed.  One delimiting
/// whitespace character is dropped, then everything up to the closing quote is taken verbatim.  An
/// unterminated literal runs to the end of the input.
fn process_string(buffer: &mut SourceBuffer) -> String {
    let mut text = String::new();

    if let Some(next) = buffer.peek_next()
        && is_whitespace(&next)
    {
        let _ = buffer.next_char();
    }

    while let Some(next) = buffer.next_char() {
        if next == '"' {
            break;
        }

        text.push(next);
    }

    text
}

/// Tokenize the source code from a string.  The path is used to tag token locations, for example
/// "\<repl\>" for interactive input.
///
/// Lexical shape never fails here, questionable words are left for the interpreter to reject.
pub fn tokenize_from_source(path: &str, source: &str) -> error::Result<TokenList> {
    let mut buffer = SourceBuffer::new(path, source);
    let mut token_list = TokenList::new();
    let mut pending = PendingWord::new();

    while let Some(next) = buffer.peek_next() {
        let location = buffer.location().clone();

        if is_whitespace(&next) {
            // A lone backslash comments out the rest of the line.
            if pending.text == "\\" {
                pending.clear();
                skip_line(&mut buffer);
                continue;
            }

            pending.flush(&mut token_list);
            let _ = buffer.next_char();
        } else if is_marker(&next) {
            pending.flush(&mut token_list);
            let _ = buffer.next_char();

            token_list.push(Token::new(next.to_string(), TokenKind::Operator, location));
        } else if is_operator_char(&next) && pending.closes_on_operator() {
            pending.flush(&mut token_list);
            let _ = buffer.next_char();

            token_list.push(Token::new(next.to_string(), TokenKind::Operator, location));
        } else if next == '"' && pending.text == "." {
            let start = pending.location.clone();

            pending.clear();
            let _ = buffer.next_char();

            let text = process_string(&mut buffer);
            token_list.push(Token::new(text, TokenKind::StringLiteral, start));
        } else {
            let _ = buffer.next_char();
            pending.push(next, &location);
        }
    }

    if pending.text == "\\" {
        pending.clear();
    }

    pending.flush(&mut token_list);

    Ok(token_list)
}

/// Load the code from a file and then tokenize it.
pub fn tokenize_from_file(path: &str) -> error::Result<TokenList> {
    match read_to_string(path) {
        Ok(source) => tokenize_from_source(path, &source),
        Err(error) => ScriptError::new_as_result(
            ErrorKind::Tokenize,
            None,
            format!("Could not read file {}: {}", path, error),
            None,
        ),
    }
}

/// Tokenize interactive input.
pub fn tokenize(source: &str) -> error::Result<TokenList> {
    tokenize_from_source("<input>", source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(source: &str) -> Vec<String> {
        tokenize(source)
            .unwrap()
            .iter()
            .map(|token| token.content().clone())
            .collect()
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().iter().map(|token| token.kind()).collect()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(contents("1 2   +\n\tDUP"), vec!["1", "2", "+", "DUP"]);
    }

    #[test]
    fn classifies_tokens() {
        assert_eq!(
            kinds("42 -7 + IF foo <>"),
            vec![
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Operator,
            ]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(kinds("if Loop"), vec![TokenKind::Keyword, TokenKind::Keyword]);
    }

    #[test]
    fn operators_split_from_preceding_words() {
        assert_eq!(contents("1+ 5-3 x*y"), vec!["1", "+", "5", "-", "3", "x", "*", "y"]);
    }

    #[test]
    fn leading_operators_stay_in_the_word() {
        assert_eq!(contents("+! */ /MOD -ROT -12"), vec!["+!", "*/", "/MOD", "-ROT", "-12"]);
        assert_eq!(kinds("-12")[0], TokenKind::Number);
    }

    #[test]
    fn markers_are_their_own_tokens() {
        assert_eq!(contents("(comment) x"), vec!["(", "comment", ")", "x"]);
    }

    #[test]
    fn reads_print_string_literals() {
        let tokens = tokenize(".\" Hello, world!\" CR").unwrap();

        assert_eq!(tokens.len(), 2);
        assert!(tokens[0].is_string());
        assert_eq!(tokens[0].content(), "Hello, world!");
        assert_eq!(tokens[1].content(), "CR");
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let tokens = tokenize(".\" open").unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].content(), "open");
    }

    #[test]
    fn line_comments_are_dropped() {
        assert_eq!(contents("1 \\ ignored 2\n3"), vec!["1", "3"]);
        assert_eq!(contents("1 \\"), vec!["1"]);
    }

    #[test]
    fn huge_literals_are_identifiers() {
        assert_eq!(kinds("99999999999999999999"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn records_locations() {
        let tokens = tokenize_from_source("<repl>", "1\n  DUP").unwrap();
        let location = tokens[1].location();

        assert_eq!(location.path(), "<repl>");
        assert_eq!(location.line(), 2);
        assert_eq!(location.column(), 3);
    }

    #[test]
    fn missing_file_is_a_tokenize_error() {
        let error = tokenize_from_file("/definitely/not/here.f").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Tokenize);
    }
}
