use crate::{
    lang::{
        code::{Code, Instruction, Keyword, Op, ScriptWord},
        tokenizing::{Token, TokenKind},
    },
    runtime::{
        data_structures::dictionary::{Dictionary, WordKind},
        error::{self, ErrorKind, ScriptError},
    },
};

/// Where a block of code is going to run.  Top level code may open and close definitions, the body
/// of a definition may not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Code submitted directly.  `defining` is set when a definition left open by an earlier
    /// evaluation is still capturing.
    TopLevel { defining: bool },

    /// The body of a colon definition.
    Body,
}

/// The construct kinds tracked while checking structure.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Construct {
    If,
    IfElse,
    Do,
    Begin,
    BeginWhile,
}

impl Construct {
    /// How the construct is closed, for error messages.
    fn closer(&self) -> &'static str {
        match self {
            Construct::If | Construct::IfElse => "THEN",
            Construct::Do => "LOOP",
            Construct::Begin => "UNTIL",
            Construct::BeginWhile => "REPEAT",
        }
    }
}

fn control_error<T>(instruction: &Instruction, message: impl Into<String>) -> error::Result<T> {
    ScriptError::new_as_result(
        ErrorKind::ControlFlow,
        Some(instruction.location().clone()),
        message.into(),
        None,
    )
}

fn is_close_marker(token: &Token) -> bool {
    token.kind() == TokenKind::Operator && token.content() == ")"
}

/// Turn a token list into instructions.  Comments between `(` and `)` are dropped, and the token
/// following a defining word becomes its name operand.  Words are left as lookups.
pub fn lower_tokens(tokens: &[Token]) -> error::Result<Code> {
    let mut code = Code::with_capacity(tokens.len());
    let mut index = 0;

    while index < tokens.len() {
        let token = &tokens[index];

        match token.kind() {
            TokenKind::Operator if token.content() == "(" => {
                // Skip to the closing marker.  An unclosed comment runs to the end of the input.
                while index < tokens.len() && !is_close_marker(&tokens[index]) {
                    index += 1;
                }
            }

            TokenKind::Operator if is_close_marker(token) => {
                return ScriptError::new_as_result(
                    ErrorKind::ControlFlow,
                    Some(token.location().clone()),
                    "Found ')' without an opening '('.".to_string(),
                    None,
                );
            }

            TokenKind::Number => {
                let value = token.number().unwrap_or_default();
                code.push(Instruction::new(token.clone(), Op::Literal(value)));
            }

            TokenKind::StringLiteral => {
                code.push(Instruction::new(token.clone(), Op::Print(token.content().clone())));
            }

            TokenKind::Keyword => match Keyword::from_name(&token.name()) {
                Some(keyword) => {
                    code.push(Instruction::new(token.clone(), Op::Control(keyword)));

                    if keyword.takes_name() && index + 1 < tokens.len() {
                        index += 1;

                        let name_token = &tokens[index];
                        let name = Op::Name(name_token.name());

                        code.push(Instruction::new(name_token.clone(), name));
                    }
                }
                None => code.push(Instruction::new(token.clone(), Op::Lookup(token.name()))),
            },

            TokenKind::Operator | TokenKind::Identifier => {
                code.push(Instruction::new(token.clone(), Op::Lookup(token.name())));
            }
        }

        index += 1;
    }

    Ok(code)
}

/// Bind every lookup in a definition body to the dictionary entry it names right now.  Constants
/// are inlined as values and variables as addresses, so later redefinitions leave this body alone.
pub fn bind_code(code: Code, dictionary: &Dictionary) -> error::Result<Code> {
    let mut bound = Code::with_capacity(code.len());

    for instruction in code {
        let op = match &instruction.op {
            Op::Lookup(name) => match dictionary.try_get(name) {
                Some(word) => match &word.kind {
                    WordKind::Builtin(builtin) => Op::Builtin(*builtin),
                    WordKind::Scripted(script) => Op::Call(script.clone()),
                    WordKind::Constant(value) => Op::Constant(*value),
                    WordKind::Variable(address) => Op::Variable(*address),
                },
                None => {
                    return ScriptError::new_as_result(
                        ErrorKind::UnknownWord,
                        Some(instruction.location().clone()),
                        format!("Word {} not found.", instruction.token.content()),
                        None,
                    );
                }
            },
            _ => instruction.op.clone(),
        };

        bound.push(Instruction::new(instruction.token, op));
    }

    Ok(bound)
}

/// Make sure that a definition's name operand is present.
fn check_name(code: &Code, index: usize) -> error::Result<()> {
    match code.get(index + 1) {
        Some(Instruction { op: Op::Name(_), .. }) => Ok(()),
        _ => control_error(
            &code[index],
            format!("Expected a name after {}.", code[index].token.content()),
        ),
    }
}

/// Check that the control constructs of a block are balanced and that definitions are well formed.
/// This runs before any of the code executes, so a malformed block leaves no trace.
///
/// Inside a definition only the `:` `;` pairing is checked, the body itself is checked when the
/// definition is committed.
pub fn check_structure(code: &Code, scope: Scope) -> error::Result<()> {
    let mut constructs: Vec<(Construct, usize)> = Vec::new();
    let mut defining = matches!(scope, Scope::TopLevel { defining: true });

    for (index, instruction) in code.iter().enumerate() {
        let Some(keyword) = instruction.keyword() else {
            continue;
        };

        match keyword {
            Keyword::Colon => {
                if scope == Scope::Body || defining {
                    return control_error(instruction, "Nested definitions are not allowed.");
                }

                if let Some((construct, _)) = constructs.last() {
                    return control_error(
                        instruction,
                        format!(
                            "Definition started before {} closed an open construct.",
                            construct.closer()
                        ),
                    );
                }

                check_name(code, index)?;
                defining = true;
            }

            Keyword::Semicolon => {
                if !defining {
                    return control_error(instruction, "Found ; without a matching :.");
                }

                defining = false;
            }

            Keyword::Variable | Keyword::Constant => check_name(code, index)?,

            _ if defining => {}

            Keyword::If => constructs.push((Construct::If, index)),

            Keyword::Else => match constructs.last_mut() {
                Some((construct @ Construct::If, _)) => *construct = Construct::IfElse,
                _ => return control_error(instruction, "Found ELSE without a matching IF."),
            },

            Keyword::Then => match constructs.last() {
                Some((Construct::If | Construct::IfElse, _)) => {
                    let _ = constructs.pop();
                }
                _ => return control_error(instruction, "Found THEN without a matching IF."),
            },

            Keyword::Do => constructs.push((Construct::Do, index)),

            Keyword::Loop | Keyword::PlusLoop => match constructs.last() {
                Some((Construct::Do, _)) => {
                    let _ = constructs.pop();
                }
                _ => {
                    return control_error(
                        instruction,
                        format!("Found {} without a matching DO.", instruction.token.name()),
                    );
                }
            },

            Keyword::Begin => constructs.push((Construct::Begin, index)),

            Keyword::Until => match constructs.last() {
                Some((Construct::Begin, _)) => {
                    let _ = constructs.pop();
                }
                _ => return control_error(instruction, "Found UNTIL without a matching BEGIN."),
            },

            Keyword::While => match constructs.last_mut() {
                Some((construct @ Construct::Begin, _)) => *construct = Construct::BeginWhile,
                _ => return control_error(instruction, "Found WHILE without a matching BEGIN."),
            },

            Keyword::Repeat => match constructs.last() {
                Some((Construct::BeginWhile, _)) => {
                    let _ = constructs.pop();
                }
                _ => {
                    return control_error(
                        instruction,
                        "Found REPEAT without a matching BEGIN ... WHILE.",
                    );
                }
            },

            Keyword::I | Keyword::J => {}
        }
    }

    if let Some((construct, index)) = constructs.last() {
        return control_error(
            &code[*index],
            format!("Missing {} for {}.", construct.closer(), code[*index].token.name()),
        );
    }

    Ok(())
}

/// Compile the captured tokens of a definition into a bound, checked word.
pub fn compile_definition(
    name: String,
    token: &Token,
    body: &[Token],
    dictionary: &Dictionary,
) -> error::Result<ScriptWord> {
    let code = lower_tokens(body)?;
    check_structure(&code, Scope::Body)?;

    let code = bind_code(code, dictionary)?;

    Ok(ScriptWord {
        name,
        location: token.location().clone(),
        code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::tokenizing::tokenize;

    fn check(source: &str) -> error::Result<()> {
        let code = lower_tokens(&tokenize(source).unwrap())?;
        check_structure(&code, Scope::TopLevel { defining: false })
    }

    #[test]
    fn comments_are_removed() {
        let code = lower_tokens(&tokenize("1 ( two three ) 4").unwrap()).unwrap();

        assert_eq!(code.len(), 2);
    }

    #[test]
    fn defining_words_take_a_name() {
        let code = lower_tokens(&tokenize("VARIABLE count").unwrap()).unwrap();

        assert!(matches!(code[1].op, Op::Name(ref name) if name == "COUNT"));
    }

    #[test]
    fn balanced_structures_pass() {
        assert!(check("1 IF 2 ELSE 3 THEN").is_ok());
        assert!(check("5 0 DO I 2 MOD IF I THEN LOOP").is_ok());
        assert!(check("BEGIN 1 WHILE 2 REPEAT BEGIN 1 UNTIL").is_ok());
        assert!(check(": f IF ; 1").is_ok());
    }

    #[test]
    fn unbalanced_structures_fail() {
        let sources = [
            "IF 1 THEN THEN",
            "5 LOOP",
            "1 IF",
            "ELSE",
            "BEGIN 1 REPEAT",
            "; 1",
            ": a : b ;",
        ];

        for source in sources {
            let error = check(source).unwrap_err();

            assert_eq!(error.kind(), ErrorKind::ControlFlow, "{}", source);
        }
    }

    #[test]
    fn missing_names_fail() {
        assert_eq!(check("VARIABLE").unwrap_err().kind(), ErrorKind::ControlFlow);
        assert_eq!(check(":").unwrap_err().kind(), ErrorKind::ControlFlow);
    }

    #[test]
    fn stray_close_marker_fails() {
        let error = lower_tokens(&tokenize("1 )").unwrap()).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ControlFlow);
    }
}
