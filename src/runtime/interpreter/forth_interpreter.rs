use crate::{
    lang::{
        code::{Code, Keyword, Op, ScriptWord, pretty_print_code},
        compilation::{Scope, check_structure, compile_definition, lower_tokens},
        source_buffer::SourceLocation,
        tokenizing::{Token, TokenKind, TokenList, tokenize_from_file, tokenize_from_source},
    },
    runtime::{
        built_ins::register_builtin_words,
        config::InterpreterConfig,
        data_structures::{
            control_stack::ControlStack,
            dictionary::{Dictionary, WordInfo, WordKind},
            memory_segment::MemorySegment,
            number_stack::NumberStack,
        },
        error::{self, ErrorKind, ScriptError, script_error, script_error_str},
        interpreter::{
            CallItem, CallStack, CodeManagement, Evaluation, Interpreter, InterpreterMemory,
            InterpreterOutput, InterpreterStack, WordManagement, control_flow::execute_control,
        },
    },
};
use iceoryx2_bb_log::debug;
use std::rc::Rc;

/// A colon definition that is still collecting its body.
struct PendingDefinition {
    /// The name being defined.
    name: String,

    /// The token holding the name, the definition's location.
    token: Token,

    /// The body tokens captured so far.
    body: TokenList,
}

/// The core interpreter implementation.  All of the state of one session lives here, so several
/// interpreters can run side by side without sharing anything.
pub struct ForthInterpreter {
    /// The configured limits.
    config: InterpreterConfig,

    /// The number stack used by the interpreter.
    stack: NumberStack,

    /// The cells backing variables and allotted storage.
    memory: MemorySegment,

    /// Markers for the running IF, DO and BEGIN constructs.
    control: ControlStack,

    /// The dictionary of words known by the interpreter.
    dictionary: Dictionary,

    /// Text written by the output words during the current evaluation.
    output: String,

    /// The last known location execution has reached in the original source code.
    current_location: Option<SourceLocation>,

    /// The call stack used to keep track of the current execution context.
    call_stack: CallStack,

    /// Set while capturing a colon definition, possibly across several evaluations.
    pending: Option<PendingDefinition>,
}

impl InterpreterStack for ForthInterpreter {
    fn stack(&self) -> &NumberStack {
        &self.stack
    }

    fn stack_mut(&mut self) -> &mut NumberStack {
        &mut self.stack
    }

    fn push(&mut self, value: i64) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<i64> {
        self.stack.pop()
    }

    fn require(&self, word: &str, count: usize) -> error::Result<()> {
        self.stack.require(word, count)
    }
}

impl InterpreterMemory for ForthInterpreter {
    fn memory(&self) -> &MemorySegment {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut MemorySegment {
        &mut self.memory
    }
}

impl InterpreterOutput for ForthInterpreter {
    fn write_output(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn output(&self) -> &str {
        &self.output
    }
}

impl Interpreter for ForthInterpreter {
    fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn control_stack(&self) -> &ControlStack {
        &self.control
    }

    fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    fn is_defining(&self) -> bool {
        self.pending.is_some()
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.control.clear();
        self.output.clear();
        self.call_stack.clear();
        self.current_location = None;
        self.pending = None;
    }
}

impl CodeManagement for ForthInterpreter {
    fn process_source_file(&mut self, path: &str) -> error::Result<Evaluation> {
        let tokens = tokenize_from_file(path)?;
        self.evaluate(&tokens)
    }

    fn process_source(&mut self, path: &str, source: &str) -> error::Result<Evaluation> {
        let tokens = tokenize_from_source(path, source)?;
        self.evaluate(&tokens)
    }

    fn evaluate(&mut self, tokens: &TokenList) -> error::Result<Evaluation> {
        self.output.clear();

        let result = lower_tokens(tokens).and_then(|code| {
            check_structure(&code, Scope::TopLevel { defining: self.pending.is_some() })?;
            self.execute_code("<top level>", &code)
        });

        match result {
            Ok(()) => Ok(Evaluation {
                stack: self.stack.as_slice().to_vec(),
                output: self.output.clone(),
            }),

            Err(error) => {
                self.abort();
                Err(error)
            }
        }
    }

    fn execute_code(&mut self, name: &str, code: &Code) -> error::Result<()> {
        // Markers below this height belong to whoever called us.
        let floor = self.control.len();
        let mut pc = 0;

        while pc < code.len() {
            let instruction = &code[pc];

            self.current_location = Some(instruction.location().clone());

            // In capture mode everything up to the ; becomes part of the body.
            if self.pending.is_some() {
                let result = match instruction.keyword() {
                    Some(Keyword::Semicolon) => self.commit_definition(),
                    Some(Keyword::Colon) => script_error_str(
                        self,
                        ErrorKind::ControlFlow,
                        "Nested definitions are not allowed.",
                    ),
                    _ => {
                        if let Some(pending) = &mut self.pending {
                            pending.body.push(instruction.token.clone());
                        }

                        Ok(())
                    }
                };

                if let Err(error) = result {
                    return Err(error.located(instruction.location(), &self.call_stack));
                }

                pc += 1;
                continue;
            }

            let result: error::Result<usize> = match &instruction.op {
                Op::Literal(value) | Op::Constant(value) => {
                    self.stack.push(*value);
                    Ok(pc + 1)
                }

                Op::Variable(address) => {
                    self.stack.push(*address as i64);
                    Ok(pc + 1)
                }

                Op::Print(text) => {
                    self.output.push_str(text);
                    Ok(pc + 1)
                }

                Op::Builtin(builtin) => (builtin.handler())(self).map(|_| pc + 1),

                Op::Call(word) => self
                    .execute_script_word(instruction.location(), word)
                    .map(|_| pc + 1),

                Op::Lookup(word_name) => self
                    .execute_lookup(instruction.location(), word_name)
                    .map(|_| pc + 1),

                Op::Control(Keyword::Colon) => self.start_definition(code, pc).map(|_| pc + 2),

                Op::Control(Keyword::Semicolon) => {
                    script_error_str(self, ErrorKind::ControlFlow, "Found ; without a matching :.")
                }

                Op::Control(Keyword::Variable) => self.define_variable(code, pc).map(|_| pc + 2),

                Op::Control(Keyword::Constant) => self.define_constant(code, pc).map(|_| pc + 2),

                Op::Control(keyword) => {
                    execute_control(*keyword, code, pc, floor, &mut self.stack, &mut self.control)
                }

                Op::Name(name) => script_error(
                    self,
                    ErrorKind::ControlFlow,
                    format!("Found the name {} without a defining word.", name),
                ),
            };

            match result {
                Ok(next) => pc = next,
                Err(error) => return Err(error.located(instruction.location(), &self.call_stack)),
            }
        }

        if self.control.len() > floor {
            self.control.truncate(floor);

            return ScriptError::new_as_result(
                ErrorKind::ControlFlow,
                self.current_location.clone(),
                format!("Unclosed control construct at the end of {}.", name),
                Some(self.call_stack.clone()),
            );
        }

        Ok(())
    }
}

impl WordManagement for ForthInterpreter {
    fn current_location(&self) -> &Option<SourceLocation> {
        &self.current_location
    }

    fn add_word(
        &mut self,
        file: String,
        line: usize,
        column: usize,
        name: String,
        kind: WordKind,
        description: String,
        signature: String,
    ) {
        let location = SourceLocation::new_from_info(&file, line, column);
        let mut info = WordInfo::new(location, name.to_ascii_uppercase(), kind);

        info.description = description;
        info.signature = signature;

        self.dictionary.insert(info);
    }

    fn find_word(&self, word: &str) -> Option<&WordInfo> {
        self.dictionary.try_get(&word.to_ascii_uppercase())
    }

    fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }

    fn call_stack_push(&mut self, name: String, location: SourceLocation) {
        self.call_stack.push(CallItem::new(name, location));
    }

    fn call_stack_pop(&mut self) -> error::Result<()> {
        if self.call_stack.is_empty() {
            return script_error_str(self, ErrorKind::ControlFlow, "Call stack underflow.");
        }

        let _ = self.call_stack.pop();
        Ok(())
    }
}

impl ForthInterpreter {
    /// Create an interpreter with the default configuration and every built-in word registered.
    pub fn new() -> ForthInterpreter {
        ForthInterpreter::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> ForthInterpreter {
        let memory = MemorySegment::new(config.memory_limit);

        let mut interpreter = ForthInterpreter {
            config,
            stack: NumberStack::new(),
            memory,
            control: ControlStack::new(),
            dictionary: Dictionary::new(),
            output: String::new(),
            current_location: None,
            call_stack: CallStack::with_capacity(40),
            pending: None,
        };

        register_builtin_words(&mut interpreter);
        interpreter
    }

    /// Throw away everything a failed evaluation left half done.  The number stack and memory are
    /// left as they were.
    fn abort(&mut self) {
        self.control.clear();
        self.call_stack.clear();
        self.pending = None;
    }

    /// The name operand of the defining word at `pc`.  Keywords, numbers and string literals can't
    /// be names.
    fn defined_name(&self, code: &Code, pc: usize) -> error::Result<(String, Token)> {
        let word = code[pc].token.name();

        match code.get(pc + 1) {
            Some(instruction) => match (&instruction.op, instruction.token.kind()) {
                (Op::Name(name), TokenKind::Identifier | TokenKind::Operator) => {
                    Ok((name.clone(), instruction.token.clone()))
                }

                (_, kind) => script_error(
                    self,
                    ErrorKind::ControlFlow,
                    format!("{} can not define the {:?} {}.", word, kind, instruction.token),
                ),
            },

            None => script_error(
                self,
                ErrorKind::ControlFlow,
                format!("Expected a name after {}.", word),
            ),
        }
    }

    fn start_definition(&mut self, code: &Code, pc: usize) -> error::Result<()> {
        let (name, token) = self.defined_name(code, pc)?;

        self.pending = Some(PendingDefinition {
            name,
            token,
            body: TokenList::new(),
        });

        Ok(())
    }

    /// Compile the captured body against the dictionary as it is right now and bind it.
    fn commit_definition(&mut self) -> error::Result<()> {
        let Some(pending) = self.pending.take() else {
            return script_error_str(self, ErrorKind::ControlFlow, "Found ; without a matching :.");
        };

        let word =
            compile_definition(pending.name, &pending.token, &pending.body, &self.dictionary)?;
        debug!("Defined word {}:\n{}", word.name, pretty_print_code(&word.code));

        let info = WordInfo::new(
            word.location.clone(),
            word.name.clone(),
            WordKind::Scripted(Rc::new(word)),
        );
        self.dictionary.insert(info);

        Ok(())
    }

    fn define_variable(&mut self, code: &Code, pc: usize) -> error::Result<()> {
        let (name, token) = self.defined_name(code, pc)?;
        let address = self.memory.allot(1)?;

        debug!("Variable {} reserved at address {}.", name, address);

        self.dictionary
            .insert(WordInfo::new(token.location().clone(), name, WordKind::Variable(address)));

        Ok(())
    }

    fn define_constant(&mut self, code: &Code, pc: usize) -> error::Result<()> {
        let (name, token) = self.defined_name(code, pc)?;

        self.stack.require("CONSTANT", 1)?;
        let value = self.stack.pop()?;

        debug!("Constant {} bound to {}.", name, value);

        self.dictionary
            .insert(WordInfo::new(token.location().clone(), name, WordKind::Constant(value)));

        Ok(())
    }

    /// Run a user word's body, tracking it on the call stack.
    fn execute_script_word(
        &mut self,
        location: &SourceLocation,
        word: &Rc<ScriptWord>,
    ) -> error::Result<()> {
        self.call_stack_push(word.name.clone(), location.clone());

        let result = self.execute_code(&word.name, &word.code);

        if result.is_ok() {
            self.call_stack_pop()?;
        }

        result
    }

    /// Resolve a top level word against the latest dictionary entry and run it.
    fn execute_lookup(&mut self, location: &SourceLocation, name: &str) -> error::Result<()> {
        let kind = match self.dictionary.try_get(name) {
            Some(info) => info.kind.clone(),
            None => {
                return script_error(
                    self,
                    ErrorKind::UnknownWord,
                    format!("Word {} not found.", name),
                );
            }
        };

        match kind {
            WordKind::Builtin(builtin) => (builtin.handler())(self),
            WordKind::Scripted(word) => self.execute_script_word(location, &word),
            WordKind::Variable(address) => {
                self.stack.push(address as i64);
                Ok(())
            }
            WordKind::Constant(value) => {
                self.stack.push(value);
                Ok(())
            }
        }
    }
}

impl Default for ForthInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::tokenizing::tokenize;

    fn run(interpreter: &mut ForthInterpreter, source: &str) -> error::Result<Evaluation> {
        interpreter.evaluate(&tokenize(source).unwrap())
    }

    #[test]
    fn definition_spans_evaluations() {
        let mut interpreter = ForthInterpreter::new();

        run(&mut interpreter, ": square").unwrap();
        assert!(interpreter.is_defining());

        run(&mut interpreter, "DUP * ;").unwrap();
        assert!(!interpreter.is_defining());

        assert_eq!(run(&mut interpreter, "7 square").unwrap().stack, vec![49]);
    }

    #[test]
    fn abort_discards_the_pending_definition() {
        let mut interpreter = ForthInterpreter::new();

        run(&mut interpreter, ": broken").unwrap();

        let error = run(&mut interpreter, "missing ;").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnknownWord);
        assert!(!interpreter.is_defining());
        assert!(interpreter.find_word("broken").is_none());
    }

    #[test]
    fn errors_inside_words_carry_the_call_stack() {
        let mut interpreter = ForthInterpreter::new();

        run(&mut interpreter, ": inner DROP ; : outer inner ;").unwrap();

        let error = run(&mut interpreter, "outer").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::StackUnderflow);
        assert_eq!(error.call_stack().as_ref().map(|stack| stack.len()), Some(2));
        assert!(interpreter.call_stack().is_empty());
    }

    #[test]
    fn loop_index_is_visible_inside_called_words() {
        let mut interpreter = ForthInterpreter::new();

        run(&mut interpreter, ": show I . ;").unwrap();

        assert_eq!(run(&mut interpreter, "3 0 DO show LOOP").unwrap().output, "0 1 2 ");
    }

    #[test]
    fn memory_limit_is_configurable() {
        let config = InterpreterConfig::default().with_memory_limit(2);
        let mut interpreter = ForthInterpreter::with_config(config);

        run(&mut interpreter, "VARIABLE a VARIABLE b").unwrap();

        assert_eq!(run(&mut interpreter, "VARIABLE c").unwrap_err().kind(), ErrorKind::Memory);
        assert_eq!(interpreter.config().memory_limit, 2);
    }
}
