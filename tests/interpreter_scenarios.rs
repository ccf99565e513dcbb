use tforth::{
    CodeManagement, ErrorKind, Evaluation, ForthInterpreter, Interpreter, InterpreterConfig,
    InterpreterStack, Result, WordManagement, tokenize,
};

fn eval(interpreter: &mut ForthInterpreter, source: &str) -> Result<Evaluation> {
    interpreter.evaluate(&tokenize(source)?)
}

fn stack_of(source: &str) -> Vec<i64> {
    eval(&mut ForthInterpreter::new(), source).unwrap().stack
}

fn output_of(source: &str) -> String {
    eval(&mut ForthInterpreter::new(), source).unwrap().output
}

#[test]
fn pops_come_back_in_reverse_order() {
    assert_eq!(output_of("1 2 3 4 5 . . . . ."), "5 4 3 2 1 ");
}

#[test]
fn dup_drop_leaves_the_stack_unchanged() {
    assert_eq!(stack_of("1 2 3 DUP DROP"), vec![1, 2, 3]);
}

#[test]
fn swap_is_its_own_inverse() {
    assert_eq!(stack_of("1 2 3 SWAP SWAP"), vec![1, 2, 3]);
}

#[test]
fn empty_stack_always_underflows() {
    let mut interpreter = ForthInterpreter::new();

    for word in ["DROP", ".", "DUP", "@"] {
        let error = eval(&mut interpreter, word).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::StackUnderflow, "{}", word);
        assert!(interpreter.stack().is_empty());
    }
}

#[test]
fn division_by_zero_leaves_the_operands() {
    let mut interpreter = ForthInterpreter::new();

    for source in ["7 0 /", "7 0 MOD", "7 0 /MOD"] {
        let error = eval(&mut interpreter, source).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::DivisionByZero);
        assert_eq!(interpreter.stack().as_slice(), &[7, 0]);

        interpreter.reset();
    }
}

#[test]
fn variables_fetch_and_store() {
    let mut interpreter = ForthInterpreter::new();

    assert_eq!(eval(&mut interpreter, "VARIABLE x x @").unwrap().stack, vec![0]);
    assert_eq!(eval(&mut interpreter, "DROP 5 x ! x @").unwrap().stack, vec![5]);
}

#[test]
fn compiled_words_keep_the_constant_they_were_built_with() {
    let mut interpreter = ForthInterpreter::new();

    assert_eq!(eval(&mut interpreter, "3 CONSTANT three three").unwrap().stack, vec![3]);

    eval(&mut interpreter, "CLEARSTACK : show three ;").unwrap();
    eval(&mut interpreter, "VARIABLE three 9 three !").unwrap();

    assert_eq!(eval(&mut interpreter, "show three @").unwrap().stack, vec![3, 9]);
}

#[test]
fn scenario_stacks() {
    assert_eq!(stack_of("1 2 +"), vec![3]);
    assert_eq!(stack_of("5 3 -"), vec![2]);
    assert_eq!(stack_of("2 DUP *"), vec![4]);
    assert_eq!(stack_of("10 0 = IF 99 ELSE 0 THEN"), vec![0]);
}

#[test]
fn counted_loop_prints_each_index() {
    let evaluation = eval(&mut ForthInterpreter::new(), "5 0 DO I . LOOP").unwrap();

    assert_eq!(evaluation.output, "0 1 2 3 4 ");
    assert!(evaluation.stack.is_empty());
}

#[test]
fn do_takes_the_index_from_the_top() {
    // `limit index DO`: with the index already at the limit the body runs once.
    assert_eq!(stack_of("0 5 DO I LOOP"), vec![5]);
    assert_eq!(output_of("0 5 DO I . LOOP"), "5 ");
}

#[test]
fn unmatched_constructs_leave_an_empty_control_stack() {
    let mut interpreter = ForthInterpreter::new();

    for source in ["IF 1 THEN THEN", "5 LOOP"] {
        let error = eval(&mut interpreter, source).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ControlFlow, "{}", source);
        assert!(interpreter.control_stack().is_empty());
    }
}

#[test]
fn errors_inside_running_constructs_clear_their_markers() {
    let mut interpreter = ForthInterpreter::new();

    let error = eval(&mut interpreter, "5 0 DO I 3 = IF 1 0 / THEN LOOP").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::DivisionByZero);
    assert!(interpreter.control_stack().is_empty());
    assert_eq!(interpreter.stack().as_slice(), &[1, 0]);

    // The session keeps working after the abort.
    assert_eq!(eval(&mut interpreter, "CLEARSTACK 2 0 DO I LOOP").unwrap().stack, vec![0, 1]);
}

#[test]
fn abort_keeps_the_stack_reached_so_far() {
    let mut interpreter = ForthInterpreter::new();

    let error = eval(&mut interpreter, "1 2 nothing 3").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnknownWord);
    assert_eq!(interpreter.stack().as_slice(), &[1, 2]);
}

#[test]
fn errors_report_where_they_happened() {
    let mut interpreter = ForthInterpreter::new();

    let error = interpreter.process_source("<check>", "1 2\n  nothing").unwrap_err();
    let location = error.location().clone().unwrap();

    assert_eq!(location.path(), "<check>");
    assert_eq!(location.line(), 2);
    assert!(error.to_string().contains("Unknown word"));
    assert!(error.to_string().contains("NOTHING"));
}

#[test]
fn definitions_are_latest_wins() {
    assert_eq!(stack_of(": f 1 ; : g f ; : f 2 ; f g"), vec![2, 1]);
}

#[test]
fn built_ins_can_be_shadowed() {
    assert_eq!(stack_of(": DUP 100 ; 1 DUP"), vec![1, 100]);
}

#[test]
fn word_names_ignore_case() {
    assert_eq!(stack_of("1 dup Dup DUP"), vec![1, 1, 1, 1]);
    assert_eq!(stack_of(": Twice 2 * ; 4 TWICE twice"), vec![16]);
}

#[test]
fn definitions_can_span_lines() {
    let mut interpreter = ForthInterpreter::new();

    eval(&mut interpreter, ": greet").unwrap();
    eval(&mut interpreter, "  .\" Hello world!\" CR").unwrap();
    eval(&mut interpreter, ";").unwrap();

    assert!(!interpreter.is_defining());
    let evaluation = eval(&mut interpreter, "greet greet").unwrap();

    assert_eq!(evaluation.output, "Hello world!\nHello world!\n");
}

#[test]
fn comments_are_ignored() {
    assert_eq!(stack_of("1 ( 2 ) 3 \\ 4 5\n6"), vec![1, 3, 6]);
}

#[test]
fn output_words() {
    assert_eq!(output_of("1 2 .S"), "<2> 1 2 ");
    assert_eq!(output_of("72 EMIT 105 EMIT SPACE 1 ."), "Hi 1 ");
    assert_eq!(output_of("VARIABLE x 42 x ! x ?"), "42 ");
    assert_eq!(output_of(".\" no space\""), "no space");
    assert!(output_of("WORDS").contains("DUP"));
}

#[test]
fn output_is_per_evaluation() {
    let mut interpreter = ForthInterpreter::new();

    assert_eq!(eval(&mut interpreter, "1 .").unwrap().output, "1 ");
    assert_eq!(eval(&mut interpreter, "2 .").unwrap().output, "2 ");
}

#[test]
fn loops_and_conditionals_nest() {
    assert_eq!(output_of("6 0 DO I 2 MOD 0= IF I . THEN LOOP"), "0 2 4 ");
    assert_eq!(output_of(": countdown BEGIN DUP . 1 - DUP 0= UNTIL DROP ; 3 countdown"), "3 2 1 ");
}

#[test]
fn allotted_cells_are_usable() {
    let mut interpreter = ForthInterpreter::new();

    eval(&mut interpreter, "VARIABLE buffer 2 CELLS ALLOT").unwrap();
    eval(&mut interpreter, "10 buffer ! 20 buffer 1 + ! 30 buffer 2 + !").unwrap();

    let evaluation = eval(&mut interpreter, "buffer @ buffer 1 + @ buffer 2 + @ HERE").unwrap();

    assert_eq!(evaluation.stack, vec![10, 20, 30, 3]);
}

#[test]
fn memory_limit_bounds_growth() {
    let config = InterpreterConfig::default().with_memory_limit(4);
    let mut interpreter = ForthInterpreter::with_config(config);

    eval(&mut interpreter, "3 ALLOT").unwrap();

    assert_eq!(eval(&mut interpreter, "2 ALLOT").unwrap_err().kind(), ErrorKind::Memory);
    assert_eq!(eval(&mut interpreter, "CLEARSTACK VARIABLE last last").unwrap().stack, vec![3]);
}

#[test]
fn reset_keeps_the_dictionary_and_memory() {
    let mut interpreter = ForthInterpreter::new();

    eval(&mut interpreter, "VARIABLE v 5 v ! 1 2 3 : open").unwrap();
    interpreter.reset();

    assert!(interpreter.stack().is_empty());
    assert!(!interpreter.is_defining());
    assert_eq!(eval(&mut interpreter, "v @").unwrap().stack, vec![5]);
}

#[test]
fn sessions_are_independent() {
    let mut first = ForthInterpreter::new();
    let mut second = ForthInterpreter::new();

    eval(&mut first, ": onlyhere 1 ; 7").unwrap();

    assert!(first.find_word("onlyhere").is_some());
    assert!(second.find_word("onlyhere").is_none());
    assert!(eval(&mut second, "onlyhere").is_err());
    assert_eq!(second.stack().depth(), 0);
}
