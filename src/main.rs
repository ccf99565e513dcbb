use iceoryx2_bb_log::{LogLevel, set_log_level_from_env_or, warn};
use std::{
    env::args,
    io::{self, BufRead, Write},
};
use tforth::{
    CodeManagement, ForthInterpreter, Interpreter, InterpreterConfig, InterpreterOutput,
    runtime::error,
};

/// Run a script file, printing whatever it wrote.  The text written before a failure is still
/// shown.
fn run_script(interpreter: &mut ForthInterpreter, path: &str) -> error::Result<()> {
    match interpreter.process_source_file(path) {
        Ok(evaluation) => {
            print!("{}", evaluation.output);
            io::stdout().flush()?;
            Ok(())
        }

        Err(error) => {
            print!("{}", interpreter.output());
            warn!("Script {} aborted: {}", path, error);
            Err(error)
        }
    }
}

/// Read lines from standard input until it closes.  Each line is evaluated on its own and answered
/// with its output and ` ok`, or with the error that aborted it.
fn repl(interpreter: &mut ForthInterpreter) -> error::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;

        match interpreter.process_source("<repl>", &line) {
            Ok(evaluation) => {
                let prompt = if interpreter.is_defining() { " compiled" } else { " ok" };
                writeln!(stdout, "{}{}", evaluation.output, prompt)?;
            }

            Err(error) => {
                warn!("Evaluation aborted: {}", error);
                writeln!(stdout, "{}{}", interpreter.output(), error)?;
            }
        }

        stdout.flush()?;
    }

    Ok(())
}

fn main() -> error::Result<()> {
    set_log_level_from_env_or(LogLevel::Warn);

    // Create the interpreter with its limits taken from the environment.  The built-in words are
    // registered as part of creation.
    let mut interpreter = ForthInterpreter::with_config(InterpreterConfig::from_env());

    // With a script argument run the script, otherwise start the REPL.
    let args: Vec<String> = args().collect();

    match args.get(1).map(String::as_str) {
        Some("--words") => {
            print!("{}", interpreter.dictionary());
            Ok(())
        }

        Some(path) => run_script(&mut interpreter, path),

        None => repl(&mut interpreter),
    }
}
