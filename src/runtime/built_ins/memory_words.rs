use crate::{
    add_builtin_word,
    runtime::{data_structures::memory_segment::CELL_SIZE, error, interpreter::Interpreter},
};
use iceoryx2_bb_log::debug;

/// Read the cell at an address.  The address stays on the stack until the read has succeeded.
///
/// Signature: `address -- value`
fn word_fetch(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("@", 1)?;

    let address = interpreter.stack().peek()?;
    let value = interpreter.memory().fetch(address)?;

    let _ = interpreter.pop()?;
    interpreter.push(value);

    Ok(())
}

/// Signature: `value address -- `
fn word_store(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("!", 2)?;

    let address = interpreter.stack().peek()?;
    let value = interpreter.stack().pick(1)?;

    interpreter.memory_mut().store(address, value)?;

    let _ = interpreter.pop()?;
    let _ = interpreter.pop()?;

    Ok(())
}

/// Add to the value already in a cell.
///
/// Signature: `n address -- `
fn word_add_store(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("+!", 2)?;

    let address = interpreter.stack().peek()?;
    let n = interpreter.stack().pick(1)?;
    let value = interpreter.memory().fetch(address)?;

    interpreter.memory_mut().store(address, value.wrapping_add(n))?;

    let _ = interpreter.pop()?;
    let _ = interpreter.pop()?;

    Ok(())
}

/// Print the value at an address.
///
/// Signature: `address -- `
fn word_print_cell(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("?", 1)?;

    let address = interpreter.stack().peek()?;
    let value = interpreter.memory().fetch(address)?;

    let _ = interpreter.pop()?;
    interpreter.write_output(&format!("{} ", value));

    Ok(())
}

fn word_cells(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("CELLS", 1)?;

    let count = interpreter.pop()?;
    interpreter.push(count.wrapping_mul(CELL_SIZE));

    Ok(())
}

/// Grow the memory segment by `count` zeroed cells.
///
/// Signature: `count -- `
fn word_allot(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.require("ALLOT", 1)?;

    let count = interpreter.stack().peek()?;
    let address = interpreter.memory_mut().allot(count)?;

    let _ = interpreter.pop()?;
    debug!("Allotted {} cells at address {}.", count, address);

    Ok(())
}

fn word_here(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let here = interpreter.memory().here() as i64;

    interpreter.push(here);

    Ok(())
}

/// Register the words that work with the memory segment.
pub fn register_memory_words(interpreter: &mut dyn Interpreter) {
    add_builtin_word!(
        interpreter,
        "@",
        word_fetch,
        "Read the value of a cell.",
        "address -- value"
    );

    add_builtin_word!(
        interpreter,
        "!",
        word_store,
        "Write a value to a cell.",
        "value address -- "
    );

    add_builtin_word!(interpreter, "+!", word_add_store, "Add a value to a cell.", "n address -- ");

    add_builtin_word!(
        interpreter,
        "?",
        word_print_cell,
        "Print the value of a cell.",
        "address -- "
    );

    add_builtin_word!(
        interpreter,
        "CELLS",
        word_cells,
        "Convert a count of cells to address units.",
        "count -- units"
    );

    add_builtin_word!(
        interpreter,
        "ALLOT",
        word_allot,
        "Reserve count more zeroed cells of memory.",
        "count -- "
    );

    add_builtin_word!(interpreter, "HERE", word_here, "The next free address.", " -- address");
}
