/// The number stack, the only runtime value space.
pub mod number_stack;

/// The flat cell array that backs variables and allotted storage.
pub mod memory_segment;

/// The dictionary module provides the word dictionary used by the interpreter.
pub mod dictionary;

/// Markers for the control constructs that are currently executing.
pub mod control_stack;
