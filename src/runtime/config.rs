use std::env::var;

/// The default number of cells the memory segment may grow to.
pub const DEFAULT_MEMORY_LIMIT: usize = 65_536;

/// The environment variable the host reads the memory limit from.
pub const MEMORY_LIMIT_VAR: &str = "TFORTH_MEMORY_LIMIT";

/// Limits an interpreter instance is created with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// The most cells VARIABLE and ALLOT may reserve in total.
    pub memory_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            memory_limit: DEFAULT_MEMORY_LIMIT,
        }
    }
}

impl InterpreterConfig {
    /// Build a config from the defaults, overridden by the environment.  A value that doesn't parse
    /// is ignored and the default is kept.
    pub fn from_env() -> InterpreterConfig {
        let mut config = InterpreterConfig::default();

        if let Ok(limit) = var(MEMORY_LIMIT_VAR)
            && let Ok(limit) = limit.trim().parse::<usize>()
        {
            config.memory_limit = limit;
        }

        config
    }

    pub fn with_memory_limit(mut self, memory_limit: usize) -> InterpreterConfig {
        self.memory_limit = memory_limit;
        self
    }
}
