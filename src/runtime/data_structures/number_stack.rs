use crate::runtime::error::{self, ErrorKind, ScriptError};
use std::fmt::{self, Display, Formatter};

/// The data stack of signed integers.  The top is the most recently pushed value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NumberStack {
    elements: Vec<i64>,
}

/// Print the stack the way `.S` shows it, `<depth> bottom ... top `.
impl Display for NumberStack {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "<{}> ", self.elements.len())?;

        for value in &self.elements {
            write!(f, "{} ", value)?;
        }

        Ok(())
    }
}

impl NumberStack {
    pub fn new() -> NumberStack {
        NumberStack {
            elements: Vec::with_capacity(20),
        }
    }

    pub fn push(&mut self, value: i64) {
        self.elements.push(value);
    }

    /// Remove and return the top value.  An empty stack is an underflow, never a default value.
    pub fn pop(&mut self) -> error::Result<i64> {
        match self.elements.pop() {
            Some(value) => Ok(value),
            None => {
                ScriptError::unlocated(ErrorKind::StackUnderflow, "Stack underflow.".to_string())
            }
        }
    }

    /// Return the top value without removing it.
    pub fn peek(&self) -> error::Result<i64> {
        match self.elements.last() {
            Some(value) => Ok(*value),
            None => {
                ScriptError::unlocated(ErrorKind::StackUnderflow, "Stack underflow.".to_string())
            }
        }
    }

    /// Read the value `depth` places below the top, 0 being the top itself.
    pub fn pick(&self, depth: usize) -> error::Result<i64> {
        if depth >= self.elements.len() {
            return ScriptError::unlocated(
                ErrorKind::StackUnderflow,
                format!("Index {} out of range of stack size {}.", depth, self.elements.len()),
            );
        }

        Ok(self.elements[self.elements.len() - 1 - depth])
    }

    /// Fail with an underflow unless at least `count` values are present.
    pub fn require(&self, word: &str, count: usize) -> error::Result<()> {
        if self.elements.len() < count {
            return ScriptError::unlocated(
                ErrorKind::StackUnderflow,
                format!(
                    "Stack underflow, {} needs {} values but the stack holds {}.",
                    word,
                    count,
                    self.elements.len()
                ),
            );
        }

        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// The values from bottom to top.
    pub fn as_slice(&self) -> &[i64] {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_order() {
        let mut stack = NumberStack::new();

        for value in 1..=5 {
            stack.push(value);
        }

        let popped: Vec<i64> = (0..5).map(|_| stack.pop().unwrap()).collect();

        assert_eq!(popped, vec![5, 4, 3, 2, 1]);
        assert!(stack.is_empty());
    }

    #[test]
    fn empty_stack_underflows() {
        let mut stack = NumberStack::new();

        assert_eq!(stack.pop().unwrap_err().kind(), ErrorKind::StackUnderflow);
        assert_eq!(stack.peek().unwrap_err().kind(), ErrorKind::StackUnderflow);
    }

    #[test]
    fn peek_leaves_the_value() {
        let mut stack = NumberStack::new();

        stack.push(9);

        assert_eq!(stack.peek().unwrap(), 9);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn pick_reads_below_the_top() {
        let mut stack = NumberStack::new();

        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.pick(0).unwrap(), 3);
        assert_eq!(stack.pick(2).unwrap(), 1);
        assert!(stack.pick(3).is_err());
    }

    #[test]
    fn displays_like_dot_s() {
        let mut stack = NumberStack::new();

        stack.push(1);
        stack.push(-2);

        assert_eq!(stack.to_string(), "<2> 1 -2 ");
    }
}
