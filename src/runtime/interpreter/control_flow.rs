use crate::{
    lang::code::{Code, Keyword},
    runtime::{
        data_structures::{
            control_stack::{ControlMarker, ControlStack, MarkerKind},
            number_stack::NumberStack,
        },
        error::{self, ErrorKind, ScriptError},
    },
};

fn control_error<T>(message: String) -> error::Result<T> {
    ScriptError::unlocated(ErrorKind::ControlFlow, message)
}

/// Scan forward from `start` for the first of `stop` at nesting depth zero.  `open` keywords
/// increase the depth and `close` keywords decrease it.
fn scan_forward(
    code: &Code,
    start: usize,
    open: &[Keyword],
    close: &[Keyword],
    stop: &[Keyword],
) -> Option<(usize, Keyword)> {
    let mut depth = 0usize;

    for (index, instruction) in code.iter().enumerate().skip(start) {
        let Some(keyword) = instruction.keyword() else {
            continue;
        };

        if depth == 0 && stop.contains(&keyword) {
            return Some((index, keyword));
        }

        if open.contains(&keyword) {
            depth += 1;
        } else if close.contains(&keyword) && depth > 0 {
            depth -= 1;
        }
    }

    None
}

/// Find the ELSE or THEN matching the IF or ELSE just before `start`.
fn find_else_or_then(
    code: &Code,
    start: usize,
    allow_else: bool,
) -> error::Result<(usize, Keyword)> {
    let stop: &[Keyword] = if allow_else {
        &[Keyword::Else, Keyword::Then]
    } else {
        &[Keyword::Then]
    };

    match scan_forward(code, start, &[Keyword::If], &[Keyword::Then], stop) {
        Some(found) => Ok(found),
        None => control_error("Missing THEN for IF.".to_string()),
    }
}

/// Find the REPEAT matching the WHILE just before `start`.
fn find_repeat(code: &Code, start: usize) -> error::Result<usize> {
    match scan_forward(
        code,
        start,
        &[Keyword::Begin],
        &[Keyword::Until, Keyword::Repeat],
        &[Keyword::Repeat],
    ) {
        Some((index, _)) => Ok(index),
        None => control_error("Missing REPEAT for WHILE.".to_string()),
    }
}

fn pop_flag(stack: &mut NumberStack, word: &str) -> error::Result<bool> {
    stack.require(word, 1)?;
    Ok(stack.pop()? != 0)
}

/// Execute one of the control-flow keywords at `pc` and return the index of the next instruction.
///
/// `floor` is the height of the control stack when the running block started, markers below it
/// belong to a caller and are only visible to `I` and `J`.
pub fn execute_control(
    keyword: Keyword,
    code: &Code,
    pc: usize,
    floor: usize,
    stack: &mut NumberStack,
    control: &mut ControlStack,
) -> error::Result<usize> {
    match keyword {
        Keyword::If => {
            if pop_flag(stack, "IF")? {
                control.push(ControlMarker::new_if());
                return Ok(pc + 1);
            }

            let (index, found) = find_else_or_then(code, pc + 1, true)?;

            if found == Keyword::Else {
                control.push(ControlMarker::new_if());
            }

            Ok(index + 1)
        }

        Keyword::Else => {
            // Only reached at the end of a taken branch.
            if control.top_mut(floor, MarkerKind::If).is_none() {
                return control_error("Found ELSE without a matching IF.".to_string());
            }

            let _ = control.pop();
            let (index, _) = find_else_or_then(code, pc + 1, false)?;

            Ok(index + 1)
        }

        Keyword::Then => {
            if control.top_mut(floor, MarkerKind::If).is_none() {
                return control_error("Found THEN without a matching IF.".to_string());
            }

            let _ = control.pop();
            Ok(pc + 1)
        }

        Keyword::Do => {
            stack.require("DO", 2)?;

            let index = stack.pop()?;
            let limit = stack.pop()?;

            control.push(ControlMarker::new_do_loop(pc + 1, index, limit));
            Ok(pc + 1)
        }

        Keyword::Loop | Keyword::PlusLoop => {
            let word = if keyword == Keyword::Loop { "LOOP" } else { "+LOOP" };

            if control.top_mut(floor, MarkerKind::DoLoop).is_none() {
                return control_error(format!("Found {} without a matching DO.", word));
            }

            let step = if keyword == Keyword::Loop {
                1
            } else {
                stack.require(word, 1)?;
                stack.pop()?
            };

            let Some(marker) = control.top_mut(floor, MarkerKind::DoLoop) else {
                return control_error(format!("Found {} without a matching DO.", word));
            };

            marker.loop_index = marker.loop_index.wrapping_add(step);

            let repeat = if step >= 0 {
                marker.loop_index < marker.loop_limit
            } else {
                marker.loop_index >= marker.loop_limit
            };

            if repeat {
                Ok(marker.resume_index)
            } else {
                let _ = control.pop();
                Ok(pc + 1)
            }
        }

        Keyword::I | Keyword::J => {
            let (nth, word) = if keyword == Keyword::I { (0, "I") } else { (1, "J") };

            match control.do_loop(nth) {
                Some(marker) => {
                    stack.push(marker.loop_index);
                    Ok(pc + 1)
                }
                None => control_error(format!("{} used outside of a DO loop.", word)),
            }
        }

        Keyword::Begin => {
            control.push(ControlMarker::new_begin(pc + 1));
            Ok(pc + 1)
        }

        Keyword::Until => {
            let Some(marker) = control.top_mut(floor, MarkerKind::Begin) else {
                return control_error("Found UNTIL without a matching BEGIN.".to_string());
            };
            let resume_index = marker.resume_index;

            if pop_flag(stack, "UNTIL")? {
                let _ = control.pop();
                Ok(pc + 1)
            } else {
                Ok(resume_index)
            }
        }

        Keyword::While => {
            if control.top_mut(floor, MarkerKind::Begin).is_none() {
                return control_error("Found WHILE without a matching BEGIN.".to_string());
            }

            if pop_flag(stack, "WHILE")? {
                return Ok(pc + 1);
            }

            let _ = control.pop();
            Ok(find_repeat(code, pc + 1)? + 1)
        }

        Keyword::Repeat => match control.top_mut(floor, MarkerKind::Begin) {
            Some(marker) => Ok(marker.resume_index),
            None => control_error("Found REPEAT without a matching BEGIN.".to_string()),
        },

        Keyword::Colon | Keyword::Semicolon | Keyword::Variable | Keyword::Constant => {
            control_error(format!("{:?} is not a control-flow word.", keyword))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{compilation::lower_tokens, tokenizing::tokenize};

    fn code(source: &str) -> Code {
        lower_tokens(&tokenize(source).unwrap()).unwrap()
    }

    #[test]
    fn false_if_skips_to_else() {
        let code = code("0 IF 1 IF 2 THEN ELSE 3 THEN");
        let mut stack = NumberStack::new();
        let mut control = ControlStack::new();

        stack.push(0);

        let next = execute_control(Keyword::If, &code, 1, 0, &mut stack, &mut control).unwrap();

        assert_eq!(next, 7);
        assert_eq!(control.len(), 1);
    }

    #[test]
    fn false_if_without_else_continues_after_then() {
        let code = code("0 IF 1 THEN 2");
        let mut stack = NumberStack::new();
        let mut control = ControlStack::new();

        stack.push(0);

        let next = execute_control(Keyword::If, &code, 1, 0, &mut stack, &mut control).unwrap();

        assert_eq!(next, 4);
        assert!(control.is_empty());
    }

    #[test]
    fn do_pops_index_then_limit() {
        let code = code("5 0 DO LOOP");
        let mut stack = NumberStack::new();
        let mut control = ControlStack::new();

        stack.push(5);
        stack.push(0);

        let _ = execute_control(Keyword::Do, &code, 2, 0, &mut stack, &mut control).unwrap();
        let marker = control.do_loop(0).unwrap();

        assert_eq!(marker.loop_index, 0);
        assert_eq!(marker.loop_limit, 5);
        assert!(stack.is_empty());
    }

    #[test]
    fn markers_below_the_floor_are_not_closed() {
        let code = code("THEN");
        let mut stack = NumberStack::new();
        let mut control = ControlStack::new();

        control.push(ControlMarker::new_if());

        let error =
            execute_control(Keyword::Then, &code, 0, 1, &mut stack, &mut control).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ControlFlow);
        assert_eq!(control.len(), 1);
    }
}
