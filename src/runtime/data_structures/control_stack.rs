/// The constructs that leave a marker on the control-flow stack while they run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    If,
    DoLoop,
    Begin,
}

/// Enough state to resume or repeat a control construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlMarker {
    pub kind: MarkerKind,

    /// The instruction to jump back to when the construct repeats.
    pub resume_index: usize,

    /// The current index of a DO loop.
    pub loop_index: i64,

    /// The limit of a DO loop.
    pub loop_limit: i64,
}

impl ControlMarker {
    pub fn new_if() -> ControlMarker {
        ControlMarker {
            kind: MarkerKind::If,
            resume_index: 0,
            loop_index: 0,
            loop_limit: 0,
        }
    }

    pub fn new_do_loop(resume_index: usize, loop_index: i64, loop_limit: i64) -> ControlMarker {
        ControlMarker {
            kind: MarkerKind::DoLoop,
            resume_index,
            loop_index,
            loop_limit,
        }
    }

    pub fn new_begin(resume_index: usize) -> ControlMarker {
        ControlMarker {
            kind: MarkerKind::Begin,
            resume_index,
            loop_index: 0,
            loop_limit: 0,
        }
    }
}

/// The stack of markers for the constructs currently executing.  Every code block only touches the
/// markers it pushed itself, the `floor` passed in marks where its own markers start.
#[derive(Clone, Debug, Default)]
pub struct ControlStack {
    markers: Vec<ControlMarker>,
}

impl ControlStack {
    pub fn new() -> ControlStack {
        ControlStack {
            markers: Vec::new(),
        }
    }

    pub fn push(&mut self, marker: ControlMarker) {
        self.markers.push(marker);
    }

    /// The top marker if it is of the given kind and belongs to the block starting at `floor`.
    pub fn top_mut(&mut self, floor: usize, kind: MarkerKind) -> Option<&mut ControlMarker> {
        if self.markers.len() <= floor {
            return None;
        }

        self.markers.last_mut().filter(|marker| marker.kind == kind)
    }

    /// Pop the top marker.
    pub fn pop(&mut self) -> Option<ControlMarker> {
        self.markers.pop()
    }

    /// The `nth` innermost DO loop marker, 0 being the innermost.
    pub fn do_loop(&self, nth: usize) -> Option<&ControlMarker> {
        self.markers
            .iter()
            .rev()
            .filter(|marker| marker.kind == MarkerKind::DoLoop)
            .nth(nth)
    }

    /// Drop every marker above `height`.
    pub fn truncate(&mut self, height: usize) {
        self.markers.truncate(height);
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_loops_under_if_markers() {
        let mut stack = ControlStack::new();

        stack.push(ControlMarker::new_do_loop(1, 3, 10));
        stack.push(ControlMarker::new_do_loop(5, 7, 9));
        stack.push(ControlMarker::new_if());

        assert_eq!(stack.do_loop(0).unwrap().loop_index, 7);
        assert_eq!(stack.do_loop(1).unwrap().loop_index, 3);
        assert!(stack.do_loop(2).is_none());
    }

    #[test]
    fn top_respects_the_floor() {
        let mut stack = ControlStack::new();

        stack.push(ControlMarker::new_if());

        assert!(stack.top_mut(0, MarkerKind::If).is_some());
        assert!(stack.top_mut(1, MarkerKind::If).is_none());
        assert!(stack.top_mut(0, MarkerKind::DoLoop).is_none());
    }
}
