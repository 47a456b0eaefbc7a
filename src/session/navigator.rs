/// Cursor over `len` sentences, always inside `[0, len - 1]`.
///
/// Every operation returns whether listeners should drop artifacts tied to
/// the previous position. The explicit jumps always signal; stepping past
/// either end is a silent no-op.
#[derive(Clone, Debug)]
pub struct Navigator {
    current: usize,
    len: usize,
}

impl Navigator {
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    pub fn first(&mut self) -> bool {
        self.current = 0;
        true
    }

    pub fn last(&mut self) -> bool {
        self.current = self.last_index();
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn next(&mut self) -> bool {
        if self.current >= self.last_index() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Fraction of the way through, counting the current sentence as visited.
    pub fn progress(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        ((self.current + 1) as f64 / self.len as f64).clamp(0.0, 1.0)
    }
}
