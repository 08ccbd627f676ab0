/// Indentation state threaded through one backtrace rendering.
///
/// `indent` is the column nested blocks start at. `extra` is the additional
/// indentation introduced when a method chain is wrapped, it is carried back up
/// to the enclosing chain so consecutive wrapped calls line up.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub indent: usize,
    pub extra: usize,
}

impl Context {
    pub fn new(indent: usize) -> Self {
        Self { indent, extra: 0 }
    }

    /// Context for a nested block, `step` columns deeper than the current line.
    pub fn nested(&self, step: usize) -> Context {
        Context {
            indent: self.indent + self.extra + step,
            extra: 0,
        }
    }

    /// Column of the current line start.
    pub fn column(&self) -> usize {
        self.indent + self.extra
    }
}
