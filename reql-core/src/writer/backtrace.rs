use std::fmt::{self, Display};

/// Rendered query text and the caret mask under it.
///
/// Both strings always have the same number of characters and their line breaks
/// sit at the same positions. The mask has `^` under the underlined span and a
/// space everywhere else.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Backtrace {
    pub text: String,
    pub mask: String,
}

/// Byte offsets into a [`Backtrace`], taken before a node starts writing.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    text: usize,
    mask: usize,
}

impl Backtrace {
    /// Append unmarked text.
    pub fn push_str(&mut self, value: &str) {
        self.text.push_str(value);
        self.mask
            .extend(value.chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
    }

    pub fn mark(&self) -> Mark {
        Mark {
            text: self.text.len(),
            mask: self.mask.len(),
        }
    }

    /// Text written since `mark`.
    pub fn since(&self, mark: Mark) -> &str {
        &self.text[mark.text..]
    }

    /// Mark everything written since `mark`.
    pub fn underline(&mut self, mark: Mark) {
        self.mask.truncate(mark.mask);
        self.mask.extend(
            self.text[mark.text..]
                .chars()
                .map(|c| if c == '\n' { '\n' } else { '^' }),
        );
    }

    pub fn is_underlined(&self) -> bool {
        self.mask.contains('^')
    }

    /// Pairs of (text line, mask line).
    pub fn lines(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text.split('\n').zip(self.mask.split('\n'))
    }

    /// The text with the caret lines interleaved under the lines they mark.
    ///
    /// Carets are never printed under the indentation of their line.
    pub fn annotated(&self) -> String {
        let mut out = String::with_capacity(self.text.len() * 2);
        for (line, carets) in self.lines() {
            out.push_str(line);
            out.push('\n');
            if !carets.contains('^') {
                continue;
            }
            let indent = line.chars().take_while(|c| c.is_whitespace()).count();
            if indent > 0 && indent < line.chars().count() {
                out.extend(std::iter::repeat_n(' ', indent));
                out.extend(carets.chars().skip(indent));
            } else {
                out.push_str(carets);
            }
            out.truncate(out.trim_end_matches(' ').len());
            out.push('\n');
        }
        out
    }
}

impl Display for Backtrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.annotated())
    }
}
