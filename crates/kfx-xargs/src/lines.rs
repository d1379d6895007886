//! Logical line assembly
//!
//! Physical lines are trimmed once each. A line ending in `\` has the
//! backslash removed and is glued to the next physical line with no
//! separator. Blank logical lines and logical lines starting with `#` are
//! dropped, so a comment marker only counts at the start of a logical line.

/// Iterator adapter folding physical lines into logical xargs lines.
#[derive(Debug, Clone)]
pub struct LineAssembler<I> {
    lines: I,
}

impl<I> LineAssembler<I> {
    pub fn new(lines: I) -> Self {
        LineAssembler { lines }
    }
}

impl<I, S> Iterator for LineAssembler<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut buffer = String::new();
        let mut continuing = false;

        loop {
            let Some(raw) = self.lines.next() else {
                // Dangling continuation at end of input still yields its text
                if continuing && is_content(&buffer) {
                    return Some(buffer);
                }
                return None;
            };

            let line = raw.as_ref().trim();
            if let Some(head) = line.strip_suffix('\\') {
                buffer.push_str(head);
                continuing = true;
                continue;
            }

            buffer.push_str(line);
            if is_content(&buffer) {
                return Some(buffer);
            }
            buffer.clear();
            continuing = false;
        }
    }
}

fn is_content(line: &str) -> bool {
    !line.is_empty() && !line.starts_with('#')
}

/// Assemble the logical lines of an in-memory xargs text.
pub fn logical_lines(text: &str) -> LineAssembler<std::str::Lines<'_>> {
    LineAssembler::new(text.lines())
}
