//! Line-oriented views of a commit message.

/// Iterate over lines, keeping each line's terminator attached.
#[derive(Clone, Debug)]
pub(crate) struct LinesWithTerminator<'a> {
    data: &'a str,
}

impl<'a> LinesWithTerminator<'a> {
    pub(crate) fn new(data: &'a str) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for LinesWithTerminator<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<&'a str> {
        if self.data.is_empty() {
            return None;
        }
        let end = self.data.find('\n').map_or(self.data.len(), |i| i + 1);
        let (line, rest) = self.data.split_at(end);
        self.data = rest;
        Some(line)
    }
}

/// A paragraph break: nothing but whitespace.
pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Rendered width of a line.
pub(crate) fn width(line: &str) -> usize {
    line.chars().count()
}

/// Longest rendered line.
pub(crate) fn longest(text: &str) -> usize {
    text.lines().map(width).max().unwrap_or(0)
}

/// Map a byte offset to its 1-based line and column and the line it falls on.
pub(crate) fn locate(input: &str, offset: usize) -> (usize, usize, &str) {
    let mut offset = offset.min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }

    let mut start = 0;
    let mut line = 1;
    for l in LinesWithTerminator::new(input) {
        let end = start + l.len();
        if offset < end || end == input.len() {
            break;
        }
        start = end;
        line += 1;
    }

    let text = input[start..]
        .split('\n')
        .next()
        .unwrap_or_default()
        .trim_end_matches('\r');
    let column = width(&input[start..offset]) + 1;
    (line, column, text)
}
