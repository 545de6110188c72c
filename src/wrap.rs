//! Greedy paragraph reflow.

use crate::lines;

/// Reflow `text` so no line is wider than `width` characters.
///
/// Runs of whitespace, newlines included, collapse to single spaces before
/// the words are packed greedily.  A word wider than `width` starts its own
/// line and is broken into `width`-sized pieces.  Wrapping already wrapped
/// text gives it back unchanged.
///
/// ```rust
/// assert_eq!(conventional_lint::wrap("one two  three\nfour", 9), "one two\nthree\nfour");
/// ```
pub fn wrap(text: &str, width: usize) -> String {
    wrap_after(text, width, 0)
}

/// Like [`wrap`], with the first line already `offset` characters wide.
pub(crate) fn wrap_after(text: &str, width: usize, offset: usize) -> String {
    let width = width.max(1);
    let mut wrapped = String::with_capacity(text.len());
    let mut room = width.saturating_sub(offset).max(1);
    let mut used = 0;

    for mut word in text.split_whitespace() {
        let mut len = lines::width(word);
        if 0 < used {
            if used + 1 + len <= room {
                wrapped.push(' ');
                wrapped.push_str(word);
                used += 1 + len;
                continue;
            }
            wrapped.push('\n');
            room = width;
        }

        while room < len {
            let split = word
                .char_indices()
                .nth(room)
                .map_or(word.len(), |(i, _)| i);
            wrapped.push_str(&word[..split]);
            wrapped.push('\n');
            word = &word[split..];
            len -= room;
            room = width;
        }
        wrapped.push_str(word);
        used = len;
    }

    wrapped
}
