//! Preparing raw commit messages for parsing.

/// Strip comment lines from a raw commit message.
///
/// Lines whose first non-whitespace character is `#` are dropped, the way git
/// drops them from an edited message.  Trailing whitespace at the end of the
/// message is removed and every kept line is terminated with a newline.
///
/// ```rust
/// let raw = "fix: typo\n# Please enter the commit message\n\n";
/// assert_eq!(conventional_lint::clean(raw), "fix: typo\n");
/// ```
pub fn clean(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for line in raw.trim_end().split('\n') {
        if is_comment(line) {
            continue;
        }
        cleaned.push_str(line);
        cleaned.push('\n');
    }
    cleaned
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

const GENERATED_PREFIXES: &[&str] = &["Merge ", "Revert \"", "fixup! ", "squash! ", "amend! "];

/// Whether git, rather than a person, wrote the message.
///
/// Merge commits, reverts and autosquash markers are not expected to follow
/// the conventional grammar.
pub fn is_generated(raw: &str) -> bool {
    let subject = raw
        .lines()
        .find(|line| !is_comment(line) && !line.trim().is_empty())
        .unwrap_or_default();
    GENERATED_PREFIXES
        .iter()
        .any(|prefix| subject.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_comments() {
        let raw = "feat: add\n\n# comment\n  # indented\nbody # not a comment\n\n\n";
        assert_eq!(clean(raw), "feat: add\n\nbody # not a comment\n");
    }

    #[test]
    fn keeps_inner_blank_lines() {
        assert_eq!(clean("fix: a\n\n\nb"), "fix: a\n\n\nb\n");
    }

    #[test]
    fn empty_message() {
        assert_eq!(clean(""), "\n");
        assert_eq!(clean("# only a comment\n"), "");
    }

    #[test]
    fn generated_messages() {
        assert!(is_generated("Merge branch 'main' into topic\n"));
        assert!(is_generated("# leading comment\nMerge pull request #1\n"));
        assert!(is_generated("Revert \"feat: add thing\"\n\nThis reverts commit abc.\n"));
        assert!(is_generated("fixup! fix: typo\n"));
        assert!(is_generated("squash! feat: x\n"));
        assert!(!is_generated("fix: merge two lists\n"));
        assert!(!is_generated(""));
    }
}
