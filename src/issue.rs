//! Closes-issue references: `closes #12, fixes owner/repo#7`.

use winnow::ascii::{digit1, Caseless};
use winnow::combinator::{alt, cut_err, opt, separated, terminated, trace};
use winnow::token::{literal, take_while};
use winnow::{ModalResult, Parser};

use crate::commit::ClosesIssue;
use crate::error::IssueReferenceError;
use crate::{Error, ErrorKind};

/// Parse the value of a closes footer.
pub(crate) fn parse(value: &str) -> Result<Vec<ClosesIssue>, Error> {
    references.parse(value).map_err(|err| {
        Error::new(ErrorKind::InvalidIssueReference)
            .set_issue_reference(IssueReferenceError::new(value, err.offset()))
    })
}

// <references>      ::= <reference>, (", ", <reference>)*
fn references(i: &mut &str) -> ModalResult<Vec<ClosesIssue>> {
    trace("references", separated(1.., reference, ", ")).parse_next(i)
}

// <reference>       ::= <keyword>, " ", [<owner>, "/", <repo>], "#", <number>
fn reference(i: &mut &str) -> ModalResult<ClosesIssue> {
    (
        terminated(keyword, cut_err(' ')),
        opt((identifier, '/', cut_err(identifier))),
        cut_err(('#', digit1)),
    )
        .map(|(keyword, repository, (_, number))| {
            ClosesIssue::new(keyword, repository.map(|(owner, _, repo)| (owner, repo)), number)
        })
        .parse_next(i)
}

// <keyword>         ::= "close" | "closed" | "closes" | "fix" | "fixed" | "fixes"
//                    |  "resolve" | "resolved" | "resolves"
fn keyword<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    // Longest spellings first so `closes` is not cut short at `close`.
    alt((
        literal(Caseless("closes")),
        literal(Caseless("closed")),
        literal(Caseless("close")),
        literal(Caseless("fixes")),
        literal(Caseless("fixed")),
        literal(Caseless("fix")),
        literal(Caseless("resolves")),
        literal(Caseless("resolved")),
        literal(Caseless("resolve")),
    ))
    .parse_next(i)
}

// <identifier>      ::= alphanumerics and inner hyphens, at most 39 long
fn identifier<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1..=39, |c: char| c.is_ascii_alphanumeric() || c == '-')
        .verify(|s: &str| !s.starts_with('-') && !s.ends_with('-'))
        .parse_next(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(value: &str) -> Vec<String> {
        parse(value)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn offset(value: &str) -> usize {
        parse(value).unwrap_err().issue_reference().unwrap().offset()
    }

    #[test]
    fn single_reference() {
        let issues = parse("closes #12").unwrap();
        assert_eq!(issues, [ClosesIssue::new("closes", None, "12")]);
    }

    #[test]
    fn reference_list() {
        let issues = parse("closes foo/bar#42, fixes #7").unwrap();
        assert_eq!(
            issues,
            [
                ClosesIssue::new("closes", Some(("foo", "bar")), "42"),
                ClosesIssue::new("fixes", None, "7"),
            ]
        );
    }

    #[test]
    fn every_keyword() {
        for keyword in [
            "close", "closed", "closes", "fix", "fixed", "fixes", "resolve", "resolved",
            "resolves", "Closes", "FIXED",
        ] {
            assert_eq!(refs(&format!("{keyword} #1")), [format!("{keyword} #1")]);
        }
    }

    #[test]
    fn identifiers() {
        assert_eq!(refs("fixes my-org/my-repo2#3"), ["fixes my-org/my-repo2#3"]);
        assert!(parse("fixes -org/repo#3").is_err());
        assert!(parse("fixes org-/repo#3").is_err());
        let long = "a".repeat(40);
        assert!(parse(&format!("fixes {long}/repo#3")).is_err());
        let longest = "a".repeat(39);
        assert!(parse(&format!("fixes {longest}/repo#3")).is_ok());
    }

    #[test]
    fn malformed_references() {
        assert_eq!(offset("closes #4x"), 9);
        assert_eq!(offset("closes foo/#4"), 11);
        assert_eq!(offset("closes #"), 8);
        assert_eq!(offset("closes #1,fixes #2"), 9);
        assert_eq!(offset("closes #1, fixes 2"), 17);
        assert_eq!(offset("shuts #1"), 0);
        assert_eq!(offset(""), 0);
    }

    #[test]
    fn error_splits_value() {
        let err = parse("closes #1, fixes 2").unwrap_err();
        let issue = err.issue_reference().unwrap();
        assert_eq!(issue.parseable(), "closes #1, fixes ");
        assert_eq!(issue.bad_char(), Some('2'));
        assert_eq!(issue.unparseable(), "2");
    }
}
