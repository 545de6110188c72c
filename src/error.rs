//! All errors related to checking Conventional Commits.

use std::fmt;

use winnow::error::{ContextError, ParseError, StrContext};

use crate::parser;

/// The error returned when configuring, parsing or validating a commit fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    kind: ErrorKind,

    context: Option<Box<Context>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Context {
    Position(Position),
    Length(LengthViolation),
    IssueReference(IssueReferenceError),
    Footer(String),
    Message(String),
}

impl Error {
    /// Create a new error from a `ErrorKind`.
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Translate a grammar failure into an error pointing at the offending line.
    pub(crate) fn with_parse(input: &str, err: &ParseError<&str, ContextError>) -> Self {
        use ErrorKind::{
            InvalidFormat, InvalidScope, MissingBlankLine, MissingDescription, MissingSeparator,
            MissingType, UnknownScope, UnknownType,
        };

        let label = err.inner().context().find_map(|c| match c {
            StrContext::Label(label) => Some(*label),
            _ => None,
        });
        let kind = match label {
            Some(parser::TYPE) => MissingType,
            Some(parser::UNKNOWN_TYPE) => UnknownType,
            Some(parser::SCOPE) => InvalidScope,
            Some(parser::UNKNOWN_SCOPE) => UnknownScope,
            Some(parser::SEPARATOR) => MissingSeparator,
            Some(parser::DESCRIPTION) => MissingDescription,
            Some(parser::BLANK_LINE) => MissingBlankLine,
            _ => InvalidFormat,
        };

        Self::new(kind).set_position(Position::locate(input, err.offset()))
    }

    pub(crate) fn set_position(mut self, position: Position) -> Self {
        self.context = Some(Box::new(Context::Position(position)));
        self
    }

    pub(crate) fn set_length(mut self, length: LengthViolation) -> Self {
        self.context = Some(Box::new(Context::Length(length)));
        self
    }

    pub(crate) fn set_issue_reference(mut self, issue: IssueReferenceError) -> Self {
        self.context = Some(Box::new(Context::IssueReference(issue)));
        self
    }

    pub(crate) fn set_footer(mut self, token: impl Into<String>) -> Self {
        self.context = Some(Box::new(Context::Footer(token.into())));
        self
    }

    pub(crate) fn set_message(mut self, message: impl Into<String>) -> Self {
        self.context = Some(Box::new(Context::Message(message.into())));
        self
    }

    /// The kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Where a grammar error occurred.
    pub fn position(&self) -> Option<&Position> {
        match self.context.as_deref() {
            Some(Context::Position(position)) => Some(position),
            _ => None,
        }
    }

    /// The measured and allowed lengths of a length error.
    pub fn length(&self) -> Option<&LengthViolation> {
        match self.context.as_deref() {
            Some(Context::Length(length)) => Some(length),
            _ => None,
        }
    }

    /// Details of a malformed closes-issue footer value.
    pub fn issue_reference(&self) -> Option<&IssueReferenceError> {
        match self.context.as_deref() {
            Some(Context::IssueReference(issue)) => Some(issue),
            _ => None,
        }
    }

    /// The required footer token that was missing.
    pub fn footer(&self) -> Option<&str> {
        match self.context.as_deref() {
            Some(Context::Footer(token)) => Some(token),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::{BodyTooLong, BreakingTooLong, HeaderTooLong};

        match (self.kind, self.context.as_deref()) {
            (HeaderTooLong, Some(Context::Length(length))) => write!(
                f,
                "Commit header length ({}) exceeds the maximum length ({}).",
                length.measured, length.max
            ),
            (BodyTooLong, Some(Context::Length(length))) => write!(
                f,
                "Commit body length ({}) exceeds the maximum length ({}).",
                length.measured, length.max
            ),
            (BreakingTooLong, Some(Context::Length(length))) => write!(
                f,
                "Commit breaking change length ({}) exceeds the maximum length ({}).",
                length.measured, length.max
            ),
            (_, Some(Context::IssueReference(issue))) => issue.fmt(f),
            (kind, Some(Context::Position(position))) => {
                write!(
                    f,
                    "{kind} at line {}, column {}: {:?}",
                    position.line, position.column, position.text
                )
            }
            (kind, Some(Context::Footer(token))) => write!(f, "{kind}: {token}"),
            (kind, Some(Context::Message(message))) => write!(f, "{kind}: {message}"),
            (kind, _) => kind.fmt(f),
        }
    }
}

impl std::error::Error for Error {}

/// All possible error kinds returned when checking a conventional commit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The commit type is missing from the header.
    MissingType,

    /// The commit type is not one of the configured types.
    UnknownType,

    /// The scope has an invalid format.
    InvalidScope,

    /// The scope is not one of the configured scopes.
    UnknownScope,

    /// The header does not separate type and description with `": "`.
    MissingSeparator,

    /// The description of the commit is missing.
    MissingDescription,

    /// The header is not followed by a blank line before more content.
    MissingBlankLine,

    /// Any other part of the commit does not conform to the grammar.
    InvalidFormat,

    /// A closes-issue footer value is malformed.
    InvalidIssueReference,

    /// The header is longer than allowed.
    HeaderTooLong,

    /// A body line is longer than allowed.
    BodyTooLong,

    /// A breaking change line is longer than allowed.
    BreakingTooLong,

    /// A required footer is absent.
    MissingFooter,

    /// The configuration is unusable.
    InvalidConfig,
}

impl ErrorKind {
    /// The message text does not match the commit grammar.
    pub fn is_grammar(self) -> bool {
        matches!(
            self,
            Self::MissingType
                | Self::UnknownType
                | Self::InvalidScope
                | Self::UnknownScope
                | Self::MissingSeparator
                | Self::MissingDescription
                | Self::MissingBlankLine
                | Self::InvalidFormat
                | Self::InvalidIssueReference
        )
    }

    /// A section of the commit exceeds its configured length.
    pub fn is_length(self) -> bool {
        matches!(
            self,
            Self::HeaderTooLong | Self::BodyTooLong | Self::BreakingTooLong
        )
    }

    /// Rewrapping may fix the error.
    pub fn is_repairable(self) -> bool {
        matches!(self, Self::BodyTooLong | Self::BreakingTooLong)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingType => "missing type definition",
            Self::UnknownType => "unknown commit type",
            Self::InvalidScope => "invalid scope format",
            Self::UnknownScope => "unknown commit scope",
            Self::MissingSeparator => "missing `: ` after type",
            Self::MissingDescription => "missing commit description",
            Self::MissingBlankLine => "missing blank line after header",
            Self::InvalidFormat => "invalid commit format",
            Self::InvalidIssueReference => "malformed issue reference",
            Self::HeaderTooLong => "commit header too long",
            Self::BodyTooLong => "commit body too long",
            Self::BreakingTooLong => "commit breaking change too long",
            Self::MissingFooter => "missing required footer",
            Self::InvalidConfig => "invalid configuration",
        };
        f.write_str(s)
    }
}

/// Location of a grammar error in the cleaned message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    line: usize,
    column: usize,
    text: String,
}

impl Position {
    pub(crate) fn locate(input: &str, offset: usize) -> Self {
        let (line, column, text) = crate::lines::locate(input, offset);
        Self {
            line,
            column,
            text: text.to_owned(),
        }
    }

    /// 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column, in characters.
    pub fn column(&self) -> usize {
        self.column
    }

    /// The offending line, without its terminator.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A measured length compared against its configured maximum.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LengthViolation {
    measured: usize,
    max: usize,
    text: Option<String>,
}

impl LengthViolation {
    pub(crate) fn new(measured: usize, max: usize) -> Self {
        Self {
            measured,
            max,
            text: None,
        }
    }

    pub(crate) fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The measured length, in characters.
    pub fn measured(&self) -> usize {
        self.measured
    }

    /// The configured maximum.
    pub fn max(&self) -> usize {
        self.max
    }

    /// How far over the maximum the section is.
    pub fn excess(&self) -> usize {
        self.measured.saturating_sub(self.max)
    }

    /// The rendered header, for header length errors.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A closes-issue footer value that could not be fully parsed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IssueReferenceError {
    value: String,
    offset: usize,
}

impl IssueReferenceError {
    pub(crate) fn new(value: impl Into<String>, offset: usize) -> Self {
        let value = value.into();
        let mut offset = offset.min(value.len());
        while !value.is_char_boundary(offset) {
            offset -= 1;
        }
        Self { value, offset }
    }

    /// The full footer value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Byte offset of the first unparseable character.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Everything before the first unparseable character.
    pub fn parseable(&self) -> &str {
        &self.value[..self.offset]
    }

    /// The first unparseable character, if the value did not end early.
    pub fn bad_char(&self) -> Option<char> {
        self.value[self.offset..].chars().next()
    }

    /// Everything from the first unparseable character onward.
    pub fn unparseable(&self) -> &str {
        &self.value[self.offset..]
    }
}

impl fmt::Display for IssueReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parseable = self.parseable();
        let unparseable = self.unparseable();
        let (bad, rest) = match self.bad_char() {
            Some(c) => unparseable.split_at(c.len_utf8()),
            None => ("", ""),
        };
        write!(
            f,
            "One or more malformed Github issue references on or after \
             character position {} in \"{parseable}[{bad}]{rest}\".",
            parseable.chars().count() + 1
        )?;
        write!(f, "\nparseable: {parseable}")?;
        write!(f, "\nunparseable: {unparseable}")
    }
}
