//! The parsed conventional commit and its canonical rendering.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use unicase::UniCase;

use crate::config::is_breaking_token;
use crate::{issue, lines, parser, validate, wrap, Config, Error, ErrorKind};

pub(crate) const BREAKING_PHRASE: &str = "BREAKING CHANGE";
pub(crate) const BREAKING_ARROW: &str = "BREAKING-CHANGE";

/// A conventional commit.
///
/// Built by a single parse of a cleaned message.  Only validation touches it
/// afterwards, and only to rewrap the body and breaking change.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    #[cfg_attr(feature = "serde", serde(skip))]
    raw: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    cleaned: String,
    header: Header,
    body: Body,
    breaking: Breaking,
    footers: Vec<Footer>,
    closes_issues: Vec<ClosesIssue>,
}

impl Commit {
    /// Parse a cleaned commit message against `config`.
    ///
    /// # Errors
    ///
    /// Returns a grammar error when the message does not match the configured
    /// grammar, or [`ErrorKind::InvalidIssueReference`] when a closes-issue
    /// footer is malformed.
    #[tracing::instrument(skip_all, fields(input_len = cleaned.len()))]
    pub fn parse(cleaned: &str, config: &Config) -> Result<Self, Error> {
        let (ty, scope, flag, description, body, footers) = parser::parse(cleaned, config)?;

        let mut breaking = Breaking::new(flag);
        let mut kept = Vec::with_capacity(footers.len());
        let mut closes_issues = Vec::new();
        for (token, sep, value) in footers {
            let separator = sep.parse()?;
            if is_breaking_token(token) {
                if breaking.footer.is_some() {
                    tracing::debug!(token, "breaking change footer replaces an earlier one");
                }
                breaking.set_footer(Footer::new(token, separator, value));
                continue;
            }

            if config.is_closes_token(&UniCase::new(token)) {
                closes_issues.extend(issue::parse(value)?);
            }
            tracing::trace!(token, "footer");
            kept.push(Footer::new(title_case(token), separator, value));
        }

        Ok(Self {
            raw: cleaned.to_owned(),
            cleaned: cleaned.to_owned(),
            header: Header::new(ty, scope.unwrap_or_default(), description, flag),
            body: body.map(Body::collect).unwrap_or_default(),
            breaking,
            footers: kept,
            closes_issues,
        })
    }

    /// Strip comments from a raw message, then parse it.
    ///
    /// # Errors
    ///
    /// See [`Commit::parse`].
    pub fn from_raw(raw: &str, config: &Config) -> Result<Self, Error> {
        let cleaned = crate::clean(raw);
        let mut commit = Self::parse(&cleaned, config)?;
        raw.clone_into(&mut commit.raw);
        Ok(commit)
    }

    /// Check lengths and required footers, rewrapping when allowed.
    ///
    /// # Errors
    ///
    /// See [`validate`](crate::validate()).
    pub fn validate(&mut self, config: &Config) -> Result<(), Error> {
        validate(self, config)
    }

    /// Normalize formatting once validation passed.
    pub fn post_process(&mut self, config: &Config) {
        validate::post_process(self, config);
    }

    /// The message as given, before comments were stripped.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The message the grammar was applied to.
    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    /// The parsed first line.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The free-form body.
    pub fn body(&self) -> &Body {
        &self.body
    }

    pub(crate) fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// The breaking change marker and footer.
    pub fn breaking(&self) -> &Breaking {
        &self.breaking
    }

    pub(crate) fn breaking_mut(&mut self) -> &mut Breaking {
        &mut self.breaking
    }

    /// Every footer other than the breaking change, in message order.
    ///
    /// A footer is similar to a Git trailer, with the exception of not
    /// requiring whitespace before newlines.
    ///
    /// See: <https://git-scm.com/docs/git-interpret-trailers>
    pub fn footers(&self) -> &[Footer] {
        &self.footers
    }

    /// Issues listed in the closes footer.
    pub fn closes_issues(&self) -> &[ClosesIssue] {
        &self.closes_issues
    }

    /// The type of the commit.
    pub fn type_(&self) -> &str {
        self.header.type_()
    }

    /// The optional scope of the commit.
    pub fn scope(&self) -> Option<&str> {
        Some(self.header.scope()).filter(|s| !s.is_empty())
    }

    /// The commit description.
    pub fn description(&self) -> &str {
        self.header.description()
    }

    /// The header as it is rendered.
    pub fn header_line(&self) -> String {
        self.header.render(self.breaking.flag)
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header_line())?;

        let mut sep = "\n\n";
        if !self.body.is_empty() {
            write!(f, "{sep}{}", self.body)?;
        }
        if let Some(footer) = self.breaking.footer() {
            write!(f, "{sep}{footer}")?;
            sep = "\n";
        }
        for footer in &self.footers {
            write!(f, "{sep}{footer}")?;
            sep = "\n";
        }

        f.write_str("\n")
    }
}

/// The first line of a commit: `type(scope)!: description`.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    ty: String,
    scope: String,
    description: String,
    length: usize,
}

impl Header {
    fn new(ty: &str, scope: &str, description: &str, flag: bool) -> Self {
        let mut header = Self {
            ty: ty.to_owned(),
            scope: scope.to_owned(),
            description: description.to_owned(),
            length: 0,
        };
        header.length = lines::width(&header.render(flag));
        header
    }

    fn render(&self, flag: bool) -> String {
        let mut line = self.ty.clone();
        if !self.scope.is_empty() {
            line.push('(');
            line.push_str(&self.scope);
            line.push(')');
        }
        if flag {
            line.push('!');
        }
        line.push_str(": ");
        line.push_str(&self.description);
        line
    }

    /// The commit type.
    pub fn type_(&self) -> &str {
        &self.ty
    }

    /// The scope, empty when absent.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Length of the reconstructed header line, in characters.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// The free-form paragraphs between the header and the footers.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Body {
    paragraphs: Vec<String>,
    longest: usize,
}

impl Body {
    /// Group the body region into paragraphs separated by blank lines.
    pub(crate) fn collect(text: &str) -> Self {
        let mut body = Self::default();
        let mut paragraph: Vec<&str> = Vec::new();
        for line in text.lines() {
            if lines::is_blank(line) {
                body.push(&mut paragraph);
                continue;
            }
            let line = line.trim_end();
            body.longest = body.longest.max(lines::width(line));
            paragraph.push(line);
        }
        body.push(&mut paragraph);
        body
    }

    fn push(&mut self, paragraph: &mut Vec<&str>) {
        if !paragraph.is_empty() {
            self.paragraphs.push(paragraph.join("\n"));
            paragraph.clear();
        }
    }

    /// Reflow every paragraph to `width`.
    pub(crate) fn rewrap(&mut self, width: usize) {
        for paragraph in &mut self.paragraphs {
            *paragraph = wrap(paragraph, width);
        }
        self.longest = self
            .paragraphs
            .iter()
            .map(|p| lines::longest(p))
            .max()
            .unwrap_or(0);
    }

    /// The paragraphs, each with its lines joined by `\n`.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Length of the longest body line, in characters.
    pub fn longest(&self) -> usize {
        self.longest
    }

    /// Whether the commit has no body.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.paragraphs.join("\n\n"))
    }
}

/// Breaking change signals.
///
/// The header `!` and the `BREAKING CHANGE` footer are independent: either,
/// both or neither may be present.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Breaking {
    flag: bool,
    footer: Option<Footer>,
    longest: usize,
}

impl Breaking {
    fn new(flag: bool) -> Self {
        Self {
            flag,
            ..Self::default()
        }
    }

    fn set_footer(&mut self, footer: Footer) {
        self.longest = lines::longest(&footer.to_string());
        self.footer = Some(footer);
    }

    /// Reflow the value so every rendered line, including the first which
    /// carries the token, fits `width`.
    ///
    /// The value is left as is when the token and separator alone fill the
    /// width.
    pub(crate) fn rewrap(&mut self, width: usize) {
        if let Some(mut footer) = self.footer.take() {
            let prefix = lines::width(&footer.token) + lines::width(footer.separator.as_str());
            if prefix < width {
                footer.value = wrap::wrap_after(&footer.value, width, prefix);
            } else {
                tracing::debug!(prefix, width, "breaking change token fills the width");
            }
            self.set_footer(footer);
        }
    }

    /// Whether the header carried `!`.
    pub fn flag(&self) -> bool {
        self.flag
    }

    /// The `BREAKING CHANGE` footer, if any.
    pub fn footer(&self) -> Option<&Footer> {
        self.footer.as_ref()
    }

    /// The breaking token, exactly as written.
    pub fn token(&self) -> Option<&str> {
        self.footer.as_ref().map(Footer::token)
    }

    /// The separator between token and value.
    pub fn separator(&self) -> Option<FooterSeparator> {
        self.footer.as_ref().map(Footer::separator)
    }

    /// The breaking change description.
    pub fn value(&self) -> Option<&str> {
        self.footer.as_ref().map(Footer::value)
    }

    /// Length of the longest rendered breaking change line, in characters.
    pub fn longest(&self) -> usize {
        self.longest
    }

    /// Whether the commit is breaking by either signal.
    pub fn is_breaking(&self) -> bool {
        self.flag || self.footer.is_some()
    }
}

/// A single footer.
///
/// A footer is similar to a Git trailer, with the exception of not requiring
/// whitespace before newlines.
///
/// See: <https://git-scm.com/docs/git-interpret-trailers>
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Footer {
    token: String,
    separator: FooterSeparator,
    value: String,
}

impl Footer {
    /// Piece together a footer.
    pub fn new(token: impl Into<String>, separator: FooterSeparator, value: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            separator,
            value: value.into(),
        }
    }

    /// The token of the footer.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The separator between the footer token and its value.
    pub fn separator(&self) -> FooterSeparator {
        self.separator
    }

    /// The value of the footer.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// A flag to signal that the footer describes a breaking change.
    pub fn breaking(&self) -> bool {
        is_breaking_token(&self.token)
    }
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.token, self.separator, self.value)
    }
}

/// The type of separator between the footer token and value.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum FooterSeparator {
    /// ": "
    Value,

    /// " #"
    Ref,
}

impl FooterSeparator {
    /// Access `str` representation of FooterSeparator
    pub fn as_str(self) -> &'static str {
        match self {
            FooterSeparator::Value => ": ",
            FooterSeparator::Ref => " #",
        }
    }
}

impl Deref for FooterSeparator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<&'_ str> for FooterSeparator {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for FooterSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl FromStr for FooterSeparator {
    type Err = Error;

    fn from_str(sep: &str) -> Result<Self, Self::Err> {
        match sep {
            ": " => Ok(FooterSeparator::Value),
            " #" => Ok(FooterSeparator::Ref),
            _ => Err(Error::new(ErrorKind::InvalidFormat).set_message(format!("{sep:?}"))),
        }
    }
}

/// An issue the commit closes, from the closes footer.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ClosesIssue {
    keyword: String,
    owner: Option<String>,
    repo: Option<String>,
    number: String,
}

impl ClosesIssue {
    pub(crate) fn new(keyword: &str, repository: Option<(&str, &str)>, number: &str) -> Self {
        Self {
            keyword: keyword.to_owned(),
            owner: repository.map(|(owner, _)| owner.to_owned()),
            repo: repository.map(|(_, repo)| repo.to_owned()),
            number: number.to_owned(),
        }
    }

    /// The closing keyword, as written (`closes`, `Fixes`, ...).
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Owner of the repository the issue lives in, when not this one.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Repository the issue lives in, when not this one.
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// The issue number.
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl fmt::Display for ClosesIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keyword)?;
        f.write_str(" ")?;
        if let (Some(owner), Some(repo)) = (&self.owner, &self.repo) {
            write!(f, "{owner}/{repo}")?;
        }
        write!(f, "#{}", self.number)
    }
}

/// `signed-off-by` -> `Signed-Off-By`
fn title_case(token: &str) -> String {
    let mut titled = String::with_capacity(token.len());
    let mut prev_alpha = false;
    for c in token.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                titled.extend(c.to_lowercase());
            } else {
                titled.extend(c.to_uppercase());
            }
        } else {
            titled.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    titled
}
