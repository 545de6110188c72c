//! A configurable checker for [Conventional Commit] messages.
//!
//! [conventional commit]: https://www.conventionalcommits.org
//!
//! The grammar is driven by a [`Config`]: commit types, scopes and footer
//! tokens must come from its vocabularies, and its limits decide how long the
//! header, body and breaking change may be.
//!
//! # Example
//!
//! ```rust
//! use conventional_lint::{Commit, Config};
//! use indoc::indoc;
//!
//! let config = Config {
//!     types: vec!["feat".into(), "fix".into(), "docs".into()],
//!     scopes: vec!["example".into()],
//!     footers: vec!["Co-Authored-By".into()],
//!     ..Config::default()
//! };
//!
//! let message = indoc!("
//!     docs(example)!: add tested usage example
//!
//!     This example is tested using Rust's doctest capabilities. Having this
//!     example helps people understand how to use the checker.
//!
//!     BREAKING CHANGE: Going from nothing to something, meaning anyone doing
//!     nothing before suddenly has something to do.
//!     co-authored-by: Lisa Simpson <lisa@simpsons.fam>
//!     Github-Closes: closes #12
//! ");
//!
//! let mut commit = Commit::parse(message, &config).unwrap();
//! commit.validate(&config).unwrap();
//!
//! // You can access all components of the header.
//! assert_eq!(commit.type_(), "docs");
//! assert_eq!(commit.scope(), Some("example"));
//! assert_eq!(commit.description(), "add tested usage example");
//! assert_eq!(commit.header().length(), 40);
//!
//! // And the free-form commit body.
//! assert!(commit.body().paragraphs()[0].contains("helps people understand"));
//!
//! // The `!` and the `BREAKING CHANGE` footer are tracked separately.
//! assert!(commit.breaking().flag());
//! assert!(commit.breaking().value().unwrap().contains("suddenly"));
//!
//! // Other footers keep their order, with their tokens title-cased.
//! assert_eq!(commit.footers()[0].token(), "Co-Authored-By");
//! assert_eq!(commit.footers()[0].value(), "Lisa Simpson <lisa@simpsons.fam>");
//!
//! // The closes footer is also read as a list of issue references.
//! assert_eq!(commit.closes_issues()[0].number(), "12");
//! ```

#![warn(missing_docs)]

mod clean;
mod commit;
mod config;
mod error;
mod issue;
mod lines;
mod parser;
mod validate;
mod wrap;

pub use clean::{clean, is_generated};
pub use commit::{Body, Breaking, ClosesIssue, Commit, Footer, FooterSeparator, Header};
pub use config::{Config, REQUIRED_TYPES};
pub use error::{Error, ErrorKind, IssueReferenceError, LengthViolation, Position};
pub use validate::{check, post_process, validate};
pub use wrap::wrap;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
