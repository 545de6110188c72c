//! Length limits, rewrapping and required footers.

use tracing::debug;
use unicase::UniCase;

use crate::config::is_breaking_token;
use crate::error::LengthViolation;
use crate::{Commit, Config, Error, ErrorKind};

/// Check a parsed commit against the configured limits.
///
/// Checks run header, body, breaking change, then required footers, and stop
/// at the first failure.  The header is never repaired.  With `wrap` or
/// `force_wrap` set, an overlong body or breaking change is rewrapped once
/// to `body_length` before it is measured again.
///
/// # Errors
///
/// - [`ErrorKind::HeaderTooLong`], [`ErrorKind::BodyTooLong`] or
///   [`ErrorKind::BreakingTooLong`] with the [`LengthViolation`]
/// - [`ErrorKind::MissingFooter`] naming the first absent required footer
#[tracing::instrument(skip_all, fields(header = commit.header().length()))]
pub fn validate(commit: &mut Commit, config: &Config) -> Result<(), Error> {
    let header = commit.header().length();
    if config.header_length < header {
        return Err(Error::new(ErrorKind::HeaderTooLong).set_length(
            LengthViolation::new(header, config.header_length).with_text(commit.header_line()),
        ));
    }

    let rewrap = config.wrap || config.force_wrap;

    if config.body_length < commit.body().longest() {
        if rewrap {
            debug!(
                longest = commit.body().longest(),
                width = config.body_length,
                "rewrapping body"
            );
            commit.body_mut().rewrap(config.body_length);
        }
        let longest = commit.body().longest();
        if config.body_length < longest {
            return Err(Error::new(ErrorKind::BodyTooLong)
                .set_length(LengthViolation::new(longest, config.body_length)));
        }
    }

    if config.body_length < commit.breaking().longest() {
        if rewrap {
            debug!(
                longest = commit.breaking().longest(),
                width = config.body_length,
                "rewrapping breaking change"
            );
            commit.breaking_mut().rewrap(config.body_length);
        }
        let longest = commit.breaking().longest();
        if config.body_length < longest {
            return Err(Error::new(ErrorKind::BreakingTooLong)
                .set_length(LengthViolation::new(longest, config.body_length)));
        }
    }

    for token in &config.required_footers {
        if !has_footer(commit, token) {
            return Err(Error::new(ErrorKind::MissingFooter).set_footer(token.as_str()));
        }
    }

    Ok(())
}

fn has_footer(commit: &Commit, token: &str) -> bool {
    if is_breaking_token(token) {
        return commit.breaking().footer().is_some();
    }
    let token = UniCase::new(token);
    commit
        .footers()
        .iter()
        .any(|footer| UniCase::new(footer.token()) == token)
}

/// Normalize a validated commit: with `force_wrap`, the body and breaking
/// change are rewrapped whatever their length.
pub fn post_process(commit: &mut Commit, config: &Config) {
    if config.force_wrap {
        debug!(width = config.body_length, "force wrapping");
        commit.body_mut().rewrap(config.body_length);
        commit.breaking_mut().rewrap(config.body_length);
    }
}

/// Check a raw commit message from start to finish.
///
/// The configuration is validated, then the message is cleaned, parsed,
/// validated and post-processed.  Returns `Ok(None)` for messages git
/// generated itself when `ignore_generated` is set.
///
/// ```rust
/// use conventional_lint::{check, Config, ErrorKind};
///
/// let config = Config::default();
/// let commit = check("feat: add wrap option\n", &config).unwrap().unwrap();
/// assert_eq!(commit.type_(), "feat");
///
/// assert!(check("Merge branch 'main'\n", &config).unwrap().is_none());
///
/// let err = check("docs: add usage\n", &config).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::UnknownType);
/// ```
///
/// # Errors
///
/// Any configuration, grammar, issue reference or validation error.
#[tracing::instrument(skip_all, fields(input_len = raw.len()))]
pub fn check(raw: &str, config: &Config) -> Result<Option<Commit>, Error> {
    config.validate()?;
    if config.ignore_generated && crate::is_generated(raw) {
        debug!("skipping generated message");
        return Ok(None);
    }

    let mut commit = Commit::from_raw(raw, config)?;
    commit.validate(config)?;
    commit.post_process(config);
    Ok(Some(commit))
}
