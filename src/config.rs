//! The vocabulary and limits a commit is checked against.

use unicase::UniCase;

use crate::commit::{BREAKING_ARROW, BREAKING_PHRASE};
use crate::{Error, ErrorKind};

/// Types every configuration must allow.
pub const REQUIRED_TYPES: [&str; 2] = ["feat", "fix"];

/// Checker configuration.
///
/// The vocabularies decide which tokens the grammar accepts; the lengths and
/// wrap flags drive validation.  Fields missing from a deserialized
/// configuration take their default values.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum header length.
    pub header_length: usize,
    /// Maximum length of a body or breaking change line.
    pub body_length: usize,
    /// Allowed commit types, matched case-sensitively.
    pub types: Vec<String>,
    /// Allowed scopes, matched case-sensitively.
    pub scopes: Vec<String>,
    /// Recognized footer tokens, matched case-insensitively.
    pub footers: Vec<String>,
    /// Footer tokens that must be present.
    pub required_footers: Vec<String>,
    /// Rewrap the body and breaking change when they are too long.
    pub wrap: bool,
    /// Rewrap the body and breaking change unconditionally.
    pub force_wrap: bool,
    /// Footer token whose value lists the issues a commit closes.
    #[cfg_attr(feature = "serde", serde(alias = "closes_keyword"))]
    pub closes_token: String,
    /// Skip messages written by git itself (merges, reverts, autosquash).
    pub ignore_generated: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_length: 50,
            body_length: 72,
            types: REQUIRED_TYPES.iter().map(|t| (*t).to_owned()).collect(),
            scopes: Vec::new(),
            footers: Vec::new(),
            required_footers: Vec::new(),
            wrap: false,
            force_wrap: false,
            closes_token: "github-closes".to_owned(),
            ignore_generated: true,
        }
    }
}

impl Config {
    /// Check the configuration is usable before any commit is parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidConfig`] when `types` lacks `feat` or
    /// `fix`, when a length limit is zero, when a footer token could never
    /// open a footer line, or when a required footer could never be
    /// recognized.
    pub fn validate(&self) -> Result<(), Error> {
        for required in REQUIRED_TYPES {
            if !self.is_type(required) {
                return Err(Error::new(ErrorKind::InvalidConfig)
                    .set_message(format!("types must include `{required}`")));
            }
        }
        if self.header_length == 0 {
            return Err(Error::new(ErrorKind::InvalidConfig)
                .set_message("header_length must be positive"));
        }
        if self.body_length == 0 {
            return Err(Error::new(ErrorKind::InvalidConfig)
                .set_message("body_length must be positive"));
        }
        if let Some(token) = self.footers.iter().find(|token| !is_matchable_token(token)) {
            return Err(Error::new(ErrorKind::InvalidConfig)
                .set_message(format!("footer token `{token}` cannot start a footer line")));
        }
        if !self.closes_token.is_empty() && !is_matchable_token(&self.closes_token) {
            return Err(Error::new(ErrorKind::InvalidConfig).set_message(format!(
                "closes token `{}` cannot start a footer line",
                self.closes_token
            )));
        }
        if let Some(token) = self
            .required_footers
            .iter()
            .find(|token| !self.is_footer_token(token) && !is_breaking_token(token))
        {
            return Err(Error::new(ErrorKind::InvalidConfig)
                .set_message(format!("required footer `{token}` is not a known footer")));
        }
        Ok(())
    }

    pub(crate) fn is_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }

    pub(crate) fn is_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// The closes token is always recognized as a footer.
    pub(crate) fn is_footer_token(&self, token: &str) -> bool {
        let token = UniCase::new(token);
        self.is_closes_token(&token)
            || self
                .footers
                .iter()
                .any(|f| UniCase::new(f.as_str()) == token)
    }

    /// Footer tokens the grammar matches, the closes token included.
    pub(crate) fn footer_tokens(&self) -> impl Iterator<Item = &str> {
        self.footers
            .iter()
            .map(String::as_str)
            .chain(Some(self.closes_token.as_str()).filter(|t| !t.is_empty()))
    }

    pub(crate) fn is_closes_token(&self, token: &UniCase<&str>) -> bool {
        !self.closes_token.is_empty() && UniCase::new(self.closes_token.as_str()) == *token
    }
}

// A token is matched literally at the start of a line and must be followed by
// a separator.
fn is_matchable_token(token: &str) -> bool {
    !token.is_empty()
        && token.trim() == token
        && !token.contains(|c: char| c == ':' || c == '#' || c == '\n' || c == '\r')
}

pub(crate) fn is_breaking_token(token: &str) -> bool {
    let token = UniCase::new(token);
    token == UniCase::new(BREAKING_PHRASE) || token == UniCase::new(BREAKING_ARROW)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            types: vec!["feat".into(), "fix".into(), "docs".into()],
            scopes: vec!["parser".into()],
            footers: vec!["Signed-Off-By".into()],
            ..Config::default()
        }
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.header_length, 50);
        assert_eq!(config.body_length, 72);
        assert_eq!(config.types, ["feat", "fix"]);
        assert!(config.scopes.is_empty());
        assert!(!config.wrap);
        assert!(!config.force_wrap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn types_must_include_feat_and_fix() {
        let config = Config {
            types: vec!["feat".into(), "docs".into()],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert_eq!(err.to_string(), "invalid configuration: types must include `fix`");
    }

    #[test]
    fn lengths_must_be_positive() {
        let config = Config {
            body_length: 0,
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn required_footers_must_be_recognized() {
        let mut config = config();
        config.required_footers = vec!["signed-off-by".into(), "BREAKING CHANGE".into()];
        assert!(config.validate().is_ok());

        config.required_footers.push("Reviewed-By".into());
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn footer_tokens_must_be_matchable() {
        let mut config = config();
        config.footers.push("Acked by".into());
        config.required_footers = vec!["acked by".into()];
        assert!(config.validate().is_ok());

        for token in ["", " Acked", "Acked-By:", "See #", "Acked\nBy"] {
            let config = Config {
                footers: vec![token.into()],
                ..Config::default()
            };
            let err = config.validate().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidConfig, "{token:?}");
        }

        let config = Config {
            closes_token: "Closes:".into(),
            ..Config::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);

        let config = Config {
            closes_token: String::new(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.footer_tokens().count(), 0);
    }

    #[test]
    fn vocabulary_matching() {
        let config = config();
        assert!(config.is_type("docs"));
        assert!(!config.is_type("Docs"));
        assert!(config.is_scope("parser"));
        assert!(!config.is_scope("Parser"));
        assert!(config.is_footer_token("signed-off-by"));
        assert!(config.is_footer_token("GITHUB-CLOSES"));
        assert!(!config.is_footer_token("Reviewed-By"));
        assert!(is_breaking_token("breaking change"));
        assert!(is_breaking_token("BREAKING-CHANGE"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_with_defaults() {
        use serde_test::Token;

        let expected = Config {
            header_length: 60,
            closes_token: "closes".into(),
            ..Config::default()
        };
        serde_test::assert_de_tokens(
            &expected,
            &[
                Token::Struct {
                    name: "Config",
                    len: 2,
                },
                Token::Str("header_length"),
                Token::U64(60),
                Token::Str("closes_keyword"),
                Token::Str("closes"),
                Token::StructEnd,
            ],
        );
    }
}
