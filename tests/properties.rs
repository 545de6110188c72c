//! Properties every well-formed message keeps through parsing, validation and
//! rendering.

use conventional_lint::{wrap, Commit, Config, ErrorKind};
use proptest::prelude::*;

fn config() -> Config {
    Config {
        types: ["feat", "fix", "docs"].map(String::from).to_vec(),
        scopes: ["parser", "cli"].map(String::from).to_vec(),
        footers: ["Signed-Off-By", "Reviewed-By"].map(String::from).to_vec(),
        header_length: 1000,
        body_length: 1000,
        ..Config::default()
    }
}

/// A message assembled from its parts, rendered the canonical way.
#[derive(Clone, Debug)]
struct Message {
    ty: &'static str,
    scope: Option<&'static str>,
    flag: bool,
    description: String,
    paragraphs: Vec<String>,
    breaking: Option<String>,
    footers: Vec<(&'static str, String)>,
}

impl Message {
    fn header(&self) -> String {
        let scope = self.scope.map(|s| format!("({s})")).unwrap_or_default();
        let flag = if self.flag { "!" } else { "" };
        format!("{}{scope}{flag}: {}", self.ty, self.description)
    }

    fn render(&self) -> String {
        let mut text = self.header();
        let mut sep = "\n\n";
        if !self.paragraphs.is_empty() {
            text.push_str(sep);
            text.push_str(&self.paragraphs.join("\n\n"));
        }
        if let Some(breaking) = &self.breaking {
            text.push_str(sep);
            text.push_str("BREAKING CHANGE: ");
            text.push_str(breaking);
            sep = "\n";
        }
        for (token, value) in &self.footers {
            text.push_str(sep);
            text.push_str(token);
            text.push_str(": ");
            text.push_str(value);
            sep = "\n";
        }
        text.push('\n');
        text
    }
}

fn words(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..=max).prop_map(|words| words.join(" "))
}

fn paragraph() -> impl Strategy<Value = String> {
    prop::collection::vec(words(8), 1..=3).prop_map(|lines| lines.join("\n"))
}

fn message() -> impl Strategy<Value = Message> {
    (
        prop::sample::select(vec!["feat", "fix", "docs"]),
        prop::option::of(prop::sample::select(vec!["parser", "cli"])),
        any::<bool>(),
        "[a-z]([a-z ]{0,30}[a-z])?",
        prop::collection::vec(paragraph(), 0..=3),
        prop::option::of(words(6)),
        prop::collection::vec(
            (
                prop::sample::select(vec!["Signed-Off-By", "Reviewed-By"]),
                words(4),
            ),
            0..=3,
        ),
    )
        .prop_map(
            |(ty, scope, flag, description, paragraphs, breaking, footers)| Message {
                ty,
                scope,
                flag,
                description,
                paragraphs,
                breaking,
                footers,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn canonical_text_round_trips(message in message()) {
        let text = message.render();
        let commit = Commit::parse(&text, &config()).unwrap();
        prop_assert_eq!(commit.to_string(), text);
    }

    #[test]
    fn header_is_composed_of_its_parts(message in message()) {
        let commit = Commit::parse(&message.render(), &config()).unwrap();
        prop_assert_eq!(commit.type_(), message.ty);
        prop_assert_eq!(commit.scope(), message.scope);
        prop_assert_eq!(commit.description(), message.description.as_str());
        prop_assert_eq!(commit.breaking().flag(), message.flag);
        prop_assert_eq!(commit.header().length(), message.header().chars().count());
        prop_assert_eq!(commit.header_line(), message.header());
    }

    #[test]
    fn header_limit_is_monotonic(message in message(), limit in 1usize..80) {
        let config = Config {
            header_length: limit,
            ..config()
        };
        let mut commit = Commit::parse(&message.render(), &config).unwrap();
        let length = commit.header().length();
        match commit.validate(&config) {
            Ok(()) => prop_assert!(length <= limit),
            Err(err) => {
                prop_assert_eq!(err.kind(), ErrorKind::HeaderTooLong);
                prop_assert!(limit < length);
            }
        }
    }

    #[test]
    fn footers_keep_their_order(message in message()) {
        let commit = Commit::parse(&message.render(), &config()).unwrap();
        let tokens: Vec<_> = commit.footers().iter().map(|f| f.token()).collect();
        let expected: Vec<_> = message.footers.iter().map(|(t, _)| *t).collect();
        prop_assert_eq!(tokens, expected);
        prop_assert_eq!(commit.breaking().value(), message.breaking.as_deref());
    }

    #[test]
    fn wrapping_is_idempotent(text in "[a-z \n]{0,300}", width in 1usize..80) {
        let once = wrap(&text, width);
        prop_assert!(once.lines().all(|line| line.chars().count() <= width));
        prop_assert_eq!(wrap(&once, width), once);
    }

    #[test]
    fn rewrapped_body_fits(message in message(), width in 20usize..72) {
        let config = Config {
            body_length: width,
            wrap: true,
            ..config()
        };
        let mut commit = Commit::parse(&message.render(), &config).unwrap();
        commit.validate(&config).unwrap();
        prop_assert!(commit.body().longest() <= width);
        prop_assert!(commit.breaking().longest() <= width);
    }
}
