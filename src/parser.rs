use winnow::ascii::{line_ending, Caseless};
use winnow::combinator::{
    alt, cut_err, delimited, eof, fail, not, opt, preceded, repeat, terminated, trace,
};
use winnow::error::StrContext;
use winnow::token::{any, literal, one_of, rest, take, take_till, take_while};
use winnow::{ModalResult, Parser};

use crate::commit::{BREAKING_ARROW, BREAKING_PHRASE};
use crate::lines::LinesWithTerminator;
use crate::{Config, Error};

pub(crate) type CommitDetails<'a> = (
    &'a str,
    Option<&'a str>,
    bool,
    &'a str,
    Option<&'a str>,
    Vec<(&'a str, &'a str, &'a str)>,
);

type Summary<'a> = (&'a str, Option<&'a str>, bool, &'a str);

pub(crate) fn parse<'a>(i: &'a str, config: &Config) -> Result<CommitDetails<'a>, Error> {
    let grammar = Grammar { config };
    let mut message = |input: &mut &'a str| grammar.message(input);
    message
        .parse(i)
        .map_err(|err| Error::with_parse(i, &err))
}

pub(crate) const TYPE: &str = "type";
pub(crate) const UNKNOWN_TYPE: &str = "unknown type";
pub(crate) const SCOPE: &str = "scope";
pub(crate) const UNKNOWN_SCOPE: &str = "unknown scope";
pub(crate) const SEPARATOR: &str = "separator";
pub(crate) const DESCRIPTION: &str = "description";
pub(crate) const BLANK_LINE: &str = "blank line";

// <CR>              ::= "0x000D"
// <LF>              ::= "0x000A"
// <newline>         ::= [<CR>], <LF>
fn is_line_ending(c: char) -> bool {
    c == '\n' || c == '\r'
}

// <parens>          ::= "(" | ")"
fn is_parens(c: char) -> bool {
    c == '(' || c == ')'
}

// <token-char>      ::= <alphanumeric> | "-" | "_"
fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

// <space>           ::= " " | "\t"
fn space0<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    take_while(0.., [' ', '\t']).parse_next(i)
}

// <blank-line>      ::= <space>*, <newline>
fn blank_line<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    (space0, line_ending).take().parse_next(i)
}

// <separator>       ::= ": " | " #"
fn separator<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    alt((": ", " #")).parse_next(i)
}

// <breaking-token>  ::= "BREAKING CHANGE" | "BREAKING-CHANGE"   (any case)
fn breaking_token<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    terminated(
        alt((
            literal(Caseless(BREAKING_PHRASE)),
            literal(Caseless(BREAKING_ARROW)),
        )),
        not(one_of(is_token_char)),
    )
    .parse_next(i)
}

fn label(name: &'static str) -> StrContext {
    StrContext::Label(name)
}

/// The commit grammar, with its vocabularies drawn from one configuration.
#[derive(Copy, Clone, Debug)]
struct Grammar<'c> {
    config: &'c Config,
}

impl Grammar<'_> {
    // <message>         ::= <summary>, <newline>*
    //                    |  <summary>, <newline>, <blank-line>+, [<body>], <footer>*, <newline>*
    fn message<'i>(&self, i: &mut &'i str) -> ModalResult<CommitDetails<'i>> {
        let (type_, scope, breaking, description) = terminated(
            trace("summary", |i: &mut &'i str| self.summary(i)),
            alt((line_ending, eof)),
        )
        .parse_next(i)?;

        if i.trim().is_empty() {
            rest.parse_next(i)?;
            return Ok((type_, scope, breaking, description, None, Vec::new()));
        }

        // The body MUST begin one blank line after the description.
        cut_err(blank_line.context(label(BLANK_LINE))).parse_next(i)?;
        let _extra: () = repeat(0.., blank_line).parse_next(i)?;

        let body = opt(trace("body", |i: &mut &'i str| self.body(i))).parse_next(i)?;

        let footers: Vec<_> =
            repeat(0.., trace("footer", |i: &mut &'i str| self.footer(i))).parse_next(i)?;

        take_while(0.., char::is_whitespace).parse_next(i)?;

        Ok((type_, scope, breaking, description, body, footers))
    }

    // <summary>         ::= <type>, ["(", <scope>, ")"], ["!"], ": ", <description>
    fn summary<'i>(&self, i: &mut &'i str) -> ModalResult<Summary<'i>> {
        (
            trace("type", |i: &mut &'i str| self.type_(i)),
            trace("scope", |i: &mut &'i str| self.scope(i)),
            opt('!').map(|bang| bang.is_some()),
            preceded(
                cut_err(": ".context(label(SEPARATOR))),
                trace("description", description),
            ),
        )
            .parse_next(i)
    }

    // <type>            ::= <any UTF8-octets except newline or parens or ":" or "!" or whitespace>+
    //                       drawn from the configured types
    fn type_<'i>(&self, i: &mut &'i str) -> ModalResult<&'i str> {
        take_while(1.., |c: char| {
            !is_line_ending(c) && !is_parens(c) && c != ':' && c != '!' && !c.is_whitespace()
        })
        .context(label(TYPE))
        .verify(|t: &str| self.config.is_type(t))
        .context(label(UNKNOWN_TYPE))
        .parse_next(i)
    }

    // <scope>           ::= <any UTF8-octets except newline or parens>+
    //                       drawn from the configured scopes
    fn scope<'i>(&self, i: &mut &'i str) -> ModalResult<Option<&'i str>> {
        opt(delimited(
            '(',
            cut_err(take_while(1.., |c: char| !is_line_ending(c) && !is_parens(c)))
                .context(label(SCOPE)),
            cut_err(')').context(label(SCOPE)),
        ))
        .verify(|scope: &Option<&str>| scope.map_or(true, |s| self.config.is_scope(s)))
        .context(label(UNKNOWN_SCOPE))
        .parse_next(i)
    }

    // <body>            ::= (<line> that does not start a footer)+
    fn body<'i>(&self, i: &mut &'i str) -> ModalResult<&'i str> {
        let mut offset = 0;
        for line in LinesWithTerminator::new(*i) {
            if self.is_footer_start(line.trim_end()) {
                break;
            }
            offset += line.chars().count();
        }
        if offset == 0 {
            return fail(i);
        }

        take(offset).map(str::trim_end).parse_next(i)
    }

    // <footer>          ::= <token>, <separator>, <space>*, <value>
    fn footer<'i>(&self, i: &mut &'i str) -> ModalResult<(&'i str, &'i str, &'i str)> {
        (
            |i: &mut &'i str| self.token(i),
            separator,
            space0,
            |i: &mut &'i str| self.value(i),
        )
            .map(|(ft, s, _, fv)| (ft, s, fv))
            .parse_next(i)
    }

    // <token>           ::= <breaking-token>
    //                    |  a configured footer token (any case)
    fn token<'i>(&self, i: &mut &'i str) -> ModalResult<&'i str> {
        alt((breaking_token, |i: &mut &'i str| self.configured_token(i))).parse_next(i)
    }

    // Configured tokens may hold spaces, so each is matched literally and the
    // longest match wins.
    fn configured_token<'i>(&self, i: &mut &'i str) -> ModalResult<&'i str> {
        let longest = self
            .config
            .footer_tokens()
            .filter_map(|token| {
                let mut input = *i;
                let matched: ModalResult<&str> =
                    terminated(literal(Caseless(token)), not(one_of(is_token_char)))
                        .parse_next(&mut input);
                matched.ok().map(|m| m.chars().count())
            })
            .max();
        match longest {
            Some(count) => take(count).parse_next(i),
            None => fail(i),
        }
    }

    // <value>           ::= <text>, (<newline>, <line> that does not start a footer)*
    fn value<'i>(&self, i: &mut &'i str) -> ModalResult<&'i str> {
        let mut offset = 0;
        for (n, line) in LinesWithTerminator::new(*i).enumerate() {
            if 0 < n && self.is_footer_start(line.trim_end()) {
                break;
            }
            offset += line.chars().count();
        }

        take(offset)
            .map(str::trim_end)
            .verify(|v: &str| !v.is_empty())
            .parse_next(i)
    }

    /// One line of lookahead: does `line` open a footer or breaking change?
    fn is_footer_start<'l>(&self, mut line: &'l str) -> bool {
        (
            |i: &mut &'l str| self.token(i),
            separator,
            space0,
            any.verify(|c: &char| !is_line_ending(*c)),
        )
            .parse_next(&mut line)
            .is_ok()
    }
}

// <description>     ::= <whitespace>*, <any UTF8-octets except newline>+
fn description<'i>(i: &mut &'i str) -> ModalResult<&'i str> {
    take_till(0.., is_line_ending)
        .map(str::trim)
        .verify(|d: &str| !d.is_empty())
        .context(label(DESCRIPTION))
        .parse_next(i)
}
