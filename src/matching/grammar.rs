//! Token-grammar record matcher
//!
//! The document is tokenized once with logos. The scanner then tries the
//! record grammar at every `{` token: on success it resumes after the
//! matched block, on failure it moves one token forward. This keeps the
//! "find record-shaped blocks anywhere" behavior of the pattern matcher
//! (envelopes and unrelated objects are simply skipped) while parsing the
//! blocks themselves structurally.
//!
//! Grammar, over tokens:
//!
//! ```text
//! record   := "{" id "," label "," aspects "," description "," triggers ","
//!             uniquenessgroup ("," animFrame)? ("," comments)? ("," decayto)?
//!             ("," lifetime)? ("," icon)? ","? "}"
//! aspects  := "aspects" ":" block
//! triggers := ("xtriggers" | "triggers") ":" block
//! block    := "{" (any token except braces)* "}"
//! ```
//!
//! Block contents are split into entries on comma tokens, so commas and
//! colons inside quoted strings are safe.

use super::{FlatEntry, Matches, RawValue, RecordCaptures, RecordMatcher};
use crate::lexing::{tokenize_with_spans, Token};
use chumsky::{prelude::*, Stream};
use std::ops::Range;
use tracing::trace;

/// Type alias for parser error
type ParserError = Simple<Token>;

/// Matches record blocks by parsing the token stream
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarMatcher;

impl RecordMatcher for GrammarMatcher {
    fn name(&self) -> &str {
        "grammar"
    }

    fn matches<'src>(&self, source: &'src str) -> Matches<'src> {
        Box::new(RecordScanner::new(source))
    }
}

/// Single-pass scanner over a tokenized document
pub struct RecordScanner {
    tokens: Vec<Token>,
    spans: Vec<Range<usize>>,
    cursor: usize,
}

impl RecordScanner {
    pub fn new(source: &str) -> Self {
        let (tokens, spans) = tokenize_with_spans(source).into_iter().unzip();
        Self {
            tokens,
            spans,
            cursor: 0,
        }
    }

    fn try_record_at(&self, start: usize) -> Result<(RecordCaptures, Range<usize>), Vec<ParserError>> {
        let end = self.tokens.len();
        let stream = Stream::from_iter(
            end..end,
            self.tokens[start..]
                .iter()
                .cloned()
                .enumerate()
                .map(move |(offset, token)| (token, start + offset..start + offset + 1)),
        );
        record()
            .map_with_span(|captures, span: Range<usize>| (captures, span))
            .parse(stream)
    }
}

impl Iterator for RecordScanner {
    type Item = RecordCaptures;

    fn next(&mut self) -> Option<RecordCaptures> {
        while self.cursor < self.tokens.len() {
            let start = self.cursor;
            if self.tokens[start] != Token::OpenBrace {
                self.cursor += 1;
                continue;
            }
            match self.try_record_at(start) {
                Ok((captures, span)) => {
                    self.cursor = span.end.max(start + 1);
                    return Some(captures);
                }
                Err(_) => {
                    trace!(offset = self.spans[start].start, "no record block at brace");
                    self.cursor += 1;
                }
            }
        }
        None
    }
}

/// Helper: match a specific token
fn token(t: Token) -> impl Parser<Token, (), Error = ParserError> + Clone {
    just(t).ignored()
}

/// Helper: match a quoted key with the given name
fn key(name: &'static str) -> impl Parser<Token, (), Error = ParserError> + Clone {
    filter(move |t: &Token| matches!(t, Token::Str(s) if s == name))
        .ignored()
        .labelled(name)
}

/// A quoted string value
fn quoted() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, t: Token| match t {
        Token::Str(text) => Ok(text),
        other => Err(Simple::custom(span, format!("expected string, found {other}"))),
    })
}

/// Any scalar value, as written (used for `lifetime`)
fn scalar() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, t: Token| match t {
        Token::Str(text) | Token::Number(text) | Token::Word(text) => Ok(text),
        other => Err(Simple::custom(span, format!("expected value, found {other}"))),
    })
}

/// `"name": value`
fn field<T>(
    name: &'static str,
    value: impl Parser<Token, T, Error = ParserError> + Clone,
) -> impl Parser<Token, T, Error = ParserError> + Clone {
    key(name).then_ignore(token(Token::Colon)).ignore_then(value)
}

/// `, "name": value`, or nothing
fn optional_field<T>(
    name: &'static str,
    value: impl Parser<Token, T, Error = ParserError> + Clone,
) -> impl Parser<Token, Option<T>, Error = ParserError> + Clone {
    token(Token::Comma).ignore_then(field(name, value)).or_not()
}

/// A brace-delimited flat map, split into entries
fn block() -> impl Parser<Token, Vec<FlatEntry>, Error = ParserError> + Clone {
    filter(|t: &Token| !matches!(t, Token::OpenBrace | Token::CloseBrace))
        .repeated()
        .delimited_by(token(Token::OpenBrace), token(Token::CloseBrace))
        .map(|tokens| split_entries(&tokens))
}

fn triggers_key() -> impl Parser<Token, (), Error = ParserError> + Clone {
    filter(|t: &Token| matches!(t, Token::Str(s) if s == "xtriggers" || s == "triggers"))
        .ignored()
        .labelled("xtriggers")
}

/// The record block grammar
pub(crate) fn record() -> impl Parser<Token, RecordCaptures, Error = ParserError> + Clone {
    let comma = || token(Token::Comma);

    let required = field("id", quoted())
        .then_ignore(comma())
        .then(field("label", quoted()))
        .then_ignore(comma())
        .then(field("aspects", block()))
        .then_ignore(comma())
        .then(field("description", quoted()))
        .then_ignore(comma())
        .then(triggers_key().then_ignore(token(Token::Colon)).ignore_then(block()))
        .then_ignore(comma())
        .then(field("uniquenessgroup", quoted()))
        .map(
            |(((((id, label), aspects), description), triggers), uniqueness_group)| RecordCaptures {
                id,
                label,
                aspects,
                description,
                triggers,
                uniqueness_group,
                ..RecordCaptures::default()
            },
        );

    required
        .then(optional_field("animFrame", quoted()))
        .then(optional_field("comments", quoted()))
        .then(optional_field("decayto", quoted()))
        .then(optional_field("lifetime", scalar()))
        .then(optional_field("icon", quoted()))
        .then_ignore(comma().or_not())
        .delimited_by(token(Token::OpenBrace), token(Token::CloseBrace))
        .map(
            |(((((captures, anim_frame), comments), decay_to), lifetime), icon)| RecordCaptures {
                anim_frame,
                comments,
                decay_to,
                lifetime,
                icon,
                ..captures
            },
        )
}

/// Split block tokens on commas and classify each piece
fn split_entries(tokens: &[Token]) -> Vec<FlatEntry> {
    tokens
        .split(|t| *t == Token::Comma)
        .filter(|piece| !piece.is_empty())
        .map(|piece| match piece {
            [k, Token::Colon, v] if k.is_scalar() && v.is_scalar() => {
                let key = k.scalar_text().unwrap_or_default().to_string();
                let value = match v {
                    Token::Str(text) => RawValue::Quoted(text.clone()),
                    other => RawValue::Bare(other.to_string()),
                };
                FlatEntry::Pair { key, value }
            }
            _ => FlatEntry::Malformed(
                piece
                    .iter()
                    .map(Token::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
        })
        .collect()
}
