//! Tokenization of follower documents
//!
//! Tokenization is handled entirely by logos; this module only collects the
//! stream. Unclassifiable input is kept as [`Token::Unknown`] so that the
//! grammar fails on it instead of silently stitching neighbours together.

pub mod tokens;

pub use tokens::Token;

use logos::Logos;
use std::ops::Range;

/// Tokenize a document, keeping the byte span of every token
pub fn tokenize_with_spans(source: &str) -> Vec<(Token, Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let token = result.unwrap_or_else(|_| Token::Unknown(lexer.slice().to_string()));
        tokens.push((token, lexer.span()));
    }

    tokens
}

/// Tokenize a document, dropping spans
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_with_spans(source)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}
