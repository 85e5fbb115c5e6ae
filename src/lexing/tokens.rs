//! Token definitions for follower documents
//!
//! The document syntax is JSON-shaped, but the lexer is deliberately more
//! forgiving than JSON: bare words and numbers are both accepted wherever a
//! scalar can appear, and characters that fit no token become
//! [`Token::Unknown`] instead of aborting the scan. Whitespace is skipped.
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    /// Quoted string, stored unescaped
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    /// Numeric literal, kept as written
    #[regex(r"[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    Number(String),

    /// Bare word such as `true`, `null` or an unquoted key
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Word(String),

    /// Anything the lexer could not classify, one character at a time
    #[regex(r".", |lex| lex.slice().to_string(), priority = 0)]
    Unknown(String),
}

impl Token {
    /// Scalar tokens can stand as a key or a value inside a flat map
    pub fn is_scalar(&self) -> bool {
        matches!(self, Token::Str(_) | Token::Number(_) | Token::Word(_))
    }

    /// Text of a scalar token (unescaped for strings)
    pub fn scalar_text(&self) -> Option<&str> {
        match self {
            Token::Str(text) | Token::Number(text) | Token::Word(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenBrace => f.write_str("{"),
            Token::CloseBrace => f.write_str("}"),
            Token::OpenBracket => f.write_str("["),
            Token::CloseBracket => f.write_str("]"),
            Token::Colon => f.write_str(":"),
            Token::Comma => f.write_str(","),
            Token::Str(text) => write!(f, "\"{text}\""),
            Token::Number(text) | Token::Word(text) | Token::Unknown(text) => f.write_str(text),
        }
    }
}

/// Strip the surrounding quotes and resolve backslash escapes.
///
/// The JSON escapes are recognized, including `\uXXXX` with surrogate
/// pairs. A `\u` not followed by four hex digits, or naming a lone
/// surrogate, is kept as written; any other escaped character stands for
/// itself.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => match unicode_escape(&mut chars) {
                Some(decoded) => out.push(decoded),
                None => out.push_str("\\u"),
            },
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Decode the code point after a `\u`, advancing `chars` only on success
fn unicode_escape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let mut ahead = chars.clone();
    let high = hex4(&mut ahead)?;
    let decoded = match high {
        0xD800..=0xDBFF => {
            if ahead.next() != Some('\\') || ahead.next() != Some('u') {
                return None;
            }
            let low = hex4(&mut ahead)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return None;
            }
            let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            char::from_u32(code)?
        }
        _ => char::from_u32(u32::from(high))?,
    };
    *chars = ahead;
    Some(decoded)
}

fn hex4(chars: &mut std::str::Chars<'_>) -> Option<u16> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(&digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source)
            .map(|result| result.unwrap_or_else(|_| Token::Unknown("?".into())))
            .collect()
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            lex("{ } [ ] : ,"),
            vec![
                Token::OpenBrace,
                Token::CloseBrace,
                Token::OpenBracket,
                Token::CloseBracket,
                Token::Colon,
                Token::Comma,
            ]
        );
    }

    #[test]
    fn test_string_with_escapes() {
        assert_eq!(
            lex(r#""say \"hi\"\n""#),
            vec![Token::Str("say \"hi\"\n".into())]
        );
        assert_eq!(lex(r#""""#), vec![Token::Str(String::new())]);
    }

    #[test]
    fn test_json_control_escapes() {
        assert_eq!(
            lex(r#""a\bb\u0001c\f""#),
            vec![Token::Str("a\u{8}b\u{1}c\u{c}".into())]
        );
        assert_eq!(lex(r#""\u00e9\u20AC""#), vec![Token::Str("é€".into())]);
    }

    #[test]
    fn test_surrogate_pairs() {
        assert_eq!(lex(r#""\ud83c\udf31""#), vec![Token::Str("🌱".into())]);
    }

    #[test]
    fn test_malformed_unicode_escapes_stay_literal() {
        assert_eq!(lex(r#""\u12g4""#), vec![Token::Str("\\u12g4".into())]);
        assert_eq!(lex(r#""\u+abc""#), vec![Token::Str("\\u+abc".into())]);
        assert_eq!(lex(r#""\u12""#), vec![Token::Str("\\u12".into())]);
        assert_eq!(lex(r#""\ud83cx""#), vec![Token::Str("\\ud83cx".into())]);
        assert_eq!(lex(r#""\udf31""#), vec![Token::Str("\\udf31".into())]);
    }

    #[test]
    fn test_numbers_and_words() {
        assert_eq!(
            lex("-3 +4 2.5 true"),
            vec![
                Token::Number("-3".into()),
                Token::Number("+4".into()),
                Token::Number("2.5".into()),
                Token::Word("true".into()),
            ]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(
            lex("\n\t \"id\" :\r\n \"f1\""),
            vec![
                Token::Str("id".into()),
                Token::Colon,
                Token::Str("f1".into())
            ]
        );
    }

    #[test]
    fn test_scalar_predicates() {
        assert!(Token::Str("a".into()).is_scalar());
        assert!(Token::Number("1".into()).is_scalar());
        assert!(!Token::Colon.is_scalar());
        assert_eq!(Token::Word("null".into()).scalar_text(), Some("null"));
        assert_eq!(Token::Comma.scalar_text(), None);
    }

    #[test]
    fn test_display_round_trips_simple_tokens() {
        let rendered: Vec<String> = lex(r#"{"a": 5}"#).iter().map(|t| t.to_string()).collect();
        assert_eq!(rendered, vec!["{", "\"a\"", ":", "5", "}"]);
    }
}
