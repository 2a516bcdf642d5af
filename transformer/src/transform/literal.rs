//! Literal parser for the serialized fields of the recipe dataset.
//!
//! The `nutrition`, `ingredients` and `steps` cells hold Python-style
//! literals such as `[51.5, 0.0, 13.0]` or `['flour', "baker's yeast"]`.
//! This module parses that notation into a [`Literal`] tree; the typed
//! accessors then decide whether the shape is the one a field expects.
//!
//! ## Grammar
//!
//! ```text
//! literal  := sequence | number | string | keyword
//! sequence := '[' items? ']' | '(' items? ')'
//! items    := literal (',' literal)* ','?
//! string   := prefix? quoted (prefix? quoted)*     adjacent strings concatenate
//! keyword  := True | False | None
//! ```

use std::fmt;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
}

/// Why a literal could not be parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralError {
    /// Byte offset into the input
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for LiteralError {}

impl Literal {
    /// Items of a list or tuple.
    pub fn as_sequence(&self) -> Option<&[Literal]> {
        match self {
            Literal::List(items) | Literal::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Numeric value of an int or float. Booleans are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Parse a complete literal. Anything but whitespace after it is an error.
pub fn parse_literal(text: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    let value = parser.literal()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Parse `text` as a sequence whose items are all numbers.
pub fn parse_number_sequence(text: &str) -> Result<Vec<f64>, LiteralError> {
    let value = parse_literal(text)?;
    let items = value.as_sequence().ok_or_else(|| shape_error("expected a sequence"))?;
    items
        .iter()
        .map(|item| item.as_f64().ok_or_else(|| shape_error("expected a number")))
        .collect()
}

/// Parse `text` as a sequence whose items are all strings.
pub fn parse_string_sequence(text: &str) -> Result<Vec<String>, LiteralError> {
    let value = parse_literal(text)?;
    let items = value.as_sequence().ok_or_else(|| shape_error("expected a sequence"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| shape_error("expected a string"))
        })
        .collect()
}

fn shape_error(message: &str) -> LiteralError {
    LiteralError {
        offset: 0,
        message: message.to_string(),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn literal(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            Some('[') => self.sequence(']').map(Literal::List),
            Some('(') => {
                let (mut items, trailing_comma) = self.items(')')?;
                // `(x)` is a parenthesized value, not a tuple
                match items.pop() {
                    Some(only) if items.is_empty() && !trailing_comma => Ok(only),
                    Some(last) => {
                        items.push(last);
                        Ok(Literal::Tuple(items))
                    }
                    None => Ok(Literal::Tuple(items)),
                }
            }
            Some('\'') | Some('"') => self.strings(),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.word(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn sequence(&mut self, close: char) -> Result<Vec<Literal>, LiteralError> {
        self.items(close).map(|(items, _)| items)
    }

    /// Comma-separated items up to `close`. Returns the items and whether the
    /// last item was followed by a comma.
    fn items(&mut self, close: char) -> Result<(Vec<Literal>, bool), LiteralError> {
        self.bump();
        let mut items = Vec::new();
        let mut trailing_comma = false;

        loop {
            self.skip_ws();
            match self.peek() {
                Some(c) if c == close => {
                    self.bump();
                    return Ok((items, trailing_comma));
                }
                None => return Err(self.error(format!("unclosed sequence, expected '{}'", close))),
                _ => {}
            }

            items.push(self.literal()?);
            trailing_comma = false;
            self.skip_ws();

            match self.peek() {
                Some(',') => {
                    self.bump();
                    trailing_comma = true;
                }
                Some(c) if c == close => {}
                Some(c) => return Err(self.error(format!("expected ',' or '{}', found '{}'", close, c))),
                None => return Err(self.error(format!("unclosed sequence, expected '{}'", close))),
            }
        }
    }

    fn word(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        let src = self.src;
        let word = &src[start..self.pos];

        // String prefixes: r'..', u'..', R"..", U".."
        if matches!(word, "r" | "R" | "u" | "U") && matches!(self.peek(), Some('\'') | Some('"')) {
            self.pos = start;
            return self.strings();
        }

        match word {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => {
                self.pos = start;
                Err(self.error(format!("'{}' is not a literal", word)))
            }
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        let mut negative = false;

        if let Some(sign @ ('-' | '+')) = self.peek() {
            negative = sign == '-';
            self.bump();
            self.skip_ws();
        }

        let body_start = self.pos;
        let mut is_float = false;
        let mut seen_exponent = false;
        let mut prev = '\0';

        while let Some(c) = self.peek() {
            let accept = match c {
                '0'..='9' => true,
                '_' => prev.is_ascii_digit(),
                '.' if !is_float && !seen_exponent => {
                    is_float = true;
                    true
                }
                'e' | 'E' if !seen_exponent && (prev.is_ascii_digit() || prev == '.') => {
                    seen_exponent = true;
                    is_float = true;
                    true
                }
                '+' | '-' => prev == 'e' || prev == 'E',
                _ => false,
            };
            if !accept {
                break;
            }
            prev = c;
            self.bump();
        }

        let body: String = self.src[body_start..self.pos].chars().filter(|&c| c != '_').collect();
        if body.is_empty() || body == "." || prev == '_' {
            self.pos = start;
            return Err(self.error("invalid number"));
        }
        if body.len() > 1 && body.starts_with('0') && !is_float && body.chars().any(|c| c != '0') {
            self.pos = start;
            return Err(self.error("leading zeros in integer"));
        }

        if is_float {
            let value: f64 = body.parse().map_err(|_| self.error("invalid float"))?;
            Ok(Literal::Float(if negative { -value } else { value }))
        } else {
            match body.parse::<i64>() {
                Ok(value) => Ok(Literal::Int(if negative { -value } else { value })),
                // Outside i64: keep magnitude as a float
                Err(_) => body
                    .parse::<f64>()
                    .map(|value| Literal::Float(if negative { -value } else { value }))
                    .map_err(|_| self.error("invalid integer")),
            }
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn strings(&mut self) -> Result<Literal, LiteralError> {
        let mut out = self.string()?;
        loop {
            let save = self.pos;
            self.skip_ws();
            let next_is_string = match self.peek() {
                Some('\'') | Some('"') => true,
                Some('r' | 'R' | 'u' | 'U') => {
                    let mut chars = self.rest().chars();
                    chars.next();
                    matches!(chars.next(), Some('\'') | Some('"'))
                }
                _ => false,
            };
            if !next_is_string {
                self.pos = save;
                return Ok(Literal::Str(out));
            }
            out.push_str(&self.string()?);
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let mut raw = false;
        if let Some(c @ ('r' | 'R' | 'u' | 'U')) = self.peek() {
            raw = c == 'r' || c == 'R';
            self.bump();
        }

        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected a quote")),
        };

        let triple = self.rest().starts_with(&format!("{q}{q}", q = quote));
        if triple {
            self.bump();
            self.bump();
        }

        let mut out = String::new();
        loop {
            let c = self.bump().ok_or_else(|| self.error("unterminated string"))?;

            if c == quote {
                if !triple {
                    return Ok(out);
                }
                if self.rest().starts_with(&format!("{q}{q}", q = quote)) {
                    self.bump();
                    self.bump();
                    return Ok(out);
                }
                out.push(c);
                continue;
            }

            if c == '\n' && !triple {
                return Err(self.error("line break in single-quoted string"));
            }

            if c != '\\' {
                out.push(c);
                continue;
            }

            let escaped = self.bump().ok_or_else(|| self.error("unterminated string"))?;
            if raw {
                out.push('\\');
                out.push(escaped);
                continue;
            }
            match escaped {
                '\n' => {}
                '\\' => out.push('\\'),
                '\'' => out.push('\''),
                '"' => out.push('"'),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'a' => out.push('\u{07}'),
                'b' => out.push('\u{08}'),
                'f' => out.push('\u{0C}'),
                'v' => out.push('\u{0B}'),
                '0'..='7' => {
                    let mut code = escaped.to_digit(8).unwrap_or(0);
                    for _ in 0..2 {
                        match self.peek().and_then(|d| d.to_digit(8)) {
                            Some(d) => {
                                code = code * 8 + d;
                                self.bump();
                            }
                            None => break,
                        }
                    }
                    out.push(char::from_u32(code).ok_or_else(|| self.error("invalid octal escape"))?);
                }
                'x' => out.push(self.hex_escape(2)?),
                'u' => out.push(self.hex_escape(4)?),
                'U' => out.push(self.hex_escape(8)?),
                // Unknown escapes keep the backslash
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let rest = self.rest();
        let hex = rest.get(..digits).filter(|h| h.chars().all(|c| c.is_ascii_hexdigit()));
        let hex = hex.ok_or_else(|| self.error("truncated hex escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid hex escape"))?;
        self.pos += digits;
        char::from_u32(code).ok_or_else(|| self.error("escape is not a valid character"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_list() {
        let value = parse_literal("[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]").unwrap();
        let items = value.as_sequence().unwrap();
        assert_eq!(items.len(), 7);
        assert_eq!(items[0], Literal::Float(51.5));
    }

    #[test]
    fn test_ints_and_signs() {
        assert_eq!(
            parse_literal("[1, -2, +3, 1_000]").unwrap(),
            Literal::List(vec![
                Literal::Int(1),
                Literal::Int(-2),
                Literal::Int(3),
                Literal::Int(1000)
            ])
        );
    }

    #[test]
    fn test_float_forms() {
        assert_eq!(
            parse_number_sequence("[.5, 5., 1e3, 2.5E-1]").unwrap(),
            vec![0.5, 5.0, 1000.0, 0.25]
        );
    }

    #[test]
    fn test_leading_zero_integer_rejected() {
        assert!(parse_literal("[007]").is_err());
        assert_eq!(parse_literal("[0, 00]").unwrap().as_sequence().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_string_list_mixed_quotes() {
        assert_eq!(
            parse_string_sequence(r#"['flour', "baker's yeast", 'salt']"#).unwrap(),
            vec!["flour", "baker's yeast", "salt"]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            parse_string_sequence(r"['it\'s', 'a\tb', 'caf\xe9', 'ça']").unwrap(),
            vec!["it's", "a\tb", "café", "ça"]
        );
    }

    #[test]
    fn test_raw_and_unicode_prefixes() {
        assert_eq!(
            parse_string_sequence(r"[r'a\nb', u'crème']").unwrap(),
            vec![r"a\nb", "crème"]
        );
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        assert_eq!(parse_string_sequence("['ab' 'cd', \"e\"]").unwrap(), vec!["abcd", "e"]);
    }

    #[test]
    fn test_non_ascii_preserved() {
        assert_eq!(
            parse_string_sequence("['un', 'tuz', 'şeker']").unwrap(),
            vec!["un", "tuz", "şeker"]
        );
    }

    #[test]
    fn test_trailing_comma_and_whitespace() {
        assert_eq!(parse_string_sequence("  [ 'a' ,\n 'b', ]  ").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_tuples() {
        assert_eq!(parse_number_sequence("(1, 2)").unwrap(), vec![1.0, 2.0]);
        assert_eq!(parse_number_sequence("(1,)").unwrap(), vec![1.0]);
        // Parenthesized scalar, not a sequence
        assert!(parse_number_sequence("(1)").is_err());
        assert_eq!(parse_literal("()").unwrap(), Literal::Tuple(vec![]));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(parse_string_sequence("[]").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            parse_literal("[True, False, None]").unwrap(),
            Literal::List(vec![Literal::Bool(true), Literal::Bool(false), Literal::None])
        );
        // Booleans are not numbers
        assert!(parse_number_sequence("[True, 1]").is_err());
    }

    #[test]
    fn test_syntax_errors() {
        assert!(parse_literal("not a list").is_err());
        assert!(parse_literal("[1, 2").is_err());
        assert!(parse_literal("[1 2]").is_err());
        assert!(parse_literal("['open]").is_err());
        assert!(parse_literal("[1, 2] extra").is_err());
        assert!(parse_literal("").is_err());
    }

    #[test]
    fn test_shape_mismatches() {
        assert!(parse_string_sequence("[1, 2]").is_err());
        assert!(parse_string_sequence("'just a string'").is_err());
        assert!(parse_number_sequence("['1', '2']").is_err());
        assert!(parse_number_sequence("[[1], [2]]").is_err());
    }

    #[test]
    fn test_error_offset() {
        let err = parse_literal("[1, ?]").unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.to_string().contains("offset 4"));
    }
}
