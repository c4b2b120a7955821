//! Query expression parser
//!
//! This module implements a recursive descent parser for JSONPath query
//! expressions with position-aware error reporting.
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

use super::ast::*;
use super::error::*;
use std::iter::Peekable;
use std::str::Chars;

type Result<T> = std::result::Result<T, QueryError>;

/// Query expression parser
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    /// Character iterator
    chars: Peekable<Chars<'a>>,
    /// Current byte offset in input
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input
    pub fn new(input: &'a str) -> Result<Self> {
        if input.is_empty() {
            return Err(QueryError::parse("can't backup beyond start", 0, input));
        }

        Ok(Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        })
    }

    /// Parse the query expression into an AST
    pub fn parse(mut self) -> Result<Expression> {
        let root = self.parse_root()?;
        let mut selectors = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }

            let selector = self.parse_selector()?;
            let descends = selector == Selector::RecursiveDescent;
            selectors.push(selector);

            if descends {
                selectors.push(self.parse_descendant_target()?);
            }
        }

        Ok(Expression::new(root, selectors))
    }

    /// Parse the root selector ($)
    fn parse_root(&mut self) -> Result<Selector> {
        self.skip_whitespace();

        if self.current_char() != Some('$') {
            return Err(QueryError::syntax(
                "Query must start with $",
                self.position,
                self.input,
                vec!["$".to_string()],
                self.found(),
            ));
        }

        self.advance();
        Ok(Selector::Root)
    }

    /// Parse a selector
    fn parse_selector(&mut self) -> Result<Selector> {
        match self.current_char() {
            Some('.') => self.parse_dot_selector(),
            Some('[') => self.parse_bracket_selector(),
            Some(ch) => Err(QueryError::syntax(
                "Unexpected character in selector",
                self.position,
                self.input,
                vec![".".to_string(), "[".to_string()],
                ch.to_string(),
            )),
            None => Err(QueryError::parse("Unexpected end of input", self.position, self.input)),
        }
    }

    /// Parse dot notation selector (.name, .* or ..)
    fn parse_dot_selector(&mut self) -> Result<Selector> {
        self.advance(); // consume '.'

        match self.current_char() {
            Some('.') => {
                self.advance();
                Ok(Selector::RecursiveDescent)
            }
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            _ => {
                let name = self.parse_identifier()?;
                Ok(Selector::Child(ChildSelector::Property(name)))
            }
        }
    }

    /// Parse what follows `..`: a member name, a wildcard or a bracket
    fn parse_descendant_target(&mut self) -> Result<Selector> {
        match self.current_char() {
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some('[') => self.parse_bracket_selector(),
            Some(ch) if is_name_first(ch) => {
                let name = self.parse_identifier()?;
                Ok(Selector::Child(ChildSelector::Property(name)))
            }
            Some(ch) => Err(QueryError::syntax(
                "Expected member name, '*' or '[' after '..'",
                self.position,
                self.input,
                vec!["identifier".to_string(), "*".to_string(), "[".to_string()],
                ch.to_string(),
            )),
            None => Err(QueryError::parse(
                "Unexpected end of input after '..'",
                self.position,
                self.input,
            )),
        }
    }

    /// Parse bracket notation selector
    fn parse_bracket_selector(&mut self) -> Result<Selector> {
        let open = self.position;
        self.advance(); // consume '['

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            items.push(self.parse_bracket_item(open)?);
            self.skip_whitespace();

            match self.current_char() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {
                    self.advance();
                    break;
                }
                Some(ch) => {
                    return Err(QueryError::syntax(
                        "Expected ',' or ']'",
                        self.position,
                        self.input,
                        vec![",".to_string(), "]".to_string()],
                        ch.to_string(),
                    ))
                }
                None => {
                    return Err(
                        QueryError::parse("Unterminated bracket selector", open, self.input)
                    )
                }
            }
        }

        if items.len() == 1 {
            Ok(items.remove(0))
        } else {
            Ok(Selector::Union(UnionSelector { selectors: items }))
        }
    }

    /// Parse one entry of a bracket selector
    fn parse_bracket_item(&mut self, open: usize) -> Result<Selector> {
        match self.current_char() {
            Some('\'') | Some('"') => {
                let name = self.parse_quoted_string()?;
                Ok(Selector::Child(ChildSelector::QuotedProperty(name)))
            }
            Some('*') => {
                self.advance();
                Ok(Selector::Wildcard)
            }
            Some('?') => Err(QueryError::unsupported(
                "Filter expressions",
                self.position,
                self.input,
            )),
            Some(ch) if ch == '-' || ch == ':' || ch.is_ascii_digit() => self.parse_index_or_slice(),
            Some(ch) => Err(QueryError::syntax(
                "Invalid character in bracket selector",
                self.position,
                self.input,
                vec![
                    "quoted name".to_string(),
                    "*".to_string(),
                    "integer".to_string(),
                    ":".to_string(),
                ],
                ch.to_string(),
            )),
            None => Err(QueryError::parse("Unterminated bracket selector", open, self.input)),
        }
    }

    /// Parse `index` or `start:end:step`
    fn parse_index_or_slice(&mut self) -> Result<Selector> {
        let start = self.parse_optional_integer()?;
        self.skip_whitespace();

        if self.current_char() != Some(':') {
            return match start {
                Some(index) => Ok(Selector::Index(IndexSelector {
                    index: array_index(index),
                })),
                None => Err(QueryError::syntax(
                    "Expected integer",
                    self.position,
                    self.input,
                    vec!["integer".to_string()],
                    self.found(),
                )),
            };
        }

        self.advance(); // consume ':'
        self.skip_whitespace();
        let end = self.parse_optional_integer()?;
        self.skip_whitespace();

        let mut step = None;
        if self.current_char() == Some(':') {
            self.advance();
            self.skip_whitespace();
            let step_position = self.position;
            step = self.parse_optional_integer()?;
            if step == Some(0) {
                return Err(
                    QueryError::parse("Slice step cannot be zero", step_position, self.input)
                );
            }
        }

        Ok(Selector::Slice(SliceSelector { start, end, step }))
    }

    fn parse_optional_integer(&mut self) -> Result<Option<i64>> {
        match self.current_char() {
            Some(ch) if ch == '-' || ch.is_ascii_digit() => Ok(Some(self.parse_integer()?)),
            _ => Ok(None),
        }
    }

    /// Parse a signed integer
    fn parse_integer(&mut self) -> Result<i64> {
        let start = self.position;
        let mut digits = String::new();

        if self.current_char() == Some('-') {
            digits.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if digits.is_empty() || digits == "-" {
            return Err(QueryError::syntax(
                "Expected integer",
                self.position,
                self.input,
                vec!["digit".to_string()],
                self.found(),
            ));
        }

        digits.parse().map_err(|_| {
            QueryError::parse(format!("Integer out of range: {}", digits), start, self.input)
        })
    }

    /// Parse a member name in shorthand notation
    fn parse_identifier(&mut self) -> Result<String> {
        let mut identifier = String::new();

        if !self.current_char().map(is_name_first).unwrap_or(false) {
            return Err(QueryError::syntax(
                "Expected member name",
                self.position,
                self.input,
                vec!["letter or _".to_string()],
                self.found(),
            ));
        }

        while let Some(ch) = self.current_char() {
            if is_name_first(ch) || ch.is_ascii_digit() {
                identifier.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Ok(identifier)
    }

    /// Parse a single or double quoted string
    fn parse_quoted_string(&mut self) -> Result<String> {
        let start = self.position;
        let quote_char = match self.advance() {
            Some(ch @ ('\'' | '"')) => ch,
            _ => return Err(QueryError::parse("Expected quoted string", start, self.input)),
        };

        let mut string = String::new();

        while let Some(ch) = self.advance() {
            if ch == quote_char {
                return Ok(string);
            }
            if ch != '\\' {
                string.push(ch);
                continue;
            }

            let escape_position = self.position;
            match self.advance() {
                Some('n') => string.push('\n'),
                Some('r') => string.push('\r'),
                Some('t') => string.push('\t'),
                Some('b') => string.push('\u{0008}'),
                Some('f') => string.push('\u{000C}'),
                Some('u') => string.push(self.parse_unicode_escape(escape_position)?),
                Some(ch @ ('\\' | '/' | '\'' | '"')) => string.push(ch),
                Some(ch) => {
                    return Err(QueryError::parse(
                        format!("Invalid escape sequence '\\{}'", ch),
                        escape_position,
                        self.input,
                    ))
                }
                None => break,
            }
        }

        Err(QueryError::parse("Unterminated string literal", start, self.input))
    }

    /// Parse the four hex digits of a `\u` escape, including surrogate pairs
    fn parse_unicode_escape(&mut self, escape_position: usize) -> Result<char> {
        let high = self.parse_hex4(escape_position)?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if self.advance() != Some('\\') || self.advance() != Some('u') {
                return Err(QueryError::parse(
                    "Unpaired surrogate in escape sequence",
                    escape_position,
                    self.input,
                ));
            }
            let low = self.parse_hex4(escape_position)?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(QueryError::parse(
                    "Invalid low surrogate in escape sequence",
                    escape_position,
                    self.input,
                ));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };

        char::from_u32(code).ok_or_else(|| {
            QueryError::parse("Invalid unicode escape", escape_position, self.input)
        })
    }

    fn parse_hex4(&mut self, escape_position: usize) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .advance()
                .and_then(|ch| ch.to_digit(16))
                .ok_or_else(|| QueryError::parse("Invalid unicode escape", escape_position, self.input))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get current character without advancing
    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Describe the current character for error reporting
    fn found(&mut self) -> String {
        self.current_char()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "EOF".to_string())
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&mut self) -> bool {
        self.current_char().is_none()
    }
}

fn is_name_first(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn array_index(value: i64) -> ArrayIndex {
    if value < 0 {
        ArrayIndex::Negative(value.unsigned_abs() as usize)
    } else {
        ArrayIndex::Positive(value as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Expression {
        Parser::new(input).unwrap().parse().unwrap()
    }

    fn parse_err(input: &str) -> String {
        match Parser::new(input).and_then(|p| p.parse()) {
            Err(err) => err.reason(),
            Ok(expr) => panic!("expected query error, got {expr:?}"),
        }
    }

    #[test]
    fn test_parse_root() {
        let expr = parse("$");
        assert!(matches!(expr.root, Selector::Root));
        assert!(expr.selectors.is_empty());
    }

    #[test]
    fn test_parse_property() {
        let expr = parse("$.store.book");
        assert_eq!(
            expr.selectors,
            vec![
                Selector::Child(ChildSelector::Property("store".to_string())),
                Selector::Child(ChildSelector::Property("book".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_quoted_property() {
        let expr = parse("$['first name'][\"it's\"]");
        assert_eq!(
            expr.selectors,
            vec![
                Selector::Child(ChildSelector::QuotedProperty("first name".to_string())),
                Selector::Child(ChildSelector::QuotedProperty("it's".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_escapes() {
        let expr = parse(r"$['a\'bé\n']");
        assert_eq!(
            expr.selectors,
            vec![Selector::Child(ChildSelector::QuotedProperty("a'bé\n".to_string()))]
        );
    }

    #[test]
    fn test_parse_array_index() {
        let expr = parse("$.books[0][-1]");
        assert_eq!(
            expr.selectors[1],
            Selector::Index(IndexSelector { index: ArrayIndex::Positive(0) })
        );
        assert_eq!(
            expr.selectors[2],
            Selector::Index(IndexSelector { index: ArrayIndex::Negative(1) })
        );
    }

    #[test]
    fn test_parse_wildcards() {
        let expr = parse("$.a.*[*]");
        assert_eq!(expr.selectors[1], Selector::Wildcard);
        assert_eq!(expr.selectors[2], Selector::Wildcard);
    }

    #[test]
    fn test_parse_slice() {
        let expr = parse("$[1:3]");
        assert_eq!(
            expr.selectors[0],
            Selector::Slice(SliceSelector { start: Some(1), end: Some(3), step: None })
        );

        let expr = parse("$[::-1]");
        assert_eq!(
            expr.selectors[0],
            Selector::Slice(SliceSelector { start: None, end: None, step: Some(-1) })
        );
    }

    #[test]
    fn test_parse_union() {
        let expr = parse("$[ 'a', 0 , 1:2, * ]");
        match &expr.selectors[0] {
            Selector::Union(union) => {
                assert_eq!(union.selectors.len(), 4);
                assert_eq!(union.selectors[3], Selector::Wildcard);
            }
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_recursive_descent() {
        let expr = parse("$..author");
        assert_eq!(
            expr.selectors,
            vec![
                Selector::RecursiveDescent,
                Selector::Child(ChildSelector::Property("author".to_string())),
            ]
        );

        let expr = parse("$..*");
        assert_eq!(expr.selectors, vec![Selector::RecursiveDescent, Selector::Wildcard]);

        let expr = parse("$..[0]");
        assert_eq!(expr.selectors.len(), 2);
    }

    #[test]
    fn test_display_round_trip() {
        for input in ["$.a.b", "$['a b'][0]", "$..c", "$..*", "$[1:2:3]", "$['x',1]"] {
            let printed = parse(input).to_string();
            assert_eq!(parse(&printed), parse(input), "{input} printed as {printed}");
        }
    }

    #[test]
    fn test_empty_expression() {
        assert!(matches!(Parser::new(""), Err(QueryError::Parse { position: 0, .. })));
        assert_eq!(parse_err(""), "can't backup beyond start ('':0)");
    }

    #[test]
    fn test_parse_errors_carry_position() {
        assert_eq!(parse_err("foo"), "Query must start with $ ('foo':0)");
        assert_eq!(parse_err("$.a["), "Unterminated bracket selector ('$.a[':3)");
        assert_eq!(parse_err("$['abc"), "Unterminated string literal ('$['abc':2)");
        assert_eq!(parse_err("$[0:1:0]"), "Slice step cannot be zero ('$[0:1:0]':6)");
        assert_eq!(parse_err("$.1"), "Expected member name ('$.1':2)");
        assert_eq!(parse_err("$.."), "Unexpected end of input after '..' ('$..':3)");
    }

    #[test]
    fn test_filters_are_rejected() {
        assert_eq!(
            parse_err("$.a[?(@.b)]"),
            "Filter expressions are not supported ('$.a[?(@.b)]':4)"
        );
    }
}
