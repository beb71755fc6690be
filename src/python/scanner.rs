//! Byte-level scanner over Python source.
//!
//! The scanner only understands enough Python to find top-level bindings and
//! step over everything else: it tracks bracket depth and string boundaries
//! so that multi-line statements are skipped as a unit, and it evaluates
//! literal expressions into [`Value`]s.

use super::error::PythonError;
use serde_yaml::{Mapping, Number, Value};

pub(crate) struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            src: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Scan the whole source for top-level `<name> = <literal>` bindings and
    /// return the value of the last one.
    pub(crate) fn scan_binding(&mut self, name: &str) -> Result<Option<Value>, PythonError> {
        let mut found = None;
        // Loop invariant: `pos` sits at the start of a top-level line.
        while self.pos < self.src.len() {
            if let Some(ident) = self.take_identifier() {
                if ident == name && self.binding_follows() {
                    self.skip_inline_ws();
                    self.pos += 1; // the `=`
                    self.skip_inline_ws();
                    let value = self.parse_literal()?;
                    self.expect_end_of_statement()?;
                    found = Some(value);
                    continue;
                }
            }
            self.skip_statement();
        }
        Ok(found)
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Advance one byte, keeping the line counter current.
    fn bump(&mut self) {
        if self.peek() == Some(b'\n') {
            self.line += 1;
        }
        self.pos += 1;
    }

    fn error(&self, message: impl Into<String>) -> PythonError {
        PythonError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn take_identifier(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(b) if is_ident_start(b) => {}
            _ => return None,
        }
        let start = self.pos;
        self.pos += 1;
        while matches!(self.peek(), Some(b) if is_ident_continue(b)) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.src[start..self.pos]).ok()
    }

    /// Lookahead for `=` (but not `==`) after optional inline whitespace.
    fn binding_follows(&self) -> bool {
        let mut i = self.pos;
        while matches!(self.src.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        self.src.get(i) == Some(&b'=') && self.src.get(i + 1) != Some(&b'=')
    }

    /// Skip spaces, tabs, and backslash line continuations.
    fn skip_inline_ws(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r') => self.pos += 1,
                Some(b'\\') if self.peek_at(1) == Some(b'\n') => {
                    self.pos += 1;
                    self.bump();
                }
                _ => break,
            }
        }
    }

    /// Skip whitespace, newlines, and comments inside brackets.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r') => self.pos += 1,
                Some(b'\n') => self.bump(),
                Some(b'#') => self.skip_comment(),
                Some(b'\\') if self.peek_at(1) == Some(b'\n') => {
                    self.pos += 1;
                    self.bump();
                }
                _ => break,
            }
        }
    }

    /// Consume a `#` comment up to (not including) the newline.
    fn skip_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Consume the rest of a logical line, stepping over strings and
    /// balanced brackets so multi-line statements are skipped whole.
    fn skip_statement(&mut self) {
        let mut depth: usize = 0;
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.bump();
                    if depth == 0 {
                        return;
                    }
                }
                b'#' => self.skip_comment(),
                b'(' | b'[' | b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b')' | b']' | b'}' => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                }
                b'\'' | b'"' => {
                    // A malformed string in a skipped statement just runs to
                    // the end of the file; nothing to report for code we are
                    // not evaluating.
                    let _ = self.read_string();
                }
                b'\\' if self.peek_at(1) == Some(b'\n') => {
                    self.pos += 1;
                    self.bump();
                }
                _ => self.pos += 1,
            }
        }
    }

    /// After a binding's literal, only whitespace and a comment may remain.
    fn expect_end_of_statement(&mut self) -> Result<(), PythonError> {
        self.skip_inline_ws();
        if self.peek() == Some(b'#') {
            self.skip_comment();
        }
        match self.peek() {
            None => Ok(()),
            Some(b'\n') => {
                self.bump();
                Ok(())
            }
            Some(_) => Err(self.error("trailing characters after literal")),
        }
    }

    fn parse_literal(&mut self) -> Result<Value, PythonError> {
        match self.peek() {
            Some(b'\'' | b'"') => Ok(Value::String(self.read_string()?)),
            Some(b'[') => self.parse_sequence(b']'),
            Some(b'(') => self.parse_sequence(b')'),
            Some(b'{') => self.parse_mapping(),
            Some(b) if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.') => self.parse_number(),
            Some(b) if is_ident_start(b) => self.parse_keyword(),
            Some(_) => Err(self.error("expected a literal value")),
            None => Err(self.error("expected a literal value, found end of file")),
        }
    }

    fn parse_keyword(&mut self) -> Result<Value, PythonError> {
        let line = self.line;
        match self.take_identifier() {
            Some("True") => Ok(Value::Bool(true)),
            Some("False") => Ok(Value::Bool(false)),
            Some("None") => Ok(Value::Null),
            Some(other) => Err(PythonError::Syntax {
                line,
                message: format!("only literal values are supported, found name `{other}`"),
            }),
            None => Err(self.error("expected a literal value")),
        }
    }

    /// Read a quoted string, handling triple quotes and common escapes.
    fn read_string(&mut self) -> Result<String, PythonError> {
        let quote = self.src[self.pos];
        self.pos += 1;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut buf = Vec::new();
        loop {
            let Some(b) = self.peek() else {
                return Err(self.error("unterminated string literal"));
            };
            if b == quote {
                if !triple {
                    self.pos += 1;
                    break;
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    self.pos += 3;
                    break;
                }
                buf.push(b);
                self.pos += 1;
            } else if b == b'\\' {
                self.pos += 1;
                let Some(escape) = self.peek() else {
                    return Err(self.error("unterminated string literal"));
                };
                match escape {
                    b'n' => buf.push(b'\n'),
                    b't' => buf.push(b'\t'),
                    b'r' => buf.push(b'\r'),
                    b'\\' => buf.push(b'\\'),
                    b'\'' => buf.push(b'\''),
                    b'"' => buf.push(b'"'),
                    b'0' => buf.push(0),
                    // Backslash-newline continues the string on the next line.
                    b'\n' => {}
                    // Python leaves unrecognized escapes in place.
                    other => {
                        buf.push(b'\\');
                        buf.push(other);
                    }
                }
                self.bump();
            } else if b == b'\n' {
                if !triple {
                    return Err(self.error("unterminated string literal"));
                }
                buf.push(b);
                self.bump();
            } else {
                buf.push(b);
                self.pos += 1;
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse a list or tuple; both come back as a sequence.
    fn parse_sequence(&mut self, close: u8) -> Result<Value, PythonError> {
        self.pos += 1; // opening bracket
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.pos += 1;
                break;
            }
            items.push(self.parse_literal()?);
            self.skip_trivia();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("expected `,` or closing bracket in sequence")),
            }
        }
        Ok(Value::Sequence(items))
    }

    fn parse_mapping(&mut self) -> Result<Value, PythonError> {
        self.pos += 1; // the `{`
        let mut map = Mapping::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(b'}') {
                self.pos += 1;
                break;
            }
            let key = self.parse_literal()?;
            self.skip_trivia();
            match self.peek() {
                Some(b':') => self.pos += 1,
                Some(b',' | b'}') => return Err(self.error("set literals are not supported")),
                _ => return Err(self.error("expected `:` after dict key")),
            }
            self.skip_trivia();
            let value = self.parse_literal()?;
            map.insert(key, value);
            self.skip_trivia();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("expected `,` or `}` in dict")),
            }
        }
        Ok(Value::Mapping(map))
    }

    fn parse_number(&mut self) -> Result<Value, PythonError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut saw_digit = false;
        let mut is_float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {
                    saw_digit = true;
                    self.pos += 1;
                }
                b'_' => self.pos += 1,
                b'.' => {
                    is_float = true;
                    self.pos += 1;
                }
                b'e' | b'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek(), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        if !saw_digit {
            return Err(self.error("malformed number literal"));
        }

        let text: String = self.src[start..self.pos]
            .iter()
            .map(|&b| b as char)
            .filter(|&c| c != '_')
            .collect();
        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(Number::from(n)));
            }
        }
        match text.parse::<f64>() {
            Ok(f) => Ok(Value::Number(Number::from(f))),
            Err(_) => Err(self.error("malformed number literal")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Result<Option<Value>, PythonError> {
        Scanner::new(source).scan_binding("cartridge")
    }

    fn value(source: &str) -> Value {
        extract(source).unwrap().unwrap()
    }

    #[test]
    fn string_binding() {
        assert_eq!(value("cartridge = 'foo'"), Value::String("foo".into()));
        assert_eq!(value("cartridge = \"foo\"\n"), Value::String("foo".into()));
    }

    #[test]
    fn triple_quoted_string() {
        assert_eq!(
            value("cartridge = '''line one\nline two'''\n"),
            Value::String("line one\nline two".into())
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            value(r#"cartridge = 'a\tb\n\'c\''"#),
            Value::String("a\tb\n'c'".into())
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(value("cartridge = 42"), Value::Number(42.into()));
        assert_eq!(value("cartridge = -7"), Value::Number((-7).into()));
        assert_eq!(value("cartridge = 1_000"), Value::Number(1000.into()));
        assert_eq!(value("cartridge = 2.5"), Value::Number(2.5.into()));
        assert_eq!(value("cartridge = 1e3"), Value::Number(1000.0.into()));
    }

    #[test]
    fn keywords() {
        assert_eq!(value("cartridge = True"), Value::Bool(true));
        assert_eq!(value("cartridge = False"), Value::Bool(false));
        assert_eq!(value("cartridge = None"), Value::Null);
    }

    #[test]
    fn nested_collections() {
        let got = value("cartridge = {'a': [1, 2], 'b': {'c': None}}");
        let expected: Value = serde_yaml::from_str("a: [1, 2]\nb:\n  c: null").unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn tuple_reads_as_sequence() {
        assert_eq!(
            value("cartridge = (1, 2)"),
            Value::Sequence(vec![Value::Number(1.into()), Value::Number(2.into())])
        );
    }

    #[test]
    fn multiline_dict_with_comments_and_trailing_comma() {
        let source = "\
cartridge = {
    'START': {
        'prompt': 'hello',   # greeting
        'events': [],
    },
}
";
        let got = value(source);
        let expected: Value = serde_yaml::from_str("START:\n  prompt: hello\n  events: []").unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn last_binding_wins() {
        assert_eq!(
            value("cartridge = 'first'\ncartridge = 'second'\n"),
            Value::String("second".into())
        );
    }

    #[test]
    fn other_statements_are_skipped() {
        let source = "\
import os

\"\"\"module docstring with cartridge = 'decoy' inside\"\"\"

def helper(cartridge):
    cartridge = 'inner'
    return cartridge

cartridge = 'real'
";
        assert_eq!(value(source), Value::String("real".into()));
    }

    #[test]
    fn indented_binding_does_not_count() {
        assert_eq!(extract("    cartridge = 'inner'\n").unwrap(), None);
    }

    #[test]
    fn comparison_is_not_a_binding() {
        assert_eq!(extract("cartridge == 'foo'\n").unwrap(), None);
    }

    #[test]
    fn missing_binding_is_none() {
        assert_eq!(extract("other = 1\n").unwrap(), None);
    }

    #[test]
    fn non_literal_rhs_is_rejected() {
        let err = extract("cartridge = load()\n").unwrap_err();
        let PythonError::Syntax { line, message } = err;
        assert_eq!(line, 1);
        assert!(message.contains("load"));
    }

    #[test]
    fn set_literal_is_rejected() {
        let err = extract("cartridge = {1, 2}\n").unwrap_err();
        let PythonError::Syntax { message, .. } = err;
        assert!(message.contains("set"));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let err = extract("cartridge = 'foo' + bar\n").unwrap_err();
        let PythonError::Syntax { message, .. } = err;
        assert!(message.contains("trailing"));
    }

    #[test]
    fn unterminated_string_reports_line() {
        let err = extract("x = 1\ncartridge = 'open\n").unwrap_err();
        let PythonError::Syntax { line, .. } = err;
        assert_eq!(line, 2);
    }

    #[test]
    fn trailing_comment_after_literal_is_fine() {
        assert_eq!(
            value("cartridge = 'foo'  # the cartridge\n"),
            Value::String("foo".into())
        );
    }
}
