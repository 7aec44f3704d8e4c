//! Directive file lexer.
//!
//! Splits input into whitespace-separated tokens, tracking the line each
//! token starts on. Double-quoted tokens may contain whitespace and `\"`
//! escapes; backtick-quoted tokens are taken verbatim. A `#` at the start
//! of a token begins a comment running to the end of the line. Braces are
//! ordinary tokens here; the dispenser gives them meaning.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{DirectiveError, DirectiveErrorKind, DirectiveResult, Position};

/// A single lexical token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// File the token was read from
    pub file: String,
    /// Line the token starts on (1-indexed)
    pub line: usize,
    /// Token text with quotes removed
    pub text: String,
    /// Whether the token was quoted in the input
    pub quoted: bool,
}

impl Token {
    pub fn position(&self) -> Position {
        Position::new(self.file.clone(), self.line)
    }

    /// An unquoted `{`
    pub fn is_open_brace(&self) -> bool {
        !self.quoted && self.text == "{"
    }

    /// An unquoted `}`
    pub fn is_close_brace(&self) -> bool {
        !self.quoted && self.text == "}"
    }

    /// Number of newlines inside the token text (quoted tokens only)
    pub fn line_breaks(&self) -> usize {
        self.text.matches('\n').count()
    }
}

struct Lexer<'a> {
    file: &'a str,
    tokens: Vec<Token>,
    line: usize,
    text: String,
    token_line: usize,
    in_token: bool,
}

impl<'a> Lexer<'a> {
    fn new(file: &'a str) -> Self {
        Self {
            file,
            tokens: Vec::new(),
            line: 1,
            text: String::new(),
            token_line: 1,
            in_token: false,
        }
    }

    fn start(&mut self) {
        if !self.in_token {
            self.in_token = true;
            self.token_line = self.line;
        }
    }

    fn finish(&mut self, quoted: bool) {
        if !self.in_token {
            return;
        }
        self.tokens.push(Token {
            file: self.file.to_string(),
            line: self.token_line,
            text: std::mem::take(&mut self.text),
            quoted,
        });
        self.in_token = false;
    }

    fn read_quoted(&mut self, delim: char, chars: &mut Peekable<Chars<'_>>) -> DirectiveResult<()> {
        let mut escaped = false;
        while let Some(ch) = chars.next() {
            if !escaped {
                if ch == delim {
                    return Ok(());
                }
                if ch == '\\' && delim == '"' {
                    escaped = true;
                    continue;
                }
            }
            if ch == '\n' {
                self.line += 1;
            }
            // only quotes and newlines lose their backslash
            if escaped && ch != '"' && ch != '\n' {
                self.text.push('\\');
            }
            self.text.push(ch);
            escaped = false;
        }

        Err(DirectiveError::new(
            Position::new(self.file, self.token_line),
            DirectiveErrorKind::UnterminatedQuote,
        ))
    }
}

/// Tokenize directive input read from `file`
pub fn tokenize(file: &str, input: &str) -> DirectiveResult<Vec<Token>> {
    let mut lexer = Lexer::new(file);
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\n' => {
                lexer.finish(false);
                lexer.line += 1;
            }
            c if c.is_whitespace() => lexer.finish(false),
            '#' if !lexer.in_token => {
                while chars.next_if(|&c| c != '\n').is_some() {}
            }
            '"' | '`' if !lexer.in_token => {
                lexer.start();
                lexer.read_quoted(ch, &mut chars)?;
                lexer.finish(true);
            }
            c => {
                lexer.start();
                lexer.text.push(c);
            }
        }
    }
    lexer.finish(false);

    Ok(lexer.tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_inline_directive() {
        let tokens = tokenize("Testfile", "rcodezero abc123").unwrap();
        assert_eq!(texts(&tokens), vec!["rcodezero", "abc123"]);
        assert!(tokens.iter().all(|t| t.line == 1 && !t.quoted));
        assert_eq!(tokens[0].file, "Testfile");
    }

    #[test]
    fn test_block_lines() {
        let input = "rcodezero {\n\tapi_token abc123\n\tbase_url https://my.example.at\n}\n";
        let tokens = tokenize("Testfile", input).unwrap();

        assert_eq!(
            texts(&tokens),
            vec![
                "rcodezero",
                "{",
                "api_token",
                "abc123",
                "base_url",
                "https://my.example.at",
                "}"
            ]
        );
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 2, 2, 3, 3, 4]);
        assert!(tokens[1].is_open_brace());
        assert!(tokens[6].is_close_brace());
    }

    #[test]
    fn test_quoted_tokens() {
        let tokens = tokenize("Testfile", r#"api_token "a b \"c\"" `raw \"x` "{""#).unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["api_token", r#"a b "c""#, r#"raw \"x"#, "{"]
        );
        assert!(tokens[1].quoted);
        assert!(tokens[2].quoted);
        assert!(!tokens[3].is_open_brace());
    }

    #[test]
    fn test_backslash_escapes_in_quotes() {
        let tokens = tokenize("Testfile", r#"rcodezero "abc\\" "a\b" "x\\\"y""#).unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["rcodezero", r"abc\\", r"a\b", r#"x\\"y"#]
        );

        let tokens = tokenize("Testfile", "\"one\\\ntwo\" next").unwrap();
        assert_eq!(texts(&tokens), vec!["one\ntwo", "next"]);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_empty_quoted_token() {
        let tokens = tokenize("Testfile", r#"rcodezero """#).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "");
        assert!(tokens[1].quoted);
    }

    #[test]
    fn test_comments_are_skipped() {
        let input = "# provider\nrcodezero abc # trailing\nnext#tag\n";
        let tokens = tokenize("Testfile", input).unwrap();
        assert_eq!(texts(&tokens), vec!["rcodezero", "abc", "next#tag"]);
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_multiline_quoted_token_advances_lines() {
        let input = "a \"one\ntwo\" b\nc";
        let tokens = tokenize("Testfile", input).unwrap();
        assert_eq!(texts(&tokens), vec!["a", "one\ntwo", "b", "c"]);
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[1].line_breaks(), 1);
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[3].line, 3);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = tokenize("Testfile", "rcodezero\n  \"abc").unwrap_err();
        assert_eq!(err.kind, DirectiveErrorKind::UnterminatedQuote);
        assert_eq!(err.position, Position::new("Testfile", 2));
    }

    #[test]
    fn test_crlf_line_endings() {
        let tokens = tokenize("Testfile", "rcodezero {\r\n api_token x\r\n}\r\n").unwrap();
        assert_eq!(texts(&tokens), vec!["rcodezero", "{", "api_token", "x", "}"]);
        assert_eq!(tokens[4].line, 3);
    }
}
