//! Cursor over directive tokens.
//!
//! The dispenser hands tokens to directive consumers one at a time. A
//! consumer typically loops over [`Dispenser::next`] for each occurrence of
//! its directive, reads arguments on the same line with
//! [`Dispenser::next_arg`], and walks nested sub-directives with
//! [`Dispenser::next_block`]:
//!
//! ```
//! use rcodezero_config::Dispenser;
//!
//! let mut d = Dispenser::from_source("Caddyfile", "rcodezero {\n  api_token abc\n}").unwrap();
//! let mut seen = Vec::new();
//! while d.next() {
//!     let nesting = d.nesting();
//!     while d.next_block(nesting) {
//!         seen.push(d.val().to_string());
//!         while d.next_arg() {
//!             seen.push(d.val().to_string());
//!         }
//!     }
//! }
//! assert_eq!(seen, vec!["api_token", "abc"]);
//! ```

use tracing::trace;

use crate::error::{DirectiveError, DirectiveErrorKind, DirectiveResult, Position};
use crate::lexer::{tokenize, Token};

/// Token cursor with block nesting tracking
#[derive(Debug, Clone)]
pub struct Dispenser {
    file: String,
    tokens: Vec<Token>,
    /// Index of the current token; `None` before the first `next()`
    cursor: Option<usize>,
    nesting: usize,
}

impl Dispenser {
    /// Create a dispenser over already lexed tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        let file = tokens.first().map(|t| t.file.clone()).unwrap_or_default();
        Self {
            file,
            tokens,
            cursor: None,
            nesting: 0,
        }
    }

    /// Lex `input` and check that its blocks are balanced
    pub fn from_source(file: &str, input: &str) -> DirectiveResult<Self> {
        let tokens = tokenize(file, input)?;
        check_braces(&tokens)?;
        trace!(file = %file, tokens = tokens.len(), "Lexed directive input");

        let mut dispenser = Self::new(tokens);
        dispenser.file = file.to_string();
        Ok(dispenser)
    }

    /// Dispenser over inline test input, reported as `Testfile`
    pub fn test(input: &str) -> DirectiveResult<Self> {
        Self::from_source("Testfile", input)
    }

    /// Advance to the next token regardless of line or nesting
    pub fn next(&mut self) -> bool {
        let next = self.next_index();
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    /// Advance to the next token if it is an argument on the current line
    ///
    /// Unquoted braces are never arguments: a `{` opens a block and is left
    /// for [`Dispenser::next_block`]; a `}` closes the enclosing block.
    pub fn next_arg(&mut self) -> bool {
        if !self.next_on_same_line() {
            return false;
        }
        match self.peek() {
            Some(tok) if tok.is_open_brace() || tok.is_close_brace() => false,
            Some(_) => self.next(),
            None => false,
        }
    }

    /// Current block nesting depth
    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Advance to the next sub-directive inside a block
    ///
    /// Call with the nesting level observed before the block. On the first
    /// call the block is entered if a `{` follows on the same line; each
    /// call then loads the next token inside the block and returns `false`
    /// once the closing `}` brings nesting back to `level`.
    pub fn next_block(&mut self, level: usize) -> bool {
        if self.nesting > level {
            if !self.next() {
                return false;
            }
            if let Some(tok) = self.token() {
                if tok.is_close_brace() {
                    self.nesting -= 1;
                } else if tok.is_open_brace() {
                    self.nesting += 1;
                }
            }
            return self.nesting > level;
        }

        if !self.next_on_same_line() || !self.peek().is_some_and(Token::is_open_brace) {
            return false;
        }
        self.next();

        if !self.next() {
            return false;
        }
        if self.token().is_some_and(Token::is_close_brace) {
            // opened and closed right away
            return false;
        }
        self.nesting += 1;
        true
    }

    /// Text of the current token, or `""` before the first token
    pub fn val(&self) -> &str {
        self.token().map(|t| t.text.as_str()).unwrap_or("")
    }

    /// The current token
    pub fn token(&self) -> Option<&Token> {
        self.cursor.and_then(|i| self.tokens.get(i))
    }

    /// Position of the current token
    pub fn position(&self) -> Position {
        match self.token().or_else(|| self.tokens.first()) {
            Some(tok) => tok.position(),
            None => Position::new(self.file.clone(), 0),
        }
    }

    /// Consume and return all remaining arguments on the current line
    pub fn remaining_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while self.next_arg() {
            args.push(self.val().to_string());
        }
        args
    }

    /// Split off the directive at the cursor, including its block
    ///
    /// The cursor must be on a directive name. The returned dispenser is
    /// positioned before that name, and this dispenser moves to the last
    /// token of the segment.
    pub fn new_from_next_segment(&mut self) -> Dispenser {
        let Some(start) = self.cursor else {
            return Dispenser::new(Vec::new());
        };

        let mut end = start;
        let mut depth = 0usize;
        while let Some(tok) = self.tokens.get(end + 1) {
            if depth == 0 && !on_same_line(&self.tokens[end], tok) {
                break;
            }
            if tok.is_open_brace() {
                depth += 1;
            } else if tok.is_close_brace() {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            end += 1;
            if depth == 0 && tok.is_close_brace() {
                break;
            }
        }

        self.cursor = Some(end);
        let mut segment = Dispenser::new(self.tokens[start..=end].to_vec());
        segment.file = self.file.clone();
        segment
    }

    /// Rewind to before the first token
    pub fn reset(&mut self) {
        self.cursor = None;
        self.nesting = 0;
    }

    /// Argument-count error after the current token
    pub fn arg_err(&self) -> DirectiveError {
        self.err_kind(DirectiveErrorKind::ArgumentCount {
            after: self.val().to_string(),
        })
    }

    /// Error with a message at the current position
    pub fn err(&self, message: impl Into<String>) -> DirectiveError {
        self.err_kind(DirectiveErrorKind::Message(message.into()))
    }

    fn err_kind(&self, kind: DirectiveErrorKind) -> DirectiveError {
        DirectiveError::new(self.position(), kind)
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |c| c + 1)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.next_index())
    }

    fn next_on_same_line(&self) -> bool {
        match (self.token(), self.peek()) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(curr), Some(next)) => on_same_line(curr, next),
        }
    }
}

fn on_same_line(curr: &Token, next: &Token) -> bool {
    curr.file == next.file && curr.line + curr.line_breaks() == next.line
}

fn check_braces(tokens: &[Token]) -> DirectiveResult<()> {
    let mut open: Vec<&Token> = Vec::new();
    for tok in tokens {
        if tok.is_open_brace() {
            open.push(tok);
        } else if tok.is_close_brace() && open.pop().is_none() {
            return Err(DirectiveError::new(
                tok.position(),
                DirectiveErrorKind::UnexpectedClosingBrace,
            ));
        }
    }

    match open.last() {
        Some(tok) => Err(DirectiveError::new(
            tok.position(),
            DirectiveErrorKind::UnclosedBlock,
        )),
        None => Ok(()),
    }
}
