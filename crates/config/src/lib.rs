//! Directive configuration support for DNS provider modules
//!
//! This crate implements the host side of module configuration: lexing
//! directive files, walking their tokens, and expanding placeholders in the
//! values modules receive.
//!
//! # Module Organization
//!
//! - [`lexer`]: Tokenizer with line tracking and quoting rules
//! - [`dispenser`]: Token cursor with argument and block navigation
//! - [`replacer`]: `{$VAR}`-style placeholder substitution
//! - [`error`]: Positioned parse errors

pub mod dispenser;
pub mod error;
pub mod lexer;
pub mod replacer;

pub use dispenser::Dispenser;
pub use error::{DirectiveError, DirectiveErrorKind, DirectiveResult, Position};
pub use lexer::{tokenize, Token};
pub use replacer::Replacer;
