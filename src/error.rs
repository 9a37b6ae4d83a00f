//! Translation errors and their rendering.
//!
//! Diagnostics name the offending token and its position, then repeat the
//! source line with a caret under the column.

use std::io;

use snafu::Snafu;

use crate::token::{Token, TokenKind};

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CompileError {
  /// The tokenizer stopped on a character it could not classify.
  #[snafu(display(
    "line {line}, column {column}: unrecognized character '{character}'\n{source_line}\n{marker}"
  ))]
  Lexical {
    character: String,
    line: usize,
    column: usize,
    source_line: String,
    marker: String,
  },

  #[snafu(display(
    "line {line}, column {column}: {message}, found {found}\n{source_line}\n{marker}"
  ))]
  Syntax {
    message: String,
    found: TokenKind,
    line: usize,
    column: usize,
    source_line: String,
    marker: String,
  },

  #[snafu(display("failed to write generated code: {source}"))]
  Write { source: io::Error },
}

/// Returned when a backend name does not match any known target.
#[derive(Debug, Snafu)]
#[snafu(
  visibility(pub(crate)),
  display("unknown target '{name}', expected 'structured' or 'assembly'")
)]
pub struct UnknownTargetError {
  name: String,
}

impl CompileError {
  /// Construct an error anchored at `token`.
  ///
  /// Invalid tokens are reported as lexical errors regardless of what the
  /// parser was expecting at that point.
  pub fn at(source: &str, token: &Token, message: impl Into<String>) -> Self {
    let source_line = line_text(source, token.line).to_string();
    let marker = format!("{}^", " ".repeat(token.column.saturating_sub(1)));

    if token.kind == TokenKind::Invalid {
      return Self::Lexical {
        character: token.text.clone(),
        line: token.line,
        column: token.column,
        source_line,
        marker,
      };
    }

    Self::Syntax {
      message: message.into(),
      found: token.kind,
      line: token.line,
      column: token.column,
      source_line,
      marker,
    }
  }

  /// Source position of the error, when it has one.
  pub fn position(&self) -> Option<(usize, usize)> {
    match self {
      Self::Lexical { line, column, .. } | Self::Syntax { line, column, .. } => {
        Some((*line, *column))
      }
      Self::Write { .. } => None,
    }
  }
}

/// Return the 1-based `line` of `source`, using the tokenizer's notion of
/// line breaks (`\n`, `\r\n` or a lone `\r`).
fn line_text(source: &str, line: usize) -> &str {
  let mut rest = source;
  for _ in 1..line {
    let Some(end) = rest.find(['\n', '\r']) else {
      return "";
    };
    let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
    rest = &rest[end + skip..];
  }
  let end = rest.find(['\n', '\r']).unwrap_or(rest.len());
  &rest[..end]
}
