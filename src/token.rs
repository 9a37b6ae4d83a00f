//! Token model shared by the tokenizer and the parser.
//!
//! A token is pure data: its kind, the exact source text it was built from
//! and the 1-based position of its first character.

use std::fmt;

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Integer,
  Identifier,

  Plus,
  Minus,
  Star,
  Slash,

  EqualEqual,
  NotEqual,
  Less,
  Greater,
  LessEqual,
  GreaterEqual,

  Assign,
  Semicolon,
  LeftParen,
  RightParen,
  LeftBrace,
  RightBrace,

  Var,
  Print,
  Println,
  InputInt,
  If,
  Else,
  While,

  Eof,
  Invalid,
}

impl TokenKind {
  /// Look up a collected identifier in the keyword set.
  pub fn keyword(text: &str) -> Option<TokenKind> {
    let kind = match text {
      "var" => TokenKind::Var,
      "print" => TokenKind::Print,
      "println" => TokenKind::Println,
      "inputInt" => TokenKind::InputInt,
      "if" => TokenKind::If,
      "else" => TokenKind::Else,
      "while" => TokenKind::While,
      _ => return None,
    };
    Some(kind)
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      TokenKind::Integer => "integer literal",
      TokenKind::Identifier => "identifier",
      TokenKind::Plus => "'+'",
      TokenKind::Minus => "'-'",
      TokenKind::Star => "'*'",
      TokenKind::Slash => "'/'",
      TokenKind::EqualEqual => "'=='",
      TokenKind::NotEqual => "'!='",
      TokenKind::Less => "'<'",
      TokenKind::Greater => "'>'",
      TokenKind::LessEqual => "'<='",
      TokenKind::GreaterEqual => "'>='",
      TokenKind::Assign => "'='",
      TokenKind::Semicolon => "';'",
      TokenKind::LeftParen => "'('",
      TokenKind::RightParen => "')'",
      TokenKind::LeftBrace => "'{'",
      TokenKind::RightBrace => "'}'",
      TokenKind::Var => "keyword 'var'",
      TokenKind::Print => "keyword 'print'",
      TokenKind::Println => "keyword 'println'",
      TokenKind::InputInt => "keyword 'inputInt'",
      TokenKind::If => "keyword 'if'",
      TokenKind::Else => "keyword 'else'",
      TokenKind::While => "keyword 'while'",
      TokenKind::Eof => "end of input",
      TokenKind::Invalid => "invalid token",
    };
    f.write_str(text)
  }
}

/// A classified, positioned lexical unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub line: usize,
  pub column: usize,
}

impl Token {
  pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
    Self {
      kind,
      text: text.into(),
      line,
      column,
    }
  }
}
