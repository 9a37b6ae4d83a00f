//! MidLang scanner: splits source text into positioned tokens.
//!
//! The tokenizer only classifies characters. It never fails: an unrecognised
//! character becomes an `Invalid` token, scanning stops right there, and the
//! parser reports the problem when it reaches that token. Two-character
//! comparison operators are matched with one character of lookahead.

use std::iter::Peekable;
use std::str::Chars;

use crate::token::{Token, TokenKind};

/// Scan `source` completely. The last token is always `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
  let mut cursor = Cursor::new(source);
  let mut tokens = Vec::new();

  loop {
    cursor.skip_whitespace();
    let Some(token) = cursor.next_token() else {
      break;
    };
    let halt = token.kind == TokenKind::Invalid;
    tokens.push(token);
    if halt {
      break;
    }
  }

  tokens.push(Token::new(TokenKind::Eof, "", cursor.line, cursor.column));
  tokens
}

/// Character cursor that keeps the current line and column up to date.
struct Cursor<'a> {
  chars: Peekable<Chars<'a>>,
  line: usize,
  column: usize,
}

impl<'a> Cursor<'a> {
  fn new(source: &'a str) -> Self {
    Self {
      chars: source.chars().peekable(),
      line: 1,
      column: 1,
    }
  }

  fn peek(&mut self) -> Option<char> {
    self.chars.peek().copied()
  }

  fn advance(&mut self) -> Option<char> {
    let c = self.chars.next()?;
    self.column += 1;
    Some(c)
  }

  fn newline(&mut self) {
    self.line += 1;
    self.column = 1;
  }

  /// Skip spaces, tabs and line breaks. `\r\n` counts as a single newline.
  fn skip_whitespace(&mut self) {
    while let Some(c) = self.peek() {
      match c {
        ' ' | '\t' => {
          self.advance();
        }
        '\r' => {
          self.advance();
          if self.peek() == Some('\n') {
            self.advance();
          }
          self.newline();
        }
        '\n' => {
          self.advance();
          self.newline();
        }
        _ => break,
      }
    }
  }

  fn next_token(&mut self) -> Option<Token> {
    let (line, column) = (self.line, self.column);
    let c = self.advance()?;

    let simple = |kind: TokenKind| Token::new(kind, c.to_string(), line, column);
    let token = match c {
      '=' => self.with_equals(c, TokenKind::Assign, TokenKind::EqualEqual, line, column),
      '!' => self.with_equals(c, TokenKind::Invalid, TokenKind::NotEqual, line, column),
      '<' => self.with_equals(c, TokenKind::Less, TokenKind::LessEqual, line, column),
      '>' => self.with_equals(c, TokenKind::Greater, TokenKind::GreaterEqual, line, column),
      '+' => simple(TokenKind::Plus),
      '-' => simple(TokenKind::Minus),
      '*' => simple(TokenKind::Star),
      '/' => simple(TokenKind::Slash),
      ';' => simple(TokenKind::Semicolon),
      '(' => simple(TokenKind::LeftParen),
      ')' => simple(TokenKind::RightParen),
      '{' => simple(TokenKind::LeftBrace),
      '}' => simple(TokenKind::RightBrace),
      '0'..='9' => {
        let text = self.collect_run(c, |d| d.is_ascii_digit());
        Token::new(TokenKind::Integer, text, line, column)
      }
      'a'..='z' | 'A'..='Z' | '_' => {
        let text = self.collect_run(c, |d| d.is_ascii_alphanumeric() || d == '_');
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, line, column)
      }
      _ => simple(TokenKind::Invalid),
    };

    Some(token)
  }

  /// Emit `double` when the next character is `=`, `single` otherwise.
  fn with_equals(
    &mut self,
    first: char,
    single: TokenKind,
    double: TokenKind,
    line: usize,
    column: usize,
  ) -> Token {
    if self.peek() == Some('=') {
      self.advance();
      return Token::new(double, format!("{first}="), line, column);
    }
    Token::new(single, first.to_string(), line, column)
  }

  /// Collect `first` plus the maximal run of characters accepted by `accept`.
  fn collect_run(&mut self, first: char, accept: impl Fn(char) -> bool) -> String {
    let mut text = String::from(first);
    while let Some(c) = self.peek() {
      if !accept(c) {
        break;
      }
      text.push(c);
      self.advance();
    }
    text
  }
}
