//! MidLang grammar as a recursive-descent parser.
//!
//! One function per grammar rule, one token of lookahead. Arithmetic uses two
//! precedence levels (`+ -` below `* /`), both left-associative. Conditions
//! are a single comparison and only appear inside `if (...)` and
//! `while (...)`. The first mismatch aborts the whole parse.
//!
//! Nesting is capped at [`MAX_NESTING`] levels. Each block, each parenthesised
//! sub-expression and each operator in a chain counts as one level, which keeps
//! the parser, the backends and the AST drop within a bounded stack depth.

use crate::ast::{BinaryOp, CompareOp, Condition, Expr, Program, Stmt};
use crate::error::{CompileError, CompileResult};
use crate::token::{Token, TokenKind};

/// Deepest nesting of blocks and expressions accepted in one program.
pub const MAX_NESTING: usize = 256;

/// Parse a whole program from the token stream.
pub fn parse(tokens: &[Token], source: &str) -> CompileResult<Program> {
  let mut stream = TokenStream::new(tokens, source);
  let mut statements = Vec::new();

  while !stream.is_eof() {
    statements.push(parse_stmt(&mut stream)?);
  }

  Ok(Program { statements })
}

fn parse_stmt(stream: &mut TokenStream) -> CompileResult<Stmt> {
  if stream.equal(TokenKind::Var) {
    return parse_var_decl(stream);
  }
  if stream.equal(TokenKind::Print) {
    return parse_print(stream, false);
  }
  if stream.equal(TokenKind::Println) {
    return parse_print(stream, true);
  }
  if stream.equal(TokenKind::If) {
    return parse_if(stream);
  }
  if stream.equal(TokenKind::While) {
    return parse_while(stream);
  }
  // Anything else must be an assignment.
  parse_assign(stream)
}

fn parse_var_decl(stream: &mut TokenStream) -> CompileResult<Stmt> {
  let name = stream.get_ident("expected variable name after 'var'")?;
  stream.skip(TokenKind::Assign, "expected '=' after variable name")?;
  let init = parse_expr(stream)?;
  stream.skip(TokenKind::Semicolon, "expected ';' after expression")?;
  Ok(Stmt::VarDecl { name, init })
}

fn parse_assign(stream: &mut TokenStream) -> CompileResult<Stmt> {
  let name = stream.get_ident("expected variable name")?;
  stream.skip(TokenKind::Assign, "expected '=' after variable name")?;
  let value = parse_expr(stream)?;
  stream.skip(TokenKind::Semicolon, "expected ';' after expression")?;
  Ok(Stmt::Assign { name, value })
}

fn parse_print(stream: &mut TokenStream, newline: bool) -> CompileResult<Stmt> {
  let open_message = if newline {
    "expected '(' after 'println'"
  } else {
    "expected '(' after 'print'"
  };
  stream.skip(TokenKind::LeftParen, open_message)?;
  let value = parse_expr(stream)?;
  stream.skip(TokenKind::RightParen, "expected ')' after expression")?;
  stream.skip(TokenKind::Semicolon, "expected ';' after ')'")?;
  Ok(Stmt::Print { value, newline })
}

fn parse_if(stream: &mut TokenStream) -> CompileResult<Stmt> {
  stream.skip(TokenKind::LeftParen, "expected '(' after 'if'")?;
  let cond = parse_condition(stream)?;
  stream.skip(TokenKind::RightParen, "expected ')' after condition")?;
  let then_body = parse_block(stream, "expected '{' after ')'", "expected '}' after if block")?;

  let else_body = if stream.equal(TokenKind::Else) {
    parse_block(
      stream,
      "expected '{' after 'else'",
      "expected '}' after else block",
    )?
  } else {
    Vec::new()
  };

  Ok(Stmt::If {
    cond,
    then_body,
    else_body,
  })
}

fn parse_while(stream: &mut TokenStream) -> CompileResult<Stmt> {
  stream.skip(TokenKind::LeftParen, "expected '(' after 'while'")?;
  let cond = parse_condition(stream)?;
  stream.skip(TokenKind::RightParen, "expected ')' after condition")?;
  let body = parse_block(
    stream,
    "expected '{' after ')'",
    "expected '}' after while block",
  )?;
  Ok(Stmt::While { cond, body })
}

/// Parse `'{' statement* '}'`.
fn parse_block(
  stream: &mut TokenStream,
  open_message: &str,
  close_message: &str,
) -> CompileResult<Vec<Stmt>> {
  if stream.check(TokenKind::LeftBrace) {
    stream.enter()?;
  }
  stream.skip(TokenKind::LeftBrace, open_message)?;
  let mut body = Vec::new();
  while !stream.check(TokenKind::RightBrace) && !stream.is_eof() {
    body.push(parse_stmt(stream)?);
  }
  stream.skip(TokenKind::RightBrace, close_message)?;
  stream.leave();
  Ok(body)
}

fn parse_condition(stream: &mut TokenStream) -> CompileResult<Condition> {
  let lhs = parse_expr(stream)?;

  let op = match stream.peek().kind {
    TokenKind::EqualEqual => CompareOp::Eq,
    TokenKind::NotEqual => CompareOp::Ne,
    TokenKind::Less => CompareOp::Lt,
    TokenKind::Greater => CompareOp::Gt,
    TokenKind::LessEqual => CompareOp::Le,
    TokenKind::GreaterEqual => CompareOp::Ge,
    _ => return Err(stream.error("expected comparison operator (==, !=, <, >, <=, >=)")),
  };
  stream.pos += 1;

  let rhs = parse_expr(stream)?;
  Ok(Condition { op, lhs, rhs })
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<Expr> {
  let mut node = parse_term(stream)?;
  let depth = stream.depth;

  loop {
    let op = match stream.peek().kind {
      TokenKind::Plus => BinaryOp::Add,
      TokenKind::Minus => BinaryOp::Sub,
      _ => break,
    };
    stream.enter()?;
    stream.pos += 1;
    let rhs = parse_term(stream)?;
    node = Expr::binary(op, node, rhs);
  }

  stream.depth = depth;
  Ok(node)
}

fn parse_term(stream: &mut TokenStream) -> CompileResult<Expr> {
  let mut node = parse_factor(stream)?;
  let depth = stream.depth;

  loop {
    let op = match stream.peek().kind {
      TokenKind::Star => BinaryOp::Mul,
      TokenKind::Slash => BinaryOp::Div,
      _ => break,
    };
    stream.enter()?;
    stream.pos += 1;
    let rhs = parse_factor(stream)?;
    node = Expr::binary(op, node, rhs);
  }

  stream.depth = depth;
  Ok(node)
}

fn parse_factor(stream: &mut TokenStream) -> CompileResult<Expr> {
  if stream.check(TokenKind::Integer) {
    let value = stream.get_number()?;
    return Ok(Expr::number(value));
  }

  if stream.equal(TokenKind::InputInt) {
    stream.skip(TokenKind::LeftParen, "expected '(' after 'inputInt'")?;
    stream.skip(TokenKind::RightParen, "expected ')' after '('")?;
    return Ok(Expr::InputInt);
  }

  if stream.check(TokenKind::Identifier) {
    let name = stream.get_ident("expected variable name")?;
    return Ok(Expr::var(name));
  }

  if stream.check(TokenKind::LeftParen) {
    stream.enter()?;
    stream.pos += 1;
    let node = parse_expr(stream)?;
    stream.skip(TokenKind::RightParen, "expected ')' after expression")?;
    stream.leave();
    return Ok(node);
  }

  Err(stream.error("expected expression"))
}

/// Read position in the token slice plus the source used for diagnostics.
struct TokenStream<'a> {
  tokens: &'a [Token],
  source: &'a str,
  pos: usize,
  /// Current nesting level, see [`MAX_NESTING`].
  depth: usize,
  /// Returned by `peek` once the slice runs out, so a stream that lost its
  /// `Eof` marker still terminates cleanly.
  eof: Token,
}

impl<'a> TokenStream<'a> {
  fn new(tokens: &'a [Token], source: &'a str) -> Self {
    let eof = match tokens.last() {
      Some(last) => Token::new(TokenKind::Eof, "", last.line, last.column),
      None => Token::new(TokenKind::Eof, "", 1, 1),
    };
    Self {
      tokens,
      source,
      pos: 0,
      depth: 0,
      eof,
    }
  }

  fn peek(&self) -> &Token {
    self.tokens.get(self.pos).unwrap_or(&self.eof)
  }

  fn check(&self, kind: TokenKind) -> bool {
    self.peek().kind == kind
  }

  /// Consume the current token if it has the given kind.
  fn equal(&mut self, kind: TokenKind) -> bool {
    if self.check(kind) && !self.is_eof() {
      self.pos += 1;
      return true;
    }
    false
  }

  fn skip(&mut self, kind: TokenKind, message: &str) -> CompileResult<()> {
    if self.equal(kind) {
      Ok(())
    } else {
      Err(self.error(message))
    }
  }

  /// Consume an identifier and return its name.
  fn get_ident(&mut self, message: &str) -> CompileResult<String> {
    if !self.check(TokenKind::Identifier) {
      return Err(self.error(message));
    }
    let name = self.peek().text.clone();
    self.pos += 1;
    Ok(name)
  }

  /// Consume an integer literal; it must fit the target's `int`.
  fn get_number(&mut self) -> CompileResult<i32> {
    let token = self.peek();
    let value = token.text.parse::<i32>().map_err(|_| {
      CompileError::at(
        self.source,
        token,
        format!("integer literal {} does not fit in a 32-bit int", token.text),
      )
    })?;
    self.pos += 1;
    Ok(value)
  }

  /// Open one nesting level at the current token.
  fn enter(&mut self) -> CompileResult<()> {
    if self.depth >= MAX_NESTING {
      return Err(self.error(&format!("nesting exceeds the limit of {MAX_NESTING} levels")));
    }
    self.depth += 1;
    Ok(())
  }

  fn leave(&mut self) {
    self.depth = self.depth.saturating_sub(1);
  }

  fn error(&self, message: &str) -> CompileError {
    CompileError::at(self.source, self.peek(), message)
  }

  fn is_eof(&self) -> bool {
    self.peek().kind == TokenKind::Eof
  }
}
