//! Syntax tree produced by the parser and consumed by the backends.
//!
//! Comparisons live in their own [`Condition`] type, which only `if` and
//! `while` hold, so a comparison can never end up as an arithmetic operand.

use std::fmt;

/// Arithmetic operators, all left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
}

impl BinaryOp {
  pub fn symbol(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
  Eq,
  Ne,
  Lt,
  Gt,
  Le,
  Ge,
}

impl CompareOp {
  pub fn symbol(self) -> &'static str {
    match self {
      CompareOp::Eq => "==",
      CompareOp::Ne => "!=",
      CompareOp::Lt => "<",
      CompareOp::Gt => ">",
      CompareOp::Le => "<=",
      CompareOp::Ge => ">=",
    }
  }
}

impl fmt::Display for BinaryOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

impl fmt::Display for CompareOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

/// Arithmetic expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
  Int {
    value: i32,
  },
  /// `inputInt()`: reads one integer from standard input.
  InputInt,
  Var {
    name: String,
  },
  Binary {
    op: BinaryOp,
    lhs: Box<Expr>,
    rhs: Box<Expr>,
  },
}

impl Expr {
  pub fn number(value: i32) -> Self {
    Self::Int { value }
  }

  pub fn var(name: impl Into<String>) -> Self {
    Self::Var { name: name.into() }
  }

  pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }
}

/// Exactly one comparison between two arithmetic expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
  pub op: CompareOp,
  pub lhs: Expr,
  pub rhs: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
  VarDecl {
    name: String,
    init: Expr,
  },
  Assign {
    name: String,
    value: Expr,
  },
  /// `print(e);` or, with `newline` set, `println(e);`.
  Print {
    value: Expr,
    newline: bool,
  },
  If {
    cond: Condition,
    then_body: Vec<Stmt>,
    else_body: Vec<Stmt>,
  },
  While {
    cond: Condition,
    body: Vec<Stmt>,
  },
}

/// Root of the tree: the top-level statements in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  pub statements: Vec<Stmt>,
}
