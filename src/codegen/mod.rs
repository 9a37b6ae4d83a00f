//! C++ emission for a parsed MidLang program.
//!
//! Both backends implement [`Backend`] and share the expression renderer and
//! the line emitter defined here. Expressions are rendered fully
//! parenthesised, `(lhs op rhs)`, so the generated precedence never depends
//! on C++ rules. Generation is total over the AST and cannot fail.

mod assembly;
mod structured;

use std::fmt;
use std::str::FromStr;

use crate::ast::{Condition, Expr, Program};
use crate::error::{UnknownTargetError, UnknownTargetSnafu};

pub use assembly::Assembly;
pub use structured::Structured;

/// Inline C++ idiom used for `inputInt()`: read one `int` and yield it.
pub const INPUT_INT: &str = "([]() { int val; cin >> val; return val; })()";

/// A code generator: given an AST, produce target text.
pub trait Backend {
  /// Short name used in logs.
  fn name(&self) -> &'static str;

  fn generate(&self, program: &Program) -> String;
}

/// Which backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
  /// Native nested `if`/`while` blocks mirroring the source.
  #[default]
  Structured,
  /// Labels and `goto` only.
  Assembly,
}

impl Target {
  pub fn backend(self) -> &'static dyn Backend {
    match self {
      Target::Structured => &Structured,
      Target::Assembly => &Assembly,
    }
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.backend().name())
  }
}

impl FromStr for Target {
  type Err = UnknownTargetError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "structured" => Ok(Target::Structured),
      "assembly" | "asm" => Ok(Target::Assembly),
      _ => UnknownTargetSnafu { name: s }.fail(),
    }
  }
}

/// Emit C++ for `program` with the backend selected by `target`.
pub fn generate(program: &Program, target: Target) -> String {
  target.backend().generate(program)
}

/// Render an arithmetic expression.
pub fn render_expr(expr: &Expr) -> String {
  let mut out = String::new();
  write_expr(expr, &mut out);
  out
}

/// Render a comparison; the result is parenthesised like any binary node.
pub fn render_condition(cond: &Condition) -> String {
  let mut out = String::new();
  out.push('(');
  write_expr(&cond.lhs, &mut out);
  out.push_str(&format!(" {} ", cond.op));
  write_expr(&cond.rhs, &mut out);
  out.push(')');
  out
}

fn write_expr(expr: &Expr, out: &mut String) {
  match expr {
    Expr::Int { value } => out.push_str(&value.to_string()),
    Expr::InputInt => out.push_str(INPUT_INT),
    Expr::Var { name } => out.push_str(name),
    Expr::Binary { op, lhs, rhs } => {
      out.push('(');
      write_expr(lhs, out);
      out.push_str(&format!(" {op} "));
      write_expr(rhs, out);
      out.push(')');
    }
  }
}

/// Line-oriented writer with four-space indentation per nesting level.
struct Emitter {
  code: String,
  depth: usize,
}

impl Emitter {
  /// Start a translation unit: headers and the opening of `main`.
  fn prologue() -> Self {
    let mut emitter = Self {
      code: String::new(),
      depth: 0,
    };
    emitter.line("#include <iostream>");
    emitter.line("#include <string>");
    emitter.line("using namespace std;");
    emitter.blank();
    emitter.line("int main() {");
    emitter.indent();
    emitter
  }

  /// Close `main` and hand back the finished text.
  fn epilogue(mut self) -> String {
    self.line("return 0;");
    self.dedent();
    self.line("}");
    self.code
  }

  fn line(&mut self, text: &str) {
    for _ in 0..self.depth {
      self.code.push_str("    ");
    }
    self.code.push_str(text);
    self.code.push('\n');
  }

  fn blank(&mut self) {
    self.code.push('\n');
  }

  fn indent(&mut self) {
    self.depth += 1;
  }

  fn dedent(&mut self) {
    self.depth = self.depth.saturating_sub(1);
  }
}
