//! Structured backend: every statement maps to one native C++ construct and
//! nesting in the output mirrors nesting in the source.

use super::{Backend, Emitter, render_condition, render_expr};
use crate::ast::{Program, Stmt};

#[derive(Debug, Clone, Copy, Default)]
pub struct Structured;

impl Backend for Structured {
  fn name(&self) -> &'static str {
    "structured"
  }

  fn generate(&self, program: &Program) -> String {
    let mut emitter = Emitter::prologue();
    emit_block(&program.statements, &mut emitter);
    emitter.epilogue()
  }
}

fn emit_block(stmts: &[Stmt], emitter: &mut Emitter) {
  for stmt in stmts {
    emit_stmt(stmt, emitter);
  }
}

fn emit_stmt(stmt: &Stmt, emitter: &mut Emitter) {
  match stmt {
    Stmt::VarDecl { name, init } => {
      emitter.line(&format!("int {name} = {};", render_expr(init)));
    }
    Stmt::Assign { name, value } => {
      emitter.line(&format!("{name} = {};", render_expr(value)));
    }
    Stmt::Print { value, newline } => {
      let value = render_expr(value);
      if *newline {
        emitter.line(&format!("cout << {value} << endl;"));
      } else {
        emitter.line(&format!("cout << {value};"));
      }
    }
    Stmt::If {
      cond,
      then_body,
      else_body,
    } => {
      emitter.line(&format!("if ({}) {{", render_condition(cond)));
      emitter.indent();
      emit_block(then_body, emitter);
      emitter.dedent();

      if else_body.is_empty() {
        emitter.line("}");
      } else {
        emitter.line("} else {");
        emitter.indent();
        emit_block(else_body, emitter);
        emitter.dedent();
        emitter.line("}");
      }
    }
    Stmt::While { cond, body } => {
      emitter.line(&format!("while ({}) {{", render_condition(cond)));
      emitter.indent();
      emit_block(body, emitter);
      emitter.dedent();
      emitter.line("}");
    }
  }
}
