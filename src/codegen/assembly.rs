//! Assembly-style backend: straight-line C++ that only uses labels, `goto`
//! and `if (!(cond)) goto`.
//!
//! Every variable is declared once at the top of `main` so no jump can cross
//! an initialisation; declarations in the source become plain assignments at
//! their original position. One counter numbers every label in the unit.
//!
//! Hoisting flattens block scope: a nested `var` that reuses an outer name
//! assigns the single hoisted variable, so the outer value is overwritten
//! where the structured backend would shadow it.

use std::collections::HashSet;

use super::{Backend, Emitter, render_condition, render_expr};
use crate::ast::{Condition, Program, Stmt};

#[derive(Debug, Clone, Copy, Default)]
pub struct Assembly;

impl Backend for Assembly {
  fn name(&self) -> &'static str {
    "assembly"
  }

  fn generate(&self, program: &Program) -> String {
    let mut lowering = Lowering {
      emitter: Emitter::prologue(),
      next_label: 0,
    };

    lowering.emitter.line("// Variable declarations");
    for name in declared_names(&program.statements) {
      lowering.emitter.line(&format!("int {name};"));
    }
    lowering.emitter.blank();

    lowering.emitter.line("L_START:");
    lowering.emitter.blank();

    for stmt in &program.statements {
      let label = lowering.label("L_STMT");
      lowering.emitter.line(&format!("{label}:"));
      lowering.lower_stmt(stmt);
      lowering.emitter.blank();
    }

    lowering.emitter.line("L_END:");
    lowering.emitter.epilogue()
  }
}

/// Every declared name, nested bodies included, in first-declaration order.
fn declared_names(stmts: &[Stmt]) -> Vec<&str> {
  fn visit<'a>(stmts: &'a [Stmt], seen: &mut HashSet<&'a str>, names: &mut Vec<&'a str>) {
    for stmt in stmts {
      match stmt {
        Stmt::VarDecl { name, .. } => {
          if seen.insert(name.as_str()) {
            names.push(name.as_str());
          }
        }
        Stmt::If {
          then_body,
          else_body,
          ..
        } => {
          visit(then_body, seen, names);
          visit(else_body, seen, names);
        }
        Stmt::While { body, .. } => visit(body, seen, names),
        Stmt::Assign { .. } | Stmt::Print { .. } => {}
      }
    }
  }

  let mut seen = HashSet::new();
  let mut names = Vec::new();
  visit(stmts, &mut seen, &mut names);
  names
}

/// Per-run lowering state.
struct Lowering {
  emitter: Emitter,
  next_label: usize,
}

impl Lowering {
  /// Allocate a fresh label; numbers are never reused within a unit.
  fn label(&mut self, prefix: &str) -> String {
    let label = format!("{prefix}_{}", self.next_label);
    self.next_label += 1;
    label
  }

  fn lower_block(&mut self, stmts: &[Stmt]) {
    for stmt in stmts {
      self.lower_stmt(stmt);
    }
  }

  fn lower_stmt(&mut self, stmt: &Stmt) {
    match stmt {
      Stmt::VarDecl { name, init } => {
        self
          .emitter
          .line(&format!("{name} = {};", render_expr(init)));
      }
      Stmt::Assign { name, value } => {
        self
          .emitter
          .line(&format!("{name} = {};", render_expr(value)));
      }
      Stmt::Print { value, newline } => {
        let value = render_expr(value);
        if *newline {
          self.emitter.line(&format!("cout << {value} << endl;"));
        } else {
          self.emitter.line(&format!("cout << {value};"));
        }
      }
      Stmt::If {
        cond,
        then_body,
        else_body,
      } => self.lower_if(cond, then_body, else_body),
      Stmt::While { cond, body } => self.lower_while(cond, body),
    }
  }

  fn lower_if(&mut self, cond: &Condition, then_body: &[Stmt], else_body: &[Stmt]) {
    let else_label = self.label("L_ELSE");
    let end_label = self.label("L_IF_END");

    self.emitter.line("// if condition");
    self.jump_unless(cond, &else_label);
    self.emitter.blank();

    self.emitter.line("// then block");
    self.lower_block(then_body);
    self.emitter.line(&format!("goto {end_label};"));
    self.emitter.blank();

    self.emitter.line(&format!("{else_label}:"));
    if !else_body.is_empty() {
      self.emitter.line("// else block");
      self.lower_block(else_body);
    }
    self.emitter.line(&format!("{end_label}:"));
  }

  fn lower_while(&mut self, cond: &Condition, body: &[Stmt]) {
    let loop_label = self.label("L_LOOP");
    let end_label = self.label("L_LOOP_END");

    self.emitter.line("// while loop");
    self.emitter.line(&format!("{loop_label}:"));
    self.jump_unless(cond, &end_label);
    self.emitter.blank();

    self.emitter.line("// loop body");
    self.lower_block(body);
    self.emitter.line(&format!("goto {loop_label};"));
    self.emitter.blank();

    self.emitter.line(&format!("{end_label}:"));
  }

  fn jump_unless(&mut self, cond: &Condition, target: &str) {
    self
      .emitter
      .line(&format!("if (!({})) goto {target};", render_condition(cond)));
  }
}
