//! Both backends must behave the same when the generated C++ runs.
//!
//! The helpers below execute the small C++ subset the backends emit: fully
//! parenthesised expressions, `cout`, assignments, labels and `goto` for the
//! assembly output, and `if`/`else`/`while` blocks for the structured output.
//! The block interpreter opens a scope per block like C++ does; the goto
//! machine sees only the hoisted variables. A direct walk over the AST, with
//! one flat variable table, serves as the reference.

use std::collections::HashMap;

use midlang::ast::{BinaryOp, CompareOp, Condition, Expr, Program, Stmt};
use midlang::codegen::INPUT_INT;
use midlang::parser::parse;
use midlang::tokenizer::tokenize;
use midlang::{Target, transpile};

struct Io {
  inputs: Vec<i32>,
  next: usize,
  out: String,
}

impl Io {
  fn new(inputs: &[i32]) -> Self {
    Self {
      inputs: inputs.to_vec(),
      next: 0,
      out: String::new(),
    }
  }

  fn read(&mut self) -> i32 {
    let value = self.inputs[self.next];
    self.next += 1;
    value
  }
}

/// Nested variable scopes, innermost last.
struct Vars {
  scopes: Vec<HashMap<String, i32>>,
}

impl Vars {
  fn new() -> Self {
    Self {
      scopes: vec![HashMap::new()],
    }
  }

  fn get(&self, name: &str) -> i32 {
    self
      .scopes
      .iter()
      .rev()
      .find_map(|scope| scope.get(name).copied())
      .unwrap_or_else(|| panic!("undeclared variable {name}"))
  }

  fn declare(&mut self, name: &str, value: i32) {
    let scope = self.scopes.last_mut().unwrap();
    scope.insert(name.to_string(), value);
  }

  fn assign(&mut self, name: &str, value: i32) {
    let scope = self
      .scopes
      .iter_mut()
      .rev()
      .find(|scope| scope.contains_key(name))
      .unwrap_or_else(|| panic!("undeclared variable {name}"));
    scope.insert(name.to_string(), value);
  }

  fn push(&mut self) {
    self.scopes.push(HashMap::new());
  }

  fn pop(&mut self) {
    self.scopes.pop();
  }
}

fn arith(op: &str, lhs: i32, rhs: i32) -> i32 {
  match op {
    "+" => lhs.wrapping_add(rhs),
    "-" => lhs.wrapping_sub(rhs),
    "*" => lhs.wrapping_mul(rhs),
    "/" => lhs / rhs,
    "==" => i32::from(lhs == rhs),
    "!=" => i32::from(lhs != rhs),
    "<" => i32::from(lhs < rhs),
    ">" => i32::from(lhs > rhs),
    "<=" => i32::from(lhs <= rhs),
    ">=" => i32::from(lhs >= rhs),
    other => panic!("unknown operator {other}"),
  }
}

// Reference semantics straight from the AST.

fn eval(expr: &Expr, vars: &Vars, io: &mut Io) -> i32 {
  match expr {
    Expr::Int { value } => *value,
    Expr::InputInt => io.read(),
    Expr::Var { name } => vars.get(name),
    Expr::Binary { op, lhs, rhs } => {
      let lhs = eval(lhs, vars, io);
      let rhs = eval(rhs, vars, io);
      arith(BinaryOp::symbol(*op), lhs, rhs)
    }
  }
}

fn holds(cond: &Condition, vars: &Vars, io: &mut Io) -> bool {
  let lhs = eval(&cond.lhs, vars, io);
  let rhs = eval(&cond.rhs, vars, io);
  arith(CompareOp::symbol(cond.op), lhs, rhs) != 0
}

fn exec(stmts: &[Stmt], vars: &mut Vars, io: &mut Io) {
  for stmt in stmts {
    match stmt {
      Stmt::VarDecl { name, init } => {
        let value = eval(init, vars, io);
        vars.declare(name, value);
      }
      Stmt::Assign { name, value } => {
        let value = eval(value, vars, io);
        vars.assign(name, value);
      }
      Stmt::Print { value, newline } => {
        let value = eval(value, vars, io);
        io.out.push_str(&value.to_string());
        if *newline {
          io.out.push('\n');
        }
      }
      Stmt::If {
        cond,
        then_body,
        else_body,
      } => {
        if holds(cond, vars, io) {
          exec(then_body, vars, io);
        } else {
          exec(else_body, vars, io);
        }
      }
      Stmt::While { cond, body } => {
        while holds(cond, vars, io) {
          exec(body, vars, io);
        }
      }
    }
  }
}

fn run_ast(program: &Program, inputs: &[i32]) -> String {
  let mut io = Io::new(inputs);
  exec(&program.statements, &mut Vars::new(), &mut io);
  io.out
}

// Evaluation of rendered C++ expressions.

struct TextEval<'a> {
  chars: Vec<char>,
  pos: usize,
  vars: &'a Vars,
  io: &'a mut Io,
}

impl TextEval<'_> {
  fn skip_spaces(&mut self) {
    while self.chars.get(self.pos) == Some(&' ') {
      self.pos += 1;
    }
  }

  fn word(&mut self) -> String {
    self.skip_spaces();
    let mut word = String::new();
    while let Some(&c) = self.chars.get(self.pos) {
      if c == ' ' || c == ')' {
        break;
      }
      word.push(c);
      self.pos += 1;
    }
    word
  }

  fn value(&mut self) -> i32 {
    self.skip_spaces();
    match self.chars[self.pos] {
      '(' => {
        self.pos += 1;
        let lhs = self.value();
        let op = self.word();
        let rhs = self.value();
        self.skip_spaces();
        assert_eq!(self.chars[self.pos], ')');
        self.pos += 1;
        arith(&op, lhs, rhs)
      }
      '@' => {
        self.pos += 1;
        self.io.read()
      }
      c if c.is_ascii_digit() => self.word().parse().unwrap(),
      _ => {
        let name = self.word();
        self.vars.get(&name)
      }
    }
  }
}

fn eval_text(text: &str, vars: &Vars, io: &mut Io) -> i32 {
  let text = text.replace(INPUT_INT, "@");
  let mut eval = TextEval {
    chars: text.chars().collect(),
    pos: 0,
    vars,
    io,
  };
  let value = eval.value();
  eval.skip_spaces();
  assert_eq!(eval.pos, eval.chars.len(), "trailing text in {text}");
  value
}

/// Run a straight-line statement: declaration, assignment or output.
fn exec_simple(line: &str, vars: &mut Vars, io: &mut Io) {
  let line = line.strip_suffix(';').expect(line);
  if let Some(rest) = line.strip_prefix("cout << ") {
    match rest.strip_suffix(" << endl") {
      Some(value) => {
        let value = eval_text(value, vars, io);
        io.out.push_str(&format!("{value}\n"));
      }
      None => {
        let value = eval_text(rest, vars, io);
        io.out.push_str(&value.to_string());
      }
    }
    return;
  }
  let (declaration, line) = match line.strip_prefix("int ") {
    Some(rest) => (true, rest),
    None => (false, line),
  };
  let (name, value) = line.split_once(" = ").expect(line);
  let value = eval_text(value, vars, io);
  if declaration {
    vars.declare(name, value);
  } else {
    vars.assign(name, value);
  }
}

/// Lines of `main`, trimmed, without blanks, comments or the final return.
fn main_body(code: &str) -> Vec<&str> {
  code
    .lines()
    .skip_while(|line| *line != "int main() {")
    .skip(1)
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with("//"))
    .take_while(|line| *line != "return 0;")
    .collect()
}

// Label-and-jump machine for the assembly backend.

fn run_goto(code: &str, inputs: &[i32]) -> String {
  let body = main_body(code);
  let labels: HashMap<&str, usize> = body
    .iter()
    .enumerate()
    .filter_map(|(index, line)| line.strip_suffix(':').map(|label| (label, index)))
    .collect();

  let mut vars = Vars::new();
  let mut io = Io::new(inputs);
  let mut pc = 0;
  let mut steps = 0;

  while pc < body.len() {
    steps += 1;
    assert!(steps < 100_000, "program does not terminate");
    let line = body[pc];
    pc += 1;

    if line.ends_with(':') {
      continue;
    }
    if let Some(target) = line.strip_prefix("goto ") {
      pc = labels[target.trim_end_matches(';')];
      continue;
    }
    if let Some(rest) = line.strip_prefix("if (!(") {
      let (cond, target) = rest.rsplit_once(")) goto ").expect(line);
      if eval_text(cond, &vars, &mut io) == 0 {
        pc = labels[target.trim_end_matches(';')];
      }
      continue;
    }
    if let Some(name) = line.strip_prefix("int ")
      && !name.contains(" = ")
    {
      vars.declare(name.trim_end_matches(';'), 0);
      continue;
    }
    exec_simple(line, &mut vars, &mut io);
  }

  io.out
}

// Block interpreter for the structured backend.

enum Node<'a> {
  Simple(&'a str),
  If {
    cond: &'a str,
    then_body: Vec<Node<'a>>,
    else_body: Vec<Node<'a>>,
  },
  While {
    cond: &'a str,
    body: Vec<Node<'a>>,
  },
}

fn parse_nodes<'a>(lines: &[&'a str], index: &mut usize) -> Vec<Node<'a>> {
  let mut nodes = Vec::new();
  while let Some(&line) = lines.get(*index) {
    if line == "}" || line == "} else {" {
      break;
    }
    *index += 1;

    if let Some(cond) = line.strip_prefix("if (").and_then(|l| l.strip_suffix(") {")) {
      let then_body = parse_nodes(lines, index);
      let mut else_body = Vec::new();
      if lines[*index] == "} else {" {
        *index += 1;
        else_body = parse_nodes(lines, index);
      }
      assert_eq!(lines[*index], "}");
      *index += 1;
      nodes.push(Node::If {
        cond,
        then_body,
        else_body,
      });
    } else if let Some(cond) = line
      .strip_prefix("while (")
      .and_then(|l| l.strip_suffix(") {"))
    {
      let body = parse_nodes(lines, index);
      assert_eq!(lines[*index], "}");
      *index += 1;
      nodes.push(Node::While { cond, body });
    } else {
      nodes.push(Node::Simple(line));
    }
  }
  nodes
}

fn exec_scoped(nodes: &[Node], vars: &mut Vars, io: &mut Io) {
  vars.push();
  exec_nodes(nodes, vars, io);
  vars.pop();
}

fn exec_nodes(nodes: &[Node], vars: &mut Vars, io: &mut Io) {
  for node in nodes {
    match node {
      Node::Simple(line) => exec_simple(line, vars, io),
      Node::If {
        cond,
        then_body,
        else_body,
      } => {
        if eval_text(cond, vars, io) != 0 {
          exec_scoped(then_body, vars, io);
        } else {
          exec_scoped(else_body, vars, io);
        }
      }
      Node::While { cond, body } => {
        while eval_text(cond, vars, io) != 0 {
          exec_scoped(body, vars, io);
        }
      }
    }
  }
}

fn run_structured(code: &str, inputs: &[i32]) -> String {
  let body = main_body(code);
  let mut index = 0;
  let nodes = parse_nodes(&body, &mut index);
  assert_eq!(index, body.len());
  let mut io = Io::new(inputs);
  exec_nodes(&nodes, &mut Vars::new(), &mut io);
  io.out
}

fn assert_agree(source: &str, inputs: &[i32], expected: &str) {
  let program = parse(&tokenize(source), source).unwrap();
  let structured = transpile(source, Target::Structured).unwrap();
  let assembly = transpile(source, Target::Assembly).unwrap();

  assert_eq!(run_ast(&program, inputs), expected);
  assert_eq!(run_structured(&structured, inputs), expected);
  assert_eq!(run_goto(&assembly, inputs), expected);
}

#[test]
fn straight_line_arithmetic() {
  assert_agree(
    "var x = 2 + 3 * 4; var y = (x - 4) / 3; print(x); print(y); println(x * y - 1);",
    &[],
    "14341\n",
  );
}

#[test]
fn input_driven_branches() {
  let source = "\
var n = inputInt();
if (n > 10) {
  println(1);
} else {
  if (n == 10) { println(0); } else { println(2); }
}
";
  assert_agree(source, &[11], "1\n");
  assert_agree(source, &[10], "0\n");
  assert_agree(source, &[-3], "2\n");
}

#[test]
fn if_with_empty_else() {
  let source = "var x = inputInt(); if (x == 0) { println(x); } println(7);";
  assert_agree(source, &[0], "0\n7\n");
  assert_agree(source, &[5], "7\n");
}

#[test]
fn counting_loop() {
  assert_agree(
    "var x = 0; while (x < 5) { x = x + 1; print(x); } println(0);",
    &[],
    "123450\n",
  );
}

#[test]
fn loop_that_never_runs() {
  assert_agree("var x = 9; while (x <= 5) { println(x); } println(x);", &[], "9\n");
}

#[test]
fn nested_loops_with_input_and_declarations_in_bodies() {
  let source = "\
var rows = inputInt();
var r = 0;
while (r < rows) {
  var c = 0;
  while (c <= r) {
    if (c != r) { print(c); } else { println(c); }
    c = c + 1;
  }
  r = r + 1;
}
";
  assert_agree(source, &[3], "0\n01\n012\n");
}

#[test]
fn accumulate_inputs_until_sentinel() {
  let source = "\
var total = 0;
var v = inputInt();
while (v != 0) {
  if (v >= 0) { total = total + v; } else { total = total - v * 2; }
  v = inputInt();
}
println(total);
";
  assert_agree(source, &[4, -1, 6, 0], "12\n");
}

#[test]
fn shadowing_declaration_diverges_between_backends() {
  let source = "var x = 1; if (x == 1) { var x = 2; println(x); } println(x);";
  let structured = transpile(source, Target::Structured).unwrap();
  let assembly = transpile(source, Target::Assembly).unwrap();

  assert_eq!(run_structured(&structured, &[]), "2\n1\n");
  assert_eq!(run_goto(&assembly, &[]), "2\n2\n");
}
