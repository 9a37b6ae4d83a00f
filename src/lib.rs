//! MidLang to C++ translation.
//!
//! Source text goes through `tokenizer`, then `parser` builds a [`ast::Program`],
//! then a `codegen` backend prints it as a C++ `main`. Positioned diagnostics
//! live in `error`; `driver` adds the file handling the `midlang` binary needs.

pub mod ast;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod parser;
pub mod token;
pub mod tokenizer;

use std::io::Write;

use log::{debug, trace};
use snafu::ResultExt;

pub use codegen::{Backend, Target};
pub use error::{CompileError, CompileResult, UnknownTargetError};

use error::WriteSnafu;

/// Output of one translation, with the per-stage counts the driver reports.
#[derive(Debug, Clone)]
pub struct Translation {
  pub code: String,
  /// Number of tokens, the end-of-input marker included.
  pub tokens: usize,
  /// Number of top-level statements.
  pub statements: usize,
}

impl Translation {
  /// Write the generated code to `out` and flush it.
  pub fn write_to(&self, out: &mut impl Write) -> CompileResult<()> {
    out.write_all(self.code.as_bytes()).context(WriteSnafu)?;
    out.flush().context(WriteSnafu)
  }
}

/// Run the whole pipeline on `source`.
pub fn translate(source: &str, target: Target) -> CompileResult<Translation> {
  let tokens = tokenizer::tokenize(source);
  debug!("tokenized {} tokens", tokens.len());
  trace!("tokens: {tokens:?}");

  let program = parser::parse(&tokens, source)?;
  debug!("parsed {} top-level statements", program.statements.len());
  trace!("ast: {program:#?}");

  let code = codegen::generate(&program, target);
  debug!("{target} backend emitted {} bytes", code.len());

  Ok(Translation {
    code,
    tokens: tokens.len(),
    statements: program.statements.len(),
  })
}

/// Translate a source string into C++ text.
pub fn transpile(source: &str, target: Target) -> CompileResult<String> {
  Ok(translate(source, target)?.code)
}

/// Translate `source` and write the result to `out`. Nothing is written when
/// the front-end rejects the program.
pub fn transpile_to(
  source: &str,
  target: Target,
  out: &mut impl Write,
) -> CompileResult<Translation> {
  let translation = translate(source, target)?;
  translation.write_to(out)?;
  Ok(translation)
}
