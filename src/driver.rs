//! File-level driver behind the `midlang` binary.
//!
//! Reads the input, runs the pipeline, and only then creates the output file,
//! so a rejected program never leaves a partial file behind.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::info;
use snafu::{ResultExt, Snafu};

use crate::codegen::Target;
use crate::error::CompileError;

/// Extension of the generated files.
pub const OUTPUT_EXTENSION: &str = "cpp";

#[derive(Debug, Snafu)]
pub enum DriverError {
  #[snafu(display("could not read {}: {source}", path.display()))]
  ReadInput {
    path: PathBuf,
    source: std::io::Error,
  },

  #[snafu(display("{source}"))]
  Compile { source: CompileError },

  #[snafu(display("cannot create output file {}: {source}", path.display()))]
  CreateOutput {
    path: PathBuf,
    source: std::io::Error,
  },

  #[snafu(display("{}: {source}", path.display()))]
  WriteOutput { path: PathBuf, source: CompileError },
}

/// What to translate and where to put it.
#[derive(Debug, Clone)]
pub struct Options {
  pub input: PathBuf,
  /// Defaults to [`default_output_path`] of the input.
  pub output: Option<PathBuf>,
  pub target: Target,
}

impl Options {
  pub fn output_path(&self) -> PathBuf {
    match &self.output {
      Some(path) => path.clone(),
      None => default_output_path(&self.input),
    }
  }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
  pub output: PathBuf,
  pub tokens: usize,
  pub statements: usize,
}

/// Replace the input's extension with `.cpp`, or append it when there is none.
pub fn default_output_path(input: &Path) -> PathBuf {
  input.with_extension(OUTPUT_EXTENSION)
}

/// Translate one file.
pub fn run(options: &Options) -> Result<Summary, DriverError> {
  let input = &options.input;
  let output = options.output_path();

  let source = fs::read_to_string(input).context(ReadInputSnafu { path: input })?;
  info!(
    "transpiling {} with the {} backend",
    input.display(),
    options.target
  );

  let translation = crate::translate(&source, options.target).context(CompileSnafu)?;
  info!("lexical analysis: {} tokens", translation.tokens);
  info!("parsing: {} statement(s)", translation.statements);

  let file = File::create(&output).context(CreateOutputSnafu { path: &output })?;
  let mut writer = BufWriter::new(file);
  translation
    .write_to(&mut writer)
    .context(WriteOutputSnafu { path: &output })?;
  info!("wrote {}", output.display());

  Ok(Summary {
    output,
    tokens: translation.tokens,
    statements: translation.statements,
  })
}
