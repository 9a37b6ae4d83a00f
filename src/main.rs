use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use midlang::Target;
use midlang::driver::{self, Options};

/// Translate a MidLang program into C++.
#[derive(Parser, Debug)]
#[command(name = "midlang", version)]
struct Cli {
  /// MidLang source file
  input: PathBuf,

  /// Where to write the C++ code (default: the input with a .cpp extension)
  output: Option<PathBuf>,

  /// Code generation strategy: structured or assembly
  #[arg(short, long, default_value_t = Target::Structured)]
  target: Target,

  /// Verbose mode (-v, -vv)
  #[arg(short, long, action = ArgAction::Count)]
  verbose: u8,
}

fn init_logger(verbose: u8) {
  let level = match verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new()
    .filter_level(level)
    .parse_default_env()
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logger(cli.verbose);

  let options = Options {
    input: cli.input,
    output: cli.output,
    target: cli.target,
  };

  if let Err(err) = driver::run(&options) {
    eprintln!("error: {err}");
    process::exit(1);
  }
}
