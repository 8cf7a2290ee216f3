mod cmd;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cmd::{BuildArgs, cmd_build};
use crate::output::{OutputFormat, print_error};

/// py2so - compile a Python project into native extension modules
#[derive(Parser)]
#[command(name = "py2so")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(flatten)]
  build: BuildArgs,

  /// Output format
  #[arg(short = 'o', long, value_enum, default_value = "text")]
  output: OutputFormat,

  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long)]
  verbose: bool,
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(e) = cmd_build(cli.build, cli.output) {
    print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}
