mod cmd;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use brisk_lib::consts::DEFAULT_SCRIPT_FILE;
use brisk_lib::context::BuildVersion;

use cmd::RunOptions;
use output::{OutputFormat, print_error};

/// Build automation: run dependency-ordered targets from a build script.
#[derive(Parser)]
#[command(name = "brisk")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run targets and everything they depend on
  Run {
    /// Targets to run (default: the script's default_target)
    targets: Vec<String>,

    /// Build script
    #[arg(short, long, default_value = DEFAULT_SCRIPT_FILE)]
    file: PathBuf,

    /// Keep running independent targets after a failure
    #[arg(long)]
    continue_on_failure: bool,

    /// Set a build property (repeatable)
    #[arg(short = 'p', long = "property", value_name = "KEY=VALUE", value_parser = cmd::parse_property)]
    properties: Vec<(String, String)>,

    /// Override the build version
    #[arg(long)]
    build_version: Option<BuildVersion>,
  },

  /// List the targets declared in a build script
  List {
    /// Build script
    #[arg(short, long, default_value = DEFAULT_SCRIPT_FILE)]
    file: PathBuf,
  },

  /// Show the execution order without running anything
  Plan {
    /// Targets to plan (default: the script's default_target)
    targets: Vec<String>,

    /// Build script
    #[arg(short, long, default_value = DEFAULT_SCRIPT_FILE)]
    file: PathBuf,
  },

  /// Extract a package, expanding shared entries through its metadata
  Unzip {
    /// Archive to extract
    archive: PathBuf,

    /// Destination directory
    destination: PathBuf,
  },

  /// Display platform information
  Info,
}

fn init_tracing(verbose: bool) {
  let default = if verbose {
    "brisk=debug,brisk_lib=debug"
  } else {
    "brisk=info,brisk_lib=info"
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Run {
      targets,
      file,
      continue_on_failure,
      properties,
      build_version,
    } => cmd::cmd_run(RunOptions {
      file,
      targets,
      continue_on_failure,
      properties,
      build_version,
      output: cli.output,
    }),
    Commands::List { file } => cmd::cmd_list(&file, cli.output).map(|()| 0),
    Commands::Plan { targets, file } => cmd::cmd_plan(&file, &targets, cli.output).map(|()| 0),
    Commands::Unzip { archive, destination } => cmd::cmd_unzip(&archive, &destination, cli.output).map(|()| 0),
    Commands::Info => {
      cmd::cmd_info();
      Ok(0)
    }
  };

  match result {
    Ok(code) => process::exit(code),
    Err(e) => {
      print_error(&format!("{e:#}"));
      process::exit(1);
    }
  }
}
