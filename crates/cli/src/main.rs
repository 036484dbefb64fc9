//! r2dec CLI - runs the r2dec plugin against a radare2 child process.

mod commands;
mod host;
mod output;
mod pipe;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

use commands::decompile::DecompileOptions;

#[derive(Parser)]
#[command(name = "r2dec")]
#[command(
    author,
    version,
    about = "Decompile functions with r2dec-js, hosted outside radare2"
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompile a function of a binary
    Decompile {
        /// Binary to open in radare2
        file: PathBuf,

        /// Address or flag to seek to before decompiling
        #[arg(short, long)]
        seek: Option<String>,

        /// Run full analysis (aaa) first
        #[arg(short, long)]
        analyze: bool,

        /// Emit JSON (pddj)
        #[arg(short, long)]
        json: bool,

        /// Override a plugin setting, e.g. -e pdd.out.tabsize=2
        #[arg(short = 'e', long = "eval", value_name = "KEY=VALUE")]
        settings: Vec<String>,

        /// r2dec-js directory (defaults to R2DEC_HOME or the r2pm location)
        #[arg(long, env = "R2DEC_HOME")]
        root: Option<PathBuf>,

        /// radare2 executable (searched in PATH if not given)
        #[arg(long = "r2", value_name = "PATH")]
        radare2: Option<PathBuf>,

        /// Abort the process on interpreter fatal errors
        #[arg(long)]
        abort_on_fatal: bool,

        /// Extra text appended to the pdd command
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// List the settings the plugin registers
    Settings {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the plugin descriptor
    Info,

    /// Show where the r2dec-js scripts are looked up
    Locate {
        /// r2dec-js directory to check instead of the default
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Decompile {
            file,
            seek,
            analyze,
            json,
            settings,
            root,
            radare2,
            abort_on_fatal,
            args,
        } => commands::decompile::execute(DecompileOptions {
            file,
            seek,
            analyze,
            json,
            settings,
            root,
            radare2,
            abort_on_fatal,
            color: !cli.no_color && console::colors_enabled(),
            args,
        }),

        Commands::Settings { json } => commands::settings::execute(json),

        Commands::Info => commands::info::execute(),

        Commands::Locate { root } => commands::locate::execute(root),
    }
}
