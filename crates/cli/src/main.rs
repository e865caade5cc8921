use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use classtrace::commands::{
    disassemble_command, list_engines_command, resolve_trace_options, version_command,
    DEFAULT_ENGINE,
};

/// JVM class-file disassembler.
///
/// This CLI is a thin wrapper around `classtrace-core` (exposed in code as
/// `classtrace_core`). Set `RUST_LOG=debug` for diagnostics on stderr.
#[derive(Parser, Debug)]
#[command(name = "classtrace", version, about = "Disassemble JVM class files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Disassemble class files as one batch.
    ///
    /// Each path is a `.class` file or a directory scanned recursively for
    /// them. If any class fails, no listings are printed.
    Disassemble {
        /// Class files or directories.
        #[arg(required = true)]
        paths: Vec<String>,

        /// Engine to render with (see `classtrace engines`).
        #[arg(long, default_value = DEFAULT_ENGINE)]
        engine: String,

        /// YAML or JSON file with trace options.
        #[arg(long)]
        config: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Omit the constant pool section.
        #[arg(long, default_value_t = false)]
        no_constant_pool: bool,

        /// Omit method bodies.
        #[arg(long, default_value_t = false)]
        no_code: bool,

        /// Omit source file, line number and local variable information.
        #[arg(long, default_value_t = false)]
        no_debug_info: bool,
    },

    /// List the available disassembly engines.
    Engines {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the library version.
    Version,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Disassemble {
            paths,
            engine,
            config,
            json,
            no_constant_pool,
            no_code,
            no_debug_info,
        } => {
            let options =
                resolve_trace_options(config.as_deref(), no_constant_pool, no_code, no_debug_info)?;
            disassemble_command(&paths, &engine, options, json)?
        }
        Command::Engines { json } => list_engines_command(json)?,
        Command::Version => version_command()?,
    }

    Ok(())
}
