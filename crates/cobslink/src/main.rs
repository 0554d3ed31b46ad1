#[cfg(unix)]
mod cmd;
mod exit;
#[cfg(unix)]
mod logging;
#[cfg(unix)]
mod output;

#[cfg(unix)]
use clap::Parser;

#[cfg(unix)]
use crate::cmd::Command;
#[cfg(unix)]
use crate::logging::{init_logging, LogFormat, LogLevel};
#[cfg(unix)]
use crate::output::OutputFormat;

#[cfg(unix)]
#[derive(Parser, Debug)]
#[command(name = "cobslink", version, about = "Framed serial packet CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[cfg(unix)]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

// Serial lines need termios, so the subcommands only exist on Unix.
// The library crates stay portable.
#[cfg(not(unix))]
fn main() {
    eprintln!("the cobslink CLI supports Unix serial devices only");
    std::process::exit(crate::exit::USAGE);
}
