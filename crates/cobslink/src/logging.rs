use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Stderr log encoding.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Verbosity applied to the cobslink crates.
///
/// Third-party crates stay capped at `warn` so that `--log-level trace`
/// traces the framing path without burying it in dependency internals.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Targets that follow the `--log-level` flag. The stream crate carries
/// the receive-path diagnostics, the link crate the serial setup ones.
const CRATE_TARGETS: [&str; 4] = [
    "cobslink",
    "cobslink_codec",
    "cobslink_link",
    "cobslink_stream",
];

fn directives_for(level: LogLevel) -> String {
    let mut directives = String::from("warn");
    for target in CRATE_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push('=');
        directives.push_str(level.as_directive());
    }
    directives
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    // RUST_LOG wins when set; the flag only supplies the default.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives_for(level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
