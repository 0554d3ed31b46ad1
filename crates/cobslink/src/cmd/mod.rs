use std::path::PathBuf;

use clap::{Args, Subcommand};

use cobslink_link::{SerialConfig, SerialPort};
use cobslink_stream::{FieldReader, PacketSink, PacketStream, MAX_CAPACITY};

use crate::exit::{link_error, stream_error, CliResult};
use crate::output::OutputFormat;

pub mod echo;
pub mod listen;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a packet from typed fields and send it once.
    Send(SendArgs),
    /// Poll the line and print received packets.
    Listen(ListenArgs),
    /// Retransmit every received packet back to the sender.
    Echo(EchoArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args),
        Command::Listen(args) => listen::run(args, format),
        Command::Echo(args) => echo::run(args),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Serial device to open (e.g. /dev/ttyACM0).
    pub device: PathBuf,
    /// Typed field, TYPE=VALUE (u8, i8, u16, i16, u32, i32, f32).
    /// Repeat in the order the receiver will extract.
    #[arg(long = "field", value_name = "TYPE=VALUE", value_parser = send::parse_field)]
    pub fields: Vec<send::FieldArg>,
    /// Line speed in baud.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
    /// Per-packet field capacity in bytes.
    #[arg(long, default_value_t = MAX_CAPACITY)]
    pub capacity: usize,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Serial device to open.
    pub device: PathBuf,
    /// Line speed in baud.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
    /// Per-packet field capacity in bytes.
    #[arg(long, default_value_t = MAX_CAPACITY)]
    pub capacity: usize,
    /// Stop after this many delivered packets.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EchoArgs {
    /// Serial device to open.
    pub device: PathBuf,
    /// Line speed in baud.
    #[arg(long, default_value_t = 115_200)]
    pub baud: u32,
    /// Per-packet field capacity in bytes.
    #[arg(long, default_value_t = MAX_CAPACITY)]
    pub capacity: usize,
    /// Stop after echoing this many packets.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {}

/// Holds the most recent delivered payload for the command loop to
/// pick up after `receive` returns.
#[derive(Default)]
pub(crate) struct CaptureSink {
    pub(crate) last: Option<Vec<u8>>,
}

impl PacketSink for CaptureSink {
    fn on_packet(&mut self, fields: &mut FieldReader<'_>) -> bool {
        self.last = Some(fields.remaining().to_vec());
        true
    }
}

pub(crate) fn open_stream(
    device: &PathBuf,
    baud: u32,
    capacity: usize,
) -> CliResult<PacketStream<SerialPort, CaptureSink>> {
    let config = SerialConfig { baud };
    let port = SerialPort::open_with_config(device, &config)
        .map_err(|err| link_error("open failed", err))?;
    PacketStream::new(port, capacity, CaptureSink::default())
        .map_err(|err| stream_error("stream setup failed", err))
}
