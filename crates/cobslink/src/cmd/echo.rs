use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use cobslink_stream::Receipt;

use crate::cmd::EchoArgs;
use crate::exit::{stream_error, CliResult, SUCCESS};

const IDLE_POLL: Duration = Duration::from_millis(1);

/// Receive packets and retransmit each payload back as a fresh packet.
/// Handy as the far end when exercising `send`/`listen` against real
/// hardware.
pub fn run(args: EchoArgs) -> CliResult<i32> {
    let mut stream = crate::cmd::open_stream(&args.device, args.baud, args.capacity)?;

    let running = Arc::new(AtomicBool::new(true));
    super::listen::install_ctrlc_handler(running.clone())?;

    info!(device = %args.device.display(), "echo responder up");
    let mut echoed = 0usize;

    while running.load(Ordering::SeqCst) {
        match stream.receive().map_err(|err| stream_error("receive failed", err))? {
            Receipt::Delivered => {
                let payload = stream.sink_mut().last.take().unwrap_or_default();
                for &byte in &payload {
                    stream
                        .add_field(byte)
                        .map_err(|err| stream_error("echo append", err))?;
                }
                stream
                    .send()
                    .map_err(|err| stream_error("echo send", err))?;

                echoed += 1;
                debug!(bytes = payload.len(), echoed, "packet echoed");
                if let Some(count) = args.count {
                    if echoed >= count {
                        break;
                    }
                }
            }
            Receipt::ChecksumMismatch | Receipt::Overflow => {}
            Receipt::Pending => {
                std::thread::sleep(IDLE_POLL);
            }
        }
    }

    Ok(SUCCESS)
}
