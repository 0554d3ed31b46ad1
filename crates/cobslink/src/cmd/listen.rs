use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use cobslink_stream::Receipt;

use crate::cmd::ListenArgs;
use crate::exit::{stream_error, CliError, CliResult, SUCCESS};
use crate::output::{print_packet, OutputFormat};

/// Poll cadence while the line is idle.
const IDLE_POLL: Duration = Duration::from_millis(1);

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let mut stream = crate::cmd::open_stream(&args.device, args.baud, args.capacity)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut delivered = 0usize;
    let mut rejected = 0usize;

    while running.load(Ordering::SeqCst) {
        match stream.receive().map_err(|err| stream_error("receive failed", err))? {
            Receipt::Delivered => {
                if let Some(payload) = stream.sink_mut().last.take() {
                    print_packet(&payload, delivered, format);
                }
                delivered += 1;
                if let Some(count) = args.count {
                    if delivered >= count {
                        break;
                    }
                }
            }
            Receipt::ChecksumMismatch | Receipt::Overflow => {
                rejected += 1;
            }
            Receipt::Pending => {
                std::thread::sleep(IDLE_POLL);
            }
        }
    }

    debug!(delivered, rejected, "listen loop finished");
    Ok(SUCCESS)
}

pub(crate) fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
