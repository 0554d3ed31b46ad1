//! Send a seven-field packet and receive a doubled reply, over an
//! in-memory loopback pair so it runs without serial hardware.
//!
//! Run with:
//!   cargo run --example send-and-receive-reply
//!
//! Against a real device, replace the loopback ends with
//! `SerialPort::open("/dev/ttyACM0")` on each side of the line.

use cobslink::link::{ByteLink, Loopback};
use cobslink::stream::{FieldReader, PacketStream, Receipt, Result, StreamError};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Package {
    a: u8,
    b: i8,
    c: u16,
    d: i16,
    e: u32,
    f: i32,
    g: f32,
}

impl Package {
    fn extract(fields: &mut FieldReader<'_>) -> Result<Self> {
        // Same order and widths as `append`; the wire carries no tags.
        Ok(Self {
            a: fields.extract_field()?,
            b: fields.extract_field()?,
            c: fields.extract_field()?,
            d: fields.extract_field()?,
            e: fields.extract_field()?,
            f: fields.extract_field()?,
            g: fields.extract_field()?,
        })
    }

    fn append<L: ByteLink, S: cobslink::stream::PacketSink>(
        &self,
        stream: &mut PacketStream<L, S>,
    ) -> Result<()> {
        stream.add_field(self.a)?;
        stream.add_field(self.b)?;
        stream.add_field(self.c)?;
        stream.add_field(self.d)?;
        stream.add_field(self.e)?;
        stream.add_field(self.f)?;
        stream.add_field(self.g)?;
        Ok(())
    }

    fn doubled(&self) -> Self {
        Self {
            a: self.a.wrapping_mul(2),
            b: self.b.wrapping_mul(2),
            c: self.c.wrapping_mul(2),
            d: self.d.wrapping_mul(2),
            e: self.e.wrapping_mul(2),
            f: self.f.wrapping_mul(2),
            g: self.g * 2.0,
        }
    }
}

/// Sink that stashes the most recent decoded package.
#[derive(Default)]
struct PackageSink {
    received: Option<Package>,
}

impl cobslink::stream::PacketSink for PackageSink {
    fn on_packet(&mut self, fields: &mut FieldReader<'_>) -> bool {
        match Package::extract(fields) {
            Ok(package) => {
                self.received = Some(package);
                true
            }
            Err(err) => {
                eprintln!("malformed package: {err}");
                false
            }
        }
    }
}

fn main() -> std::result::Result<(), StreamError> {
    let (near, far) = Loopback::pair();
    let mut requester = PacketStream::new(near, 30, PackageSink::default())?;
    let mut responder = PacketStream::new(far, 30, PackageSink::default())?;

    let sent = Package {
        a: 42,
        b: -17,
        c: 12_000,
        d: -4_321,
        e: 1_000_000,
        f: -2_000_000,
        g: 0.03125,
    };

    sent.append(&mut requester)?;
    requester.send()?;
    println!("Sent package:     {sent:?}");

    // Responder side: receive, double every field, reply.
    if responder.receive()? != Receipt::Delivered {
        eprintln!("responder saw no packet");
        std::process::exit(1);
    }
    let request = responder
        .sink_mut()
        .received
        .take()
        .expect("delivered packet should be recorded");
    request.doubled().append(&mut responder)?;
    responder.send()?;

    // Requester side: the reply is already queued on the loopback.
    if requester.receive()? != Receipt::Delivered {
        eprintln!("requester saw no reply");
        std::process::exit(1);
    }
    let reply = requester
        .sink_mut()
        .received
        .take()
        .expect("delivered packet should be recorded");
    println!("Received package: {reply:?}");

    let matches = reply == sent.doubled();
    println!("Match: {}", if matches { "YES" } else { "NO" });
    if !matches {
        std::process::exit(1);
    }
    Ok(())
}
