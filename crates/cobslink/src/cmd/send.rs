use cobslink_stream::PacketStream;

use crate::cmd::SendArgs;
use crate::exit::{stream_error, CliResult, SUCCESS};

/// One typed field value from the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldArg {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    F32(f32),
}

/// Parse a `TYPE=VALUE` field argument (`u16=1000`, `i8=-3`, `f32=0.5`).
pub fn parse_field(input: &str) -> Result<FieldArg, String> {
    let (ty, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=VALUE, got `{input}`"))?;

    fn num<T: std::str::FromStr>(ty: &str, value: &str) -> Result<T, String>
    where
        T::Err: std::fmt::Display,
    {
        value
            .parse()
            .map_err(|err| format!("invalid {ty} value `{value}`: {err}"))
    }

    match ty {
        "u8" => Ok(FieldArg::U8(num("u8", value)?)),
        "i8" => Ok(FieldArg::I8(num("i8", value)?)),
        "u16" => Ok(FieldArg::U16(num("u16", value)?)),
        "i16" => Ok(FieldArg::I16(num("i16", value)?)),
        "u32" => Ok(FieldArg::U32(num("u32", value)?)),
        "i32" => Ok(FieldArg::I32(num("i32", value)?)),
        "f32" => Ok(FieldArg::F32(num("f32", value)?)),
        other => Err(format!(
            "unknown field type `{other}` (expected u8, i8, u16, i16, u32, i32 or f32)"
        )),
    }
}

pub fn run(args: SendArgs) -> CliResult<i32> {
    let mut stream = crate::cmd::open_stream(&args.device, args.baud, args.capacity)?;

    append_fields(&mut stream, &args.fields).map_err(|err| stream_error("field append", err))?;
    stream
        .send()
        .map_err(|err| stream_error("send failed", err))?;

    Ok(SUCCESS)
}

fn append_fields<L, S>(
    stream: &mut PacketStream<L, S>,
    fields: &[FieldArg],
) -> cobslink_stream::Result<()>
where
    L: cobslink_link::ByteLink,
    S: cobslink_stream::PacketSink,
{
    for field in fields {
        match *field {
            FieldArg::U8(v) => stream.add_field(v)?,
            FieldArg::I8(v) => stream.add_field(v)?,
            FieldArg::U16(v) => stream.add_field(v)?,
            FieldArg::I16(v) => stream.add_field(v)?,
            FieldArg::U32(v) => stream.add_field(v)?,
            FieldArg::I32(v) => stream.add_field(v)?,
            FieldArg::F32(v) => stream.add_field(v)?,
        }
    }
    Ok(())
}
