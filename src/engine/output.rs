//! Writers for a finished [`ResultSet`]. Only called on success, so output is all-or-nothing.

use anyhow::Result;
use std::io::Write;

use crate::ResultSet;
use crate::engine::arg_parser::OutputFormat;

/// Write `set` in `format` and flush.
pub fn write_records<W: Write>(out: &mut W, set: &ResultSet, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, set)?,
        OutputFormat::Json => write_json(out, set)?,
    }
    out.flush()?;
    Ok(())
}

/// `<digest> <path>\n` per record. Paths are written as their raw encoded bytes.
pub fn write_text<W: Write>(out: &mut W, set: &ResultSet) -> std::io::Result<()> {
    for record in set {
        out.write_all(record.digest.as_bytes())?;
        out.write_all(b" ")?;
        out.write_all(record.path.as_os_str().as_encoded_bytes())?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Pretty JSON array of records followed by a newline. Non-UTF-8 paths are written lossily.
pub fn write_json<W: Write>(out: &mut W, set: &ResultSet) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, set.records())?;
    out.write_all(b"\n")?;
    Ok(())
}
