//! JSON persistence.

use crate::error::OutputResult;
use crate::scanner::OpenPort;
use std::io::{Read, Write};

/// Write open ports as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, open: &[OpenPort]) -> OutputResult<()> {
    serde_json::to_writer_pretty(&mut writer, open)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read back a file written by [`write_json`].
pub fn read_json<R: Read>(reader: R) -> OutputResult<Vec<OpenPort>> {
    Ok(serde_json::from_reader(reader)?)
}
