//! CSV persistence.

use crate::error::OutputResult;
use crate::scanner::OpenPort;
use std::io::{Read, Write};

/// Write a `port,service` header followed by one row per open port.
pub fn write_csv<W: Write>(writer: W, open: &[OpenPort]) -> OutputResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    // Header is written explicitly so an empty scan still has one.
    wtr.write_record(["port", "service"])?;
    for entry in open {
        wtr.write_record([entry.port.to_string().as_str(), entry.service.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Read back a file written by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> OutputResult<Vec<OpenPort>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize().collect::<Result<Vec<OpenPort>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let open = vec![
            OpenPort {
                port: 22,
                service: "ssh".into(),
            },
            OpenPort {
                port: 8080,
                service: "http-proxy".into(),
            },
        ];
        let mut buf = Vec::new();
        write_csv(&mut buf, &open).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "port,service\n22,ssh\n8080,http-proxy\n"
        );
    }

    #[test]
    fn test_header_only_when_empty() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "port,service\n");
    }

    #[test]
    fn test_read_back() {
        let rows = read_csv("port,service\n443,https\n".as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![OpenPort {
                port: 443,
                service: "https".into()
            }]
        );
    }
}
