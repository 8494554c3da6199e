//! Raw datagram capture files.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic            8 bytes  "LTCAPv01"
//! repeated:
//!   timestamp_ns   u64      since capture start
//!   len            u32
//!   payload        len bytes
//! ```

use std::io::{self, Read, Write};

use crate::error::CliError;

pub const CAPTURE_MAGIC: &[u8; 8] = b"LTCAPv01";
/// Upper bound on a stored datagram; anything larger is a corrupt file.
const MAX_RECORD_BYTES: u32 = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedDatagram {
    pub timestamp_ns: u64,
    pub payload: Vec<u8>,
}

pub struct CaptureWriter<W: Write> {
    inner: W,
    records: u64,
}

impl<W: Write> CaptureWriter<W> {
    /// Write the magic and return a writer positioned at the first record.
    pub fn new(mut inner: W) -> io::Result<Self> {
        inner.write_all(CAPTURE_MAGIC)?;
        Ok(Self { inner, records: 0 })
    }

    pub fn write(&mut self, timestamp_ns: u64, payload: &[u8]) -> Result<(), CliError> {
        let len = u32::try_from(payload.len())
            .ok()
            .filter(|&len| len <= MAX_RECORD_BYTES)
            .ok_or_else(|| {
                CliError::InvalidCapture(format!("datagram of {} bytes", payload.len()))
            })?;
        self.inner.write_all(&timestamp_ns.to_le_bytes())?;
        self.inner.write_all(&len.to_le_bytes())?;
        self.inner.write_all(payload)?;
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Iterates over the records of a capture.
pub struct CaptureReader<R: Read> {
    inner: R,
    done: bool,
}

impl<R: Read> CaptureReader<R> {
    /// Check the magic and return a reader positioned at the first record.
    pub fn new(mut inner: R) -> Result<Self, CliError> {
        let mut magic = [0u8; 8];
        inner
            .read_exact(&mut magic)
            .map_err(|err| CliError::InvalidCapture(format!("missing header: {err}")))?;
        if &magic != CAPTURE_MAGIC {
            return Err(CliError::InvalidCapture("bad magic".to_string()));
        }
        Ok(Self { inner, done: false })
    }

    /// Read until `buf` is full or the input ends; returns the bytes read.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while let Some(rest) = buf.get_mut(filled..).filter(|rest| !rest.is_empty()) {
            match self.inner.read(rest) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(filled)
    }

    fn read_record(&mut self) -> Result<Option<CapturedDatagram>, CliError> {
        let mut timestamp = [0u8; 8];
        match self.fill(&mut timestamp)? {
            0 => return Ok(None),
            8 => {}
            n => {
                return Err(CliError::InvalidCapture(format!(
                    "record cut short: {n} of 8 timestamp bytes"
                )));
            }
        }
        let mut len = [0u8; 4];
        self.inner
            .read_exact(&mut len)
            .map_err(|err| CliError::InvalidCapture(format!("record cut short: {err}")))?;
        let len = u32::from_le_bytes(len);
        if len > MAX_RECORD_BYTES {
            return Err(CliError::InvalidCapture(format!("record length {len}")));
        }
        let mut payload = vec![0u8; usize::try_from(len).unwrap_or_default()];
        self.inner
            .read_exact(&mut payload)
            .map_err(|err| CliError::InvalidCapture(format!("record cut short: {err}")))?;
        Ok(Some(CapturedDatagram {
            timestamp_ns: u64::from_le_bytes(timestamp),
            payload,
        }))
    }
}

impl<R: Read> Iterator for CaptureReader<R> {
    type Item = Result<CapturedDatagram, CliError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let record = self.read_record().transpose();
        if !matches!(record, Some(Ok(_))) {
            self.done = true;
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn records_come_back_in_order() -> TestResult {
        let mut writer = CaptureWriter::new(Vec::new())?;
        writer.write(10, &[1, 2, 3])?;
        writer.write(20, &[])?;
        assert_eq!(writer.records(), 2);
        let bytes = writer.finish()?;

        let records = CaptureReader::new(bytes.as_slice())?.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(
            records,
            [
                CapturedDatagram {
                    timestamp_ns: 10,
                    payload: vec![1, 2, 3]
                },
                CapturedDatagram {
                    timestamp_ns: 20,
                    payload: vec![]
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let result = CaptureReader::new(&b"ORACAPv1"[..]);
        assert!(matches!(result, Err(CliError::InvalidCapture(_))));
    }

    #[test]
    fn truncated_record_stops_iteration_with_an_error() -> TestResult {
        let mut writer = CaptureWriter::new(Vec::new())?;
        writer.write(1, &[9; 16])?;
        let mut bytes = writer.finish()?;
        bytes.truncate(bytes.len() - 4);

        let mut reader = CaptureReader::new(bytes.as_slice())?;
        assert!(matches!(reader.next(), Some(Err(CliError::InvalidCapture(_)))));
        assert!(reader.next().is_none());
        Ok(())
    }

    #[test]
    fn partial_timestamp_at_the_end_is_an_error() -> TestResult {
        let mut writer = CaptureWriter::new(Vec::new())?;
        writer.write(1, &[7; 4])?;
        let mut bytes = writer.finish()?;
        bytes.extend_from_slice(&[0xAA; 3]);

        let mut reader = CaptureReader::new(bytes.as_slice())?;
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(reader.next(), Some(Err(CliError::InvalidCapture(_)))));
        assert!(reader.next().is_none());
        Ok(())
    }
}
