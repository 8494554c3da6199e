//! Little-endian cursor helpers shared by every packet layout.

use crate::error::{DecodeError, DecodeResult};

/// Cursor-style byte reader for little-endian binary data.
///
/// Every read is bounds checked; running off the end yields
/// [`DecodeError::Truncated`] carrying the offset that would have been needed.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Current cursor offset from the start of the datagram.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let end = self.pos.saturating_add(N);
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(DecodeError::Truncated {
                expected: end,
                actual: self.data.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.pos = end;
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> DecodeResult<u8> {
        self.take::<1>().map(|[b]| b)
    }

    #[inline]
    pub fn i8(&mut self) -> DecodeResult<i8> {
        self.take::<1>().map(i8::from_le_bytes)
    }

    #[inline]
    pub fn u16_le(&mut self) -> DecodeResult<u16> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn u32_le(&mut self) -> DecodeResult<u32> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u64_le(&mut self) -> DecodeResult<u64> {
        self.take::<8>().map(u64::from_le_bytes)
    }

    /// Reads an `f32`; NaN and infinities decode as `0.0`.
    #[inline]
    pub fn f32_le(&mut self) -> DecodeResult<f32> {
        self.take::<4>()
            .map(f32::from_le_bytes)
            .map(|v| if v.is_finite() { v } else { 0.0 })
    }

    pub fn bytes<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        self.take::<N>()
    }

    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        let end = self.pos.saturating_add(n);
        if end > self.data.len() {
            return Err(DecodeError::Truncated {
                expected: end,
                actual: self.data.len(),
            });
        }
        self.pos = end;
        Ok(())
    }
}

/// Append-only little-endian writer used by the `to_bytes` encoders.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn i8(&mut self, v: i8) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u16_le(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32_le(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64_le(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f32_le(&mut self, v: f32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(v);
        self
    }

    /// Pads with zero bytes.
    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.buf.extend(std::iter::repeat_n(0u8, n));
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn reads_little_endian_fields_in_order() -> TestResult {
        let mut w = ByteWriter::default();
        w.u16_le(2021).u8(7).u32_le(0xDEAD_BEEF).f32_le(1.5).i8(-3);
        let raw = w.into_inner();

        let mut r = ByteReader::new(&raw);
        assert_eq!(r.u16_le()?, 2021);
        assert_eq!(r.u8()?, 7);
        assert_eq!(r.u32_le()?, 0xDEAD_BEEF);
        assert!((r.f32_le()? - 1.5).abs() < f32::EPSILON);
        assert_eq!(r.i8()?, -3);
        assert_eq!(r.position(), raw.len());
        Ok(())
    }

    #[test]
    fn read_past_end_reports_needed_length() {
        let raw = [1u8, 2, 3];
        let mut r = ByteReader::at(&raw, 1);
        assert_eq!(
            r.u32_le(),
            Err(DecodeError::Truncated {
                expected: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn non_finite_float_decodes_as_zero() -> TestResult {
        let raw = f32::NAN.to_le_bytes();
        let mut r = ByteReader::new(&raw);
        assert_eq!(r.f32_le()?.to_bits(), 0.0f32.to_bits());
        Ok(())
    }

    #[test]
    fn skip_is_bounds_checked() {
        let raw = [0u8; 4];
        let mut r = ByteReader::new(&raw);
        assert!(r.skip(4).is_ok());
        assert!(r.skip(1).is_err());
    }
}
