/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Cursor-based reader over a refcounted byte buffer.
//!
//! Slices returned by [`WireReader::read_bytes`] and the length-prefixed
//! variants are `Bytes` views sharing the backing storage, so decoded
//! entries stay valid after the reader is dropped.

use bytes::Bytes;
use ironomm_core::error::DecodeError;

use crate::{MAJOR_VERSION, MINOR_VERSION};

/// Reader over an RWF-encoded buffer.
#[derive(Debug, Clone)]
pub struct WireReader {
    buf: Bytes,
    pos: usize,
    major: u8,
    minor: u8,
}

impl WireReader {
    /// Creates a reader over `buf` at the default wire version.
    #[must_use]
    pub fn new(buf: Bytes) -> Self {
        Self::with_version(buf, MAJOR_VERSION, MINOR_VERSION)
    }

    /// Creates a reader over `buf` at an explicit wire version.
    ///
    /// # Arguments
    /// * `buf` - The encoded bytes
    /// * `major` - Major wire version the buffer was encoded with
    /// * `minor` - Minor wire version the buffer was encoded with
    #[must_use]
    pub const fn with_version(buf: Bytes, major: u8, minor: u8) -> Self {
        Self {
            buf,
            pos: 0,
            major,
            minor,
        }
    }

    /// Returns the major wire version.
    #[inline]
    #[must_use]
    pub const fn major_version(&self) -> u8 {
        self.major
    }

    /// Returns the minor wire version.
    #[inline]
    #[must_use]
    pub const fn minor_version(&self) -> u8 {
        self.minor
    }

    /// Returns the current cursor position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of unread bytes.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns true if every byte has been consumed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    fn check(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            Err(DecodeError::UnexpectedEof {
                offset: self.pos,
                needed: needed - self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Reads one byte.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` at end of buffer.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.check(1)?;
        let v = self.buf[self.pos];
        self.pos += 1;
        Ok(v)
    }

    /// Reads a big-endian u16.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if fewer than two bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        self.check(2)?;
        let v = u16::from_be_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    /// Reads a big-endian u32.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if fewer than four bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.check(4)?;
        let v = u32::from_be_bytes([
            self.buf[self.pos],
            self.buf[self.pos + 1],
            self.buf[self.pos + 2],
            self.buf[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(v)
    }

    /// Reads a big-endian i32.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if fewer than four bytes remain.
    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(self.read_u32()? as i32)
    }

    /// Reads a big-endian i16.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if fewer than two bytes remain.
    pub fn read_i16(&mut self) -> Result<i16, DecodeError> {
        Ok(self.read_u16()? as i16)
    }

    /// Reads a 15-bit reserved-bit length: one byte below 0x80, otherwise
    /// two bytes with the high bit as the wide marker.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` on a truncated prefix.
    pub fn read_u15rb(&mut self) -> Result<u16, DecodeError> {
        let b0 = self.read_u8()?;
        if b0 & 0x80 == 0 {
            Ok(u16::from(b0))
        } else {
            let b1 = self.read_u8()?;
            Ok((u16::from(b0 & 0x7F) << 8) | u16::from(b1))
        }
    }

    /// Reads an optimized-byte u16: values below 0xFE in one byte, larger
    /// values as the 0xFE marker plus a big-endian u16.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` on a truncated prefix.
    pub fn read_u16ob(&mut self) -> Result<u16, DecodeError> {
        let b0 = self.read_u8()?;
        if b0 < 0xFE {
            Ok(u16::from(b0))
        } else {
            self.read_u16()
        }
    }

    /// Reads a 30-bit reserved-bit unsigned integer: the top two bits of
    /// the first byte select a total width of one to four bytes.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` on a truncated value.
    pub fn read_u30rb(&mut self) -> Result<u32, DecodeError> {
        let b0 = self.read_u8()?;
        let extra = (b0 >> 6) as usize;
        let mut v = u32::from(b0 & 0x3F);
        for _ in 0..extra {
            v = (v << 8) | u32::from(self.read_u8()?);
        }
        Ok(v)
    }

    /// Reads `len` bytes as a shared slice of the backing buffer.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, DecodeError> {
        self.check(len)?;
        let slice = self.buf.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(slice)
    }

    /// Reads a `u15rb`-length-prefixed byte sequence.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` on truncation.
    pub fn read_b15(&mut self) -> Result<Bytes, DecodeError> {
        let len = self.read_u15rb()? as usize;
        self.read_bytes(len)
    }

    /// Reads a `u16ob`-length-prefixed byte sequence.
    ///
    /// # Errors
    /// Returns `DecodeError::UnexpectedEof` on truncation.
    pub fn read_b16(&mut self) -> Result<Bytes, DecodeError> {
        let len = self.read_u16ob()? as usize;
        self.read_bytes(len)
    }

    /// Reads all remaining bytes as a shared slice.
    pub fn read_rest(&mut self) -> Bytes {
        let slice = self.buf.slice(self.pos..);
        self.pos = self.buf.len();
        slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &[u8]) -> WireReader {
        WireReader::new(Bytes::copy_from_slice(data))
    }

    #[test]
    fn test_read_fixed_width() {
        let mut r = reader(&[0x01, 0x02, 0x03, 0x00, 0x00, 0x00, 0x04]);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16().unwrap(), 0x0203);
        assert_eq!(r.read_u32().unwrap(), 4);
        assert!(r.is_empty());
    }

    #[test]
    fn test_read_eof() {
        let mut r = reader(&[0x01]);
        let err = r.read_u32().unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnexpectedEof {
                offset: 0,
                needed: 3
            }
        ));
    }

    #[test]
    fn test_read_u15rb() {
        let mut r = reader(&[0x7F, 0x81, 0x00, 0xFF, 0xFF]);
        assert_eq!(r.read_u15rb().unwrap(), 0x7F);
        assert_eq!(r.read_u15rb().unwrap(), 0x100);
        assert_eq!(r.read_u15rb().unwrap(), 0x7FFF);
    }

    #[test]
    fn test_read_u16ob() {
        let mut r = reader(&[0xFD, 0xFE, 0x12, 0x34]);
        assert_eq!(r.read_u16ob().unwrap(), 0xFD);
        assert_eq!(r.read_u16ob().unwrap(), 0x1234);
    }

    #[test]
    fn test_read_u30rb() {
        let mut r = reader(&[0x3F, 0x40, 0x80, 0xC0, 0x01, 0x02, 0x03]);
        assert_eq!(r.read_u30rb().unwrap(), 0x3F);
        assert_eq!(r.read_u30rb().unwrap(), 0x80);
        assert_eq!(r.read_u30rb().unwrap(), 0x010203);
    }

    #[test]
    fn test_read_b15_shares_backing() {
        let mut r = reader(&[0x03, b'a', b'b', b'c', 0x00]);
        let slice = r.read_b15().unwrap();
        assert_eq!(&slice[..], b"abc");
        drop(r);
        // still valid after reader drop
        assert_eq!(&slice[..], b"abc");
    }

    #[test]
    fn test_versions_carried_opaquely() {
        let r = WireReader::with_version(Bytes::new(), 14, 2);
        assert_eq!(r.major_version(), 14);
        assert_eq!(r.minor_version(), 2);
    }
}
