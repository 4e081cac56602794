/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Growable output buffer mirroring [`crate::reader::WireReader`].

use bytes::{BufMut, Bytes, BytesMut};
use ironomm_core::error::EncodeError;

use crate::{MAJOR_VERSION, MINOR_VERSION};

/// Writer producing an RWF-encoded buffer.
#[derive(Debug)]
pub struct WireWriter {
    buf: BytesMut,
    major: u8,
    minor: u8,
}

impl WireWriter {
    /// Creates a writer at the default wire version.
    #[must_use]
    pub fn new() -> Self {
        Self::with_version(MAJOR_VERSION, MINOR_VERSION)
    }

    /// Creates a writer at an explicit wire version.
    #[must_use]
    pub fn with_version(major: u8, minor: u8) -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
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

    /// Returns the number of bytes written so far.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes one byte.
    #[inline]
    pub fn put_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    /// Writes a big-endian u16.
    #[inline]
    pub fn put_u16(&mut self, v: u16) {
        self.buf.put_u16(v);
    }

    /// Writes a big-endian u32.
    #[inline]
    pub fn put_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    /// Writes a big-endian i32.
    #[inline]
    pub fn put_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    /// Writes a big-endian i16.
    #[inline]
    pub fn put_i16(&mut self, v: i16) {
        self.buf.put_i16(v);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn put_bytes(&mut self, v: &[u8]) {
        self.buf.put_slice(v);
    }

    /// Writes a 15-bit reserved-bit length.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` above `0x7FFF`.
    pub fn put_u15rb(&mut self, v: usize) -> Result<(), EncodeError> {
        if v < 0x80 {
            self.buf.put_u8(v as u8);
            Ok(())
        } else if v <= 0x7FFF {
            self.buf.put_u8(((v >> 8) as u8) | 0x80);
            self.buf.put_u8((v & 0xFF) as u8);
            Ok(())
        } else {
            Err(EncodeError::LengthTooLarge {
                length: v,
                max: 0x7FFF,
                encoding: "u15rb",
            })
        }
    }

    /// Writes an optimized-byte u16.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` above `0xFFFF`.
    pub fn put_u16ob(&mut self, v: usize) -> Result<(), EncodeError> {
        if v < 0xFE {
            self.buf.put_u8(v as u8);
            Ok(())
        } else if v <= 0xFFFF {
            self.buf.put_u8(0xFE);
            self.buf.put_u16(v as u16);
            Ok(())
        } else {
            Err(EncodeError::LengthTooLarge {
                length: v,
                max: 0xFFFF,
                encoding: "u16ob",
            })
        }
    }

    /// Writes a 30-bit reserved-bit unsigned integer at minimal width.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` above `0x3FFF_FFFF`.
    pub fn put_u30rb(&mut self, v: u32) -> Result<(), EncodeError> {
        if v < 1 << 6 {
            self.buf.put_u8(v as u8);
        } else if v < 1 << 14 {
            self.buf.put_u8(0x40 | (v >> 8) as u8);
            self.buf.put_u8((v & 0xFF) as u8);
        } else if v < 1 << 22 {
            self.buf.put_u8(0x80 | (v >> 16) as u8);
            self.buf.put_u16((v & 0xFFFF) as u16);
        } else if v < 1 << 30 {
            self.buf.put_u8(0xC0 | (v >> 24) as u8);
            self.buf.put_u8(((v >> 16) & 0xFF) as u8);
            self.buf.put_u16((v & 0xFFFF) as u16);
        } else {
            return Err(EncodeError::LengthTooLarge {
                length: v as usize,
                max: 0x3FFF_FFFF,
                encoding: "u30rb",
            });
        }
        Ok(())
    }

    /// Writes a `u15rb`-length-prefixed byte sequence.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if the data exceeds `0x7FFF` bytes.
    pub fn put_b15(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        self.put_u15rb(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Writes a `u16ob`-length-prefixed byte sequence.
    ///
    /// # Errors
    /// Returns `EncodeError::LengthTooLarge` if the data exceeds `0xFFFF` bytes.
    pub fn put_b16(&mut self, data: &[u8]) -> Result<(), EncodeError> {
        self.put_u16ob(data.len())?;
        self.buf.put_slice(data);
        Ok(())
    }

    /// Finalizes the writer, freezing the buffer.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Clears the writer for reuse, keeping version and capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}
