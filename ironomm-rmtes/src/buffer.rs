/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! RMTES buffer: cached resolved text plus partial-update application.
//!
//! An update buffer either replaces the text wholesale or carries escape
//! sequences that edit the previously resolved text in place:
//!
//! - `ESC [ <digits> 0x60` moves the write cursor to the given index;
//! - `ESC [ <digits> 0x62` repeats the previously written byte N times;
//! - `ESC % 0` (UTF-8 shift) and any other two-byte escape pass through.
//!
//! Partial updates require an established base; applying one to an unset
//! buffer fails. A failed apply leaves the prior resolved state intact.

use std::cell::OnceCell;
use std::fmt;

use memchr::{memchr, memchr_iter};
use tracing::trace;

use crate::error::RmtesError;

const ESC: u8 = 0x1B;
const LBRKT: u8 = 0x5B;
const RHPA: u8 = 0x60;
const RREP: u8 = 0x62;
const UTF8_SHIFT: u8 = 0x25;

/// Returns true if `bytes` contain a cursor-move or repeat escape.
#[must_use]
pub fn has_partial_update(bytes: &[u8]) -> bool {
    for pos in memchr_iter(ESC, bytes) {
        if bytes.get(pos + 1) != Some(&LBRKT) {
            continue;
        }
        let mut j = pos + 2;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        if matches!(bytes.get(j), Some(&RHPA) | Some(&RREP)) {
            return true;
        }
    }
    false
}

#[derive(Debug, Default)]
struct Resolved {
    bytes: Vec<u8>,
    utf8: OnceCell<String>,
    utf16: OnceCell<Vec<u16>>,
}

impl Resolved {
    fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            utf8: OnceCell::new(),
            utf16: OnceCell::new(),
        }
    }
}

/// RMTES text buffer: `Unset` until the first apply establishes text.
#[derive(Debug, Default)]
pub struct RmtesBuffer {
    resolved: Option<Resolved>,
}

impl RmtesBuffer {
    /// Creates an unset buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no text has been established yet.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        self.resolved.is_none()
    }

    /// Applies an update buffer, replacing or editing the resolved text.
    ///
    /// A buffer without partial-update escapes replaces the text outright
    /// and may establish the base. One with escapes edits a working copy of
    /// the current text, which must exist.
    ///
    /// # Errors
    /// Returns `RmtesError::NoBaseText` for a partial update on an unset
    /// buffer and `RmtesError::BadEscapeSequence` for a malformed escape.
    /// The prior resolved state survives either failure.
    pub fn apply(&mut self, update: &[u8]) -> Result<(), RmtesError> {
        let next = if memchr(ESC, update).is_none() {
            update.to_vec()
        } else if has_partial_update(update) {
            let base = self
                .resolved
                .as_ref()
                .filter(|r| !r.bytes.is_empty())
                .ok_or(RmtesError::NoBaseText)?;
            resolve_partial(&base.bytes, update)?
        } else {
            // escapes without edits still need validating and expanding
            resolve_partial(&[], update)?
        };
        trace!(len = next.len(), "resolved rmtes text");
        self.resolved = Some(Resolved::new(next));
        Ok(())
    }

    /// Returns the resolved text as UTF-8, empty when unset.
    ///
    /// Invalid byte sequences are replaced, not rejected. The conversion
    /// runs once per apply; later calls return the cached string.
    #[must_use]
    pub fn as_utf8(&self) -> &str {
        match &self.resolved {
            Some(r) => r
                .utf8
                .get_or_init(|| String::from_utf8_lossy(&r.bytes).into_owned()),
            None => "",
        }
    }

    /// Returns the resolved text as UTF-16 code units, empty when unset.
    #[must_use]
    pub fn as_utf16(&self) -> &[u16] {
        match &self.resolved {
            Some(r) => r.utf16.get_or_init(|| self.as_utf8().encode_utf16().collect()),
            None => &[],
        }
    }

    /// Returns the raw resolved bytes, empty when unset.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.resolved.as_ref().map_or(&[], |r| &r.bytes)
    }

    /// Returns to the unset state.
    pub fn clear(&mut self) {
        self.resolved = None;
    }
}

impl fmt::Display for RmtesBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_utf8())
    }
}

/// Edits a copy of `base` per the escapes in `update`.
///
/// Plain bytes write at the cursor and advance it. Writes past the end
/// extend the text, padding any gap with spaces. The result keeps the
/// base's trailing bytes beyond the furthest write.
fn resolve_partial(base: &[u8], update: &[u8]) -> Result<Vec<u8>, RmtesError> {
    let mut out = base.to_vec();
    let mut cursor = 0usize;
    let mut i = 0usize;
    while i < update.len() {
        let b = update[i];
        if b != ESC {
            write_at(&mut out, cursor, b);
            cursor += 1;
            i += 1;
            continue;
        }
        let offset = i;
        let next = *update
            .get(i + 1)
            .ok_or(RmtesError::BadEscapeSequence { offset })?;
        match next {
            LBRKT => {
                let mut j = i + 2;
                let mut n = 0usize;
                let mut have_digit = false;
                while let Some(&d) = update.get(j) {
                    if d.is_ascii_digit() {
                        n = n * 10 + usize::from(d - b'0');
                        have_digit = true;
                        j += 1;
                    } else {
                        break;
                    }
                }
                match update.get(j) {
                    Some(&RHPA) if have_digit => cursor = n,
                    Some(&RREP) if have_digit => {
                        let fill = cursor
                            .checked_sub(1)
                            .and_then(|p| out.get(p).copied())
                            .ok_or(RmtesError::BadEscapeSequence { offset })?;
                        for _ in 0..n {
                            write_at(&mut out, cursor, fill);
                            cursor += 1;
                        }
                    }
                    _ => return Err(RmtesError::BadEscapeSequence { offset }),
                }
                i = j + 1;
            }
            UTF8_SHIFT => {
                if update.get(i + 2) != Some(&0x30) {
                    return Err(RmtesError::BadEscapeSequence { offset });
                }
                for k in 0..3 {
                    write_at(&mut out, cursor, update[i + k]);
                    cursor += 1;
                }
                i += 3;
            }
            other => {
                write_at(&mut out, cursor, ESC);
                cursor += 1;
                write_at(&mut out, cursor, other);
                cursor += 1;
                i += 2;
            }
        }
    }
    Ok(out)
}

fn write_at(out: &mut Vec<u8>, index: usize, byte: u8) {
    if index < out.len() {
        out[index] = byte;
    } else {
        while out.len() < index {
            out.push(b' ');
        }
        out.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_replace_establishes_base() {
        let mut buf = RmtesBuffer::new();
        assert!(buf.is_unset());
        buf.apply(b"abcdefghijkl").unwrap();
        assert_eq!(buf.as_utf8(), "abcdefghijkl");
    }

    #[test]
    fn test_overwrite_at_index_zero() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"abcdefghijkl").unwrap();
        buf.apply(&[0x1B, 0x5B, 0x30, 0x60, 0x31, 0x32]).unwrap();
        assert_eq!(buf.as_utf8(), "12cdefghijkl");
    }

    #[test]
    fn test_overwrite_then_repeat_fill() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"abcdefghijkl").unwrap();
        buf.apply(&[0x1B, 0x5B, 0x39, 0x60, 0x20, 0x1B, 0x5B, 0x32, 0x62])
            .unwrap();
        assert_eq!(buf.as_utf8(), "abcdefghi   ");
    }

    #[test]
    fn test_partial_update_on_unset_fails() {
        let mut buf = RmtesBuffer::new();
        let err = buf.apply(&[0x1B, 0x5B, 0x30, 0x60, 0x31]).unwrap_err();
        assert_eq!(err, RmtesError::NoBaseText);
        assert!(buf.is_unset());
    }

    #[test]
    fn test_partial_update_on_empty_base_fails() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"").unwrap();
        let err = buf.apply(&[0x1B, 0x5B, 0x30, 0x60, 0x31]).unwrap_err();
        assert_eq!(err, RmtesError::NoBaseText);
    }

    #[test]
    fn test_malformed_escape_preserves_state() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"abc").unwrap();
        let err = buf.apply(&[0x1B, 0x5B, 0x31]).unwrap_err();
        assert!(matches!(err, RmtesError::BadEscapeSequence { offset: 0 }));
        assert_eq!(buf.as_utf8(), "abc");
    }

    #[test]
    fn test_repeat_without_preceding_write_fails() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"abc").unwrap();
        let err = buf.apply(&[0x1B, 0x5B, 0x32, 0x62]).unwrap_err();
        assert!(matches!(err, RmtesError::BadEscapeSequence { .. }));
    }

    #[test]
    fn test_views_are_stable_and_consistent() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"abcdefghijkl").unwrap();
        buf.apply(&[0x1B, 0x5B, 0x30, 0x60, 0x31, 0x32]).unwrap();
        let first = buf.as_utf8().to_owned();
        assert_eq!(buf.as_utf8(), first);
        let utf16: Vec<u16> = first.encode_utf16().collect();
        assert_eq!(buf.as_utf16(), utf16.as_slice());
        assert_eq!(buf.as_utf16(), utf16.as_slice());
        assert_eq!(buf.to_string(), first);
    }

    #[test]
    fn test_has_partial_update() {
        assert!(has_partial_update(&[0x1B, 0x5B, 0x30, 0x60]));
        assert!(has_partial_update(&[b'x', 0x1B, 0x5B, 0x32, 0x62]));
        assert!(!has_partial_update(b"plain text"));
        assert!(!has_partial_update(&[0x1B, 0x25, 0x30]));
        assert!(!has_partial_update(&[0x1B, 0x5B, 0x30]));
    }

    #[test]
    fn test_clear_returns_to_unset() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"abc").unwrap();
        buf.clear();
        assert!(buf.is_unset());
        assert_eq!(buf.as_utf8(), "");
        assert_eq!(buf.as_utf16(), &[] as &[u16]);
    }

    #[test]
    fn test_cursor_past_end_pads_with_spaces() {
        let mut buf = RmtesBuffer::new();
        buf.apply(b"ab").unwrap();
        buf.apply(&[0x1B, 0x5B, 0x34, 0x60, b'z']).unwrap();
        assert_eq!(buf.as_utf8(), "ab  z");
    }
}
