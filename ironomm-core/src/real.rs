/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Decimal `Real` value as mantissa plus magnitude hint.
//!
//! A [`OmmReal`] carries an integer mantissa and a [`MagnitudeType`] that
//! scales it by a power of ten or names a fractional denominator. A blank
//! real is a distinct state signalled on the wire, not a zero value.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hint byte value that marks a blank real on the wire.
pub const BLANK_REAL_HINT: u8 = 0x20;

/// Magnitude hint for a [`OmmReal`] mantissa.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromPrimitive,
    ToPrimitive,
)]
#[repr(u8)]
pub enum MagnitudeType {
    /// mantissa * 10^-14
    ExponentNeg14 = 0,
    /// mantissa * 10^-13
    ExponentNeg13 = 1,
    /// mantissa * 10^-12
    ExponentNeg12 = 2,
    /// mantissa * 10^-11
    ExponentNeg11 = 3,
    /// mantissa * 10^-10
    ExponentNeg10 = 4,
    /// mantissa * 10^-9
    ExponentNeg9 = 5,
    /// mantissa * 10^-8
    ExponentNeg8 = 6,
    /// mantissa * 10^-7
    ExponentNeg7 = 7,
    /// mantissa * 10^-6
    ExponentNeg6 = 8,
    /// mantissa * 10^-5
    ExponentNeg5 = 9,
    /// mantissa * 10^-4
    ExponentNeg4 = 10,
    /// mantissa * 10^-3
    ExponentNeg3 = 11,
    /// mantissa * 10^-2
    ExponentNeg2 = 12,
    /// mantissa * 10^-1
    ExponentNeg1 = 13,
    /// mantissa * 10^0
    Exponent0 = 14,
    /// mantissa * 10^1
    Exponent1 = 15,
    /// mantissa * 10^2
    Exponent2 = 16,
    /// mantissa * 10^3
    Exponent3 = 17,
    /// mantissa * 10^4
    Exponent4 = 18,
    /// mantissa * 10^5
    Exponent5 = 19,
    /// mantissa * 10^6
    Exponent6 = 20,
    /// mantissa * 10^7
    Exponent7 = 21,
    /// mantissa / 1
    Divisor1 = 22,
    /// mantissa / 2
    Divisor2 = 23,
    /// mantissa / 4
    Divisor4 = 24,
    /// mantissa / 8
    Divisor8 = 25,
    /// mantissa / 16
    Divisor16 = 26,
    /// mantissa / 32
    Divisor32 = 27,
    /// mantissa / 64
    Divisor64 = 28,
    /// mantissa / 128
    Divisor128 = 29,
    /// mantissa / 256
    Divisor256 = 30,
}

impl MagnitudeType {
    /// Decodes a raw hint code.
    #[inline]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    /// Returns the raw hint code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the base-ten exponent for exponent hints, `None` for divisors.
    #[must_use]
    pub const fn exponent(self) -> Option<i32> {
        let code = self.code();
        if code <= Self::Exponent7.code() {
            Some(code as i32 - 14)
        } else {
            None
        }
    }

    /// Returns the denominator for divisor hints, `None` for exponents.
    #[must_use]
    pub const fn divisor(self) -> Option<i64> {
        let code = self.code();
        if code >= Self::Divisor1.code() {
            Some(1i64 << (code - Self::Divisor1.code()))
        } else {
            None
        }
    }
}

/// Decimal value: integer mantissa scaled by a [`MagnitudeType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OmmReal {
    /// Integer mantissa.
    pub mantissa: i64,
    /// Scale applied to the mantissa.
    pub magnitude: MagnitudeType,
}

impl OmmReal {
    /// Creates a real from mantissa and magnitude.
    #[inline]
    #[must_use]
    pub const fn new(mantissa: i64, magnitude: MagnitudeType) -> Self {
        Self {
            mantissa,
            magnitude,
        }
    }

    /// Converts to a `Decimal`.
    ///
    /// Divisor hints produce an exact quotient (all divisors are powers of
    /// two, representable in 28 fractional digits well past precision
    /// needs); exponent hints scale directly.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        match self.magnitude.exponent() {
            Some(exp) if exp >= 0 => {
                Decimal::from(self.mantissa) * Decimal::from(10i64.pow(exp as u32))
            }
            Some(exp) => Decimal::new(self.mantissa, (-exp) as u32),
            None => {
                // divisor hint
                let div = self.magnitude.divisor().unwrap_or(1);
                Decimal::from(self.mantissa) / Decimal::from(div)
            }
        }
    }

    /// Converts to an `f64` approximation.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        match self.magnitude.exponent() {
            Some(exp) => self.mantissa as f64 * 10f64.powi(exp),
            None => self.mantissa as f64 / self.magnitude.divisor().unwrap_or(1) as f64,
        }
    }
}

impl fmt::Display for OmmReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
