// ─────────────────────────────────────────────────────────────────────
// φⁿ Oscillator Kernel — Fixed-Point Numerics
// ─────────────────────────────────────────────────────────────────────
//! Q4.14 scalar (`Fixed`) and Q28 accumulator (`Wide`).
//!
//! Every shift, rounding and saturation rule of the kernel lives here:
//!
//!   - `Fixed` is an 18-bit signed register with 14 fractional bits,
//!     range [-8, 8), resolution 2⁻¹⁴ ≈ 6.1e-5.
//!   - `Wide` holds exact Q14×Q14 products (28 fractional bits) so that
//!     several terms can be summed before a single rounding step.
//!   - Narrowing rounds half up (add 2¹³, arithmetic shift) and then
//!     saturates to the 18-bit range.
//!
//! Arithmetic never panics: overflow saturates, division by zero
//! saturates toward the sign of the dividend.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Arithmetic right shift with round-half-up.
#[inline]
fn round_shift(v: i128, shift: u32) -> i128 {
    if shift == 0 {
        v
    } else {
        (v + (1i128 << (shift - 1))) >> shift
    }
}

#[inline]
fn saturate_i64(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Bitwise integer square root (floor).
fn isqrt_u64(v: u64) -> u64 {
    let mut op = v;
    let mut res = 0u64;
    let mut one = 1u64 << 62;
    while one > op {
        one >>= 2;
    }
    while one != 0 {
        if op >= res + one {
            op -= res + one;
            res = (res >> 1) + one;
        } else {
            res >>= 1;
        }
        one >>= 2;
    }
    res
}

// ─── Fixed (Q4.14) ──────────────────────────────────────────────────

/// Q4.14 signed fixed-point value saturating to 18 bits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "i32", into = "i32")]
pub struct Fixed(i32);

impl Fixed {
    pub const FRAC_BITS: u32 = 14;
    pub const SCALE: i32 = 1 << Self::FRAC_BITS;
    pub const RAW_MAX: i32 = (1 << 17) - 1;
    pub const RAW_MIN: i32 = -(1 << 17);

    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(Self::SCALE);
    pub const HALF: Fixed = Fixed(Self::SCALE / 2);
    pub const QUARTER: Fixed = Fixed(Self::SCALE / 4);
    pub const MAX: Fixed = Fixed(Self::RAW_MAX);
    pub const MIN: Fixed = Fixed(Self::RAW_MIN);
    /// Smallest positive step (one LSB).
    pub const EPSILON: Fixed = Fixed(1);

    /// Wrap a raw register value, saturating to the 18-bit range.
    pub const fn from_raw(raw: i32) -> Self {
        if raw > Self::RAW_MAX {
            Self::MAX
        } else if raw < Self::RAW_MIN {
            Self::MIN
        } else {
            Fixed(raw)
        }
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    fn saturate(v: i128) -> Self {
        Fixed(v.clamp(Self::RAW_MIN as i128, Self::RAW_MAX as i128) as i32)
    }

    pub fn from_int(n: i32) -> Self {
        Self::saturate((n as i128) << Self::FRAC_BITS)
    }

    /// Convert from f64, rounding to nearest. NaN maps to zero.
    pub fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            return Self::ZERO;
        }
        Self::saturate((v * Self::SCALE as f64).round() as i128)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn abs(self) -> Self {
        Self::saturate((self.0 as i128).abs())
    }

    pub fn signum(self) -> i32 {
        self.0.signum()
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by an integer, saturating.
    pub fn mul_int(self, k: i32) -> Self {
        Self::saturate(self.0 as i128 * k as i128)
    }

    /// Arithmetic right shift (floor), i.e. divide by 2^k.
    pub fn shr(self, k: u32) -> Self {
        Fixed(self.0 >> k.min(31))
    }

    /// Square root of a non-negative value; negative inputs give zero.
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        let scaled = (self.0 as u64) << Self::FRAC_BITS;
        Self::saturate(isqrt_u64(scaled) as i128)
    }

    /// Linear interpolation `self + (other - self) * t`, `t` in [0, 1].
    pub fn lerp(self, other: Fixed, t: Fixed) -> Self {
        self + (other - self) * t
    }
}

impl Add for Fixed {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::saturate(self.0 as i128 + rhs.0 as i128)
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::saturate(self.0 as i128 - rhs.0 as i128)
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Self;
    fn neg(self) -> Self {
        Self::saturate(-(self.0 as i128))
    }
}

impl Mul for Fixed {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let product = self.0 as i128 * rhs.0 as i128;
        Self::saturate(round_shift(product, Self::FRAC_BITS))
    }
}

impl Div for Fixed {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return if self.0 >= 0 { Self::MAX } else { Self::MIN };
        }
        let numerator = (self.0 as i128) << Self::FRAC_BITS;
        Self::saturate(numerator / rhs.0 as i128)
    }
}

/// Raw register value; out-of-range input saturates.
impl From<i32> for Fixed {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Fixed> for i32 {
    fn from(f: Fixed) -> i32 {
        f.0
    }
}

impl Sum for Fixed {
    fn sum<I: Iterator<Item = Fixed>>(iter: I) -> Self {
        iter.fold(Fixed::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}", self.to_f64())
    }
}

// ─── Wide (Q28) ─────────────────────────────────────────────────────

/// Q28 accumulator for exact products and high-resolution registers.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Wide(i64);

impl Wide {
    pub const FRAC_BITS: u32 = 28;
    pub const SCALE: i64 = 1 << Self::FRAC_BITS;

    pub const ZERO: Wide = Wide(0);
    pub const ONE: Wide = Wide(Self::SCALE);

    pub const fn from_raw(raw: i64) -> Self {
        Wide(raw)
    }

    #[inline]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Lossless widening of a Q14 value.
    pub fn from_fixed(f: Fixed) -> Self {
        Wide((f.raw() as i64) << (Self::FRAC_BITS - Fixed::FRAC_BITS))
    }

    /// Convert from f64, rounding to nearest. NaN maps to zero.
    pub fn from_f64(v: f64) -> Self {
        if v.is_nan() {
            return Self::ZERO;
        }
        Wide(saturate_i64((v * Self::SCALE as f64).round() as i128))
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Exact product of two Q14 values.
    #[inline]
    pub fn product(a: Fixed, b: Fixed) -> Self {
        Wide(a.raw() as i64 * b.raw() as i64)
    }

    /// `self * f`, keeping Q28.
    pub fn mul_fixed(self, f: Fixed) -> Self {
        let p = self.0 as i128 * f.raw() as i128;
        Wide(saturate_i64(round_shift(p, Fixed::FRAC_BITS)))
    }

    /// `self * other`, keeping Q28.
    pub fn mul_wide(self, other: Wide) -> Self {
        let p = self.0 as i128 * other.0 as i128;
        Wide(saturate_i64(round_shift(p, Self::FRAC_BITS)))
    }

    /// `self / other` in Q28; division by zero saturates by sign.
    pub fn div_wide(self, other: Wide) -> Self {
        if other.0 == 0 {
            return if self.0 >= 0 {
                Wide(i64::MAX)
            } else {
                Wide(i64::MIN)
            };
        }
        let numerator = (self.0 as i128) << Self::FRAC_BITS;
        Wide(saturate_i64(numerator / other.0 as i128))
    }

    /// Rounded arithmetic right shift, i.e. multiply by 2^-k.
    pub fn shr(self, k: u32) -> Self {
        Wide(saturate_i64(round_shift(self.0 as i128, k.min(62))))
    }

    /// Round to Q14 and saturate to the 18-bit register range.
    pub fn narrow(self) -> Fixed {
        Fixed::saturate(round_shift(
            self.0 as i128,
            Self::FRAC_BITS - Fixed::FRAC_BITS,
        ))
    }

    /// Square root of a Q28 value returned in Q14; negative gives zero.
    pub fn isqrt(self) -> Fixed {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        Fixed::saturate(isqrt_u64(self.0 as u64) as i128)
    }

    pub fn abs(self) -> Self {
        Wide(self.0.saturating_abs())
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Wide {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Wide(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Wide {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Wide {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Wide(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Wide {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Wide {
    type Output = Self;
    fn neg(self) -> Self {
        Wide(self.0.saturating_neg())
    }
}

impl Sum for Wide {
    fn sum<I: Iterator<Item = Wide>>(iter: I) -> Self {
        iter.fold(Wide::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Wide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.9}", self.to_f64())
    }
}
