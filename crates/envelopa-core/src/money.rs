//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  On a printed quote:                                                    │
//! │    R$ 10,00 / 3 = R$ 3,33 (×3 = R$ 9,99)  → Lost R$ 0,01!              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    1000 centavos / 3 = 333 centavos (×3 = 999 centavos)                │
//! │    We KNOW we lost 1 centavo, and handle it explicitly                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use envelopa_core::money::Money;
//!
//! // Create from centavos (preferred)
//! let price = Money::from_cents(1099); // R$ 10,99
//!
//! // Arithmetic operations
//! let doubled = price * 2;             // R$ 21,98
//! let total = price + Money::from_cents(500); // R$ 15,99
//!
//! // User-typed input goes through the lenient parser
//! let freight = Money::parse_lenient("15,00");
//! assert_eq!(freight.cents(), 1500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::units::{parse_decimal_subunits, Area, Percent, MM2_PER_M2};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in centavos (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Intermediate subtractions may dip negative before
///   the final clamp (subtotal − discount)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product price ──► Piece material subtotal ──┐                          │
/// │  Service price ──► Piece services subtotal ──┼──► subtotal             │
/// │                                              │                          │
/// │  subtotal ──► discount clamp ──► + freight ──► grand total             │
/// │                                                                         │
/// │  EVERY monetary value in the engine flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10,99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses user-typed currency text (comma or point separator).
    ///
    /// Freight, fixed-value discounts, and ad-hoc prices arrive as free
    /// text from the quote form. Malformed or negative input coerces to
    /// zero so a total can always be rendered.
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::money::Money;
    ///
    /// assert_eq!(Money::parse_lenient("15,00").cents(), 1500);
    /// assert_eq!(Money::parse_lenient("15.5").cents(), 1550);
    /// assert_eq!(Money::parse_lenient("").cents(), 0);
    /// assert_eq!(Money::parse_lenient("-5").cents(), 0);
    /// ```
    pub fn parse_lenient(text: &str) -> Self {
        Money(parse_decimal_subunits(text, 2))
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion.
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (centavos) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps negative values to zero.
    ///
    /// Used at the end of the totals pipeline: `subtotal − discount` is
    /// never allowed to go below zero before freight is added.
    #[inline]
    pub fn clamp_non_negative(&self) -> Self {
        Money(self.0.max(0))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(250); // R$ 2,50 per unit
    /// let line_total = unit_price.multiply_quantity(4);
    /// assert_eq!(line_total.cents(), 1000); // R$ 10,00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates a percentage of this amount.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5).
    /// i128 intermediate prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::money::Money;
    /// use envelopa_core::units::Percent;
    ///
    /// let subtotal = Money::from_cents(5000); // R$ 50,00
    /// let discount = subtotal.percent_of(Percent::from_bps(1000)); // 10%
    /// assert_eq!(discount.cents(), 500); // R$ 5,00
    /// ```
    pub fn percent_of(&self, rate: Percent) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Prices an area at this per-m² rate.
    ///
    /// ## Implementation
    /// Area is in mm², price is per m², so:
    /// `(price_cents × area_mm² + 500_000) / 1_000_000`
    /// with the +500_000 providing rounding, i128 against overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Service: "Aplicação" R$ 3,00/m²
    /// Piece area: 6.00 m²
    ///      │
    ///      ▼
    /// times_area(area) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Contribution: R$ 18,00
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::money::Money;
    /// use envelopa_core::units::{Area, Meters};
    ///
    /// let rate = Money::from_cents(300); // R$ 3,00 per m²
    /// let area = Area::of(Meters::from_millimeters(2000), Meters::from_millimeters(3000), 1);
    /// assert_eq!(rate.times_area(area).cents(), 1800);
    /// ```
    pub fn times_area(&self, area: Area) -> Money {
        let cents =
            (self.0 as i128 * area.square_millimeters() as i128 + MM2_PER_M2 as i128 / 2)
                / MM2_PER_M2 as i128;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R$ {},{:02}", sign, self.reais().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
