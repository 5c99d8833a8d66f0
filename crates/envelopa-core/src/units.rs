//! # Measurement Units
//!
//! Dimension, area, and percentage types used by the pricing engine.
//!
//! ## Why Integer Sub-Units?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM (again)                                     │
//! │                                                                         │
//! │  1.50m × 2.00m in f64 is fine... until 0.1 × 0.3 × price shows up      │
//! │  as R$ 0,0300000000000004 on a printed quote.                          │
//! │                                                                         │
//! │  OUR SOLUTION: integers all the way down                               │
//! │    Meters  → millimeters  (1.50 m  = 1500 mm)                          │
//! │    Area    → mm²          (3.00 m² = 3_000_000 mm²)                    │
//! │    Percent → basis points (10.5 %  = 1050 bps)                         │
//! │                                                                         │
//! │  Same strategy as Money (centavos). Division happens exactly once,     │
//! │  at pricing time, with explicit rounding.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Parsing
//! Every numeric field in the quoting UI is free text. The user types
//! `1,50` or `1.50` or leaves the field half-edited; the engine must always
//! be able to render a total. So all parsers here are total: malformed or
//! negative input coerces to zero (or one, for quantities), never errors.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Lenient Decimal Parsing
// =============================================================================

/// Parses decimal text into an integer number of sub-units.
///
/// `scale` is the number of decimal digits per whole unit (2 for centavos,
/// 3 for millimeters). Accepts either comma or point as the decimal
/// separator. Fractional digits beyond `scale` are truncated.
///
/// Coercion rules (total function, never errors):
/// - empty or whitespace-only text → 0
/// - any non-digit besides one separator → 0
/// - negative input cannot be expressed (`-` is a non-digit) → 0
pub(crate) fn parse_decimal_subunits(text: &str, scale: u32) -> i64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }

    let normalized = text.replace(',', ".");
    let mut parts = normalized.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next().unwrap_or("");

    // A second separator ends up inside frac_part and fails the digit check
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return 0;
    }

    let int_value: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().unwrap_or(0)
    };

    let mut frac_value: i64 = 0;
    for digit in frac_part.chars().take(scale as usize) {
        frac_value = frac_value * 10 + (digit as i64 - '0' as i64);
    }
    // Pad short fractions: "1.5" at scale 3 is 1500, not 1005
    let missing = scale as usize - frac_part.len().min(scale as usize);
    frac_value *= 10_i64.pow(missing as u32);

    int_value.saturating_mul(10_i64.pow(scale)) + frac_value
}

/// Parses a quantity field.
///
/// ## Rules
/// - Blank, malformed, or < 1 input coerces to 1 (the UI default on blur)
///
/// ## Example
/// ```rust
/// use envelopa_core::units::parse_quantity_lenient;
///
/// assert_eq!(parse_quantity_lenient("3"), 3);
/// assert_eq!(parse_quantity_lenient(""), 1);
/// assert_eq!(parse_quantity_lenient("abc"), 1);
/// assert_eq!(parse_quantity_lenient("0"), 1);
/// ```
pub fn parse_quantity_lenient(text: &str) -> i64 {
    match text.trim().parse::<i64>() {
        Ok(qty) if qty >= 1 => qty,
        _ => 1,
    }
}

// =============================================================================
// Meters
// =============================================================================

/// A linear dimension stored as integer millimeters.
///
/// Piece heights and widths are entered in meters with up to three decimal
/// places; anything finer than a millimeter is below cutting tolerance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, Default,
)]
#[ts(export)]
pub struct Meters(i64);

impl Meters {
    /// Creates a dimension from millimeters.
    #[inline]
    pub const fn from_millimeters(mm: i64) -> Self {
        Meters(mm)
    }

    /// Parses user-typed dimension text (meters, comma or point separator).
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::units::Meters;
    ///
    /// assert_eq!(Meters::parse_lenient("1,50").millimeters(), 1500);
    /// assert_eq!(Meters::parse_lenient("1.50").millimeters(), 1500);
    /// assert_eq!(Meters::parse_lenient("").millimeters(), 0);
    /// assert_eq!(Meters::parse_lenient("x").millimeters(), 0);
    /// ```
    pub fn parse_lenient(text: &str) -> Self {
        Meters(parse_decimal_subunits(text, 3))
    }

    /// Returns the dimension in millimeters.
    #[inline]
    pub const fn millimeters(&self) -> i64 {
        self.0
    }

    /// Zero dimension.
    #[inline]
    pub const fn zero() -> Self {
        Meters(0)
    }

    /// Checks if the dimension is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Area
// =============================================================================

/// A surface area stored as integer square millimeters.
///
/// ## Why mm²?
/// `height_mm × width_mm` is exact integer math. One m² = 1_000_000 mm²,
/// so dividing back out happens once, at pricing time, with explicit
/// rounding (see `Money::times_area`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS, Default,
)]
#[ts(export)]
pub struct Area(i64);

/// Square millimeters per square meter.
pub const MM2_PER_M2: i64 = 1_000_000;

impl Area {
    /// Computes the total area of a piece: `height × width × quantity`.
    ///
    /// Negative quantities are treated as zero. Saturates rather than
    /// overflowing on absurd dimensions.
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::units::{Area, Meters};
    ///
    /// // 1.50 m × 2.00 m × 3 pieces = 9.00 m² exactly
    /// let area = Area::of(
    ///     Meters::parse_lenient("1,50"),
    ///     Meters::parse_lenient("2,00"),
    ///     3,
    /// );
    /// assert_eq!(area.square_millimeters(), 9_000_000);
    /// ```
    pub fn of(height: Meters, width: Meters, quantity: i64) -> Self {
        let qty = quantity.max(0);
        Area(
            height
                .millimeters()
                .saturating_mul(width.millimeters())
                .saturating_mul(qty),
        )
    }

    /// Creates an area from square millimeters.
    #[inline]
    pub const fn from_square_millimeters(mm2: i64) -> Self {
        Area(mm2)
    }

    /// Returns the area in square millimeters.
    #[inline]
    pub const fn square_millimeters(&self) -> i64 {
        self.0
    }

    /// Returns the area in square meters (for display only).
    #[inline]
    pub fn square_meters(&self) -> f64 {
        self.0 as f64 / MM2_PER_M2 as f64
    }

    /// Zero area.
    #[inline]
    pub const fn zero() -> Self {
        Area(0)
    }

    /// Checks if the area is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1050 bps = 10.5% (a typical negotiated discount)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Default)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Parses user-typed percentage text (comma or point separator).
    ///
    /// Values above 100% are allowed here; the discount computation clamps
    /// the resulting amount to the subtotal, not the rate.
    ///
    /// ## Example
    /// ```rust
    /// use envelopa_core::units::Percent;
    ///
    /// assert_eq!(Percent::parse_lenient("10").bps(), 1000);
    /// assert_eq!(Percent::parse_lenient("10,5").bps(), 1050);
    /// assert_eq!(Percent::parse_lenient("-3").bps(), 0);
    /// assert_eq!(Percent::parse_lenient("").bps(), 0);
    /// ```
    pub fn parse_lenient(text: &str) -> Self {
        let bps = parse_decimal_subunits(text, 2).min(u32::MAX as i64);
        Percent(bps as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_comma_and_point() {
        assert_eq!(parse_decimal_subunits("1,50", 3), 1500);
        assert_eq!(parse_decimal_subunits("1.50", 3), 1500);
        assert_eq!(parse_decimal_subunits("1.5", 3), 1500);
        assert_eq!(parse_decimal_subunits("0,125", 3), 125);
        assert_eq!(parse_decimal_subunits("2", 3), 2000);
        assert_eq!(parse_decimal_subunits("  2,00  ", 3), 2000);
    }

    #[test]
    fn test_parse_decimal_truncates_excess_digits() {
        assert_eq!(parse_decimal_subunits("1,2345", 3), 1234);
        assert_eq!(parse_decimal_subunits("0,999", 2), 99);
    }

    #[test]
    fn test_parse_decimal_coerces_garbage_to_zero() {
        assert_eq!(parse_decimal_subunits("", 2), 0);
        assert_eq!(parse_decimal_subunits("   ", 2), 0);
        assert_eq!(parse_decimal_subunits("abc", 2), 0);
        assert_eq!(parse_decimal_subunits("1,5,0", 2), 0);
        assert_eq!(parse_decimal_subunits("1.5.0", 2), 0);
        assert_eq!(parse_decimal_subunits("-10", 2), 0);
        assert_eq!(parse_decimal_subunits("1e3", 2), 0);
    }

    #[test]
    fn test_parse_decimal_bare_separator() {
        assert_eq!(parse_decimal_subunits(",5", 2), 50);
        assert_eq!(parse_decimal_subunits(".", 2), 0);
        assert_eq!(parse_decimal_subunits(",", 2), 0);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity_lenient("4"), 4);
        assert_eq!(parse_quantity_lenient(" 12 "), 12);
        assert_eq!(parse_quantity_lenient(""), 1);
        assert_eq!(parse_quantity_lenient("0"), 1);
        assert_eq!(parse_quantity_lenient("-2"), 1);
        assert_eq!(parse_quantity_lenient("2,5"), 1);
    }

    #[test]
    fn test_area_formula_exact() {
        // The canonical example: 1.50 × 2.00 × 3 = 9.00 m² exactly
        let area = Area::of(
            Meters::parse_lenient("1,50"),
            Meters::parse_lenient("2,00"),
            3,
        );
        assert_eq!(area.square_millimeters(), 9 * MM2_PER_M2);
        assert!((area.square_meters() - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_zero_dimension_is_zero() {
        let area = Area::of(Meters::zero(), Meters::parse_lenient("2,00"), 3);
        assert!(area.is_zero());
    }

    #[test]
    fn test_area_negative_quantity_is_zero() {
        let area = Area::of(
            Meters::from_millimeters(1000),
            Meters::from_millimeters(1000),
            -1,
        );
        assert!(area.is_zero());
    }

    #[test]
    fn test_percent_parse() {
        assert_eq!(Percent::parse_lenient("10").bps(), 1000);
        assert_eq!(Percent::parse_lenient("8.25").bps(), 825);
        assert_eq!(Percent::parse_lenient("150").bps(), 15000); // over 100% allowed
        assert!((Percent::from_bps(825).percentage() - 8.25).abs() < 0.001);
    }
}
