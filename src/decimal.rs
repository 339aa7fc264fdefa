use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use crate::errors::{LoanError, Result};

/// three-letter currency code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub const fn new(code: [u8; 3]) -> Self {
        CurrencyCode(code)
    }

    pub fn as_str(&self) -> &str {
        // constructor only accepts ascii uppercase
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for CurrencyCode {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
            return Err(LoanError::InvalidCurrencyCode {
                code: s.to_string(),
            });
        }
        Ok(CurrencyCode([bytes[0], bytes[1], bytes[2]]))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for CurrencyCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// currency with fixed decimal places and an in-multiples-of rounding rule
///
/// the multiple rule only applies when `decimal_places` is zero (cash-rounding
/// currencies); otherwise amounts round to `decimal_places` half-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub decimal_places: u32,
    pub in_multiples_of: u32,
}

impl Currency {
    pub const fn new(code: CurrencyCode, decimal_places: u32, in_multiples_of: u32) -> Self {
        Self {
            code,
            decimal_places,
            in_multiples_of,
        }
    }

    pub const fn usd() -> Self {
        Currency::new(CurrencyCode::new(*b"USD"), 2, 1)
    }

    pub const fn eur() -> Self {
        Currency::new(CurrencyCode::new(*b"EUR"), 2, 1)
    }

    /// zero-decimal currency rounded to whole units
    pub const fn jpy() -> Self {
        Currency::new(CurrencyCode::new(*b"JPY"), 0, 1)
    }

    /// scale a raw decimal to this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        let scaled = amount
            .round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointNearestEven);
        if self.decimal_places == 0 && self.in_multiples_of > 1 {
            let multiple = Decimal::from(self.in_multiples_of);
            (scaled / multiple)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                * multiple
        } else {
            scaled
        }
    }
}

/// immutable decimal amount bound to a currency
///
/// binary operators require identical currency code; public engine entry
/// points validate operands first and surface `CurrencyMismatch`, so the
/// operator-level assertion guards an already-checked invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// create from decimal, rounding to the currency's scale
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Money {
            amount: currency.round(amount),
            currency,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Money {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// create from whole currency units
    pub fn from_major(amount: i64, currency: Currency) -> Self {
        Money::new(Decimal::from(amount), currency)
    }

    pub fn from_str_exact(s: &str, currency: Currency) -> Result<Self> {
        let d = Decimal::from_str(s).map_err(|_| LoanError::InvalidAmount {
            amount: s.to_string(),
        })?;
        Ok(Money::new(d, currency))
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    pub fn min(self, other: Self) -> Self {
        self.assert_same_currency(&other);
        if self.amount <= other.amount {
            self
        } else {
            other
        }
    }

    pub fn max(self, other: Self) -> Self {
        self.assert_same_currency(&other);
        if self.amount >= other.amount {
            self
        } else {
            other
        }
    }

    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency.code == other.currency.code
    }

    /// boundary validation: identical currency or `CurrencyMismatch`
    pub fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.same_currency(other) {
            Ok(())
        } else {
            Err(LoanError::CurrencyMismatch {
                expected: self.currency.code,
                actual: other.currency.code,
            })
        }
    }

    fn assert_same_currency(&self, other: &Money) {
        assert!(
            self.same_currency(other),
            "currency mismatch: {} vs {}",
            self.currency.code,
            other.currency.code
        );
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency.code)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        self.assert_same_currency(&other);
        Money::new(self.amount + other.amount, self.currency)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        self.assert_same_currency(&other);
        Money::new(self.amount - other.amount, self.currency)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money {
            amount: -self.amount,
            currency: self.currency,
        }
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money::new(self.amount * other, self.currency)
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money::new(self.amount / other, self.currency)
    }
}

/// rate type for interest rates and ratios, stored as a fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// daily rate for the given year basis
    pub fn per_day(&self, year_basis: u32) -> Rate {
        Rate(self.0 / Decimal::from(year_basis))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_scale_on_construction() {
        let m = Money::new(dec!(100.567), Currency::usd());
        assert_eq!(m.amount(), dec!(100.57));

        // half-even at the midpoint
        let m = Money::new(dec!(2.125), Currency::usd());
        assert_eq!(m.amount(), dec!(2.12));
    }

    #[test]
    fn test_in_multiples_of_rounding() {
        let rupiah = Currency::new("IDR".parse().unwrap(), 0, 100);
        let m = Money::new(dec!(1049), rupiah);
        assert_eq!(m.amount(), dec!(1000));

        let m = Money::new(dec!(1051), rupiah);
        assert_eq!(m.amount(), dec!(1100));

        let m = Money::new(dec!(1150), rupiah);
        assert_eq!(m.amount(), dec!(1200)); // half-even to the even multiple
    }

    #[test]
    fn test_currency_mismatch_detected() {
        let usd = Money::from_major(10, Currency::usd());
        let eur = Money::from_major(10, Currency::eur());

        assert!(usd.ensure_same_currency(&eur).is_err());
        assert!(usd.ensure_same_currency(&usd).is_ok());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(10, Currency::usd());
        let b = Money::from_str_exact("2.50", Currency::usd()).unwrap();

        assert_eq!(
            a + b,
            Money::from_str_exact("12.50", Currency::usd()).unwrap()
        );
        assert_eq!(
            a - b,
            Money::from_str_exact("7.50", Currency::usd()).unwrap()
        );
        assert_eq!(a.min(b), b);
        assert_eq!(a.max(b), a);
        assert_eq!((-b).amount(), dec!(-2.50));
    }

    #[test]
    fn test_currency_code_parsing() {
        assert!("USD".parse::<CurrencyCode>().is_ok());
        assert!("usd".parse::<CurrencyCode>().is_err());
        assert!("USDX".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_rate_conversions() {
        let r = Rate::from_percentage(5);
        assert_eq!(r.as_decimal(), dec!(0.05));
        assert_eq!(Rate::from_bps(500), r);
        assert_eq!(r.per_day(365).as_decimal(), dec!(0.05) / dec!(365));
    }
}
