//! Cantidades enteras exactas (lovelace y unidades de tokens nativos).
//!
//! Todo monto se representa como entero de precisión arbitraria. Nunca se
//! pasa por `f64`: el parser rechaza literales con punto o exponente y la
//! conversión ADA ↔ lovelace opera sobre dígitos.
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use serde::{Serialize, Serializer};

use crate::DomainError;

/// 1 ADA = 1_000_000 lovelace.
pub const LOVELACE_PER_ADA: u64 = 1_000_000;
const ADA_DECIMALS: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(BigInt);

impl Quantity {
    pub fn zero() -> Self {
        Self(BigInt::default())
    }

    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    /// Convierte un monto en ADA escrito en decimal ("12.5", "0.000001") a
    /// lovelace. Más de 6 decimales es un error, no un redondeo.
    pub fn from_ada_str(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        let whole_ok = !whole.is_empty() && whole.bytes().all(|b| b.is_ascii_digit());
        let frac_ok = frac.len() <= ADA_DECIMALS && frac.bytes().all(|b| b.is_ascii_digit());
        if !whole_ok || !frac_ok || (trimmed.ends_with('.')) {
            return Err(DomainError::InvalidQuantity(raw.to_string()));
        }
        let digits = format!("{whole}{frac:0<width$}", width = ADA_DECIMALS);
        digits.parse()
    }

    /// Representación en ADA con exactamente 6 decimales.
    pub fn to_ada_string(&self) -> String {
        let digits = self.0.magnitude().to_string();
        let padded = format!("{digits:0>width$}", width = ADA_DECIMALS + 1);
        let (whole, frac) = padded.split_at(padded.len() - ADA_DECIMALS);
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{sign}{whole}.{frac}")
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    /// Acepta sólo enteros en base 10 con signo opcional.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let body = raw.strip_prefix('-').unwrap_or(raw);
        if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidQuantity(raw.to_string()));
        }
        BigInt::parse_bytes(raw.as_bytes(), 10).map(Quantity)
                                               .ok_or_else(|| DomainError::InvalidQuantity(raw.to_string()))
    }
}

impl From<u64> for Quantity {
    fn from(v: u64) -> Self {
        Self(BigInt::from(v))
    }
}

impl From<BigInt> for Quantity {
    fn from(v: BigInt) -> Self {
        Self(v)
    }
}

impl Add for Quantity {
    type Output = Quantity;
    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Quantity> for &'a Quantity {
    type Output = Quantity;
    fn add(self, rhs: &'a Quantity) -> Quantity {
        Quantity(&self.0 + &rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Quantity;
    fn sub(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 - rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Se serializa como número JSON literal (serde_json con arbitrary_precision).
impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = serde_json::Number::from_str(&self.0.to_string()).map_err(serde::ser::Error::custom)?;
        number.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers_beyond_u64() {
        let q: Quantity = "45000000000000000000001".parse().unwrap();
        assert_eq!(q.to_string(), "45000000000000000000001");
    }

    #[test]
    fn rejects_floats_and_exponents() {
        assert!("1.0".parse::<Quantity>().is_err());
        assert!("1e6".parse::<Quantity>().is_err());
        assert!("".parse::<Quantity>().is_err());
        assert!("-".parse::<Quantity>().is_err());
    }

    #[test]
    fn ada_conversion_is_exact() {
        assert_eq!(Quantity::from_ada_str("12.5").unwrap(), Quantity::from(12_500_000u64));
        assert_eq!(Quantity::from_ada_str("0.000001").unwrap(), Quantity::from(1u64));
        assert_eq!(Quantity::from_ada_str("3").unwrap(), Quantity::from(3_000_000u64));
        assert!(Quantity::from_ada_str("0.0000001").is_err(), "más de 6 decimales no se redondea");
        assert!(Quantity::from_ada_str("1.").is_err());
        assert_eq!(Quantity::from(1u64).to_ada_string(), "0.000001");
        assert_eq!(Quantity::from(12_500_000u64).to_ada_string(), "12.500000");
    }

    #[test]
    fn serializes_as_json_number() {
        let q: Quantity = "18446744073709551617".parse().unwrap();
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v.to_string(), "18446744073709551617");
    }
}
