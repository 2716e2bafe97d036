//! # JSON payload codec.
//!
//! A pure serialization shim for job payloads: an encode/decode pair over
//! JSON, with no bearing on the supervision logic. Layer it into a
//! [`Connector`](crate::Connector)/[`BrokerHandle`](crate::BrokerHandle)
//! implementation to exchange structured payloads with clients.
//!
//! The codec additionally understands fixed-point decimal values:
//! [`Decimal`] serializes as its **exact** numeric literal (the crate is
//! built with serde_json's `arbitrary_precision` feature), never as a
//! lossy float. `Decimal::new("1.10")` encodes to the bytes `1.10` and
//! survives a decode round trip unchanged.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CodecError;

/// Encodes a payload value to JSON bytes.
///
/// # Example
/// ```
/// let bytes = gearpool::encode(&serde_json::json!({"order": 42})).unwrap();
/// assert_eq!(bytes, br#"{"order":42}"#);
/// ```
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(value)?)
}

/// Decodes a payload value from JSON bytes.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// A fixed-point decimal carried through JSON by its exact textual
/// representation.
///
/// Stored as the validated literal, so `1.10` stays `1.10` — it is never
/// routed through an `f64`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal {
    repr: Box<str>,
}

impl Decimal {
    /// Creates a decimal from its textual representation.
    ///
    /// The text must be a valid JSON number literal (`-12.50`, `3e-7`, ...).
    ///
    /// # Example
    /// ```
    /// use gearpool::Decimal;
    ///
    /// let price = Decimal::new("19.90").unwrap();
    /// assert_eq!(price.as_str(), "19.90");
    /// assert!(Decimal::new("1.2.3").is_err());
    /// ```
    pub fn new(repr: impl Into<String>) -> Result<Self, CodecError> {
        let repr = repr.into();
        if serde_json::from_str::<serde_json::Number>(&repr).is_err() {
            return Err(CodecError::Decimal { repr });
        }
        Ok(Self { repr: repr.into() })
    }

    /// Returns the exact textual representation.
    pub fn as_str(&self) -> &str {
        &self.repr
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Validated at construction; with arbitrary_precision the parsed
        // number keeps the literal text verbatim.
        let number: serde_json::Number =
            serde_json::from_str(&self.repr).map_err(serde::ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        Ok(Self {
            repr: number.to_string().into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_encodes_to_exact_literal() {
        let d = Decimal::new("1.10").unwrap();
        assert_eq!(encode(&d).unwrap(), b"1.10");
    }

    #[test]
    fn test_decimal_round_trips_unchanged() {
        let d = Decimal::new("-0.050").unwrap();
        let bytes = encode(&d).unwrap();
        let back: Decimal = decode(&bytes).unwrap();
        assert_eq!(back, d);
        assert_eq!(back.as_str(), "-0.050");
    }

    #[test]
    fn test_decimal_precision_beyond_f64_is_preserved() {
        let repr = "0.10000000000000000000000000001";
        let d = Decimal::new(repr).unwrap();
        let bytes = encode(&d).unwrap();
        assert_eq!(bytes, repr.as_bytes());
        let back: Decimal = decode(&bytes).unwrap();
        assert_eq!(back.as_str(), repr);
    }

    #[test]
    fn test_decimal_rejects_non_numeric_literals() {
        for bad in ["abc", "1.2.3", "+1", "1.", "", "0x10"] {
            assert!(Decimal::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_decimal_nests_in_structured_payloads() {
        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Invoice {
            id: u32,
            total: Decimal,
        }

        let invoice = Invoice {
            id: 7,
            total: Decimal::new("1299.00").unwrap(),
        };
        let bytes = encode(&invoice).unwrap();
        assert_eq!(bytes, br#"{"id":7,"total":1299.00}"#);
        let back: Invoice = decode(&bytes).unwrap();
        assert_eq!(back, invoice);
    }

    #[test]
    fn test_decode_rejects_malformed_payloads() {
        let err = decode::<serde_json::Value>(b"{not json").unwrap_err();
        assert_eq!(err.as_label(), "codec_json");
    }
}
