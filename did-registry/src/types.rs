//! Core types shared by the registries and the governance engine.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Delegate type for keys that may sign on behalf of an identity.
pub const DELEGATE_VERI_KEY: &str = "veriKey";

/// Delegate type for keys that may authenticate as an identity.
pub const DELEGATE_SIG_AUTH: &str = "sigAuth";

/// Delegate type scoped to service-endpoint attributes.
pub const DELEGATE_SERVICE_ADMIN: &str = "serviceAdmin";

/// A 20-byte principal identifier.
///
/// Identities, owners, delegates and company admins are all addressed the
/// same way. The zero address is never a valid owner or grantee.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create an address from raw bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create an address with every byte set to `byte`.
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Raw bytes of the address.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Error parsing an [`Address`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    /// Wrong number of hex digits
    #[error("expected 40 hex digits, got {0}")]
    InvalidLength(usize),

    /// Non-hex characters
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 40 {
            return Err(AddressParseError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Category of a DID attribute, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    /// Service endpoints (`did/svc/*`, `serviceEndpoint`)
    Service,
    /// Public keys (`did/pub/*`)
    PublicKey,
    /// Anything else
    Other,
}

impl AttributeCategory {
    /// Classify an attribute name.
    pub fn of(name: &str) -> Self {
        if name.starts_with("did/svc/") || name == "serviceEndpoint" {
            Self::Service
        } else if name.starts_with("did/pub/") {
            Self::PublicKey
        } else {
            Self::Other
        }
    }

    /// Delegate type allowed to write attributes of this category, if any.
    pub fn scoped_delegate_type(&self) -> Option<&'static str> {
        match self {
            Self::Service => Some(DELEGATE_SERVICE_ADMIN),
            Self::PublicKey | Self::Other => None,
        }
    }
}

/// Kind of registry write a caller wants to author.
///
/// Used by capability queries so the governance engine can decide whether a
/// write would be accepted before attempting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationCategory {
    /// Transfer owner-of-record
    ChangeOwner,
    /// Set or revoke an attribute of the given category
    Attribute(AttributeCategory),
    /// Add or revoke a delegate grant
    Delegate,
    /// Register company metadata
    CompanyRegistration,
    /// Add or remove company admins
    CompanyAdmin,
    /// Publish a company's revocation pointer
    RevocationPointer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_and_parse() {
        let addr = Address::repeat_byte(0xab);
        let text = addr.to_string();
        assert_eq!(text, format!("0x{}", "ab".repeat(20)));
        assert_eq!(text.parse::<Address>().unwrap(), addr);
        assert_eq!("AB".repeat(20).parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn test_address_parse_errors() {
        assert_eq!(
            "0x1234".parse::<Address>(),
            Err(AddressParseError::InvalidLength(4))
        );
        assert!(matches!(
            "zz".repeat(20).parse::<Address>(),
            Err(AddressParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_address_serde_as_hex_string() {
        let addr = Address::repeat_byte(0x01);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "01".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_attribute_categories() {
        assert_eq!(
            AttributeCategory::of("did/svc/CredentialRevocationList"),
            AttributeCategory::Service
        );
        assert_eq!(AttributeCategory::of("serviceEndpoint"), AttributeCategory::Service);
        assert_eq!(
            AttributeCategory::of("did/pub/Secp256k1/veriKey/hex"),
            AttributeCategory::PublicKey
        );
        assert_eq!(AttributeCategory::of("otherAttribute"), AttributeCategory::Other);
        assert_eq!(
            AttributeCategory::Service.scoped_delegate_type(),
            Some(DELEGATE_SERVICE_ADMIN)
        );
        assert_eq!(AttributeCategory::Other.scoped_delegate_type(), None);
    }
}
