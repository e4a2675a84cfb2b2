//! Identity types for HANDOVER entities

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::IdError;

/// Stable external identifier carried by every change duty.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// A 12-byte object identifier, written as 24 hexadecimal characters.
///
/// Caregiver and user references are stored in this encoding. Client
/// references come from a different subsystem and are never checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; ObjectId::LEN]);

impl ObjectId {
    /// Number of raw bytes in an object id.
    pub const LEN: usize = 12;

    /// Number of characters in the hex encoding.
    pub const HEX_LEN: usize = Self::LEN * 2;

    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Parse the 24-character hex form. Upper and lower case are accepted.
    pub fn parse_hex(value: &str) -> Result<Self, IdError> {
        if value.len() != Self::HEX_LEN {
            return Err(IdError::InvalidObjectId {
                value: value.to_string(),
                reason: format!("expected {} characters, got {}", Self::HEX_LEN, value.len()),
            });
        }

        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(value, &mut bytes).map_err(|e| IdError::InvalidObjectId {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> [u8; Self::LEN] {
        self.0
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

/// Structural validity check used to classify reference ids.
pub fn is_valid_object_id(value: &str) -> bool {
    ObjectId::parse_hex(value).is_ok()
}
