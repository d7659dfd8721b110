//! 128-bit entity identifiers
//!
//! A [`Uid`] tags every population, projection, channel, and backend in a
//! network. Two constructors exist: [`Uid::nil`] (the all-zero sentinel
//! meaning "no entity") and [`Uid::fresh`] (unique within a process).

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque 128-bit identifier for a network entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Uid(u128);

impl Uid {
    /// The sentinel value meaning "no entity". Used as the logical sender
    /// for input projections and as a no-op target for the message fabric.
    pub const fn nil() -> Self {
        Self(0)
    }

    /// Generate a fresh, process-unique UID (backed by UUIDv4)
    pub fn fresh() -> Self {
        Self(uuid::Uuid::new_v4().as_u128())
    }

    /// Construct a UID from its raw 128-bit representation
    pub const fn from_u128(raw: u128) -> Self {
        Self(raw)
    }

    /// The raw 128-bit representation
    pub const fn as_u128(&self) -> u128 {
        self.0
    }

    /// `true` if this is the nil sentinel
    pub const fn is_nil(&self) -> bool {
        self.0 == 0
    }

    /// Big-endian byte representation, used by the binary wire envelope
    pub const fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Construct from a big-endian byte representation
    pub const fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }
}

impl Default for Uid {
    /// Defaults to the nil sentinel
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "uid:nil")
        } else {
            write!(f, "uid:{:032x}", self.0)
        }
    }
}
