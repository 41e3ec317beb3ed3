//! 96-bit entity identifiers rendered as 24 lowercase hex characters.
//!
//! Layout: 4-byte big-endian unix seconds, 5 random bytes fixed for the
//! process, 3-byte big-endian counter.

use std::fmt;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

pub const OBJECT_ID_LEN: usize = 24;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid identifier")]
pub struct InvalidObjectId(pub String);

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

impl ObjectId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp() as u32;
        let random = PROCESS_UNIQUE.get_or_init(|| {
            let mut bytes = [0u8; 5];
            rand::thread_rng().fill(&mut bytes);
            bytes
        });
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..0x00ff_ffff)))
            .fetch_add(1, Ordering::Relaxed);

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(random);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Parses a 24-character hex token, accepting either case.
    pub fn parse(raw: &str) -> Result<Self, InvalidObjectId> {
        if raw.len() != OBJECT_ID_LEN {
            return Err(InvalidObjectId(raw.to_owned()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(raw, &mut bytes).map_err(|_| InvalidObjectId(raw.to_owned()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a new identifier in its stored string form.
pub fn new_id() -> String {
    ObjectId::new().to_hex()
}

/// Validates and normalises a caller supplied identifier.
pub fn normalize(raw: &str) -> Result<String, InvalidObjectId> {
    ObjectId::parse(raw).map(|id| id.to_hex())
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}
