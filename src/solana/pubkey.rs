//! Public keys and program-derived addresses.
//!
//! A public key is 32 bytes, written as base58 text (32 to 44 characters).
//! Program-derived addresses are sha256 hashes that deliberately fall off
//! the ed25519 curve so no private key can exist for them.

use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::solana::types::{SolanaError, SolanaResult};

/// Byte length of a public key.
pub const PUBKEY_BYTES: usize = 32;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";
const MAX_SEED_LEN: usize = 32;
const MAX_SEEDS: usize = 16;

/// The native system program (`11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey([0; 32]);

/// The SPL token program (`TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`).
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133,
    237, 95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// The associated token account program
/// (`ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`).
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153, 218,
    255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

/// A 32-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pubkey(pub [u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Whether the key is a valid ed25519 point (i.e. could have a private key).
    pub fn is_on_curve(&self) -> bool {
        bytes_are_curve_point(&self.0)
    }

    /// Find a program-derived address and its bump seed.
    ///
    /// Tries bump seeds from 255 downwards and returns the first address
    /// that is off the curve.
    pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> SolanaResult<(Pubkey, u8)> {
        if seeds.len() >= MAX_SEEDS {
            return Err(SolanaError::Custom(format!("Too many seeds: {}", seeds.len())));
        }
        if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
            return Err(SolanaError::Custom(format!("Seed too long: {} bytes", seed.len())));
        }

        for bump in (0..=u8::MAX).rev() {
            let bump_seed = [bump];
            let mut hasher = Sha256::new();
            for seed in seeds {
                hasher.update(seed);
            }
            hasher.update(bump_seed);
            hasher.update(program_id.as_bytes());
            hasher.update(PDA_MARKER);
            let hash: [u8; PUBKEY_BYTES] = hasher.finalize().into();

            if !bytes_are_curve_point(&hash) {
                return Ok((Pubkey(hash), bump));
            }
        }

        Err(SolanaError::Custom("Unable to find a viable program address bump seed".to_string()))
    }
}

fn bytes_are_curve_point(bytes: &[u8; PUBKEY_BYTES]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Derive the associated token account of `owner` for `mint`.
pub fn get_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> SolanaResult<Pubkey> {
    Pubkey::find_program_address(
        &[owner.as_bytes(), TOKEN_PROGRAM_ID.as_bytes(), mint.as_bytes()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _)| address)
}

/// True iff `address` is base58 text decoding to exactly 32 bytes.
pub fn is_valid_public_key(address: &str) -> bool {
    address.parse::<Pubkey>().is_ok()
}

impl FromStr for Pubkey {
    type Err = SolanaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // 32 bytes never encode to more than 44 base58 characters.
        if s.is_empty() || s.len() > 44 {
            return Err(SolanaError::InvalidPublicKey(s.to_string()));
        }
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| SolanaError::InvalidPublicKey(s.to_string()))?;
        let bytes: [u8; PUBKEY_BYTES] = bytes
            .try_into()
            .map_err(|_| SolanaError::InvalidPublicKey(s.to_string()))?;
        Ok(Pubkey(bytes))
    }
}

impl TryFrom<&[u8]> for Pubkey {
    type Error = SolanaError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; PUBKEY_BYTES] = bytes
            .try_into()
            .map_err(|_| SolanaError::InvalidPublicKey(format!("{} bytes", bytes.len())))?;
        Ok(Pubkey(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
