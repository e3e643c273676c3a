//! Platform authority wallet and transaction signing.
//!
//! # Security
//! - Keypairs are loaded ONLY from environment variables
//! - Secret bytes are never logged or serialized
//! - The wallet is optional; without it the platform only builds
//!   unsigned transactions for donors to sign

use ed25519_dalek::{Signature, Signer, SigningKey, KEYPAIR_LENGTH, SECRET_KEY_LENGTH};

use crate::solana::pubkey::Pubkey;
use crate::solana::types::{SolanaError, SolanaResult};

/// Environment variable holding the authority keypair.
pub const AUTHORITY_KEYPAIR_ENV_VAR: &str = "CHARITY_AUTHORITY_KEYPAIR";

/// Signing wallet for platform-initiated transfers (zakat distribution).
#[derive(Clone)]
pub struct Wallet {
    keypair: SigningKey,
    pubkey: Pubkey,
}

impl Wallet {
    /// Create a wallet from a 32-byte secret or a 64-byte keypair
    /// (secret followed by public key).
    pub fn from_secret_bytes(bytes: &[u8]) -> SolanaResult<Self> {
        let keypair = match bytes.len() {
            SECRET_KEY_LENGTH => {
                let secret: [u8; SECRET_KEY_LENGTH] = bytes
                    .try_into()
                    .map_err(|_| SolanaError::Wallet("Invalid secret key".to_string()))?;
                SigningKey::from_bytes(&secret)
            }
            KEYPAIR_LENGTH => {
                let pair: [u8; KEYPAIR_LENGTH] = bytes
                    .try_into()
                    .map_err(|_| SolanaError::Wallet("Invalid keypair".to_string()))?;
                SigningKey::from_keypair_bytes(&pair)
                    .map_err(|e| SolanaError::Wallet(format!("Invalid keypair: {}", e)))?
            }
            n => {
                return Err(SolanaError::Wallet(format!(
                    "Invalid keypair length: expected {} or {} bytes, got {}",
                    SECRET_KEY_LENGTH, KEYPAIR_LENGTH, n
                )))
            }
        };

        let pubkey = Pubkey::new(keypair.verifying_key().to_bytes());
        Ok(Self { keypair, pubkey })
    }

    /// Parse a keypair written as comma-separated bytes, with or without
    /// surrounding brackets (`[12,34,...]`, the CLI keypair file format).
    pub fn from_keypair_string(raw: &str) -> SolanaResult<Self> {
        let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
        let bytes = trimmed
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| SolanaError::Wallet(format!("Invalid keypair format: {}", e)))?;

        let wallet = Self::from_secret_bytes(&bytes)?;
        tracing::info!(address = %wallet.pubkey, "Authority wallet initialized");
        Ok(wallet)
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `CHARITY_AUTHORITY_KEYPAIR` from environment.
    pub fn from_env() -> SolanaResult<Self> {
        let raw = std::env::var(AUTHORITY_KEYPAIR_ENV_VAR).map_err(|_| {
            SolanaError::Wallet(format!(
                "Environment variable {} not set",
                AUTHORITY_KEYPAIR_ENV_VAR
            ))
        })?;

        Self::from_keypair_string(&raw)
    }

    /// The wallet's public address.
    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    pub(crate) fn keypair(&self) -> &SigningKey {
        &self.keypair
    }

    /// Sign arbitrary message bytes.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        self.keypair.sign(message)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet").field("pubkey", &self.pubkey).finish()
    }
}
