//! Transaction building and wire encoding.
//!
//! # Responsibilities
//! - Build system transfers, SPL token transfers and associated token
//!   account creation instructions
//! - Compile instructions into a legacy message (account ordering, header)
//! - Encode transactions in the cluster's wire format for wallet signing
//!
//! # Wire format
//! ```text
//! transaction = shortvec(signatures) ‖ signature[64]* ‖ message
//! message     = header[3] ‖ shortvec(keys) ‖ key[32]* ‖ blockhash[32]
//!               ‖ shortvec(instructions) ‖ instruction*
//! instruction = program_idx ‖ shortvec(accounts) ‖ idx* ‖ shortvec(data) ‖ data
//! ```

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::Signer;
use serde::Serialize;

use crate::solana::pubkey::{
    Pubkey, ASSOCIATED_TOKEN_PROGRAM_ID, PUBKEY_BYTES, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
use crate::solana::types::{SolanaError, SolanaResult};
use crate::solana::wallet::Wallet;

/// Byte length of an ed25519 signature.
pub const SIGNATURE_BYTES: usize = 64;

/// An account referenced by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self { pubkey, is_signer, is_writable: true }
    }

    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self { pubkey, is_signer, is_writable: false }
    }
}

/// A single program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// System program transfer of `lamports` from `from` to `to`.
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    // SystemInstruction::Transfer is variant 2, encoded as a little-endian u32.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&2u32.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

/// SPL token transfer of `amount` base units between token accounts.
pub fn token_transfer(source: &Pubkey, destination: &Pubkey, owner: &Pubkey, amount: u64) -> Instruction {
    // TokenInstruction::Transfer is tag 3.
    let mut data = Vec::with_capacity(9);
    data.push(3u8);
    data.extend_from_slice(&amount.to_le_bytes());

    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*source, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data,
    }
}

/// Create the associated token account `ata` of `owner` for `mint`, paid by `payer`.
pub fn create_associated_token_account(payer: &Pubkey, ata: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*ata, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: Vec::new(),
    }
}

/// Message header: how many keys sign and which are read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction with accounts replaced by indices into the key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled legacy message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions with `fee_payer` as the first signer.
    ///
    /// Keys are ordered: fee payer, writable signers, read-only signers,
    /// writable non-signers, read-only non-signers. Within a group keys keep
    /// first-seen order.
    pub fn compile(instructions: &[Instruction], fee_payer: &Pubkey, recent_blockhash: [u8; 32]) -> SolanaResult<Self> {
        let mut metas: Vec<AccountMeta> = vec![AccountMeta::new(*fee_payer, true)];
        let mut merge = |meta: AccountMeta| {
            if let Some(existing) = metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
                existing.is_signer |= meta.is_signer;
                existing.is_writable |= meta.is_writable;
            } else {
                metas.push(meta);
            }
        };
        for ix in instructions {
            for account in &ix.accounts {
                merge(*account);
            }
            merge(AccountMeta::new_readonly(ix.program_id, false));
        }

        let (payer, rest) = metas.split_at(1);
        let group = |signer: bool, writable: bool| {
            rest.iter()
                .filter(move |m| m.is_signer == signer && m.is_writable == writable)
                .copied()
        };
        let ordered: Vec<AccountMeta> = payer
            .iter()
            .copied()
            .chain(group(true, true))
            .chain(group(true, false))
            .chain(group(false, true))
            .chain(group(false, false))
            .collect();

        if ordered.len() > u8::MAX as usize {
            return Err(SolanaError::Custom(format!("Too many accounts: {}", ordered.len())));
        }

        let count = |pred: &dyn Fn(&AccountMeta) -> bool| ordered.iter().filter(|m| pred(m)).count() as u8;
        let header = MessageHeader {
            num_required_signatures: count(&|m| m.is_signer),
            num_readonly_signed_accounts: count(&|m| m.is_signer && !m.is_writable),
            num_readonly_unsigned_accounts: count(&|m| !m.is_signer && !m.is_writable),
        };

        let account_keys: Vec<Pubkey> = ordered.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> SolanaResult<u8> {
            account_keys
                .iter()
                .position(|k| k == key)
                .map(|i| i as u8)
                .ok_or_else(|| SolanaError::Custom(format!("Account {key} missing from message")))
        };

        let compiled = instructions
            .iter()
            .map(|ix| {
                Ok(CompiledInstruction {
                    program_id_index: index_of(&ix.program_id)?,
                    accounts: ix
                        .accounts
                        .iter()
                        .map(|a| index_of(&a.pubkey))
                        .collect::<SolanaResult<Vec<u8>>>()?,
                    data: ix.data.clone(),
                })
            })
            .collect::<SolanaResult<Vec<_>>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// Encode the message in wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + 1 + self.account_keys.len() * PUBKEY_BYTES + 32 + 64);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_length(&mut out, self.account_keys.len());
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(&self.recent_blockhash);

        encode_length(&mut out, self.instructions.len());
        for ix in &self.instructions {
            out.push(ix.program_id_index);
            encode_length(&mut out, ix.accounts.len());
            out.extend_from_slice(&ix.accounts);
            encode_length(&mut out, ix.data.len());
            out.extend_from_slice(&ix.data);
        }
        out
    }

    /// Keys that must sign, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.header.num_required_signatures as usize]
    }
}

/// A transaction: a message plus one signature slot per required signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; SIGNATURE_BYTES]>,
    pub message: Message,
}

impl Transaction {
    /// Build an unsigned transaction (all signature slots zeroed).
    pub fn new_unsigned(message: Message) -> Self {
        let slots = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![[0u8; SIGNATURE_BYTES]; slots],
            message,
        }
    }

    /// Fill the signature slot belonging to `wallet`.
    pub fn sign(&mut self, wallet: &Wallet) -> SolanaResult<()> {
        let signer = wallet.pubkey();
        let index = self
            .message
            .signer_keys()
            .iter()
            .position(|k| *k == signer)
            .ok_or_else(|| SolanaError::Wallet(format!("{signer} is not a signer of this transaction")))?;

        let signature = wallet.keypair().sign(&self.message.serialize());
        self.signatures[index] = signature.to_bytes();
        Ok(())
    }

    /// Whether every signature slot is filled.
    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(|s| s.iter().any(|b| *b != 0))
    }

    /// First signature in base58, which is the transaction id.
    pub fn signature(&self) -> Option<String> {
        self.signatures.first().map(|s| bs58::encode(s).into_string())
    }

    /// Encode the transaction in wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let message = self.message.serialize();
        let mut out = Vec::with_capacity(1 + self.signatures.len() * SIGNATURE_BYTES + message.len());
        encode_length(&mut out, self.signatures.len());
        for signature in &self.signatures {
            out.extend_from_slice(signature);
        }
        out.extend_from_slice(&message);
        out
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.serialize())
    }
}

/// An unsigned transaction ready to hand to a wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedTransaction {
    /// Base64 wire transaction with empty signature slots.
    pub transaction: String,
    /// Base64 message, the bytes a wallet signs.
    pub message: String,
    pub recent_blockhash: String,
    pub fee_payer: Pubkey,
    pub signers: Vec<Pubkey>,
    pub instruction_count: usize,
}

impl PreparedTransaction {
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            transaction: tx.to_base64(),
            message: BASE64.encode(tx.message.serialize()),
            recent_blockhash: bs58::encode(tx.message.recent_blockhash).into_string(),
            fee_payer: tx.message.account_keys[0],
            signers: tx.message.signer_keys().to_vec(),
            instruction_count: tx.message.instructions.len(),
        }
    }
}

/// Decode a base58 blockhash into its 32 bytes.
pub fn decode_blockhash(blockhash: &str) -> SolanaResult<[u8; 32]> {
    let bytes = bs58::decode(blockhash)
        .into_vec()
        .map_err(|e| SolanaError::Decode(format!("blockhash '{blockhash}': {e}")))?;
    bytes
        .try_into()
        .map_err(|_| SolanaError::Decode(format!("blockhash '{blockhash}' is not 32 bytes")))
}

/// Read the transaction id (first signature) from a base64 wire transaction.
pub fn signature_from_wire(encoded: &str) -> SolanaResult<String> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| SolanaError::Decode(format!("transaction is not base64: {e}")))?;
    let (count, offset) = decode_length(&bytes)?;
    if count == 0 {
        return Err(SolanaError::Decode("transaction has no signatures".to_string()));
    }
    let signature = bytes
        .get(offset..offset + SIGNATURE_BYTES)
        .ok_or_else(|| SolanaError::Decode("transaction truncated".to_string()))?;
    if signature.iter().all(|b| *b == 0) {
        return Err(SolanaError::Custom("Transaction is not signed".to_string()));
    }
    Ok(bs58::encode(signature).into_string())
}

/// Append a compact-u16 length.
fn encode_length(out: &mut Vec<u8>, len: usize) {
    let mut rem = len as u16;
    loop {
        let mut byte = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            out.push(byte);
            break;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

/// Read a compact-u16 length, returning it and the bytes consumed.
fn decode_length(bytes: &[u8]) -> SolanaResult<(usize, usize)> {
    let mut len = 0usize;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        len |= ((byte & 0x7f) as usize) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((len, i + 1));
        }
    }
    Err(SolanaError::Decode("invalid compact length".to_string()))
}
