// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential sealing for the Dukan commerce bot.
//!
//! Merchant gateway credentials are stored in the shops table sealed with
//! AES-256-GCM under a master key from configuration. The stored form is
//! `hex(nonce || ciphertext_with_tag)` so a single text column carries
//! everything needed to open it.

pub mod crypto;

use dukan_core::DukanError;

/// Seal a credential string for storage, returning `hex(nonce || ciphertext)`.
pub fn seal_to_hex(key: &[u8; 32], plaintext: &str) -> Result<String, DukanError> {
    let (ciphertext, nonce) = crypto::seal(key, plaintext.as_bytes())?;
    let mut combined = Vec::with_capacity(nonce.len() + ciphertext.len());
    combined.extend_from_slice(&nonce);
    combined.extend_from_slice(&ciphertext);
    Ok(hex::encode(combined))
}

/// Open a credential previously stored with [`seal_to_hex`].
pub fn open_from_hex(key: &[u8; 32], sealed_hex: &str) -> Result<String, DukanError> {
    let combined =
        hex::decode(sealed_hex).map_err(|e| DukanError::Vault(format!("bad hex: {e}")))?;
    if combined.len() < 12 {
        return Err(DukanError::Vault("sealed value too short".to_string()));
    }
    let (nonce_slice, ciphertext) = combined.split_at(12);
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(nonce_slice);

    let plaintext = crypto::open(key, &nonce, ciphertext)?;
    String::from_utf8(plaintext)
        .map_err(|_| DukanError::Vault("decrypted credential is not UTF-8".to_string()))
}
