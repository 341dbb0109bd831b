//! AES-256-GCM authenticated encryption
//!
//! Token format: `nonce (12 bytes) || ciphertext || auth tag (16 bytes)`,
//! stored as a single opaque blob. Everything needed for decryption except
//! the key travels inside the token.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use super::MasterKey;
use crate::error::{Result, VaultError};

/// Nonce length in bytes (96 bits, standard for GCM)
pub const NONCE_LEN: usize = 12;

/// Auth tag length in bytes (128 bits)
pub const TAG_LEN: usize = 16;

/// Encrypt plaintext using AES-256-GCM
///
/// A fresh random nonce is generated per call, so encrypting the same
/// plaintext twice yields different tokens.
pub fn encrypt(key: &MasterKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionError(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    // aes-gcm appends the auth tag to the ciphertext
    let ciphertext_with_tag = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| VaultError::EncryptionError(e.to_string()))?;

    let mut token = Vec::with_capacity(NONCE_LEN + ciphertext_with_tag.len());
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext_with_tag);
    Ok(token)
}

/// Decrypt a token produced by [`encrypt`]
///
/// Fails with [`VaultError::MalformedToken`] when the token is structurally
/// invalid, and [`VaultError::Authentication`] when the auth tag does not
/// verify under `key`. Tampering and wrong key are indistinguishable to the
/// caller.
pub fn decrypt(key: &MasterKey, token: &[u8]) -> Result<Vec<u8>> {
    if token.len() < NONCE_LEN + TAG_LEN {
        return Err(VaultError::MalformedToken(format!(
            "token too short: {} bytes, need at least {}",
            token.len(),
            NONCE_LEN + TAG_LEN
        )));
    }

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionError(e.to_string()))?;

    let (nonce_bytes, ciphertext_with_tag) = token.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext_with_tag)
        .map_err(|_| VaultError::Authentication)
}

/// Encrypt a string secret into a token
pub fn encrypt_string(key: &MasterKey, plaintext: &str) -> Result<Vec<u8>> {
    encrypt(key, plaintext.as_bytes())
}

/// Decrypt a token back to a string secret
pub fn decrypt_string(key: &MasterKey, token: &[u8]) -> Result<String> {
    let plaintext = decrypt(key, token)?;
    String::from_utf8(plaintext)
        .map_err(|e| VaultError::MalformedToken(format!("invalid UTF-8 plaintext: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> MasterKey {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        MasterKey::new(bytes)
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = b"Hello, World!";

        let token = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &token).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let key = test_key();

        let token = encrypt(&key, b"").unwrap();
        assert_eq!(token.len(), NONCE_LEN + TAG_LEN);

        let decrypted = decrypt(&key, &token).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_string_roundtrip() {
        let key = test_key();
        let plaintext = "p@ssw0rd!";

        let token = encrypt_string(&key, plaintext).unwrap();
        let decrypted = decrypt_string(&key, &token).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_same_plaintext_different_tokens() {
        let key = test_key();
        let plaintext = b"same plaintext";

        let token1 = encrypt(&key, plaintext).unwrap();
        let token2 = encrypt(&key, plaintext).unwrap();

        // Random nonces make equal inputs produce distinct tokens
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let key1 = test_key();
        let key2 = test_key();
        let token = encrypt(&key1, b"secret data").unwrap();

        match decrypt(&key2, &token) {
            Err(VaultError::Authentication) => {}
            other => panic!("expected Authentication, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_any_flipped_bit_detected() {
        let key = test_key();
        let token = encrypt(&key, b"secret data").unwrap();

        for i in 0..token.len() {
            let mut tampered = token.clone();
            tampered[i] ^= 0x01;
            match decrypt(&key, &tampered) {
                Err(VaultError::Authentication) => {}
                other => panic!(
                    "bit flip at byte {} not detected, got {:?}",
                    i,
                    other.map(|_| ())
                ),
            }
        }
    }

    #[test]
    fn test_short_token_is_malformed() {
        let key = test_key();

        for token in [&b""[..], &[0u8; 11][..], &[0u8; 27][..]] {
            match decrypt(&key, token) {
                Err(VaultError::MalformedToken(_)) => {}
                other => panic!("expected MalformedToken, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_non_utf8_plaintext_surfaces_as_malformed() {
        let key = test_key();
        let token = encrypt(&key, &[0xff, 0xfe, 0xfd]).unwrap();

        assert!(matches!(
            decrypt_string(&key, &token),
            Err(VaultError::MalformedToken(_))
        ));
    }
}
