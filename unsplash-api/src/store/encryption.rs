//! AES-256-GCM encryption for values persisted at rest.
//!
//! The key is a 32-byte key provided as a hex-encoded string (64 characters).
//! Each sealed value is `base64(nonce || ciphertext)` with a fresh random nonce.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::Rng;

use crate::error::{storage_error, Error, ErrorKind, StorageErrorKind};

/// 12-byte nonce size for AES-GCM
const NONCE_SIZE: usize = 12;

fn encryption_err() -> Error {
    ErrorKind::Storage(StorageErrorKind::EncryptionFailed).into()
}

fn decryption_err() -> Error {
    ErrorKind::Storage(StorageErrorKind::DecryptionFailed).into()
}

/// Symmetric cipher for individual stored values.
#[derive(Clone)]
pub struct ValueCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for ValueCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCipher").finish_non_exhaustive()
    }
}

impl ValueCipher {
    /// Build a cipher from a hex-encoded 32-byte key.
    pub fn from_hex(key_hex: &str) -> Result<Self, Error> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|e| storage_error(StorageErrorKind::EncryptionFailed, e))?;
        if bytes.len() != 32 {
            return Err(encryption_err());
        }
        let cipher = Aes256Gcm::new_from_slice(&bytes).map_err(|_| encryption_err())?;
        Ok(Self { cipher })
    }

    /// Encrypt `plaintext`, returning base64 of nonce + ciphertext.
    pub fn seal(&self, plaintext: &str) -> Result<String, Error> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| encryption_err())?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);

        Ok(BASE64.encode(combined))
    }

    /// Decrypt a value produced by [`ValueCipher::seal`].
    pub fn open(&self, sealed: &str) -> Result<String, Error> {
        let combined = BASE64
            .decode(sealed)
            .map_err(|e| storage_error(StorageErrorKind::DecryptionFailed, e))?;

        if combined.len() < NONCE_SIZE {
            return Err(decryption_err());
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| decryption_err())?;

        String::from_utf8(plaintext)
            .map_err(|e| storage_error(StorageErrorKind::DecryptionFailed, e))
    }
}
