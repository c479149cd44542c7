use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;

use crate::error::Error;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Seals the SSO access token for custody in a client-side cookie.
///
/// AES-256-GCM with a random 12-byte nonce prepended to the ciphertext,
/// base64url-encoded. Decryption is authenticated: a tampered value or a
/// value sealed under a different key fails, it never yields a
/// wrong-but-plausible token.
#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl TokenCodec {
    /// Create a codec from a 32-byte key.
    #[must_use]
    pub fn new(key: [u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new((&key).into()),
        }
    }

    /// Create a codec from a hex-encoded 32-byte key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if the hex is invalid or the key length is
    /// not 32 bytes.
    pub fn from_hex(key_hex: &str) -> Result<Self, Error> {
        let bytes = hex::decode(key_hex).map_err(|e| Error::Codec(format!("invalid hex: {e}")))?;
        let key: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| Error::Codec(format!("key length {}, expected 32", b.len())))?;
        Ok(Self::new(key))
    }

    /// Create a codec with a fresh random key.
    ///
    /// Tokens sealed with it become unreadable when the process restarts,
    /// which simply forces re-login.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(rand::rng().random())
    }

    /// Encrypt an access token for cookie storage.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if encryption fails.
    pub fn encrypt(&self, token: &str) -> Result<String, Error> {
        let nonce_bytes: [u8; NONCE_LEN] = rand::rng().random();
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), token.as_bytes())
            .map_err(|_| Error::Codec("encryption failed".into()))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(out))
    }

    /// Decrypt a sealed access token from a cookie value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] on malformed input, a wrong key, or any
    /// tampering with the ciphertext.
    pub fn decrypt(&self, value: &str) -> Result<String, Error> {
        let raw = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|_| Error::Codec("invalid encoding".into()))?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(Error::Codec("ciphertext too short".into()));
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| Error::Codec("decryption failed".into()))?;

        String::from_utf8(plaintext).map_err(|_| Error::Codec("invalid UTF-8".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let codec = TokenCodec::generate();
        for token in ["", "t", "an-access-token", &"x".repeat(4096)] {
            assert_eq!(codec.decrypt(&codec.encrypt(token).unwrap()).unwrap(), token);
        }
    }

    #[test]
    fn ciphertexts_differ_per_call() {
        let codec = TokenCodec::generate();
        let a = codec.encrypt("token").unwrap();
        let b = codec.encrypt("token").unwrap();
        assert_ne!(a, b, "nonce must randomize the ciphertext");
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let codec = TokenCodec::generate();
        let sealed = codec.encrypt("token").unwrap();

        let mut raw = URL_SAFE_NO_PAD.decode(&sealed).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE_NO_PAD.encode(raw);

        assert!(codec.decrypt(&tampered).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let sealed = TokenCodec::new([1; 32]).encrypt("token").unwrap();
        assert!(TokenCodec::new([2; 32]).decrypt(&sealed).is_err());
    }

    #[test]
    fn garbage_input_fails() {
        let codec = TokenCodec::generate();
        assert!(codec.decrypt("").is_err());
        assert!(codec.decrypt("not base64 !!!").is_err());
        assert!(codec.decrypt("c2hvcnQ").is_err());
    }

    #[test]
    fn hex_key_parsing() {
        let key_hex = "00".repeat(32);
        let codec = TokenCodec::from_hex(&key_hex).unwrap();
        let sealed = codec.encrypt("token").unwrap();
        // Same key material, fresh codec: still decrypts.
        let codec2 = TokenCodec::from_hex(&key_hex).unwrap();
        assert_eq!(codec2.decrypt(&sealed).unwrap(), "token");

        assert!(TokenCodec::from_hex("zz").is_err());
        assert!(TokenCodec::from_hex(&"00".repeat(16)).is_err());
    }
}
