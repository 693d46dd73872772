//! Envelope Module
//!
//! AES-256 in CFB (stream) or CBC (PKCS#7 padded block) mode with a fresh
//! random IV per call.

use std::fmt;
use std::str::FromStr;

use aes::cipher::{
    block_padding::Pkcs7, AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{IV_LEN, KEY_LEN};

type Aes256CfbEnc = cfb_mode::Encryptor<aes::Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<aes::Aes256>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

// == Crypto Error ==
/// Errors raised while sealing or opening a payload.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid key length: expected {KEY_LEN} bytes, got {0}")]
    KeyLength(usize),

    #[error("Ciphertext too short: {0} bytes is less than one cipher block")]
    MalformedCiphertext(usize),

    #[error("Ciphertext body of {0} bytes is not a whole number of blocks")]
    BlockAlignment(usize),

    #[error("Ciphertext is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("Invalid padding after decryption")]
    Padding,

    #[error("Decrypted payload is not valid UTF-8")]
    Utf8,

    #[error("Unknown cipher mode: {0}")]
    UnknownMode(String),

    #[error("Random number generation failed")]
    Rng,
}

// == Cipher Mode ==
/// Block cipher mode used by an [`Envelope`].
///
/// The two modes are not interoperable: data sealed in one mode can only be
/// opened in the same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherMode {
    /// Full-block cipher feedback, no padding
    Cfb,
    /// Cipher block chaining with PKCS#7 padding
    #[default]
    Cbc,
}

impl FromStr for CipherMode {
    type Err = CryptoError;

    /// Accepts `cfb`/`cbc` (any case) and the legacy numeric modes `0`/`1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cfb" | "0" => Ok(CipherMode::Cfb),
            "cbc" | "1" => Ok(CipherMode::Cbc),
            other => Err(CryptoError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherMode::Cfb => write!(f, "cfb"),
            CipherMode::Cbc => write!(f, "cbc"),
        }
    }
}

// == Envelope ==
/// Encrypts and decrypts text payloads under one secret key and mode.
///
/// The key is checked on every call rather than at construction, so an
/// envelope built from a bad key only fails once it is used.
#[derive(Clone)]
pub struct Envelope {
    key: Vec<u8>,
    mode: CipherMode,
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("key", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

impl Envelope {
    // == Constructor ==
    /// Creates an envelope for the given secret key and mode.
    pub fn new(key: impl AsRef<[u8]>, mode: CipherMode) -> Self {
        Self {
            key: key.as_ref().to_vec(),
            mode,
        }
    }

    /// Returns the configured cipher mode.
    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Returns true when the key has the length AES-256 requires.
    pub fn has_valid_key(&self) -> bool {
        self.key.len() == KEY_LEN
    }

    // == Encrypt ==
    /// Seals `plaintext` and returns `base64url(IV || ciphertext)`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        self.check_key()?;

        let mut iv = [0u8; IV_LEN];
        OsRng.try_fill_bytes(&mut iv).map_err(|_| CryptoError::Rng)?;

        let body = match self.mode {
            CipherMode::Cfb => {
                let mut buf = plaintext.as_bytes().to_vec();
                Aes256CfbEnc::new_from_slices(&self.key, &iv)
                    .map_err(|_| CryptoError::KeyLength(self.key.len()))?
                    .encrypt(&mut buf);
                buf
            }
            CipherMode::Cbc => Aes256CbcEnc::new_from_slices(&self.key, &iv)
                .map_err(|_| CryptoError::KeyLength(self.key.len()))?
                .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes()),
        };

        let mut sealed = Vec::with_capacity(IV_LEN + body.len());
        sealed.extend_from_slice(&iv);
        sealed.extend_from_slice(&body);

        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    // == Decrypt ==
    /// Opens a payload produced by [`Envelope::encrypt`] in the same mode.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CryptoError> {
        let raw = URL_SAFE_NO_PAD.decode(encoded)?;
        if raw.len() < IV_LEN {
            return Err(CryptoError::MalformedCiphertext(raw.len()));
        }
        self.check_key()?;

        let (iv, body) = raw.split_at(IV_LEN);

        let plain = match self.mode {
            CipherMode::Cfb => {
                let mut buf = body.to_vec();
                Aes256CfbDec::new_from_slices(&self.key, iv)
                    .map_err(|_| CryptoError::KeyLength(self.key.len()))?
                    .decrypt(&mut buf);
                buf
            }
            CipherMode::Cbc => {
                if body.len() % IV_LEN != 0 {
                    return Err(CryptoError::BlockAlignment(body.len()));
                }
                Aes256CbcDec::new_from_slices(&self.key, iv)
                    .map_err(|_| CryptoError::KeyLength(self.key.len()))?
                    .decrypt_padded_vec_mut::<Pkcs7>(body)
                    .map_err(|_| CryptoError::Padding)?
            }
        };

        String::from_utf8(plain).map_err(|_| CryptoError::Utf8)
    }

    fn check_key(&self) -> Result<(), CryptoError> {
        if self.key.len() != KEY_LEN {
            return Err(CryptoError::KeyLength(self.key.len()));
        }
        Ok(())
    }
}
