//! Crypto Envelope Module
//!
//! Symmetric AES-256 encryption of record payloads before they leave process
//! memory. Output is `base64url(IV || ciphertext)` without padding.
//!
//! No authentication tag is computed, so tampering is only caught when it
//! breaks CBC padding, UTF-8 or the JSON decoder. That holds for changes to
//! the first ciphertext block, which garble a whole block of plaintext. It
//! does not hold in general. In CFB mode a flipped byte in the last block
//! flips the same bit in the plaintext and leaves the rest intact, so a
//! digit inside a record can change and still decode.

mod envelope;

pub use envelope::{CipherMode, CryptoError, Envelope};

// == Public Constants ==
/// Required secret key length in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// IV length in bytes, equal to the AES block size
pub const IV_LEN: usize = 16;
