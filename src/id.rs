//! Identifier Generator
//!
//! Record ids are ULIDs (48-bit millisecond timestamp followed by 80 random
//! bits) rendered in Crockford base32 and then wrapped in unpadded base64url
//! so they can travel in cookies, headers and cache keys unchanged.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use rand::Rng;

/// Crockford base32 alphabet (no I, L, O, U)
const CROCKFORD: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Length of a ULID in Crockford base32
const ULID_LEN: usize = 26;

const RANDOM_BITS: u32 = 80;
const TIMESTAMP_MASK: u128 = (1 << 48) - 1;

/// Generates a new record identifier.
///
/// Randomness comes from the calling thread's generator, so concurrent callers
/// never contend on a shared lock.
pub fn new_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let entropy: u128 = rand::thread_rng().gen::<u128>() & ((1 << RANDOM_BITS) - 1);

    URL_SAFE_NO_PAD.encode(encode_ulid(millis, entropy))
}

/// Renders the 128-bit ULID as 26 Crockford base32 characters.
fn encode_ulid(millis: u128, entropy: u128) -> String {
    let value = ((millis & TIMESTAMP_MASK) << RANDOM_BITS) | entropy;

    (0..ULID_LEN)
        .map(|i| {
            let shift = 5 * (ULID_LEN - 1 - i);
            CROCKFORD[((value >> shift) & 0x1f) as usize] as char
        })
        .collect()
}
