//! Random secret tokens

use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes in a generated secret token (256 hex characters)
pub const SECRET_TOKEN_BYTES: usize = 128;

/// Generate `byte_len` bytes from the OS random source, hex encoded.
///
/// The result is `2 * byte_len` lowercase hex characters.
pub fn generate_secret(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
