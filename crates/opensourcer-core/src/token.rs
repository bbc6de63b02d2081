//! Secure random tokens for generated credentials.

use rand::rngs::OsRng;
use rand::TryRngCore;

/// Generate `length` uppercase hexadecimal characters from the OS CSPRNG.
///
/// Draws `⌈length/2⌉ + 1` fresh bytes per call, hex-encodes them, and
/// truncates to `length`.
///
/// # Panics
///
/// Panics if the operating system's secure random source cannot be read.
/// Credentials must never fall back to a predictable generator.
pub fn generate(length: usize) -> String {
    let mut bytes = vec![0u8; length.div_ceil(2) + 1];
    if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
        panic!("secure random source unavailable, refusing to generate credentials: {e}");
    }
    let mut token = hex::encode_upper(&bytes);
    token.truncate(length);
    token
}
