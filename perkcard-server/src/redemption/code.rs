//! Redemption code minting

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

/// Validity window of a freshly issued code
pub const CODE_TTL_MS: i64 = 45 * 1000;

/// Entropy per code; 16 bytes encode to 22 URL-safe characters
const CODE_BYTES: usize = 16;

/// Mint an unguessable, URL-safe code from the OS CSPRNG
pub fn generate_code() -> String {
    let mut bytes = [0u8; CODE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Expiry for a code issued at `issued_at`
pub fn expires_at(issued_at: i64) -> i64 {
    issued_at + CODE_TTL_MS
}
