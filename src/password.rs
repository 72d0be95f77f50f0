//! Password hashing and verification.
//!
//! Passwords are stored as `pbkdf2:sha256:<iterations>$<salt>$<hash>` with
//! base64url-encoded salt and digest. Verification also accepts legacy
//! hex-encoded digests and padded base64 variants so hashes imported from
//! the previous system keep working; [`needs_rehash`] flags those for a
//! transparent upgrade on the next successful login.

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD},
};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260_000;
const SALT_LENGTH: usize = 16;
const KEY_LENGTH: usize = 32;

/// Errors that can occur while hashing or verifying passwords.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("stored hash has an invalid format")]
    InvalidFormat,
    #[error("stored hash has an invalid iteration count")]
    InvalidIterations,
    #[error("failed to decode stored salt or digest")]
    Decode,
    #[error("key derivation failed: {0}")]
    Derivation(String),
}

/// Hash a plaintext password with PBKDF2-HMAC-SHA256 and a random salt.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, ITERATIONS, &mut key)
        .map_err(|e| PasswordError::Derivation(e.to_string()))?;

    let salt_b64 = URL_SAFE_NO_PAD.encode(salt);
    let hash_b64 = URL_SAFE_NO_PAD.encode(key);

    Ok(format!(
        "pbkdf2:sha256:{}${}${}",
        ITERATIONS, salt_b64, hash_b64
    ))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
    let (iterations, salt, expected) = parse_hash(stored_hash)?;

    let mut computed = vec![0u8; expected.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| PasswordError::Derivation(e.to_string()))?;

    Ok(computed.ct_eq(&expected).into())
}

/// Whether a stored hash should be re-derived with current parameters.
pub fn needs_rehash(stored_hash: &str) -> bool {
    match parse_hash(stored_hash) {
        Ok((iterations, _, _)) => iterations < ITERATIONS,
        Err(_) => true,
    }
}

fn parse_hash(stored_hash: &str) -> Result<(u32, Vec<u8>, Vec<u8>), PasswordError> {
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 3 {
        return Err(PasswordError::InvalidFormat);
    }

    let header_parts: Vec<&str> = parts[0].split(':').collect();
    if header_parts.len() != 3 || header_parts[0] != "pbkdf2" || header_parts[1] != "sha256" {
        return Err(PasswordError::InvalidFormat);
    }

    let iterations = header_parts[2]
        .parse::<u32>()
        .map_err(|_| PasswordError::InvalidIterations)?;

    let salt = decode_flexible(parts[1])?;
    let digest = decode_flexible(parts[2])?;

    Ok((iterations, salt, digest))
}

/// Decode a base64url, base64 or hex encoded segment, trying formats in
/// order of likelihood for compatibility with imported hashes.
fn decode_flexible(input: &str) -> Result<Vec<u8>, PasswordError> {
    if input.len() == 64 && input.chars().all(|c| c.is_ascii_hexdigit()) {
        return hex::decode(input).map_err(|_| PasswordError::Decode);
    }

    if let Ok(decoded) = URL_SAFE_NO_PAD.decode(input) {
        return Ok(decoded);
    }
    if let Ok(decoded) = STANDARD_NO_PAD.decode(input) {
        return Ok(decoded);
    }

    let padded = add_base64_padding(input);
    if let Ok(decoded) = URL_SAFE.decode(&padded) {
        return Ok(decoded);
    }
    if let Ok(decoded) = STANDARD.decode(&padded) {
        return Ok(decoded);
    }

    hex::decode(input).map_err(|_| PasswordError::Decode)
}

fn add_base64_padding(input: &str) -> String {
    let padding_needed = (4 - (input.len() % 4)) % 4;
    format!("{}{}", input, "=".repeat(padding_needed))
}
