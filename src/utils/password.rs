use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const HASH_ROUNDS: usize = 10_000;

/// Hash a password into the `hex(salt):hex(digest)` form stored in `users.password`.
///
/// The digest is SHA-256 over `password ++ salt`, then re-hashed on its own
/// output `HASH_ROUNDS` times. This is a weak KDF (no memory hardness, fixed
/// work factor); it is kept so existing accounts keep verifying.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let digest = stretch(password.as_bytes(), &salt);
    format!("{}:{}", hex::encode(salt), hex::encode(digest))
}

/// Check a password against a stored `salt:hash` string. Anything malformed fails closed.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let parts: Vec<&str> = encoded.split(':').collect();
    if parts.len() != 2 {
        log::warn!("Stored password hash has {} parts, expected 2", parts.len());
        return false;
    }

    let (salt, expected) = match (hex::decode(parts[0]), hex::decode(parts[1])) {
        (Ok(salt), Ok(expected)) => (salt, expected),
        _ => {
            log::warn!("Stored password hash is not valid hex");
            return false;
        }
    };

    stretch(password.as_bytes(), &salt)
        .as_slice()
        .ct_eq(expected.as_slice())
        .into()
}

fn stretch(password: &[u8], salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password);
    hasher.update(salt);
    let mut digest: [u8; 32] = hasher.finalize().into();

    for _ in 0..HASH_ROUNDS {
        digest = Sha256::digest(digest).into();
    }

    digest
}
