//! API Key generation and hashing

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of every key
pub const API_KEY_RANDOM_LEN: usize = 48;

/// Number of random characters kept in the masked hint
const HINT_LEN: usize = 8;

/// A freshly generated key value and what the store keeps of it
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once!)
    pub key: String,
    /// SHA-256 hex digest used for lookups
    pub key_hash: String,
    /// Masked form for listings, e.g. `nwsl_live_AbCdEfGh...`
    pub hint: String,
}

/// Generate a new API key: `<prefix>_<mode>_<48 alphanumeric chars>`.
///
/// The random part comes from the operating system CSPRNG; each character is
/// uniform over the 62-symbol alphabet.
pub fn generate_api_key(prefix: &str, mode: &str) -> GeneratedApiKey {
    let random: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(API_KEY_RANDOM_LEN)
        .map(char::from)
        .collect();

    let key = format!("{}_{}_{}", prefix, mode, random);
    let hint = format!("{}_{}_{}...", prefix, mode, &random[..HINT_LEN]);

    GeneratedApiKey {
        key_hash: hash_api_key(&key),
        key,
        hint,
    }
}

/// Hash an API key for storage using SHA-256
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_key_has_expected_shape() {
        let generated = generate_api_key("nwsl", "live");

        assert!(generated.key.starts_with("nwsl_live_"));
        assert_eq!(generated.key.len(), "nwsl_live_".len() + API_KEY_RANDOM_LEN);
        assert!(generated.key["nwsl_live_".len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn hint_masks_the_secret() {
        let generated = generate_api_key("nwsl", "live");
        let random = &generated.key["nwsl_live_".len()..];

        assert_eq!(generated.hint, format!("nwsl_live_{}...", &random[..8]));
        assert!(!generated.hint.contains(&random[8..]));
    }

    #[test]
    fn hash_is_stable_sha256_hex() {
        let generated = generate_api_key("nwsl", "live");

        assert_eq!(generated.key_hash, hash_api_key(&generated.key));
        assert_eq!(generated.key_hash.len(), 64);
        assert_ne!(generated.key_hash, hash_api_key("nwsl-demo-key-2024"));
    }

    #[test]
    fn keys_do_not_repeat() {
        let keys: HashSet<String> = (0..500)
            .map(|_| generate_api_key("nwsl", "live").key)
            .collect();
        assert_eq!(keys.len(), 500);
    }
}
