//! Keypair Loading
//!
//! Reads the standard Solana CLI keypair format: a JSON array of exactly
//! 64 bytes (`~/.config/solana/id.json`), secret half first, public key in
//! the trailing 32 bytes.
//!
//! Secret bytes never leave this struct - logging and `Debug` only ever see
//! the public key.

use eyre::{eyre, Result};
use std::fs;
use tracing::debug;

use crate::config::expand_home;

/// Byte length of a Solana CLI keypair file's array
const KEYPAIR_LEN: usize = 64;

pub struct Keypair {
    bytes: [u8; KEYPAIR_LEN],
}

impl Keypair {
    /// Load from a Solana `id.json`-style file. A leading `~` expands to
    /// the home directory.
    pub fn from_file(path: &str) -> Result<Self> {
        let expanded = expand_home(path);
        let raw = fs::read_to_string(&expanded)
            .map_err(|e| eyre!("cannot read keypair file {}: {}", expanded.display(), e))?;

        let keypair = Self::from_json_array(&raw)
            .map_err(|e| eyre!("malformed keypair file {}: {}", expanded.display(), e))?;

        debug!("Loaded keypair, pubkey {}", keypair.pubkey_hex());
        Ok(keypair)
    }

    /// Parse the JSON array body of a keypair file.
    pub fn from_json_array(raw: &str) -> Result<Self> {
        let bytes: Vec<u8> = serde_json::from_str(raw)
            .map_err(|e| eyre!("expected a JSON array of bytes: {}", e))?;

        if bytes.len() != KEYPAIR_LEN {
            return Err(eyre!(
                "keypair holds {} bytes, expected {}",
                bytes.len(),
                KEYPAIR_LEN
            ));
        }

        let bytes: [u8; KEYPAIR_LEN] = bytes
            .try_into()
            .map_err(|_| eyre!("keypair byte conversion failed"))?;

        Ok(Self { bytes })
    }

    pub fn from_bytes(bytes: [u8; KEYPAIR_LEN]) -> Self {
        Self { bytes }
    }

    /// The public key: the trailing 32 bytes of the pair.
    pub fn pubkey(&self) -> &[u8] {
        &self.bytes[32..]
    }

    pub fn pubkey_hex(&self) -> String {
        hex::encode(self.pubkey())
    }
}

/// The secret half must never appear in logs or error reports.
impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Keypair(pubkey={})", self.pubkey_hex())
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Throwaway bytes, never a real key: secret half all 7s, public half
    /// all 9s.
    fn test_bytes() -> [u8; KEYPAIR_LEN] {
        let mut bytes = [7u8; KEYPAIR_LEN];
        bytes[32..].fill(9);
        bytes
    }

    #[test]
    fn test_pubkey_is_trailing_half() {
        let keypair = Keypair::from_bytes(test_bytes());
        assert_eq!(keypair.pubkey(), &[9u8; 32]);
        assert_eq!(keypair.pubkey_hex(), hex::encode([9u8; 32]));
    }

    #[test]
    fn test_parses_solana_id_json_shape() {
        let json = serde_json::to_string(&test_bytes().to_vec()).unwrap();
        let keypair = Keypair::from_json_array(&json).unwrap();
        assert_eq!(keypair.pubkey(), &[9u8; 32]);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let json = serde_json::to_string(&vec![1u8; 63]).unwrap();
        assert!(Keypair::from_json_array(&json).is_err());

        let json = serde_json::to_string(&vec![1u8; 65]).unwrap();
        assert!(Keypair::from_json_array(&json).is_err());
    }

    #[test]
    fn test_rejects_non_array_document() {
        assert!(Keypair::from_json_array(r#"{"key": "value"}"#).is_err());
        assert!(Keypair::from_json_array("not json at all").is_err());
    }

    #[test]
    fn test_debug_redacts_secret_half() {
        let keypair = Keypair::from_bytes(test_bytes());
        let rendered = format!("{:?}", keypair);

        assert!(rendered.contains(&hex::encode([9u8; 32])));
        // The secret half (all 7s) must not be rendered anywhere.
        assert!(!rendered.contains(&hex::encode([7u8; 32])));
    }

    #[test]
    fn test_from_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "trident_keypair_{}.json",
            std::process::id()
        ));
        let json = serde_json::to_string(&test_bytes().to_vec()).unwrap();
        fs::write(&path, json).unwrap();

        let keypair = Keypair::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(keypair.pubkey(), &[9u8; 32]);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_from_file_missing_is_error() {
        assert!(Keypair::from_file("/definitely/not/here/id.json").is_err());
    }
}
