//! Keyfile and password stores
//!
//! The keyfile store is a directory of named SSH private keys; the
//! reconciler only checks existence, never content. Windows administrator
//! passwords live next to the keys in a TOML file with a single
//! `[passwords]` table mapping node name to secret, rewritten in place on
//! every update.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the password store inside the keyfile directory.
pub const PASSWORDS_FILE: &str = "windows-passwords.toml";

/// Directory of named SSH keyfiles.
#[derive(Debug, Clone)]
pub struct Keystore {
    dir: PathBuf,
}

impl Keystore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve a keyfile name to its path, if the file exists.
    pub fn keyfile(&self, name: &str) -> Option<PathBuf> {
        let path = self.dir.join(name);
        path.is_file().then_some(path)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PasswordsFile {
    #[serde(default)]
    passwords: BTreeMap<String, String>,
}

/// Persisted node-name → administrator-password mapping.
///
/// Reads tolerate a missing file (empty store); `set` persists
/// immediately via read-modify-write. Pass processing is sequential, so
/// there is never more than one writer.
#[derive(Debug, Clone)]
pub struct PasswordStore {
    path: PathBuf,
}

impl PasswordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PasswordsFile> {
        if !self.path.exists() {
            return Ok(PasswordsFile::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read password store {}", self.path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse password store {}", self.path.display()))
    }

    /// Look up the stored password for a node.
    pub fn get(&self, node_name: &str) -> Result<Option<String>> {
        Ok(self.load()?.passwords.get(node_name).cloned())
    }

    /// Store a password for a node, rewriting the file in place.
    pub fn set(&self, node_name: &str, password: &str) -> Result<()> {
        let mut file = self.load()?;
        file.passwords
            .insert(node_name.to_string(), password.to_string());
        let content = toml::to_string(&file).context("Failed to serialize password store")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write password store {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn keystore_resolves_existing_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("prod-key"), "key material").unwrap();

        let store = Keystore::new(dir.path());
        assert_eq!(
            store.keyfile("prod-key"),
            Some(dir.path().join("prod-key"))
        );
        assert_eq!(store.keyfile("missing-key"), None);
    }

    #[test]
    fn password_store_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = PasswordStore::new(dir.path().join(PASSWORDS_FILE));
        assert_eq!(store.get("aws.us-east-1.i-1").unwrap(), None);
    }

    #[test]
    fn password_store_set_then_get() {
        let dir = TempDir::new().unwrap();
        let store = PasswordStore::new(dir.path().join(PASSWORDS_FILE));

        store.set("aws.us-east-1.i-1", "hunter2").unwrap();
        store.set("aws.us-east-1.i-2", "secret").unwrap();

        assert_eq!(
            store.get("aws.us-east-1.i-1").unwrap().as_deref(),
            Some("hunter2")
        );
        assert_eq!(
            store.get("aws.us-east-1.i-2").unwrap().as_deref(),
            Some("secret")
        );
    }

    #[test]
    fn password_store_updates_in_place() {
        let dir = TempDir::new().unwrap();
        let store = PasswordStore::new(dir.path().join(PASSWORDS_FILE));

        store.set("aws.eu-west-1.i-9", "old").unwrap();
        store.set("aws.eu-west-1.i-9", "new").unwrap();

        assert_eq!(
            store.get("aws.eu-west-1.i-9").unwrap().as_deref(),
            Some("new")
        );

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("[passwords]"));
        assert!(!raw.contains("old"));
    }
}
