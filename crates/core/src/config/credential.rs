//! Signing credential resolution.
//!
//! One credential is resolved per configuration load and shared by every
//! network entry. An explicit private key always wins; otherwise the
//! recovery phrase is used, read from a file when one exists and falling
//! back to the well-known insecure test phrase when it does not.

use super::ConfigError;
use alloy::primitives::Address;
use deploy_config_chain::{derive_accounts, SigningSource};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Publicly known, zero-entropy test phrase. Never guards real funds.
pub const INSECURE_TEST_MNEMONIC: &str =
    "test test test test test test test test test test test junk";

/// Mnemonic file location relative to the home directory.
pub const DEFAULT_MNEMONIC_PATH: &str = ".secret/testnet-mnemonic.txt";

/// Where a recovery phrase came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MnemonicOrigin {
    /// Read from this file
    File(PathBuf),
    /// No file found; the insecure test phrase is in use
    InsecureDefault,
}

/// A recovery phrase together with its origin.
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicPhrase {
    phrase: String,
    origin: MnemonicOrigin,
}

impl MnemonicPhrase {
    pub fn new(phrase: impl Into<String>, origin: MnemonicOrigin) -> Self {
        Self {
            phrase: phrase.into(),
            origin,
        }
    }

    /// The insecure fallback phrase.
    pub fn insecure_default() -> Self {
        Self::new(INSECURE_TEST_MNEMONIC, MnemonicOrigin::InsecureDefault)
    }

    /// Phrase exactly as read, including any trailing whitespace.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn origin(&self) -> &MnemonicOrigin {
        &self.origin
    }

    pub fn is_insecure_default(&self) -> bool {
        self.origin == MnemonicOrigin::InsecureDefault
    }
}

impl fmt::Debug for MnemonicPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicPhrase")
            .field("phrase", &"<redacted>")
            .field("origin", &self.origin)
            .finish()
    }
}

/// Candidate mnemonic file: the override if given, else `$HOME/.secret/testnet-mnemonic.txt`.
pub fn mnemonic_path(file_override: Option<&str>, home: Option<&str>) -> Option<PathBuf> {
    match file_override {
        Some(path) => Some(PathBuf::from(path)),
        None => home.map(|home| Path::new(home).join(DEFAULT_MNEMONIC_PATH)),
    }
}

/// Resolve the recovery phrase.
///
/// A missing file selects the insecure default. Any other read failure is
/// fatal.
pub fn resolve_mnemonic(
    file_override: Option<&str>,
    home: Option<&str>,
) -> Result<MnemonicPhrase, ConfigError> {
    let Some(path) = mnemonic_path(file_override, home) else {
        debug!("No mnemonic file candidate (HOME unset)");
        return Ok(MnemonicPhrase::insecure_default());
    };

    match std::fs::read(&path) {
        Ok(bytes) => {
            debug!(path = %path.display(), "Loaded mnemonic from file");
            Ok(MnemonicPhrase::new(decode_ascii(&bytes), MnemonicOrigin::File(path)))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Mnemonic file not found");
            Ok(MnemonicPhrase::insecure_default())
        }
        Err(source) => Err(ConfigError::MnemonicRead { path, source }),
    }
}

/// 7-bit ASCII decoding: the high bit of every byte is dropped.
fn decode_ascii(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b & 0x7f)).collect()
}

/// Signing credential applied to every network.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Explicit hex private key
    PrivateKey(String),
    /// Recovery phrase
    Mnemonic(MnemonicPhrase),
}

/// Pick the credential: a non-empty explicit secret always wins.
///
/// Neither the key format nor the phrase word count is checked here.
pub fn resolve_credential(explicit_secret: Option<&str>, phrase: MnemonicPhrase) -> Credential {
    match explicit_secret {
        Some(secret) if !secret.is_empty() => Credential::PrivateKey(secret.to_string()),
        _ => Credential::Mnemonic(phrase),
    }
}

impl Credential {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Credential::PrivateKey(_) => "private_key",
            Credential::Mnemonic(_) => "mnemonic",
        }
    }

    /// True when the insecure test phrase is in use.
    pub fn is_insecure_default(&self) -> bool {
        matches!(self, Credential::Mnemonic(phrase) if phrase.is_insecure_default())
    }

    pub fn signing_source(&self) -> SigningSource<'_> {
        match self {
            Credential::PrivateKey(key) => SigningSource::PrivateKey(key),
            Credential::Mnemonic(phrase) => SigningSource::Mnemonic(phrase.phrase()),
        }
    }

    /// Addresses of the first `count` accounts this credential controls.
    pub fn accounts(&self, count: u32) -> Result<Vec<Address>, ConfigError> {
        Ok(derive_accounts(self.signing_source(), count)?)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
            Credential::Mnemonic(phrase) => f.debug_tuple("Mnemonic").field(phrase).finish(),
        }
    }
}

/// Build-tool `accounts` shape: `["<key>"]` or `{ "mnemonic": "<phrase>" }`.
impl Serialize for Credential {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Credential::PrivateKey(key) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(key)?;
                seq.end()
            }
            Credential::Mnemonic(phrase) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("mnemonic", phrase.phrase())?;
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_phrase_shape() {
        assert_eq!(INSECURE_TEST_MNEMONIC, "test ".repeat(11) + "junk");
    }

    #[test]
    fn test_mnemonic_path() {
        assert_eq!(
            mnemonic_path(None, Some("/home/dev")),
            Some(PathBuf::from("/home/dev/.secret/testnet-mnemonic.txt"))
        );
        assert_eq!(
            mnemonic_path(Some("/tmp/phrase.txt"), Some("/home/dev")),
            Some(PathBuf::from("/tmp/phrase.txt"))
        );
        assert_eq!(mnemonic_path(None, None), None);
    }

    #[test]
    fn test_mnemonic_from_file_is_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("phrase.txt");
        std::fs::write(&path, "alpha beta gamma\n\n").unwrap();

        let phrase = resolve_mnemonic(path.to_str(), None).unwrap();
        assert_eq!(phrase.phrase(), "alpha beta gamma\n\n");
        assert_eq!(phrase.origin(), &MnemonicOrigin::File(path));
        assert!(!phrase.is_insecure_default());
    }

    #[test]
    fn test_mnemonic_from_home() {
        let tmp = tempfile::tempdir().unwrap();
        let secret_dir = tmp.path().join(".secret");
        std::fs::create_dir_all(&secret_dir).unwrap();
        std::fs::write(secret_dir.join("testnet-mnemonic.txt"), "from home").unwrap();

        let phrase = resolve_mnemonic(None, tmp.path().to_str()).unwrap();
        assert_eq!(phrase.phrase(), "from home");
    }

    #[test]
    fn test_missing_file_uses_insecure_default() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.txt");

        let phrase = resolve_mnemonic(missing.to_str(), None).unwrap();
        assert_eq!(phrase.phrase().as_bytes(), INSECURE_TEST_MNEMONIC.as_bytes());
        assert!(phrase.is_insecure_default());

        let phrase = resolve_mnemonic(None, None).unwrap();
        assert!(phrase.is_insecure_default());
    }

    #[test]
    fn test_unreadable_path_is_fatal() {
        // A directory exists at the path but cannot be read as a file.
        let tmp = tempfile::tempdir().unwrap();
        let err = resolve_mnemonic(tmp.path().to_str(), None).unwrap_err();
        assert!(matches!(err, ConfigError::MnemonicRead { .. }));
    }

    #[test]
    fn test_high_bit_is_cleared() {
        assert_eq!(decode_ascii(&[b'a', 0xE2, b'b']), "abb");
    }

    #[test]
    fn test_private_key_wins() {
        let from_file = MnemonicPhrase::new("word word", MnemonicOrigin::File("/x".into()));
        for phrase in [from_file, MnemonicPhrase::insecure_default()] {
            assert_eq!(
                resolve_credential(Some("0xabc"), phrase),
                Credential::PrivateKey("0xabc".to_string())
            );
        }
    }

    #[test]
    fn test_mnemonic_when_no_secret() {
        let text = "word ".repeat(11) + "word";
        let phrase = MnemonicPhrase::new(text.clone(), MnemonicOrigin::File("/x".into()));

        for secret in [None, Some("")] {
            match resolve_credential(secret, phrase.clone()) {
                Credential::Mnemonic(resolved) => assert_eq!(resolved.phrase(), text),
                other => panic!("expected mnemonic, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_insecure_flag() {
        assert!(resolve_credential(None, MnemonicPhrase::insecure_default()).is_insecure_default());
        assert!(!resolve_credential(Some("0x1"), MnemonicPhrase::insecure_default())
            .is_insecure_default());
    }

    #[test]
    fn test_serialized_accounts_shape() {
        let key = serde_json::to_value(Credential::PrivateKey("0xabc".into())).unwrap();
        assert_eq!(key, serde_json::json!(["0xabc"]));

        let phrase = serde_json::to_value(Credential::Mnemonic(MnemonicPhrase::insecure_default()))
            .unwrap();
        assert_eq!(phrase, serde_json::json!({ "mnemonic": INSECURE_TEST_MNEMONIC }));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", Credential::PrivateKey("0xsecret".into()));
        assert!(!rendered.contains("secret"));

        let rendered = format!("{:?}", Credential::Mnemonic(MnemonicPhrase::insecure_default()));
        assert!(!rendered.contains("junk"));
        assert!(rendered.contains("InsecureDefault"));
    }

    #[test]
    fn test_default_accounts() {
        let credential = Credential::Mnemonic(MnemonicPhrase::insecure_default());
        let accounts = credential.accounts(1).unwrap();
        assert_eq!(
            accounts,
            vec![alloy::primitives::address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")]
        );
    }
}
