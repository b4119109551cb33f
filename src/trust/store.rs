//! Trust store keyed by script engine and content hash

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use sha2::{Digest, Sha256};

/// Identity of a script: normalized engine id plus SHA-256 of the body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptIdentity {
    engine: String,
    content_hash: [u8; 32],
}

impl ScriptIdentity {
    /// Engine ids compare trimmed and case-insensitively, so `JavaScript`
    /// and `javascript` name the same engine. Content is hashed verbatim.
    pub fn new(engine_id: &str, content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());
        let mut content_hash = [0u8; 32];
        content_hash.copy_from_slice(&digest);
        Self {
            engine: engine_id.trim().to_lowercase(),
            content_hash,
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Lowercase hex of the content hash.
    pub fn content_hex(&self) -> String {
        self.content_hash.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for ScriptIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:sha256:{}", self.engine, self.content_hex())
    }
}

/// Registry of trusted scripts.
///
/// Construct one per host (or per test) and hand it to the loader. A
/// poisoned lock reads as "untrusted".
#[derive(Debug, Default)]
pub struct TrustStore {
    entries: RwLock<HashMap<ScriptIdentity, bool>>,
}

impl TrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide store for hosts that want a single shared instance.
    ///
    /// Starts empty; tests should prefer [`TrustStore::new`] to stay isolated.
    pub fn global() -> Arc<TrustStore> {
        static GLOBAL: OnceLock<Arc<TrustStore>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(TrustStore::new())))
    }

    pub fn is_trusted(&self, engine_id: &str, content: &str) -> bool {
        self.is_identity_trusted(&ScriptIdentity::new(engine_id, content))
    }

    pub fn is_identity_trusted(&self, identity: &ScriptIdentity) -> bool {
        match self.entries.read() {
            Ok(entries) => entries.get(identity).copied().unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Records an explicit decision. `false` is stored too, so a later
    /// listing can tell "denied" from "never asked".
    pub fn set_trusted(&self, engine_id: &str, content: &str, trusted: bool) {
        let identity = ScriptIdentity::new(engine_id, content);
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(identity, trusted);
    }

    /// Drops every decision.
    pub fn revoke_all(&self) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.clear();
    }

    /// Number of recorded decisions, trusted or not.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
