//! Versioned session records over the [`Cache`].

use crate::{cache_key, Cache, CacheError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;

/// Longest session id accepted from a client.
const MAX_SESSION_ID_LEN: usize = 128;

/// A unique session identifier.
///
/// This is the value clients send back in the `Cart-Token` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new session ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new cryptographically secure session ID.
    pub fn generate() -> Self {
        use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
        use rand::Rng;

        let bytes: [u8; 18] = rand::thread_rng().gen();
        Self(format!("sess_{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Accept a client-supplied id if it looks like one we could have issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SESSION_ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        valid.then(|| Self(raw.to_string()))
    }

    /// Get the session ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Session record stored in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData<T> {
    pub id: SessionId,
    pub data: T,
    /// Incremented on every write.
    pub version: u64,
    /// Unix timestamp of the first write.
    pub created_at: i64,
    /// Unix timestamp of the last write.
    pub updated_at: i64,
}

/// Typed, versioned session storage.
///
/// Every write names the version it was based on and goes through
/// [`Cache::modify`], so of two writers that read the same version only the
/// first one lands; the second gets [`CacheError::ConcurrentModification`].
pub struct Session<T> {
    cache: Cache,
    namespace: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> Session<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Session storage under a key namespace.
    pub fn new(cache: Cache, namespace: &'static str) -> Self {
        Self {
            cache,
            namespace,
            _phantom: PhantomData,
        }
    }

    /// Get the full record including version.
    pub fn get_versioned(&self, id: &SessionId) -> Result<Option<SessionData<T>>, CacheError> {
        self.cache.get(&self.session_key(id))
    }

    /// Write only if the stored version is still `expected` (0 = absent).
    /// Returns the new version.
    pub fn set_versioned(&self, id: &SessionId, data: &T, expected: u64) -> Result<u64, CacheError> {
        let key = self.session_key(id);
        let now = chrono::Utc::now().timestamp();
        self.cache
            .modify::<SessionData<T>, u64, _>(&key, |current| {
                let found = current.as_ref().map_or(0, |s| s.version);
                if expected != found {
                    return Err(CacheError::ConcurrentModification {
                        key: key.clone(),
                        expected,
                        found,
                    });
                }
                let version = found + 1;
                let record = SessionData {
                    id: id.clone(),
                    data: data.clone(),
                    version,
                    created_at: current.map_or(now, |s| s.created_at),
                    updated_at: now,
                };
                Ok((record, version))
            })
    }

    /// Delete a session.
    pub fn delete(&self, id: &SessionId) -> Result<(), CacheError> {
        self.cache.delete(&self.session_key(id))
    }

    fn session_key(&self, id: &SessionId) -> String {
        cache_key!(self.namespace, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Visits {
        count: u32,
    }

    #[test]
    fn test_session_id_generate_format() {
        let id = SessionId::generate();
        let s = id.as_str();

        assert!(s.starts_with("sess_"));
        // Base64 encoded 18 bytes = 24 chars, plus "sess_" = 29 chars
        assert_eq!(s.len(), 29);
        assert_eq!(SessionId::parse(s), Some(id));
    }

    #[test]
    fn test_session_id_generate_uniqueness() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }

    #[test]
    fn test_session_id_parse_rejects_garbage() {
        assert_eq!(SessionId::parse(""), None);
        assert_eq!(SessionId::parse("   "), None);
        assert_eq!(SessionId::parse("a b"), None);
        assert_eq!(SessionId::parse("x;drop"), None);
        assert_eq!(SessionId::parse(&"a".repeat(129)), None);
        assert_eq!(SessionId::parse(" ok-1 "), Some(SessionId::new("ok-1")));
    }

    #[test]
    fn test_session_id_serialization() {
        let id = SessionId::new("serialize-me");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""serialize-me""#);
        let back: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_versions_increment() {
        let session = Session::<Visits>::new(Cache::new(), "visits");
        let id = SessionId::new("s1");

        assert!(session.get_versioned(&id).unwrap().is_none());
        assert_eq!(session.set_versioned(&id, &Visits::default(), 0).unwrap(), 1);
        assert_eq!(session.set_versioned(&id, &Visits { count: 1 }, 1).unwrap(), 2);

        let record = session.get_versioned(&id).unwrap().unwrap();
        assert_eq!(record.version, 2);
        assert_eq!(record.data.count, 1);
    }

    #[test]
    fn test_stale_versioned_write_rejected() {
        let session = Session::<Visits>::new(Cache::new(), "visits");
        let id = SessionId::new("s2");
        session.set_versioned(&id, &Visits { count: 1 }, 0).unwrap();

        let err = session.set_versioned(&id, &Visits { count: 9 }, 0).unwrap_err();
        assert!(matches!(err, CacheError::ConcurrentModification { found: 1, .. }));
        assert_eq!(session.get_versioned(&id).unwrap().unwrap().data.count, 1);
    }

    #[test]
    fn test_delete_resets_version() {
        let session = Session::<Visits>::new(Cache::new(), "visits");
        let id = SessionId::new("s3");
        session.set_versioned(&id, &Visits { count: 4 }, 0).unwrap();

        session.delete(&id).unwrap();
        assert!(session.get_versioned(&id).unwrap().is_none());
        assert_eq!(session.set_versioned(&id, &Visits { count: 1 }, 0).unwrap(), 1);
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let cache = Cache::new();
        let a = Session::<Visits>::new(cache.clone(), "a");
        let b = Session::<Visits>::new(cache, "b");
        let id = SessionId::new("same");
        a.set_versioned(&id, &Visits { count: 5 }, 0).unwrap();
        assert!(b.get_versioned(&id).unwrap().is_none());
    }
}
