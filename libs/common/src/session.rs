//! Redis-backed session store
//!
//! A session is an opaque 64-character hex token mapping to a small JSON
//! record at `session:<token>`. Each record carries its own expiry; the
//! Redis TTL on the key is a backstop that removes records even if they
//! are never read again.

use anyhow::Result;
use chrono::Utc;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::RedisPool;

/// Default session lifetime: 7 days
pub const DEFAULT_SESSION_TTL_SECS: u64 = 604_800;

const SESSION_KEY_PREFIX: &str = "session:";

/// Session record stored in Redis
///
/// Timestamps are Unix epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: Uuid,
    pub created_at: i64,
    pub expires_at: i64,
}

/// Session store configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Session lifetime in seconds
    pub ttl_seconds: u64,
}

impl SessionConfig {
    /// Create a new SessionConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SESSION_TTL_SECONDS`: session lifetime (default: 604800, 7 days)
    pub fn from_env() -> Self {
        let ttl_seconds = std::env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Self { ttl_seconds }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

/// Session store over the shared Redis pool
#[derive(Clone)]
pub struct SessionStore {
    redis: RedisPool,
    config: SessionConfig,
}

impl SessionStore {
    /// Create a new session store
    pub fn new(redis: RedisPool, config: SessionConfig) -> Self {
        Self { redis, config }
    }

    /// Session lifetime in seconds, also used as the cookie Max-Age
    pub fn ttl_seconds(&self) -> u64 {
        self.config.ttl_seconds
    }

    /// Create a session for a user and return the opaque token
    pub async fn create(&self, user_id: Uuid) -> Result<String> {
        let token = generate_token();
        let now = Utc::now().timestamp();
        let record = SessionRecord {
            user_id,
            created_at: now,
            expires_at: now + self.config.ttl_seconds as i64,
        };

        let payload = serde_json::to_string(&record)?;
        self.redis
            .set(
                &session_key(&token),
                &payload,
                Some(self.config.ttl_seconds),
            )
            .await?;

        debug!(%user_id, "Session created");
        Ok(token)
    }

    /// Look up a session by token
    ///
    /// Returns `None` for missing, expired, or unreadable records. An
    /// expired record is deleted on first access; the key TTL is only a
    /// backstop. Store failures are logged and reported as "no session"
    /// rather than propagated.
    pub async fn validate(&self, token: &str) -> Option<SessionRecord> {
        let key = session_key(token);

        let payload = match self.redis.get(&key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Session lookup failed; treating as unauthenticated");
                return None;
            }
        };

        let record: SessionRecord = match serde_json::from_str(&payload) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Unreadable session record; treating as unauthenticated");
                return None;
            }
        };

        if record.expires_at < Utc::now().timestamp() {
            if let Err(e) = self.redis.delete(&key).await {
                warn!(error = %e, "Failed to delete expired session");
            }
            return None;
        }

        Some(record)
    }

    /// Delete a session; destroying an absent token is not an error
    pub async fn destroy(&self, token: &str) -> Result<()> {
        self.redis.delete(&session_key(token)).await
    }
}

fn session_key(token: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{token}")
}

/// Generate a session token: 32 bytes from a CSPRNG, rendered as hex
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);

    let mut token = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(token, "{byte:02x}");
    }
    token
}
