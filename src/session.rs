//! Session state passed explicitly to whoever needs it.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// How long a fetched profile is trusted before it must be fetched again.
pub const DEFAULT_PROFILE_TTL: Duration = Duration::from_secs(5 * 60);

/// A single cached value that expires `ttl` after it was stored.
#[derive(Debug, Clone)]
pub struct SessionCache<T> {
    ttl: Duration,
    entry: Option<(T, Instant)>,
}

impl<T> SessionCache<T> {
    pub fn new(ttl: Duration) -> Self {
        SessionCache { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn store(&mut self, value: T) {
        self.store_at(value, Instant::now());
    }

    pub fn store_at(&mut self, value: T, now: Instant) {
        self.entry = Some((value, now));
    }

    pub fn get(&self) -> Option<&T> {
        self.get_at(Instant::now())
    }

    /// Cached value if it was stored less than `ttl` before `now`.
    pub fn get_at(&self, now: Instant) -> Option<&T> {
        let (value, stored) = self.entry.as_ref()?;
        (now.saturating_duration_since(*stored) < self.ttl).then_some(value)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Fresh cached value, or the result of `fetch` which is then cached.
    /// A failed fetch leaves the cache empty.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        fetch: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        let now = Instant::now();
        let stale = self.get_at(now).is_none();
        let entry = match self.entry.take() {
            Some(entry) if !stale => entry,
            _ => (fetch()?, now),
        };
        Ok(&self.entry.insert(entry).0)
    }
}

/// Account and notification settings of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub whatsapp_notifications: bool,
}

/// Bearer token plus the cached profile of the user it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    token: Option<String>,
    pub profile: SessionCache<UserProfile>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(DEFAULT_PROFILE_TTL)
    }
}

impl Session {
    pub fn new(profile_ttl: Duration) -> Self {
        Session {
            token: None,
            profile: SessionCache::new(profile_ttl),
        }
    }

    /// Start a session with a freshly issued token. Any cached profile belongs
    /// to the previous user and is dropped.
    pub fn sign_in(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
        self.profile.invalidate();
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the `Authorization` header, if signed in.
    pub fn authorization_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    pub fn sign_out(&mut self) {
        self.token = None;
        self.profile.invalidate();
    }

    /// React to an HTTP 401: the token is no longer valid.
    pub fn handle_unauthorized(&mut self) {
        self.sign_out();
    }
}
