//! Time-bounded cache of repository settings
//!
//! The cache is an ordinary value owned by the caller. Each instance base URL
//! is refreshed independently once its entries are older than the TTL; a
//! failed refresh drops that instance's entries and propagates the error.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::NexusClient;
use crate::transport::Transport;
use crate::Result;

/// Default time-to-live for cached settings.
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// One repository from `/service/rest/v1/repositorySettings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    pub name: String,
    pub format: String,
    #[serde(rename = "type")]
    pub repo_type: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Where the cache loads repository settings from.
pub trait RepositorySource {
    /// Identifies the instance; entries are cached per base URL.
    fn base_url(&self) -> &str;

    fn fetch_repositories(&self) -> Result<Vec<RepositorySettings>>;
}

impl<T: Transport> RepositorySource for NexusClient<T> {
    fn base_url(&self) -> &str {
        NexusClient::base_url(self)
    }

    fn fetch_repositories(&self) -> Result<Vec<RepositorySettings>> {
        self.repository_settings()
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    fetched_at: DateTime<Utc>,
    repositories: Vec<RepositorySettings>,
}

#[derive(Debug, Clone)]
pub struct RepositoryCache<C = SystemClock> {
    clock: C,
    ttl: Duration,
    snapshots: HashMap<String, Snapshot>,
}

impl RepositoryCache<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for RepositoryCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> RepositoryCache<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            ttl: Duration::seconds(DEFAULT_TTL_SECONDS),
            snapshots: HashMap::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Whether the entries for `base_url` are present and within the TTL.
    pub fn is_fresh(&self, base_url: &str) -> bool {
        self.snapshots
            .get(base_url)
            .is_some_and(|snapshot| self.clock.now() - snapshot.fetched_at <= self.ttl)
    }

    pub fn invalidate(&mut self, base_url: &str) {
        self.snapshots.remove(base_url);
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Look up a repository by name, optionally constrained by type and format.
    ///
    /// Refreshes from `source` first when its entries are missing or stale.
    pub fn get_repository<S: RepositorySource>(
        &mut self,
        source: &S,
        name: &str,
        repo_type: Option<&str>,
        repo_format: Option<&str>,
    ) -> Result<Option<&RepositorySettings>> {
        let base_url = source.base_url();
        if !self.is_fresh(base_url) {
            self.refresh(source)?;
        }

        Ok(self.snapshots.get(base_url).and_then(|snapshot| {
            snapshot.repositories.iter().find(|repository| {
                repository.name == name
                    && repo_type.is_none_or(|t| repository.repo_type == t)
                    && repo_format.is_none_or(|f| repository.format == f)
            })
        }))
    }

    fn refresh<S: RepositorySource>(&mut self, source: &S) -> Result<()> {
        let base_url = source.base_url();
        tracing::debug!(base_url, "Refreshing repository cache");

        match source.fetch_repositories() {
            Ok(repositories) => {
                self.snapshots.insert(
                    base_url.to_string(),
                    Snapshot {
                        fetched_at: self.clock.now(),
                        repositories,
                    },
                );
                Ok(())
            }
            Err(err) => {
                self.invalidate(base_url);
                Err(err)
            }
        }
    }
}
