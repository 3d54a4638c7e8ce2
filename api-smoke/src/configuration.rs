//! Runtime parameters of the suite, loaded from `smoke.toml` and `SMOKE_` environment variables.

use crate::{error::Error, suite::SmokeCase};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// What a 404 on the lookup of a freshly created post means.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NonPersistencePolicy {
    /// The service doesn't keep writes; the lookup is allowed to miss.
    Tolerate,
    /// The created post must be readable back.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfiguration {
    base_url: String,
    timeout_ms: Option<u64>,
    tolerate_non_persistence: bool,
    parallel: bool,
    cases: Vec<SmokeCase>,
}

impl SmokeConfiguration {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Layers the defaults, `smoke.toml` from the working directory and `SMOKE_*` environment
    /// variables, later sources winning.
    pub fn load() -> Result<Self, Error> {
        Ok(Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file("smoke.toml"))
            .merge(Env::prefixed("SMOKE_"))
            .extract()?)
    }

    pub fn set_base_url<S: Into<String>>(&mut self, base_url: S) {
        self.base_url = base_url.into();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout_ms =
            timeout.map(|timeout| u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
    }

    /// Per-request timeout; `None` leaves the HTTP client's default in place.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn set_tolerate_non_persistence(&mut self, value: bool) {
        self.tolerate_non_persistence = value;
    }

    pub fn non_persistence_policy(&self) -> NonPersistencePolicy {
        if self.tolerate_non_persistence {
            NonPersistencePolicy::Tolerate
        } else {
            NonPersistencePolicy::Reject
        }
    }

    pub fn set_parallel(&mut self, value: bool) {
        self.parallel = value;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn set_cases<I: IntoIterator<Item = SmokeCase>>(&mut self, cases: I) {
        self.cases = cases.into_iter().collect();
    }

    /// The cases to run, in declaration order. An empty selection means all of them.
    pub fn selected_cases(&self) -> Vec<SmokeCase> {
        SmokeCase::ALL
            .iter()
            .copied()
            .filter(|case| self.cases.is_empty() || self.cases.contains(case))
            .collect()
    }
}

impl Default for SmokeConfiguration {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: None,
            tolerate_non_persistence: true,
            parallel: false,
            cases: Vec::new(),
        }
    }
}
