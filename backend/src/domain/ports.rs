//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the directory expects to interact with driven adapters
//! (the upstream employee service and the query cache). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use super::{Employee, ValidEmployeeInput};

/// Errors surfaced while calling the upstream employee service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmployeeSourceError {
    /// Network transport failed before receiving a response.
    #[error("upstream transport failed: {message}")]
    Transport { message: String },
    /// Upstream call exceeded the per-attempt timeout.
    #[error("upstream request timed out: {message}")]
    Timeout { message: String },
    /// Upstream rate-limited the request.
    #[error("upstream rate limited request: {message}")]
    RateLimited { message: String },
    /// Upstream reported that the addressed entity does not exist.
    #[error("upstream entity not found: {message}")]
    NotFound { message: String },
    /// Upstream rejected the request before executing it.
    #[error("upstream rejected request: {message}")]
    Rejected { message: String },
    /// Upstream response envelope could not be decoded.
    #[error("upstream response decode failed: {message}")]
    Decode { message: String },
    /// Retryable failures persisted past the configured attempt budget.
    #[error("upstream retries exhausted after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },
}

impl EmployeeSourceError {
    /// Return whether retrying this error is expected to help.
    ///
    /// Rate limits, timeouts, and transport failures (including upstream
    /// 5xx) are transient; everything else is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for reaching the upstream employee service.
///
/// Adapters own transport, retry, and envelope decoding; the directory only
/// sees domain records and [`EmployeeSourceError`] variants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    /// Fetch the full employee collection.
    ///
    /// An envelope carrying no data yields an empty list.
    async fn fetch_all(&self) -> Result<Vec<Employee>, EmployeeSourceError>;

    /// Fetch one employee by identifier; `Ok(None)` when the id is unknown.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Employee>, EmployeeSourceError>;

    /// Create an employee upstream.
    ///
    /// `Ok(None)` means upstream answered successfully but carried no
    /// created record; the caller decides whether that is fatal.
    async fn create(
        &self,
        input: &ValidEmployeeInput,
    ) -> Result<Option<Employee>, EmployeeSourceError>;

    /// Delete an employee upstream.
    ///
    /// Deletion is addressed by **name**, not id; that is the upstream
    /// contract. Returns whether upstream reported the deletion as done.
    async fn delete_by_name(&self, name: &str) -> Result<bool, EmployeeSourceError>;
}

/// Cache signature identifying a specific query's cached result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full employee collection.
    All,
    /// A single employee by identifier.
    Employee(String),
    /// A name search result.
    Search(String),
    /// The highest-salary aggregate.
    HighestSalary,
    /// The top-ten earner names.
    TopEarners,
}

impl CacheKey {
    /// String signature used as the storage key.
    pub fn signature(&self) -> String {
        match self {
            Self::All => "all".to_owned(),
            Self::Employee(id) => id.clone(),
            Self::Search(term) => format!("search_{term}"),
            Self::HighestSalary => "highestSalary".to_owned(),
            Self::TopEarners => "top10".to_owned(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// One cached query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedValue {
    Employees(Vec<Employee>),
    Employee(Employee),
    Salary(u32),
    Names(Vec<String>),
}

/// Port for the query-result cache consulted by the directory.
///
/// Implementations must be safe for concurrent `get`/`put`/`evict_all` from
/// multiple in-flight requests. A reader racing an eviction may observe
/// either the pre- or post-eviction state; the upstream source is itself
/// eventually consistent, so no linearizability is promised.
pub trait DirectoryCache: Send + Sync {
    /// Look up a previously computed result.
    fn get(&self, key: &CacheKey) -> Option<CachedValue>;

    /// Store a computed result under the key's signature.
    fn put(&self, key: &CacheKey, value: CachedValue);

    /// Drop every entry. Triggered by any successful write.
    fn evict_all(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_signatures_match_the_query_contract() {
        assert_eq!(CacheKey::All.signature(), "all");
        assert_eq!(CacheKey::Employee("42".to_owned()).signature(), "42");
        assert_eq!(
            CacheKey::Search("jane".to_owned()).signature(),
            "search_jane"
        );
        assert_eq!(CacheKey::HighestSalary.signature(), "highestSalary");
        assert_eq!(CacheKey::TopEarners.signature(), "top10");
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        let retryable = [
            EmployeeSourceError::Transport {
                message: "connect refused".to_owned(),
            },
            EmployeeSourceError::Timeout {
                message: "deadline".to_owned(),
            },
            EmployeeSourceError::RateLimited {
                message: "429".to_owned(),
            },
        ];
        for error in retryable {
            assert!(error.is_retryable(), "{error} should be retryable");
        }

        let terminal = [
            EmployeeSourceError::NotFound {
                message: "missing".to_owned(),
            },
            EmployeeSourceError::Rejected {
                message: "400".to_owned(),
            },
            EmployeeSourceError::Decode {
                message: "bad json".to_owned(),
            },
            EmployeeSourceError::RetriesExhausted {
                attempts: 5,
                message: "429".to_owned(),
            },
        ];
        for error in terminal {
            assert!(!error.is_retryable(), "{error} should be terminal");
        }
    }
}
