//! Employee directory orchestration service.
//!
//! The directory owns the fetch/filter/aggregate/mutate flows over employee
//! records: reads are cache-first, derived views are computed over the full
//! collection, and any successful write evicts the whole cache. Coarse
//! invalidation trades cached work for correctness; the upstream source is
//! eventually consistent after writes anyway, so a one-shot stale read is
//! within contract.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::ports::{CacheKey, CachedValue, DirectoryCache, EmployeeSource, EmployeeSourceError};
use super::{DomainError, Employee, EmployeeInput};

/// Number of names returned by the top-earner view.
const TOP_EARNER_LIMIT: usize = 10;

/// Orchestrates directory operations over the source and cache ports.
pub struct EmployeeDirectory {
    source: Arc<dyn EmployeeSource>,
    cache: Arc<dyn DirectoryCache>,
}

impl EmployeeDirectory {
    /// Build a directory over the given source and cache adapters.
    pub fn new(source: Arc<dyn EmployeeSource>, cache: Arc<dyn DirectoryCache>) -> Self {
        Self { source, cache }
    }

    /// Return the full employee collection, cache-first.
    ///
    /// # Errors
    ///
    /// Propagates upstream failures as [`DomainError`] after logging.
    pub async fn list_all(&self) -> Result<Vec<Employee>, DomainError> {
        let key = CacheKey::All;
        if let Some(CachedValue::Employees(employees)) = self.cache.get(&key) {
            debug!(key = %key, "serving employee collection from cache");
            return Ok(employees);
        }

        let employees = self
            .source
            .fetch_all()
            .await
            .map_err(|error| map_source_error("list_all", None, &error))?;
        info!(count = employees.len(), "fetched employee collection");
        self.cache.put(&key, CachedValue::Employees(employees.clone()));
        Ok(employees)
    }

    /// Look up one employee by identifier; `Ok(None)` when unknown.
    ///
    /// # Errors
    ///
    /// Propagates upstream failures other than not-found.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Employee>, DomainError> {
        let key = CacheKey::Employee(id.to_owned());
        if let Some(CachedValue::Employee(employee)) = self.cache.get(&key) {
            debug!(id, "serving employee from cache");
            return Ok(Some(employee));
        }

        info!(id, "fetching employee by id");
        match self.source.fetch_by_id(id).await {
            Ok(Some(employee)) => {
                self.cache.put(&key, CachedValue::Employee(employee.clone()));
                Ok(Some(employee))
            }
            Ok(None) | Err(EmployeeSourceError::NotFound { .. }) => Ok(None),
            Err(error) => Err(map_source_error("get_by_id", Some(id), &error)),
        }
    }

    /// Case-insensitive substring search against employee names.
    ///
    /// Blank terms are a caller-side validation failure and must be rejected
    /// before reaching this operation.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying collection fetch.
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<Employee>, DomainError> {
        let key = CacheKey::Search(term.to_owned());
        if let Some(CachedValue::Employees(employees)) = self.cache.get(&key) {
            debug!(term, "serving name search from cache");
            return Ok(employees);
        }

        let needle = term.to_lowercase();
        let matches: Vec<Employee> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|employee| employee.name.to_lowercase().contains(&needle))
            .collect();
        info!(term, matches = matches.len(), "computed name search");
        self.cache.put(&key, CachedValue::Employees(matches.clone()));
        Ok(matches)
    }

    /// Maximum salary over the collection; 0 when it is empty.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying collection fetch.
    pub async fn highest_salary(&self) -> Result<u32, DomainError> {
        let key = CacheKey::HighestSalary;
        if let Some(CachedValue::Salary(salary)) = self.cache.get(&key) {
            debug!("serving highest salary from cache");
            return Ok(salary);
        }

        let highest = self
            .list_all()
            .await?
            .iter()
            .map(|employee| employee.salary)
            .max()
            .unwrap_or(0);
        self.cache.put(&key, CachedValue::Salary(highest));
        Ok(highest)
    }

    /// Names of the ten highest earners, salary descending.
    ///
    /// The sort is stable, so employees with equal salaries keep their
    /// collection order.
    ///
    /// # Errors
    ///
    /// Propagates failures from the underlying collection fetch.
    pub async fn top_ten_earner_names(&self) -> Result<Vec<String>, DomainError> {
        let key = CacheKey::TopEarners;
        if let Some(CachedValue::Names(names)) = self.cache.get(&key) {
            debug!("serving top earners from cache");
            return Ok(names);
        }

        let mut employees = self.list_all().await?;
        employees.sort_by(|a, b| b.salary.cmp(&a.salary));
        let names: Vec<String> = employees
            .into_iter()
            .take(TOP_EARNER_LIMIT)
            .map(|employee| employee.name)
            .collect();
        self.cache.put(&key, CachedValue::Names(names.clone()));
        Ok(names)
    }

    /// Validate and create an employee, evicting the cache on success.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request error aggregating every violated field, an
    /// internal error when upstream acknowledges without a created record,
    /// or a mapped upstream failure.
    pub async fn create(&self, input: EmployeeInput) -> Result<Employee, DomainError> {
        let valid = input.validate()?;
        info!(name = %valid.name, "creating employee");
        match self.source.create(&valid).await {
            Ok(Some(employee)) => {
                self.cache.evict_all();
                info!(id = %employee.id, name = %employee.name, "employee created");
                Ok(employee)
            }
            Ok(None) => {
                error!(name = %valid.name, "upstream acknowledged creation without a record");
                Err(DomainError::internal("employee creation failed"))
            }
            Err(error) => Err(map_source_error("create", Some(&valid.name), &error)),
        }
    }

    /// Delete an employee by identifier, returning the deleted name.
    ///
    /// The employee is resolved by id first; the upstream delete itself is
    /// name-addressed. When two employees share a name the upstream may
    /// delete either record; that ambiguity is the documented collaborator
    /// contract, not something this service can repair.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown ids (never a silent no-op), an
    /// internal error when upstream reports the deletion as failed, or a
    /// mapped upstream failure.
    pub async fn delete_by_id(&self, id: &str) -> Result<String, DomainError> {
        info!(id, "deleting employee by id");
        let Some(employee) = self.get_by_id(id).await? else {
            warn!(id, "employee to delete was not found");
            return Err(DomainError::not_found("employee not found"));
        };

        match self.source.delete_by_name(&employee.name).await {
            Ok(true) => {
                self.cache.evict_all();
                info!(id, name = %employee.name, "employee deleted");
                Ok(employee.name)
            }
            Ok(false) => {
                error!(id, name = %employee.name, "upstream reported deletion failure");
                Err(DomainError::internal("employee deletion failed"))
            }
            Err(error) => Err(map_source_error("delete_by_id", Some(id), &error)),
        }
    }
}

/// Map a source failure to a domain error, logging the operation context.
fn map_source_error(
    operation: &'static str,
    identifier: Option<&str>,
    error: &EmployeeSourceError,
) -> DomainError {
    error!(
        operation,
        identifier = identifier.unwrap_or(""),
        error = %error,
        "upstream call failed"
    );
    match error {
        EmployeeSourceError::RetriesExhausted { attempts, .. } => DomainError::retries_exhausted(
            format!("upstream unavailable after {attempts} attempts"),
        ),
        other => DomainError::upstream(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockEmployeeSource;
    use crate::domain::ErrorCode;
    use crate::outbound::cache::InMemoryDirectoryCache;
    use rstest::rstest;

    fn employee(id: &str, name: &str, salary: u32) -> Employee {
        Employee {
            id: id.to_owned(),
            name: name.to_owned(),
            salary,
            age: 30,
            title: "Developer".to_owned(),
            email: format!("{id}@company.com"),
        }
    }

    fn roster() -> Vec<Employee> {
        vec![
            employee("1", "John Doe", 50_000),
            employee("2", "Jane Smith", 75_000),
            employee("3", "Bob Johnson", 90_000),
        ]
    }

    fn valid_input() -> EmployeeInput {
        EmployeeInput {
            name: Some("Jane Doe".to_owned()),
            salary: Some(60_000),
            age: Some(25),
            title: Some("Senior Developer".to_owned()),
        }
    }

    fn directory(source: MockEmployeeSource) -> EmployeeDirectory {
        EmployeeDirectory::new(Arc::new(source), Arc::new(InMemoryDirectoryCache::new()))
    }

    #[tokio::test]
    async fn list_all_hits_upstream_at_most_once() {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(roster()));
        let directory = directory(source);

        let first = directory.list_all().await.expect("first call");
        let second = directory.list_all().await.expect("second call");
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[rstest]
    #[case::lowercase("jane", vec!["Jane Smith"])]
    #[case::uppercase("JOHN", vec!["John Doe", "Bob Johnson"])]
    #[case::substring("o", vec!["John Doe", "Bob Johnson"])]
    #[case::no_match("zelda", vec![])]
    #[tokio::test]
    async fn search_matches_case_insensitive_substrings(
        #[case] term: &str,
        #[case] expected: Vec<&str>,
    ) {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(roster()));
        let directory = directory(source);

        let matches = directory.search_by_name(term).await.expect("search");
        let names: Vec<&str> = matches.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn search_results_are_cached_per_term() {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(roster()));
        let directory = directory(source);

        let first = directory.search_by_name("jane").await.expect("first");
        let second = directory.search_by_name("jane").await.expect("second");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn highest_salary_over_empty_collection_is_zero() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_all().returning(|| Ok(Vec::new()));
        let directory = directory(source);

        assert_eq!(directory.highest_salary().await.expect("salary"), 0);
    }

    #[tokio::test]
    async fn highest_salary_picks_the_maximum() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_all().returning(|| Ok(roster()));
        let directory = directory(source);

        assert_eq!(directory.highest_salary().await.expect("salary"), 90_000);
    }

    #[tokio::test]
    async fn top_earners_sort_descending_by_salary() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_all().returning(|| Ok(roster()));
        let directory = directory(source);

        let names = directory.top_ten_earner_names().await.expect("names");
        assert_eq!(names, ["Bob Johnson", "Jane Smith", "John Doe"]);
    }

    #[tokio::test]
    async fn top_earners_keep_collection_order_on_salary_ties() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_all().returning(|| {
            Ok(vec![
                employee("1", "First Hired", 80_000),
                employee("2", "Second Hired", 80_000),
                employee("3", "Top Earner", 90_000),
            ])
        });
        let directory = directory(source);

        let names = directory.top_ten_earner_names().await.expect("names");
        assert_eq!(names, ["Top Earner", "First Hired", "Second Hired"]);
    }

    #[tokio::test]
    async fn top_earners_truncate_to_ten_names() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_all().returning(|| {
            Ok((0u32..15)
                .map(|n| employee(&n.to_string(), &format!("Employee {n}"), 1_000 + n))
                .collect())
        });
        let directory = directory(source);

        let names = directory.top_ten_earner_names().await.expect("names");
        assert_eq!(names.len(), 10);
        assert_eq!(names.first().map(String::as_str), Some("Employee 14"));
    }

    #[tokio::test]
    async fn get_by_id_caches_found_employees() {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_by_id()
            .times(1)
            .withf(|id| id == "1")
            .returning(|_| Ok(Some(employee("1", "John Doe", 50_000))));
        let directory = directory(source);

        let first = directory.get_by_id("1").await.expect("first");
        let second = directory.get_by_id("1").await.expect("second");
        assert_eq!(first, second);
        assert_eq!(first.map(|e| e.name), Some("John Doe".to_owned()));
    }

    #[tokio::test]
    async fn get_by_id_returns_none_for_unknown_ids() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_by_id().returning(|_| Ok(None));
        let directory = directory(source);

        assert_eq!(directory.get_by_id("missing").await.expect("lookup"), None);
    }

    #[tokio::test]
    async fn create_rejects_invalid_input_without_calling_upstream() {
        let source = MockEmployeeSource::new();
        let directory = directory(source);

        let mut input = valid_input();
        input.age = Some(15);
        let err = directory.create(input).await.expect_err("validation");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(err.message().contains("age"));
    }

    #[tokio::test]
    async fn create_evicts_cache_so_next_list_refetches() {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_all()
            .times(2)
            .returning(|| Ok(roster()));
        source
            .expect_create()
            .times(1)
            .returning(|input| Ok(Some(employee("4", &input.name, input.salary))));
        let directory = directory(source);

        directory.list_all().await.expect("warm cache");
        let created = directory.create(valid_input()).await.expect("create");
        assert_eq!(created.id, "4");
        directory.list_all().await.expect("refetch after write");
    }

    #[tokio::test]
    async fn create_without_upstream_record_is_fatal() {
        let mut source = MockEmployeeSource::new();
        source.expect_create().returning(|_| Ok(None));
        let directory = directory(source);

        let err = directory
            .create(valid_input())
            .await
            .expect_err("creation failed");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "employee creation failed");
    }

    #[tokio::test]
    async fn delete_evicts_cache_so_next_list_refetches() {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_all()
            .times(2)
            .returning(|| Ok(roster()));
        source
            .expect_fetch_by_id()
            .withf(|id| id == "1")
            .returning(|_| Ok(Some(employee("1", "John Doe", 50_000))));
        source
            .expect_delete_by_name()
            .times(1)
            .withf(|name| name == "John Doe")
            .returning(|_| Ok(true));
        let directory = directory(source);

        directory.list_all().await.expect("warm cache");
        let name = directory.delete_by_id("1").await.expect("delete");
        assert_eq!(name, "John Doe");
        directory.list_all().await.expect("refetch after write");
    }

    #[tokio::test]
    async fn delete_of_unknown_id_yields_not_found() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_by_id().returning(|_| Ok(None));
        let directory = directory(source);

        let err = directory
            .delete_by_id("nonexistent")
            .await
            .expect_err("missing employee");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn delete_reported_as_failed_upstream_is_fatal() {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_by_id()
            .returning(|_| Ok(Some(employee("1", "John Doe", 50_000))));
        source.expect_delete_by_name().returning(|_| Ok(false));
        let directory = directory(source);

        let err = directory.delete_by_id("1").await.expect_err("failed");
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.message(), "employee deletion failed");
    }

    // Known limitation: deletion is name-addressed upstream, so deleting by
    // id when two employees share a name may remove either record.
    #[tokio::test]
    async fn delete_is_name_addressed_even_with_duplicate_names() {
        let mut source = MockEmployeeSource::new();
        source
            .expect_fetch_by_id()
            .withf(|id| id == "2")
            .returning(|_| Ok(Some(employee("2", "John Doe", 75_000))));
        source
            .expect_delete_by_name()
            .times(1)
            .withf(|name| name == "John Doe")
            .returning(|_| Ok(true));
        let directory = directory(source);

        let name = directory.delete_by_id("2").await.expect("delete");
        assert_eq!(name, "John Doe");
    }

    #[tokio::test]
    async fn exhausted_retries_keep_their_error_code() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_all().returning(|| {
            Err(EmployeeSourceError::RetriesExhausted {
                attempts: 5,
                message: "upstream rate limited request: status 429".to_owned(),
            })
        });
        let directory = directory(source);

        let err = directory.list_all().await.expect_err("exhausted");
        assert_eq!(err.code(), ErrorCode::RetriesExhausted);
    }

    #[tokio::test]
    async fn non_retryable_upstream_failures_map_to_upstream_error() {
        let mut source = MockEmployeeSource::new();
        source.expect_fetch_all().returning(|| {
            Err(EmployeeSourceError::Decode {
                message: "invalid envelope".to_owned(),
            })
        });
        let directory = directory(source);

        let err = directory.list_all().await.expect_err("decode");
        assert_eq!(err.code(), ErrorCode::UpstreamError);
    }
}
