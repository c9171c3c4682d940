//! Employee records and create-request validation.
//!
//! [`EmployeeInput`] is the unvalidated payload as received from a caller;
//! [`EmployeeInput::validate`] either produces a [`ValidEmployeeInput`] ready
//! to send upstream or a single invalid-request error aggregating every
//! violated field.

use serde_json::json;

use super::{DomainError, ErrorCode};

/// Name length limit for created employees.
pub const MAX_NAME_LENGTH: usize = 100;
/// Title length limit for created employees.
pub const MAX_TITLE_LENGTH: usize = 200;
/// Inclusive age bounds for created employees.
pub const AGE_RANGE: std::ops::RangeInclusive<i64> = 16..=75;

/// One employee record as exposed by the upstream service.
///
/// Records are immutable once fetched; a delete conceptually destroys the
/// record and any change is observed only through a full re-fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    /// Opaque unique identifier assigned upstream.
    pub id: String,
    /// Display name. Searches match against this field.
    pub name: String,
    /// Non-negative salary.
    pub salary: u32,
    /// Age within [16, 75].
    pub age: u8,
    /// Job title.
    pub title: String,
    /// Contact email assigned upstream.
    pub email: String,
}

/// Unvalidated create-request payload.
///
/// All fields are optional here so that missing and out-of-range fields can
/// be reported together in one aggregated validation error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeInput {
    pub name: Option<String>,
    pub salary: Option<i64>,
    pub age: Option<i64>,
    pub title: Option<String>,
}

/// Create-request payload that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEmployeeInput {
    pub name: String,
    pub salary: u32,
    pub age: u8,
    pub title: String,
}

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl EmployeeInput {
    /// Validate the payload, aggregating every violation.
    ///
    /// Violations are reported in stable field declaration order (name,
    /// salary, age, title) and joined into one invalid-request error; the
    /// per-field breakdown travels in the error details.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode::InvalidRequest`] error when any field is
    /// missing, blank, or out of range.
    pub fn validate(self) -> Result<ValidEmployeeInput, DomainError> {
        let mut violations = Vec::new();

        let name = validate_text(self.name, "name", MAX_NAME_LENGTH, &mut violations);
        let salary = validate_salary(self.salary, &mut violations);
        let age = validate_age(self.age, &mut violations);
        let title = validate_text(self.title, "title", MAX_TITLE_LENGTH, &mut violations);

        match (name, salary, age, title) {
            (Some(name), Some(salary), Some(age), Some(title)) if violations.is_empty() => {
                Ok(ValidEmployeeInput {
                    name,
                    salary,
                    age,
                    title,
                })
            }
            _ => Err(aggregate_violations(&violations)),
        }
    }
}

fn validate_text(
    value: Option<String>,
    field: &'static str,
    max_length: usize,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let Some(value) = value else {
        violations.push(FieldViolation::new(field, format!("{field} is required")));
        return None;
    };
    if value.trim().is_empty() {
        violations.push(FieldViolation::new(
            field,
            format!("{field} must not be blank"),
        ));
        return None;
    }
    if value.chars().count() > max_length {
        violations.push(FieldViolation::new(
            field,
            format!("{field} must not exceed {max_length} characters"),
        ));
        return None;
    }
    Some(value)
}

fn validate_salary(value: Option<i64>, violations: &mut Vec<FieldViolation>) -> Option<u32> {
    let Some(value) = value else {
        violations.push(FieldViolation::new("salary", "salary is required"));
        return None;
    };
    if value < 1 {
        violations.push(FieldViolation::new(
            "salary",
            "salary must be greater than zero",
        ));
        return None;
    }
    match u32::try_from(value) {
        Ok(salary) => Some(salary),
        Err(_) => {
            violations.push(FieldViolation::new("salary", "salary is out of range"));
            None
        }
    }
}

fn validate_age(value: Option<i64>, violations: &mut Vec<FieldViolation>) -> Option<u8> {
    let Some(value) = value else {
        violations.push(FieldViolation::new("age", "age is required"));
        return None;
    };
    if value < *AGE_RANGE.start() {
        violations.push(FieldViolation::new("age", "age must be at least 16"));
        return None;
    }
    if value > *AGE_RANGE.end() {
        violations.push(FieldViolation::new("age", "age must be at most 75"));
        return None;
    }
    u8::try_from(value).ok()
}

fn aggregate_violations(violations: &[FieldViolation]) -> DomainError {
    let message = violations
        .iter()
        .map(|violation| violation.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let details = violations
        .iter()
        .map(|violation| json!({ "field": violation.field, "message": violation.message }))
        .collect::<Vec<_>>();
    DomainError::invalid_request(message).with_details(json!(details))
}
