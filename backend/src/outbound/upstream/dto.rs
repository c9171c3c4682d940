//! Wire types for the upstream employee service.
//!
//! Every upstream response arrives wrapped in a `{data, status}` envelope.
//! The employee payload uses `employee_*` field names on the wire; these
//! DTOs own that mapping so the domain types stay transport-free.

use serde::{Deserialize, Serialize};

use crate::domain::{Employee, ValidEmployeeInput};

/// Upstream response envelope.
///
/// `data` is absent both for failed mutations and for empty reads; callers
/// decide what absence means per operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One employee record as serialized by the upstream service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDto {
    pub id: String,
    #[serde(rename = "employee_name")]
    pub name: String,
    #[serde(rename = "employee_salary")]
    pub salary: u32,
    #[serde(rename = "employee_age")]
    pub age: u8,
    #[serde(rename = "employee_title")]
    pub title: String,
    #[serde(rename = "employee_email")]
    pub email: String,
}

impl From<EmployeeDto> for Employee {
    fn from(dto: EmployeeDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            salary: dto.salary,
            age: dto.age,
            title: dto.title,
            email: dto.email,
        }
    }
}

/// Create-request body accepted by the upstream service.
#[derive(Debug, Clone, Serialize)]
pub struct CreateEmployeeBody<'a> {
    pub name: &'a str,
    pub salary: u32,
    pub age: u8,
    pub title: &'a str,
}

impl<'a> From<&'a ValidEmployeeInput> for CreateEmployeeBody<'a> {
    fn from(input: &'a ValidEmployeeInput) -> Self {
        Self {
            name: &input.name,
            salary: input.salary,
            age: input.age,
            title: &input.title,
        }
    }
}

/// Delete-request body; upstream deletion is addressed by name.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteEmployeeBody<'a> {
    pub name: &'a str,
}
