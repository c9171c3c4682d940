//! Transport-agnostic employee directory core.

pub mod directory;
pub mod employee;
pub mod error;
pub mod ports;

pub use directory::EmployeeDirectory;
pub use employee::{Employee, EmployeeInput, FieldViolation, ValidEmployeeInput};
pub use error::{DomainError, ErrorCode};
