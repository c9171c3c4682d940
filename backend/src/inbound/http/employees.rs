//! Employee route handlers.
//!
//! Thin translation layer: decode path and body inputs, call the directory,
//! and encode domain results into the wire shapes. All policy (caching,
//! validation, upstream access) lives behind [`EmployeeDirectory`].

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::state::HttpState;
use crate::domain::{DomainError, Employee, EmployeeInput, ErrorCode};

/// One employee as serialized on responses.
///
/// Field names follow the upstream wire convention so callers see one
/// consistent shape on both sides of the facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
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

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            salary: employee.salary,
            age: employee.age,
            title: employee.title,
            email: employee.email,
        }
    }
}

/// Create-request body accepted on `POST /employee`.
///
/// Every field is optional at the wire level; the domain validator reports
/// all violations at once rather than failing on the first missing field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: Option<String>,
    pub salary: Option<i64>,
    pub age: Option<i64>,
    pub title: Option<String>,
}

impl From<CreateEmployeeRequest> for EmployeeInput {
    fn from(request: CreateEmployeeRequest) -> Self {
        Self {
            name: request.name,
            salary: request.salary,
            age: request.age,
            title: request.title,
        }
    }
}

fn to_responses(employees: Vec<Employee>) -> Vec<EmployeeResponse> {
    employees.into_iter().map(EmployeeResponse::from).collect()
}

#[get("/employee")]
pub async fn list_employees(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let employees = state.directory.list_all().await?;
    Ok(HttpResponse::Ok().json(to_responses(employees)))
}

#[get("/employee/search/{name}")]
pub async fn search_employees(
    state: web::Data<HttpState>,
    name: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let term = name.trim().to_owned();
    if term.is_empty() {
        return Err(ApiError::invalid_request("search term must not be blank"));
    }
    let employees = state.directory.search_by_name(&term).await?;
    Ok(HttpResponse::Ok().json(to_responses(employees)))
}

#[get("/employee/highestSalary")]
pub async fn highest_salary(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let salary = state.directory.highest_salary().await?;
    Ok(HttpResponse::Ok().json(salary))
}

#[get("/employee/topTenHighestEarningEmployeeNames")]
pub async fn top_earner_names(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let names = state.directory.top_ten_earner_names().await?;
    Ok(HttpResponse::Ok().json(names))
}

#[get("/employee/{id}")]
pub async fn get_employee(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = id.trim().to_owned();
    if id.is_empty() {
        return Err(ApiError::invalid_request("employee id must not be blank"));
    }
    match state.directory.get_by_id(&id).await? {
        Some(employee) => Ok(HttpResponse::Ok().json(EmployeeResponse::from(employee))),
        None => Err(ApiError::from(DomainError::not_found("employee not found"))),
    }
}

#[post("/employee")]
pub async fn create_employee(
    state: web::Data<HttpState>,
    body: web::Json<CreateEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    let employee = state
        .directory
        .create(EmployeeInput::from(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

#[delete("/employee/{id}")]
pub async fn delete_employee(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = id.trim().to_owned();
    if id.is_empty() {
        return Err(ApiError::invalid_request("employee id must not be blank"));
    }
    match state.directory.delete_by_id(&id).await {
        Ok(name) => Ok(HttpResponse::Ok().json(name)),
        // Deleting an unknown id is reported as a server-side failure on the
        // wire; the domain still distinguishes the two for logging.
        Err(error) if error.code() == ErrorCode::NotFound => Err(ApiError::from(
            DomainError::internal("employee deletion failed"),
        )),
        Err(error) => Err(ApiError::from(error)),
    }
}
