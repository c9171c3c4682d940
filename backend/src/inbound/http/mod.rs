//! Inbound HTTP adapter.

pub mod employees;
pub mod error;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;

use actix_web::web;

/// Register the employee routes.
///
/// Routes match in registration order, so the literal `/employee/...` paths
/// must come before the `{id}` catch-alls.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(employees::list_employees)
        .service(employees::search_employees)
        .service(employees::highest_salary)
        .service(employees::top_earner_names)
        .service(employees::create_employee)
        .service(employees::get_employee)
        .service(employees::delete_employee);
}
