//! Shared application state injected into the HTTP handlers.

use std::sync::Arc;

use crate::domain::EmployeeDirectory;

/// State handed to every handler via `web::Data`.
#[derive(Clone)]
pub struct HttpState {
    pub directory: Arc<EmployeeDirectory>,
}

impl HttpState {
    #[must_use]
    pub fn new(directory: Arc<EmployeeDirectory>) -> Self {
        Self { directory }
    }
}
