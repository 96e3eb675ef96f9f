//! API handlers for Libris REST endpoints

pub mod auth;
pub mod authors;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod users;

use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run declarative validation on a request body
fn validated<T: Validate>(value: T) -> AppResult<T> {
    value
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(value)
}
