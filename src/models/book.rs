//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    /// Display name of the author
    pub author: Option<String>,
    pub content: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
    pub available: bool,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub author: Option<String>,
    pub content: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
    pub available: Option<bool>,
}

/// Update book request; replaces the stored record field for field
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub author: Option<String>,
    pub content: Option<String>,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
    pub available: bool,
}
