//! Author management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
};

use super::validated;

/// One page of authors
#[derive(Serialize, ToSchema)]
pub struct AuthorPage {
    pub items: Vec<Author>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Search authors with pagination
#[utoipa::path(
    get,
    path = "/api/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(AuthorQuery),
    responses(
        (status = 200, description = "Page of authors", body = AuthorPage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<AuthorPage>> {
    let (authors, total) = state.services.authors.search(&query).await?;

    Ok(Json(AuthorPage {
        items: authors,
        total,
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }))
}

/// Get author details by ID
#[utoipa::path(
    get,
    path = "/api/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/api/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    Json(author): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = validated(author)?;

    let created = state.services.authors.create(author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Create several authors in one call
#[utoipa::path(
    post,
    path = "/api/authors/batch",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = Vec<CreateAuthor>,
    responses(
        (status = 201, description = "Authors created", body = Vec<Author>),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_authors(
    State(state): State<crate::AppState>,
    Json(authors): Json<Vec<CreateAuthor>>,
) -> AppResult<(StatusCode, Json<Vec<Author>>)> {
    let authors = authors
        .into_iter()
        .map(validated)
        .collect::<AppResult<Vec<_>>>()?;

    let created = state.services.authors.create_many(authors).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an author
#[utoipa::path(
    put,
    path = "/api/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(author): Json<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    let author = validated(author)?;

    let updated = state.services.authors.update(id, author).await?;
    Ok(Json(updated))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/api/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
