//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Search authors by name and nationality with pagination
    pub async fn search(&self, query: &AuthorQuery) -> AppResult<(Vec<Author>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let name_filter = query.name.as_ref().map(|n| format!("%{}%", n));

        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT * FROM authors
            WHERE ($1::text IS NULL OR first_name ILIKE $1 OR last_name ILIKE $1)
              AND ($2::text IS NULL OR nationality = $2)
            ORDER BY last_name, first_name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&name_filter)
        .bind(&query.nationality)
        .bind(per_page)
        .bind((page - 1) * per_page)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM authors
            WHERE ($1::text IS NULL OR first_name ILIKE $1 OR last_name ILIKE $1)
              AND ($2::text IS NULL OR nationality = $2)
            "#,
        )
        .bind(&name_filter)
        .bind(&query.nationality)
        .fetch_one(&self.pool)
        .await?;

        Ok((authors, total))
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, biography, nationality)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.biography)
        .bind(&author.nationality)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Create several authors in one transaction
    pub async fn create_many(&self, authors: &[CreateAuthor]) -> AppResult<Vec<Author>> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(authors.len());

        for author in authors {
            let row = sqlx::query_as::<_, Author>(
                r#"
                INSERT INTO authors (first_name, last_name, biography, nationality)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(&author.first_name)
            .bind(&author.last_name)
            .bind(&author.biography)
            .bind(&author.nationality)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Replace an author's fields
    pub async fn update(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        let updated = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET
                first_name = $2,
                last_name = $3,
                biography = $4,
                nationality = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.biography)
        .bind(&author.nationality)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        Ok(updated)
    }

    /// Delete an author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Author with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
