//! Loans repository for database operations

use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, LoanStatus},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all loans
    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(loans)
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loans for a user
    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<Loan>> {
        let loans =
            sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE user_id = $1 ORDER BY loan_date")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(loans)
    }

    /// Create a loan and mark the book unavailable, atomically
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let available: Option<bool> =
            sqlx::query_scalar("SELECT available FROM books WHERE id = $1 FOR UPDATE")
                .bind(loan.book_id)
                .fetch_optional(&mut *tx)
                .await?;

        let available = available.ok_or_else(|| {
            AppError::NotFound(format!("Book with id {} not found", loan.book_id))
        })?;

        if !available {
            return Err(AppError::BusinessRule("Book is not available".to_string()));
        }

        let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(loan.user_id)
            .fetch_one(&mut *tx)
            .await?;

        if !user_exists {
            return Err(AppError::NotFound(format!(
                "User with id {} not found",
                loan.user_id
            )));
        }

        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id, loan_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(loan.user_id)
        .bind(loan.book_id)
        .bind(Utc::now().date_naive())
        .bind(LoanStatus::Active)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET available = FALSE WHERE id = $1")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Return a loan and mark the book available again, atomically
    pub async fn return_loan(&self, loan_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
            .bind(loan_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", loan_id)))?;

        if loan.status == LoanStatus::Returned {
            return Err(AppError::BusinessRule("Loan already returned".to_string()));
        }

        let returned = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET status = $2, return_date = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(loan_id)
        .bind(LoanStatus::Returned)
        .bind(Utc::now().date_naive())
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET available = TRUE WHERE id = $1")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(returned)
    }
}
