//! Loan management service

use crate::{
    error::AppResult,
    models::loan::{CreateLoan, Loan},
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.repository.loans.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        self.repository.loans.get_by_id(id).await
    }

    pub async fn get_user_loans(&self, user_id: i32) -> AppResult<Vec<Loan>> {
        // 404 on unknown user rather than an empty list
        self.repository.users.get_by_id(user_id).await?;
        self.repository.loans.get_user_loans(user_id).await
    }

    pub async fn create(&self, loan: CreateLoan) -> AppResult<Loan> {
        self.repository.loans.create(&loan).await
    }

    pub async fn return_loan(&self, id: i32) -> AppResult<Loan> {
        self.repository.loans.return_loan(id).await
    }
}
