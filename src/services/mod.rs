//! Business logic services

pub mod auth;
pub mod authors;
pub mod books;
pub mod loans;
pub mod users;

use crate::{
    auth::token::TokenAuthenticator, config::AuthConfig, error::AppResult, repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub tokens: TokenAuthenticator,
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub books: books::BooksService,
    pub authors: authors::AuthorsService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: &AuthConfig) -> AppResult<Self> {
        let tokens = TokenAuthenticator::new(auth_config)?;

        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), tokens.clone()),
            users: users::UsersService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            loans: loans::LoansService::new(repository),
            tokens,
        })
    }
}
