//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod loans;
pub mod users;

use sqlx::{Pool, Postgres};

/// Per-entity repositories sharing one connection pool
#[derive(Clone)]
pub struct Repository {
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub loans: loans::LoansRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool),
        }
    }
}
