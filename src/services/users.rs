//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, UpdateUser, User},
    repository::Repository,
    services::auth,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Create a new user
    pub async fn create(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = auth::hash_password(&user.password)?;
        let role = user.role.unwrap_or(Role::User);

        self.repository.users.create(&user, &password_hash, role).await
    }

    /// Update an existing user
    pub async fn update(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        if let Some(ref email) = user.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict("Email already exists".to_string()));
            }
        }

        let password_hash = match user.password {
            Some(ref password) => Some(auth::hash_password(password)?),
            None => None,
        };

        self.repository.users.update(id, &user, password_hash).await
    }

    /// Delete a user
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await
    }
}
