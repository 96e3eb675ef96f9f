//! Authentication service: credential checks and token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    auth::token::TokenAuthenticator,
    error::{AppError, AppResult},
    models::user::{CreateUser, RegisterRequest, Role, User},
    repository::Repository,
};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    tokens: TokenAuthenticator,
}

impl AuthService {
    pub fn new(repository: Repository, tokens: TokenAuthenticator) -> Self {
        Self { repository, tokens }
    }

    /// Authenticate by email and password, returning the user and a fresh
    /// token. Both unknown-email and wrong-password collapse into the same
    /// error so callers cannot probe which credential part failed.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, String)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !verify_password(&user.password, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.tokens.issue(user.id, &user.email, user.role)?;
        Ok((user, token))
    }

    /// Create an account and immediately issue a token for it
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(User, String)> {
        if self
            .repository
            .users
            .email_exists(&request.email, None)
            .await?
        {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let role = request.role.unwrap_or(Role::User);

        let create = CreateUser {
            name: request.name,
            surname: request.surname,
            email: request.email,
            password: request.password,
            address: request.address,
            city: request.city,
            role: Some(role),
        };

        let user = self.repository.users.create(&create, &password_hash, role).await?;
        let token = self.tokens.issue(user.id, &user.email, user.role)?;

        Ok((user, token))
    }

    /// Get the user record behind an authenticated principal
    pub async fn current_user(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_verifies_and_rejects() {
        let hash = hash_password("hunter2-but-longer").unwrap();

        assert!(verify_password(&hash, "hunter2-but-longer").unwrap());
        assert!(!verify_password(&hash, "wrong-password").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();

        assert_ne!(a, b);
    }
}
