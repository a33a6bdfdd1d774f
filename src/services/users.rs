//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{ChangePassword, CreateUser, UpdateProfile, UpdateUser, User, UserClaims, UserDetails},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password and return a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !user.is_active {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        self.repository.users.touch_last_login(user.id).await?;

        let token = self.create_token(&user)?;

        tracing::info!(username = %user.username, "User logged in");

        Ok((token, user))
    }

    /// Build and sign JWT claims for a user
    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Seed an initial administrator account when the user table is empty
    pub async fn bootstrap_admin(&self) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let hash = self.hash_password("admin123")?;
        self.repository
            .users
            .create("admin", &hash, Role::Admin, None, None, None)
            .await?;

        tracing::warn!("Created default administrator account; change its password immediately");

        Ok(())
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<UserDetails> {
        Ok(self.repository.users.get_by_id(id).await?.into())
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<UserDetails> {
        self.repository
            .users
            .get_by_username(username)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }

    /// List all users
    pub async fn list(&self) -> AppResult<Vec<UserDetails>> {
        let users = self.repository.users.list().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    /// Create a user; usernames are unique
    pub async fn create(&self, user: &CreateUser) -> AppResult<UserDetails> {
        if self.repository.users.get_by_username(&user.username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username '{}' already exists",
                user.username
            )));
        }

        let hash = self.hash_password(&user.password)?;

        let created = self
            .repository
            .users
            .create(
                &user.username,
                &hash,
                user.role.unwrap_or(Role::User),
                user.department.as_deref(),
                user.phone.as_deref(),
                user.email.as_deref(),
            )
            .await?;

        tracing::info!(username = %created.username, "User created");

        Ok(created.into())
    }

    /// Update a user (admin operation). The caller identity guards against
    /// self-demotion and self-deactivation.
    pub async fn update(
        &self,
        caller: &UserClaims,
        id: i32,
        changes: &UpdateUser,
    ) -> AppResult<UserDetails> {
        let user = self.repository.users.get_by_id(id).await?;

        let is_self = caller.user_id == user.id;

        if let Some(role) = changes.role {
            if is_self && role != Role::Admin {
                return Err(AppError::InvalidArgument(
                    "Cannot demote your own role".to_string(),
                ));
            }
        }

        if let Some(false) = changes.is_active {
            if is_self {
                return Err(AppError::InvalidArgument(
                    "Cannot deactivate your own account".to_string(),
                ));
            }
        }

        if let Some(ref new_username) = changes.username {
            if *new_username != user.username {
                if self.repository.users.get_by_username(new_username).await?.is_some() {
                    return Err(AppError::Conflict(format!(
                        "Username '{}' already exists",
                        new_username
                    )));
                }
            }
        }

        let password_hash = match changes.password.as_deref() {
            Some(p) if !p.is_empty() => Some(self.hash_password(p)?),
            _ => None,
        };

        let updated = self
            .repository
            .users
            .update(
                id,
                changes.username.as_deref(),
                password_hash.as_deref(),
                changes.role,
                changes.department.as_deref(),
                changes.phone.as_deref(),
                changes.email.as_deref(),
                changes.is_active,
            )
            .await?;

        Ok(updated.into())
    }

    /// Delete a user; refuses self-deletion and removal of the last admin
    pub async fn delete(&self, caller: &UserClaims, id: i32) -> AppResult<()> {
        let user = self.repository.users.get_by_id(id).await?;

        if caller.user_id == user.id {
            return Err(AppError::InvalidArgument(
                "Cannot delete your own account".to_string(),
            ));
        }

        if user.role == Role::Admin {
            let admin_count = self.repository.users.count_admins().await?;
            if admin_count <= 1 {
                return Err(AppError::InvalidArgument(
                    "Cannot delete the last administrator account".to_string(),
                ));
            }
        }

        self.repository.users.delete(id).await?;

        tracing::info!(username = %user.username, "User deleted");

        Ok(())
    }

    /// Update own profile fields
    pub async fn update_profile(&self, user_id: i32, profile: &UpdateProfile) -> AppResult<UserDetails> {
        Ok(self.repository.users.update_profile(user_id, profile).await?.into())
    }

    /// Change own password after verifying the old one
    pub async fn change_password(&self, user_id: i32, change: &ChangePassword) -> AppResult<()> {
        let user = self.repository.users.get_by_id(user_id).await?;

        if !self.verify_password(&user, &change.old_password)? {
            return Err(AppError::Authentication("Old password is incorrect".to_string()));
        }

        let hash = self.hash_password(&change.new_password)?;
        self.repository.users.set_password(user_id, &hash).await
    }
}
