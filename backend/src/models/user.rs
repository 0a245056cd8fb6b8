//! Models for user accounts, groups, and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail};

use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};
use crate::validation::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
/// Role lookup rows seeded at startup and referenced by users.
pub enum UserGroupName {
    #[default]
    User,
    Admin,
}

impl UserGroupName {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserGroupName::User => "user",
            UserGroupName::Admin => "admin",
        }
    }
}

impl Serialize for UserGroupName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserGroupName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "user" | "USER" => Ok(UserGroupName::User),
            "admin" | "ADMIN" => Ok(UserGroupName::Admin),
            other => Err(serde::de::Error::unknown_variant(other, &["user", "admin"])),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserGroup {
    pub id: i64,
    pub name: UserGroupName,
}

/// Database representation of a user account.
///
/// The hash is write-only: there is no public getter and no `Serialize`
/// impl, so it cannot leak through logs or response bodies. Persistence
/// reads it through a crate-private accessor.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    hashed_password: String,
    pub is_active: bool,
    pub group_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Replaces the stored credential after validating password strength.
    pub fn set_password(&mut self, raw_password: &str) -> Result<(), AppError> {
        let violations = rules::password_strength_violations(raw_password);
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }
        self.hashed_password = hash_password(raw_password)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn verify_password(&self, raw_password: &str) -> anyhow::Result<bool> {
        verify_password(raw_password, &self.hashed_password)
    }

    /// Persistence-layer access to the stored hash. Not part of the public
    /// API surface of the domain object.
    pub(crate) fn hashed_password(&self) -> &str {
        &self.hashed_password
    }
}

/// A not-yet-persisted user; produced by [`NewUser::create`], which is the
/// only way to attach a credential to a new account.
#[derive(Debug)]
pub struct NewUser {
    pub email: String,
    hashed_password: String,
    pub group_id: i64,
}

impl NewUser {
    /// Normalizes the email, validates it and the password policy, and
    /// hashes the credential. Fails with field-level detail on violation.
    pub fn create(email: &str, raw_password: &str, group_id: i64) -> Result<Self, AppError> {
        let email = email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(AppError::Validation(vec![
                "email: invalid email address".to_string()
            ]));
        }

        let violations = rules::password_strength_violations(raw_password);
        if !violations.is_empty() {
            return Err(AppError::Validation(violations));
        }

        Ok(Self {
            email,
            hashed_password: hash_password(raw_password)?,
            group_id,
        })
    }

    pub(crate) fn hashed_password(&self) -> &str {
        &self.hashed_password
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for registering a new account.
pub struct RegisterRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(custom(function = "rules::validate_password_strength"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Tokens returned after a successful login.
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl LoginResponse {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenRefreshResponse {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for requesting a password reset token.
pub struct PasswordResetRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
/// Payload for the email-only reset path. Weaker than a token-checked
/// reset; gate behind deployment policy.
pub struct PasswordResetCompleteRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(custom(function = "rules::validate_password_strength"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a registered user.
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_group_name_serde_round_trip() {
        let user: UserGroupName = serde_json::from_str("\"user\"").unwrap();
        let admin: UserGroupName = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(user, UserGroupName::User);
        assert_eq!(admin, UserGroupName::Admin);
        assert_eq!(serde_json::to_string(&UserGroupName::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn new_user_normalizes_email() {
        let new_user = NewUser::create("Shopper@Example.COM", "Str0ng!pass", 1).unwrap();
        assert_eq!(new_user.email, "shopper@example.com");
    }

    #[test]
    fn new_user_rejects_invalid_email() {
        let err = NewUser::create("not-an-email", "Str0ng!pass", 1).unwrap_err();
        match err {
            AppError::Validation(errors) => assert!(errors[0].contains("email")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn new_user_rejects_weak_password_with_all_rules() {
        let err = NewUser::create("shopper@example.com", "short", 1).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.contains("8 characters")));
                assert!(errors.iter().any(|e| e.contains("uppercase")));
                assert!(errors.iter().any(|e| e.contains("digit")));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn set_password_rehashes_and_verifies() {
        let now = Utc::now();
        let mut user = User {
            id: 1,
            email: "shopper@example.com".to_string(),
            hashed_password: hash_password("0ld!Passw").unwrap(),
            is_active: true,
            group_id: 1,
            created_at: now,
            updated_at: now,
        };

        user.set_password("N3w!Passw").unwrap();
        assert!(user.verify_password("N3w!Passw").unwrap());
        assert!(!user.verify_password("0ld!Passw").unwrap());

        let err = user.set_password("weak").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
