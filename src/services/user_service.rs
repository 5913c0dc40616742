use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthError, IdentityClaims};
use crate::database::{DatabaseError, NewUser, Store, User};

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Account creation and credential checks
#[derive(Clone)]
pub struct UserService {
    store: Store,
}

impl UserService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> Result<User, DatabaseError> {
        self.store.users().get(id).await
    }

    /// Existing users are matched by email and get their profile refreshed
    pub async fn login_with_identity(&self, claims: &IdentityClaims) -> Result<User, UserError> {
        let users = self.store.users();
        if let Some(existing) = users.find_by_email(&claims.email).await? {
            let user = users
                .update_profile(
                    existing.id,
                    &claims.name,
                    claims.picture.as_deref(),
                    &claims.subject,
                )
                .await?;
            return Ok(user);
        }

        let user = users
            .create(&NewUser {
                name: claims.name.clone(),
                email: claims.email.clone(),
                picture: claims.picture.clone(),
                password_hash: None,
                provider_subject: Some(claims.subject.clone()),
            })
            .await?;
        tracing::info!("Created user {} on first login", user.id);
        Ok(user)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, UserError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(UserError::Validation("Name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(UserError::Validation("A valid email is required".to_string()));
        }
        if password.len() < 8 {
            return Err(UserError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let user = self
            .store
            .users()
            .create(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                picture: None,
                password_hash: Some(hash_password(password)?),
                provider_subject: None,
            })
            .await?;
        tracing::info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Email + password check for HTTP Basic token issuance
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = self
            .store
            .users()
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        verify_password(password, hash)?;
        Ok(user)
    }
}
