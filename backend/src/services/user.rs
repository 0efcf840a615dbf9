//! User service for authentication and account management
//!
//! Password hashing and verification run on the blocking thread pool.
//! Sign-in failures are uniform: an unknown email and a wrong password
//! produce the same error after the same amount of hashing work.

use crate::auth::{PasswordService, TokenService};
use crate::error::ApiError;
use crate::repositories::{NewUser, Store, StoreError, UserChanges, UserRecord};
use blog_shared::types::{SignInRequest, SignUpRequest, TokenResponse, UpdateUserRequest};
use blog_shared::validation::normalize_email;
use tracing::{error, info};

const RESOURCE: &str = "User";

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and return its id
    pub async fn sign_up(store: &Store, req: SignUpRequest) -> Result<i64, ApiError> {
        let email = normalize_email(&req.email);

        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let id = store
            .users
            .create(NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "create"))?;

        info!(user_id = id, "User registered");
        Ok(id)
    }

    /// Check credentials and issue a token
    pub async fn sign_in(
        store: &Store,
        tokens: &TokenService,
        req: SignInRequest,
    ) -> Result<TokenResponse, ApiError> {
        let email = normalize_email(&req.email);

        let user = match store.users.find_by_email(&email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                PasswordService::verify_dummy(req.password).await;
                return Err(ApiError::InvalidCredentials);
            }
            Err(e) => return Err(ApiError::from_store(e, RESOURCE, "find")),
        };

        let valid = PasswordService::verify_async(req.password, user.password_hash)
            .await
            .map_err(|e| {
                error!(user_id = user.id, "Stored password hash is unusable");
                ApiError::Internal(e)
            })?;

        if !valid {
            return Err(ApiError::InvalidCredentials);
        }

        let token = tokens.issue(user.id).map_err(ApiError::Internal)?;

        info!(user_id = user.id, "User signed in");
        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: tokens.ttl_secs(),
        })
    }

    /// Get a user by id
    pub async fn get(store: &Store, user_id: i64) -> Result<UserRecord, ApiError> {
        store
            .users
            .find_by_id(user_id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "get"))
    }

    /// Get a user by email
    pub async fn get_by_email(store: &Store, email: &str) -> Result<UserRecord, ApiError> {
        store
            .users
            .find_by_email(&normalize_email(email))
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "get"))
    }

    /// List all users
    pub async fn list(store: &Store) -> Result<Vec<UserRecord>, ApiError> {
        store
            .users
            .list()
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "list"))
    }

    /// Update the caller's own account
    pub async fn update(
        store: &Store,
        caller_id: i64,
        req: UpdateUserRequest,
    ) -> Result<UserRecord, ApiError> {
        let password_hash = match req.password {
            Some(password) => Some(
                PasswordService::hash_async(password)
                    .await
                    .map_err(ApiError::Internal)?,
            ),
            None => None,
        };

        let changes = UserChanges {
            name: req.name.map(|n| n.trim().to_string()),
            email: req.email.as_deref().map(normalize_email),
            password_hash,
        };

        let user = store
            .users
            .update(caller_id, changes)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "update"))?;

        info!(user_id = caller_id, "User updated");
        Ok(user)
    }

    /// Delete the caller's own account and everything it owns
    pub async fn delete(store: &Store, caller_id: i64) -> Result<(), ApiError> {
        store
            .users
            .delete(caller_id)
            .await
            .map_err(|e| ApiError::from_store(e, RESOURCE, "delete"))?;

        info!(user_id = caller_id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn tokens() -> TokenService {
        TokenService::new("test-secret", 3600)
    }

    fn sign_up_request(email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            name: Name().fake(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn sign_in_request(email: &str, password: &str) -> SignInRequest {
        SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_stores_hash_not_plaintext() {
        let store = Store::in_memory();
        let email: String = SafeEmail().fake();

        let id = UserService::sign_up(&store, sign_up_request(&email, "secret"))
            .await
            .unwrap();

        let user = UserService::get_by_email(&store, &email).await.unwrap();
        assert_eq!(user.id, id);
        assert_ne!(user.password_hash, "secret");
        assert!(PasswordService::verify("secret", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_conflicts() {
        let store = Store::in_memory();
        UserService::sign_up(&store, sign_up_request("a@x.com", "secret"))
            .await
            .unwrap();

        let err = UserService::sign_up(&store, sign_up_request("A@X.com ", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_sign_in_issues_token_for_user() {
        let store = Store::in_memory();
        let tokens = tokens();
        let id = UserService::sign_up(&store, sign_up_request("a@x.com", "secret"))
            .await
            .unwrap();

        let response = UserService::sign_in(&store, &tokens, sign_in_request("a@x.com", "secret"))
            .await
            .unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);
        assert_eq!(tokens.validate(&response.token), Ok(id));
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_uniform() {
        let store = Store::in_memory();
        let tokens = tokens();
        UserService::sign_up(&store, sign_up_request("a@x.com", "secret"))
            .await
            .unwrap();

        let wrong_password =
            UserService::sign_in(&store, &tokens, sign_in_request("a@x.com", "wrong"))
                .await
                .unwrap_err();
        let unknown_email =
            UserService::sign_in(&store, &tokens, sign_in_request("b@x.com", "secret"))
                .await
                .unwrap_err();

        assert!(matches!(wrong_password, ApiError::InvalidCredentials));
        assert!(matches!(unknown_email, ApiError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_update_rehashes_password_and_keeps_id() {
        let store = Store::in_memory();
        let tokens = tokens();
        let id = UserService::sign_up(&store, sign_up_request("a@x.com", "secret"))
            .await
            .unwrap();

        let updated = UserService::update(
            &store,
            id,
            UpdateUserRequest {
                name: Some("Alice".to_string()),
                email: None,
                password: Some("new-secret".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "Alice");

        assert!(UserService::sign_in(&store, &tokens, sign_in_request("a@x.com", "secret"))
            .await
            .is_err());
        assert!(UserService::sign_in(&store, &tokens, sign_in_request("a@x.com", "new-secret"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let store = Store::in_memory();
        UserService::sign_up(&store, sign_up_request("a@x.com", "secret"))
            .await
            .unwrap();
        let id = UserService::sign_up(&store, sign_up_request("b@x.com", "secret"))
            .await
            .unwrap();

        let err = UserService::update(
            &store,
            id,
            UpdateUserRequest {
                email: Some("a@x.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_user() {
        let store = Store::in_memory();
        let id = UserService::sign_up(&store, sign_up_request("a@x.com", "secret"))
            .await
            .unwrap();

        UserService::delete(&store, id).await.unwrap();

        assert!(matches!(
            UserService::get(&store, id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            UserService::delete(&store, id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
