//! API request and response types

use crate::validation::{
    check, check_optional, validate_body, validate_email, validate_name, validate_password,
    validate_reference_id, validate_title, ValidateInput, ValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request
///
/// Missing fields deserialize as empty strings so they surface as
/// validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl ValidateInput for SignUpRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        check("name", validate_name(&self.name))?;
        check("email", validate_email(&self.email))?;
        check("password", validate_password(&self.password))
    }
}

/// Registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub id: i64,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl ValidateInput for SignInRequest {
    // Only presence is checked; format failures must look like bad credentials.
    fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::new("email", "Email is required"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "Password is required"));
        }
        Ok(())
    }
}

/// Authentication token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// User Types
// ============================================================================

/// Public user profile, never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Partial update of the caller's own account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ValidateInput for UpdateUserRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_none() && self.email.is_none() && self.password.is_none() {
            return Err(ValidationError::new("request", "At least one field must be provided"));
        }
        check_optional("name", self.name.as_deref(), validate_name)?;
        check_optional("email", self.email.as_deref(), validate_email)?;
        check_optional("password", self.password.as_deref(), validate_password)
    }
}

// ============================================================================
// Post Types
// ============================================================================

/// Create post request
///
/// Has no owner field: the owner is always the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl ValidateInput for CreatePostRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        check("title", validate_title(&self.title))?;
        check("body", validate_body(&self.body))
    }
}

/// Partial update of a post
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ValidateInput for UpdatePostRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_content_update(self.title.as_deref(), self.body.as_deref())
    }
}

/// Post response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Comment Types
// ============================================================================

/// Create comment request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub post_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl ValidateInput for CreateCommentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        check("post_id", validate_reference_id(self.post_id))?;
        check("title", validate_title(&self.title))?;
        check("body", validate_body(&self.body))
    }
}

/// Partial update of a comment; the parent post cannot change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ValidateInput for UpdateCommentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_content_update(self.title.as_deref(), self.body.as_deref())
    }
}

/// Comment response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub user_id: i64,
    pub post_id: i64,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

fn validate_content_update(title: Option<&str>, body: Option<&str>) -> Result<(), ValidationError> {
    if title.is_none() && body.is_none() {
        return Err(ValidationError::new("request", "At least one of title or body must be provided"));
    }
    check_optional("title", title, validate_title)?;
    check_optional("body", body, validate_body)
}
