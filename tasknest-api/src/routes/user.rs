/// User endpoints
///
/// Registration and login are public; the profile endpoints run behind the
/// access guard and receive the verified identity as an extension.
///
/// # Endpoints
///
/// - `POST /api/user/register` - Register and get a session token
/// - `POST /api/user/login` - Login and get a session token
/// - `GET /api/user/me` - Current user's name and email
/// - `PUT /api/user/profile` - Update name and email
/// - `PUT /api/user/password` - Change password

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tasknest_shared::auth::{guard::AuthUser, password, token};
use tasknest_shared::models::user::{CreateUser, User, UserProfile, UserPublic};
use validator::ValidateEmail;

/// Register request
///
/// Fields are optional so that absent and empty values both surface as the
/// contract's "All fields are required." validation error instead of a
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile update request
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Response carrying a session token and the public user fields
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserPublic,
}

/// Response for the current-user endpoint
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

/// Response for the profile-update endpoint
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: UserPublic,
}

/// Bare success envelope
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/user/register
/// Content-Type: application/json
///
/// {"name": "A", "email": "a@x.com", "password": "password1"}
/// ```
///
/// # Errors
///
/// - `400`: a field is missing or the password is outside 8-16 characters
/// - `409`: the email is already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (name, email, password) = match (req.name, req.email, req.password) {
        (Some(name), Some(email), Some(password))
            if !name.is_empty() && !email.is_empty() && !password.is_empty() =>
        {
            (name, email, password)
        }
        _ => return Err(ApiError::BadRequest("All fields are required.".to_string())),
    };

    if !password::password_length_ok(&password) {
        return Err(ApiError::BadRequest(
            "Password must be between 8 and 16 characters.".to_string(),
        ));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict(
            "User with this email already exists.".to_string(),
        ));
    }

    let password_hash = password::hash_password(&password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name,
            email,
            password_hash,
        },
    )
    .await?;

    let token = token::issue(&user.id, state.jwt_secret(), state.token_ttl())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully.".to_string(),
            token,
            user: user.public(),
        }),
    ))
}

/// Login
///
/// An unknown email and a wrong password produce the identical message, so a
/// caller cannot probe which addresses have accounts.
///
/// # Endpoint
///
/// ```text
/// POST /api/user/login
/// Content-Type: application/json
///
/// {"email": "a@x.com", "password": "password1"}
/// ```
///
/// # Errors
///
/// - `400`: a field is missing
/// - `401`: unknown email or wrong password ("Invalid email or password.")
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (email, password) = match (req.email, req.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Email and password are required.".to_string(),
            ))
        }
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password.".to_string()))?;

    let valid = password::verify_password(&password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password.".to_string(),
        ));
    }

    let token = token::issue(&user.id, state.jwt_secret(), state.token_ttl())?;

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful.".to_string(),
        token,
        user: user.public(),
    }))
}

/// Current user
///
/// # Endpoint
///
/// ```text
/// GET /api/user/me
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `404`: the identity no longer resolves to a stored user
pub async fn current_user(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let user = User::find_by_id(&state.db, &identity.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(Json(CurrentUserResponse {
        success: true,
        message: "Current user fetched successfully.".to_string(),
        user: user.profile(),
    }))
}

/// Update name and email
///
/// # Endpoint
///
/// ```text
/// PUT /api/user/profile
/// Authorization: Bearer <token>
///
/// {"name": "New Name", "email": "new@x.com"}
/// ```
///
/// # Errors
///
/// - `400`: name or email missing, or the email is malformed
/// - `409`: the email belongs to a different user
/// - `404`: the identity no longer resolves to a stored user
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let (name, email) = match (req.name, req.email) {
        (Some(name), Some(email))
            if !name.is_empty() && !email.is_empty() && email.validate_email() =>
        {
            (name, email)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Please provide a valid name and email.".to_string(),
            ))
        }
    };

    if User::email_taken_by_other(&state.db, &email, &identity.id).await? {
        return Err(ApiError::Conflict(
            "Email already in use by another account.".to_string(),
        ));
    }

    let user = User::update_profile(&state.db, &identity.id, &name, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile updated successfully.".to_string(),
        user: user.public(),
    }))
}

/// Change password
///
/// The new password goes through the same length policy as registration.
///
/// # Endpoint
///
/// ```text
/// PUT /api/user/password
/// Authorization: Bearer <token>
///
/// {"currentPassword": "old-pass1", "newPassword": "new-pass1"}
/// ```
///
/// # Errors
///
/// - `400`: a field is missing or the new password is outside 8-16 characters
/// - `401`: the current password does not match
/// - `404`: the identity no longer resolves to a stored user
pub async fn update_password(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Json(req): Json<UpdatePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (current_password, new_password) = match (req.current_password, req.new_password) {
        (Some(current), Some(new)) if !current.is_empty() && !new.is_empty() => (current, new),
        _ => {
            return Err(ApiError::BadRequest(
                "Current and new password are required.".to_string(),
            ))
        }
    };

    if !password::password_length_ok(&new_password) {
        return Err(ApiError::BadRequest(
            "New password must be between 8 and 16 characters.".to_string(),
        ));
    }

    let user = User::find_by_id(&state.db, &identity.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    let valid = password::verify_password(&current_password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect.".to_string(),
        ));
    }

    let password_hash = password::hash_password(&new_password)?;

    let updated = User::update_password(&state.db, &identity.id, &password_hash).await?;
    if !updated {
        return Err(ApiError::NotFound("User not found.".to_string()));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Password updated successfully.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_partial_payloads() {
        // Absent fields deserialize rather than erroring, so the handler can
        // answer with the contract's validation message
        let req: RegisterRequest = serde_json::from_str(r#"{"email": "a@x.com"}"#).unwrap();
        assert!(req.name.is_none());
        assert_eq!(req.email.as_deref(), Some("a@x.com"));
        assert!(req.password.is_none());
    }

    #[test]
    fn test_password_request_uses_camel_case() {
        let req: UpdatePasswordRequest = serde_json::from_str(
            r#"{"currentPassword": "old-pass1", "newPassword": "new-pass1"}"#,
        )
        .unwrap();
        assert_eq!(req.current_password.as_deref(), Some("old-pass1"));
        assert_eq!(req.new_password.as_deref(), Some("new-pass1"));
    }

    #[test]
    fn test_auth_response_shape() {
        let response = AuthResponse {
            success: true,
            message: "Login successful.".to_string(),
            token: "jwt".to_string(),
            user: UserPublic {
                id: tasknest_shared::models::id::RecordId::parse("5f8d0d55b54764421b715f00")
                    .unwrap(),
                name: "A".to_string(),
                email: "a@x.com".to_string(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["token"], "jwt");
        assert_eq!(json["user"]["id"], "5f8d0d55b54764421b715f00");
        assert_eq!(json["user"]["name"], "A");
    }
}
