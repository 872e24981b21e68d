//! Authentication handlers

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::middleware::auth::UserContext;
use crate::models::{User, UserInfo};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub email: String,
    pub exp: usize, // Expiration timestamp
    pub iat: usize, // Issued at
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    req.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    if req.password != req.confirm_password {
        return Err(AppError::ValidationError(
            "Passwords do not match".to_string(),
        ));
    }

    // Check if email already exists
    if User::find_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(AppError::AlreadyExists(
            "Email already registered".to_string(),
        ));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .to_string();

    let user = User::create(&state.pool, &req.email, &password_hash).await?;

    tracing::info!("New user registered: {} ({})", user.email, user.id);

    let token = generate_jwt(&user, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    Ok(Json(TokenResponse {
        token,
        user: user.to_info(),
    }))
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    // Find user by email
    let user = User::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    // Update last login
    User::update_last_login(&state.pool, user.id).await?;

    // Generate JWT
    let token = generate_jwt(&user, &state.config.jwt_secret, state.config.jwt_expiration_hours)?;

    Ok(Json(TokenResponse {
        token,
        user: user.to_info(),
    }))
}

/// Current user profile
pub async fn profile(
    State(state): State<AppState>,
    ctx: UserContext,
) -> AppResult<Json<UserInfo>> {
    let user = User::find_by_id(&state.pool, ctx.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(user.to_info()))
}

/// Generate JWT token
fn generate_jwt(user: &User, secret: &str, expiration_hours: u64) -> AppResult<String> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiration_hours as i64);

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use uuid::Uuid;

    #[test]
    fn jwt_round_trips_claims() {
        let user = User {
            id: Uuid::new_v4(),
            email: "someone@example.test".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
            last_login: None,
        };

        let token = generate_jwt(&user, "secret", 1).unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, user.id.to_string());
        assert_eq!(data.claims.email, user.email);
        assert!(data.claims.exp > data.claims.iat);
    }

    #[test]
    fn register_request_rejects_malformed_email() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
