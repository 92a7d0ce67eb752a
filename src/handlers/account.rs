//! Simulated account endpoints. Nothing is stored and no credentials are checked.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::models::{LoginRequest, RegisterRequest, UserProfile};

fn required(fields: &[(&str, &Option<String>)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

// POST /api/register
pub async fn register(
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let Json(body) = payload?;
    required(&[
        ("firstName", &body.first_name),
        ("lastName", &body.last_name),
        ("email", &body.email),
        ("password", &body.password),
    ])?;

    let user = UserProfile {
        id: uuid::Uuid::new_v4().to_string(),
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email.unwrap_or_default(),
    };
    tracing::info!(user_id = %user.id, "simulated registration");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Registration successful",
            "user": user,
        })),
    ))
}

// POST /api/login
pub async fn login(
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = payload?;
    required(&[("email", &body.email), ("password", &body.password)])?;

    let user = UserProfile {
        id: uuid::Uuid::new_v4().to_string(),
        first_name: None,
        last_name: None,
        email: body.email.unwrap_or_default(),
    };

    Ok(Json(serde_json::json!({
        "message": "Login successful",
        "user": user,
    })))
}
