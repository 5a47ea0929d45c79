use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::database::models::{NewUser, User};
use crate::database::queries::UserQueries;
use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
    pub calendar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckUserRequest {
    pub email: Option<String>,
}

/// Save a user, then re-sync the full roster into the vector store.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveUserRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_user = NewUser {
        name: body.name.ok_or_else(|| ApiError::missing_field("name"))?,
        email: body.email.ok_or_else(|| ApiError::missing_field("email"))?,
        about: body.about.unwrap_or_default(),
        calendar: body.calendar.unwrap_or_default(),
    };

    let user = UserQueries::create(state.database.pool(), new_user).await?;

    let all_users = UserQueries::list_all(state.database.pool()).await?;
    state.ingestor.sync_roster(&all_users).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User saved successfully", "id": user.id })),
    ))
}

/// All users, oldest first.
pub async fn all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserQueries::list_all(state.database.pool()).await?;
    Ok(Json(users))
}

/// Look up a user by email. Emails are unique by convention only.
pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = body.email.ok_or_else(|| ApiError::missing_field("email"))?;

    let user = UserQueries::find_by_email(state.database.pool(), &email)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No user found with the provided email.".to_string())
        })?;

    Ok(Json(json!({ "message": "User exists", "user": user })))
}
