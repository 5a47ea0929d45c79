use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::database::models::{Company, NewCompany};
use crate::database::queries::{ChatQueries, CompanyQueries};
use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCompanyRequest {
    pub company_name: Option<String>,
    pub employer_email: Option<String>,
    pub industry: Option<String>,
    pub number_of_workers: Option<i64>,
    pub bot_name: Option<String>,
    pub core_values: Option<String>,
    pub bot_tone: Option<String>,
    pub bot_personality: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckCompanyRequest {
    pub employer_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyChatRequest {
    pub chat: Option<String>,
}

/// Save a company profile.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveCompanyRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new_company = NewCompany {
        company_name: body
            .company_name
            .ok_or_else(|| ApiError::missing_field("companyName"))?,
        employer_email: body
            .employer_email
            .ok_or_else(|| ApiError::missing_field("employerEmail"))?,
        industry: body.industry.unwrap_or_default(),
        number_of_workers: body.number_of_workers.unwrap_or_default(),
        bot_name: body.bot_name.unwrap_or_default(),
        core_values: body.core_values.unwrap_or_default(),
        bot_tone: body.bot_tone.unwrap_or_default(),
        bot_personality: body.bot_personality.unwrap_or_default(),
    };

    let company = CompanyQueries::create(state.database.pool(), new_company).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Company saved successfully", "id": company.id })),
    ))
}

/// All companies, oldest first.
pub async fn all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Company>>, ApiError> {
    let companies = CompanyQueries::list_all(state.database.pool()).await?;
    Ok(Json(companies))
}

/// Look up a company by employer email.
pub async fn check(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CheckCompanyRequest>,
) -> Result<Json<Value>, ApiError> {
    let employer_email = body
        .employer_email
        .ok_or_else(|| ApiError::missing_field("employerEmail"))?;

    let company = CompanyQueries::find_by_employer_email(state.database.pool(), &employer_email)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(
                "No company found with the provided employer email.".to_string(),
            )
        })?;

    Ok(Json(json!({ "message": "Company exists", "company": company })))
}

/// Append to the chat transcript, then re-sync the whole transcript into
/// the vector store. Every write re-embeds the full transcript.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CompanyChatRequest>,
) -> Result<Json<Value>, ApiError> {
    let chat = body.chat.ok_or_else(|| ApiError::missing_field("chat"))?;

    ChatQueries::create(state.database.pool(), &chat).await?;

    let transcript = ChatQueries::list_all(state.database.pool()).await?;
    state.ingestor.sync_transcript(&transcript).await?;

    Ok(Json(json!({ "message": "Chat saved successfully" })))
}
