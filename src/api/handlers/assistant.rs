use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::{requests::AssistantRequest, responses::AssistantResponse};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

const SYSTEM_INSTRUCTION: &str = "You are a concise booking assistant for a vacation-rental \
listing. Answer only from the listing facts provided. If the answer is not in the facts, say \
you don't know and suggest contacting the host.";

pub async fn ask_assistant(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Path(property_id): Path<String>,
    Json(payload): Json<AssistantRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.question.trim().is_empty() {
        return Err(AppError::Validation("question must not be empty".into()));
    }
    if state.config.assistant_api_key.is_empty() {
        return Err(AppError::Validation("Assistant is not configured".into()));
    }

    let property = state.property_repo.find_by_id(&property_id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;

    if !property.is_published {
        return Err(AppError::NotFound("Property not found".into()));
    }

    let prompt = format!(
        "Listing facts:\n\
         Title: {}\n\
         Location: {}\n\
         Description: {}\n\
         Nightly price (cents): {}\n\
         Cleaning fee (cents): {}\n\
         Service fee (cents): {}\n\
         Max guests: {}\n\n\
         Guest question: {}",
        property.title,
        property.location,
        property.description,
        property.nightly_price_cents,
        property.cleaning_fee_cents.unwrap_or(0),
        property.service_fee_cents.unwrap_or(0),
        property.max_guests,
        payload.question,
    );

    info!("Assistant question for property {}", property.id);
    let answer = state.llm_service
        .generate(&state.config.assistant_api_key, &prompt, SYSTEM_INSTRUCTION)
        .await?;

    Ok(Json(AssistantResponse { answer }))
}
