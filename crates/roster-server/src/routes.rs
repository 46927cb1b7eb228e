use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use roster_core::domain::{
    Participant, ParticipantDraft, ParticipantId, Payment, RegistrationQuery,
};
use roster_core::dto::{BadgeCardDto, ParticipantStats, PaymentSummaryDto, RegistrationCheckDto};
use roster_core::fields::map_fields;
use roster_core::rules::validate_registration;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "roster";

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    timestamp: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such endpoint".to_string())
}

pub async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<BadgeCardDto>>, ApiError> {
    let participants = state.with_store(|store| store.participants().list()).await?;
    Ok(Json(badge_cards(&participants)))
}

#[derive(Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

pub async fn search_participants(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<BadgeCardDto>>, ApiError> {
    let term = params
        .q
        .ok_or_else(|| ApiError::BadRequest("q parameter required".to_string()))?;
    let participants = state
        .with_store(move |store| store.participants().search(&term))
        .await?;
    Ok(Json(badge_cards(&participants)))
}

pub async fn participant_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<BadgeCardDto>, ApiError> {
    badge_by_email(&state, email).await
}

#[derive(Deserialize)]
pub struct EmailBody {
    email: Option<String>,
}

pub async fn participant_by_email_body(
    State(state): State<AppState>,
    body: Result<Json<EmailBody>, JsonRejection>,
) -> Result<Json<BadgeCardDto>, ApiError> {
    let Json(body) = body.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let email = body
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("email is required".to_string()))?;
    badge_by_email(&state, email).await
}

async fn badge_by_email(state: &AppState, email: String) -> Result<Json<BadgeCardDto>, ApiError> {
    let participant = state
        .with_store(move |store| store.participants().get_by_email(&email))
        .await?
        .ok_or_else(|| ApiError::NotFound("participant not found".to_string()))?;
    Ok(Json(BadgeCardDto::from(&participant)))
}

pub async fn participant_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BadgeCardDto>, ApiError> {
    let participant = find_participant(&state, &id).await?;
    Ok(Json(BadgeCardDto::from(&participant)))
}

pub async fn participant_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    let participant = find_participant(&state, &id).await?;
    let payments = state
        .with_store(move |store| store.payments().list_for_participant(participant.id))
        .await?;
    Ok(Json(payments))
}

pub async fn count(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state.with_store(|store| store.participants().count()).await?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    participants: ParticipantStats,
    payments: Vec<PaymentSummaryDto>,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let (participants, payments) = state
        .with_store(|store| Ok((store.participants().stats()?, store.payments().summary()?)))
        .await?;
    Ok(Json(StatsResponse {
        participants,
        payments,
    }))
}

#[derive(Deserialize)]
pub struct CheckParams {
    email: Option<String>,
    phone: Option<String>,
}

pub async fn check_registration(
    State(state): State<AppState>,
    Query(params): Query<CheckParams>,
) -> Result<Json<RegistrationCheckDto>, ApiError> {
    let query = RegistrationQuery::new(params.email.as_deref(), params.phone.as_deref())?;
    let found = state
        .with_store(move |store| store.participants().find_registration(&query))
        .await?;
    debug!(registered = found.is_registered(), "registration check");
    Ok(Json(RegistrationCheckDto::from(&found)))
}

pub async fn list_registrations(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let registrations = state
        .with_store(|store| store.participants().list_registrations())
        .await?;
    Ok(Json(json!({
        "success": true,
        "count": registrations.len(),
        "data": registrations,
    })))
}

pub async fn create_registration(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let Value::Object(raw) = body else {
        return Err(ApiError::BadRequest("expected a JSON object".to_string()));
    };

    let conversion = ParticipantDraft::from_record(&map_fields(&raw), state.phone_policy());
    for warning in &conversion.warnings {
        debug!(%warning, "registration field dropped");
    }

    let issues = validate_registration(&conversion.draft);
    if !issues.is_empty() {
        return Err(ApiError::Validation(
            issues.iter().map(ToString::to_string).collect(),
        ));
    }

    let now = Utc::now().timestamp();
    let draft = conversion.draft;
    let participant = state
        .with_store(move |store| store.participants().create(now, draft))
        .await?;
    info!(id = %participant.id, "registration saved");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "registration saved",
            "data": { "id": participant.id },
        })),
    ))
}

pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let participant = find_participant(&state, &id).await?;
    Ok(Json(json!({ "success": true, "data": participant })))
}

async fn find_participant(state: &AppState, raw_id: &str) -> Result<Participant, ApiError> {
    let id: ParticipantId = raw_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid participant id: {raw_id}")))?;
    state
        .with_store(move |store| store.participants().get(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("participant {id} not found")))
}

fn badge_cards(participants: &[Participant]) -> Vec<BadgeCardDto> {
    participants.iter().map(BadgeCardDto::from).collect()
}
