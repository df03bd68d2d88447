//! HTTP route handlers for Axum.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::api::types::{Listing, StatusBody};
use crate::error::AppResult;
use crate::models::{
    BoardMeeting, Deal, Executive, MonthlyIndicator, PortfolioSummary, ReportToken, Startup,
};
use crate::monitoring;
use crate::service::deals::{DealMove, DealPatch, NewDeal};
use crate::service::executives::{ExecutivePatch, NewExecutive};
use crate::service::indicators::{IndicatorPatch, NewIndicator};
use crate::service::meetings::{MeetingPatch, NewMeeting};
use crate::service::report_tokens::{ReportFormContext, ReportSubmission, TokenRequest};
use crate::service::startups::{NewStartup, StartupPatch};
use crate::service::{deals, executives, indicators, meetings, report_tokens, startups};

use super::AppState;

type Created<T> = (StatusCode, Json<T>);

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn health() -> Json<StatusBody> {
    Json(StatusBody { status: "ok" })
}

pub async fn ready(State(state): State<AppState>) -> AppResult<Json<StatusBody>> {
    state.store.ping().await?;
    Ok(Json(StatusBody { status: "ready" }))
}

pub async fn portfolio_summary(State(state): State<AppState>) -> AppResult<Json<PortfolioSummary>> {
    let summary = monitoring::portfolio_summary(state.store.as_ref(), today()).await?;
    Ok(Json(summary))
}

// --- startups ---

pub async fn list_startups(State(state): State<AppState>) -> AppResult<Json<Listing<Startup>>> {
    Ok(Json(startups::list(state.store.as_ref()).await?.into()))
}

pub async fn create_startup(
    State(state): State<AppState>,
    Json(input): Json<NewStartup>,
) -> AppResult<Created<Startup>> {
    let startup = startups::create(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(startup)))
}

pub async fn get_startup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Startup>> {
    Ok(Json(startups::get(state.store.as_ref(), id).await?))
}

pub async fn update_startup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<StartupPatch>,
) -> AppResult<Json<Startup>> {
    Ok(Json(startups::update(state.store.as_ref(), id, patch).await?))
}

pub async fn delete_startup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    startups::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- monthly indicators ---

pub async fn list_indicators(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> AppResult<Json<Listing<MonthlyIndicator>>> {
    Ok(Json(
        indicators::list(state.store.as_ref(), startup_id).await?.into(),
    ))
}

pub async fn create_indicator(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
    Json(input): Json<NewIndicator>,
) -> AppResult<Created<MonthlyIndicator>> {
    let indicator = indicators::create(state.store.as_ref(), startup_id, input, today()).await?;
    Ok((StatusCode::CREATED, Json(indicator)))
}

pub async fn get_indicator(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MonthlyIndicator>> {
    Ok(Json(
        indicators::get(state.store.as_ref(), startup_id, id).await?,
    ))
}

pub async fn update_indicator(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<IndicatorPatch>,
) -> AppResult<Json<MonthlyIndicator>> {
    Ok(Json(
        indicators::update(state.store.as_ref(), startup_id, id, patch, today()).await?,
    ))
}

pub async fn delete_indicator(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    indicators::delete(state.store.as_ref(), startup_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- board meetings ---

pub async fn list_meetings(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> AppResult<Json<Listing<BoardMeeting>>> {
    Ok(Json(meetings::list(state.store.as_ref(), startup_id).await?.into()))
}

pub async fn create_meeting(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
    Json(input): Json<NewMeeting>,
) -> AppResult<Created<BoardMeeting>> {
    let meeting = meetings::create(state.store.as_ref(), startup_id, input).await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

pub async fn get_meeting(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<BoardMeeting>> {
    Ok(Json(meetings::get(state.store.as_ref(), startup_id, id).await?))
}

pub async fn update_meeting(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<MeetingPatch>,
) -> AppResult<Json<BoardMeeting>> {
    Ok(Json(
        meetings::update(state.store.as_ref(), startup_id, id, patch).await?,
    ))
}

pub async fn delete_meeting(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    meetings::delete(state.store.as_ref(), startup_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- executives ---

pub async fn list_executives(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> AppResult<Json<Listing<Executive>>> {
    Ok(Json(
        executives::list(state.store.as_ref(), startup_id).await?.into(),
    ))
}

pub async fn create_executive(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
    Json(input): Json<NewExecutive>,
) -> AppResult<Created<Executive>> {
    let executive = executives::create(state.store.as_ref(), startup_id, input).await?;
    Ok((StatusCode::CREATED, Json(executive)))
}

pub async fn get_executive(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<Executive>> {
    Ok(Json(
        executives::get(state.store.as_ref(), startup_id, id).await?,
    ))
}

pub async fn update_executive(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
    Json(patch): Json<ExecutivePatch>,
) -> AppResult<Json<Executive>> {
    Ok(Json(
        executives::update(state.store.as_ref(), startup_id, id, patch).await?,
    ))
}

pub async fn delete_executive(
    State(state): State<AppState>,
    Path((startup_id, id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    executives::delete(state.store.as_ref(), startup_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- deals ---

pub async fn list_deals(State(state): State<AppState>) -> AppResult<Json<Listing<Deal>>> {
    Ok(Json(deals::list(state.store.as_ref()).await?.into()))
}

pub async fn create_deal(
    State(state): State<AppState>,
    Json(input): Json<NewDeal>,
) -> AppResult<Created<Deal>> {
    let deal = deals::create(state.store.as_ref(), input).await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

pub async fn get_deal(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Json<Deal>> {
    Ok(Json(deals::get(state.store.as_ref(), id).await?))
}

pub async fn update_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<DealPatch>,
) -> AppResult<Json<Deal>> {
    Ok(Json(deals::update(state.store.as_ref(), id, patch).await?))
}

pub async fn move_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(target): Json<DealMove>,
) -> AppResult<Json<Deal>> {
    Ok(Json(deals::move_to(state.store.as_ref(), id, target).await?))
}

pub async fn delete_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    deals::delete(state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- report tokens ---

pub async fn generate_report_token(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<ReportToken>> {
    Ok(Json(
        report_tokens::generate(state.store.as_ref(), startup_id, request, today()).await?,
    ))
}

pub async fn list_report_tokens(
    State(state): State<AppState>,
    Path(startup_id): Path<Uuid>,
) -> AppResult<Json<Listing<ReportToken>>> {
    Ok(Json(
        report_tokens::list(state.store.as_ref(), startup_id).await?.into(),
    ))
}

pub async fn report_form(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> AppResult<Json<ReportFormContext>> {
    Ok(Json(
        report_tokens::form_context(state.store.as_ref(), token).await?,
    ))
}

pub async fn submit_report(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
    Json(submission): Json<ReportSubmission>,
) -> AppResult<StatusCode> {
    report_tokens::submit(state.store.as_ref(), token, submission).await?;
    Ok(StatusCode::NO_CONTENT)
}
