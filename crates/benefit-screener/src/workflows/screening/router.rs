use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ClientId, Verdict};
use super::evaluation::estimate_benefit;
use super::relationships::RelationshipDeclared;
use super::repository::{HouseholdRepository, RepositoryError};
use super::service::{MemberScreeningView, ScreeningService, ScreeningServiceError};

/// Router builder exposing HTTP endpoints for screening and relationship updates.
pub fn screening_router<R>(service: Arc<ScreeningService<R>>) -> Router
where
    R: HouseholdRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/households/:client_id",
            get(household_handler::<R>),
        )
        .route(
            "/api/v1/households/:client_id/screenings",
            post(screen_handler::<R>),
        )
        .route(
            "/api/v1/households/:client_id/relationships",
            post(relationship_handler::<R>),
        )
        .route("/api/v1/snap/benefit-estimate", post(benefit_estimate_handler))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct ScreeningRequest {
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RelationshipRequest {
    #[serde(flatten)]
    pub declaration: RelationshipDeclared,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct BenefitEstimateRequest {
    pub net_income: f64,
    pub household_size: usize,
    #[serde(default)]
    pub verdict: Verdict,
}

#[derive(Debug, Serialize)]
pub struct BenefitEstimateResponse {
    pub net_income: f64,
    pub household_size: usize,
    pub benefit: f64,
}

#[derive(Debug, Serialize)]
struct HouseholdView {
    client_id: ClientId,
    members: Vec<MemberScreeningView>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn screen_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(client_id): Path<String>,
    axum::Json(request): axum::Json<ScreeningRequest>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    let client_id = ClientId(client_id);
    let as_of = request.as_of.unwrap_or_else(today);
    match service.screen(&client_id, as_of) {
        Ok(screening) => (StatusCode::OK, axum::Json(screening)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn relationship_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(client_id): Path<String>,
    axum::Json(request): axum::Json<RelationshipRequest>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    let client_id = ClientId(client_id);
    let as_of = request.as_of.unwrap_or_else(today);
    match service.declare_relationship(&client_id, &request.declaration, as_of) {
        Ok(screening) => (StatusCode::OK, axum::Json(screening)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn household_handler<R>(
    State(service): State<Arc<ScreeningService<R>>>,
    Path(client_id): Path<String>,
) -> Response
where
    R: HouseholdRepository + 'static,
{
    let client_id = ClientId(client_id);
    match service.household(&client_id) {
        Ok(members) => {
            let view = HouseholdView {
                client_id,
                members: members.iter().map(MemberScreeningView::from).collect(),
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn benefit_estimate_handler(
    axum::Json(request): axum::Json<BenefitEstimateRequest>,
) -> Response {
    if !request.net_income.is_finite() || request.net_income < 0.0 {
        let payload = json!({ "error": "net_income must be a non-negative amount" });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    }

    let benefit = estimate_benefit(
        request.net_income,
        request.household_size,
        &request.verdict,
    );
    let body = BenefitEstimateResponse {
        net_income: request.net_income,
        household_size: request.household_size,
        benefit,
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

fn error_response(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
        ScreeningServiceError::Relationship(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningServiceError::Repository(RepositoryError::Invalid(_))
        | ScreeningServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
