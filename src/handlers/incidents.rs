// src/handlers/incidents.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::incidents::{Incident, IncidentKind, IncidentOutcome, IncidentState},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentPayload {
    pub rental_item_id: Uuid,

    pub description: Option<String>,

    pub kind: IncidentKind,

    #[validate(range(min = 1, message = "Deve ser um inteiro maior que zero."))]
    #[schema(example = 1)]
    pub quantity_affected: i32,
}

// PATCH: resolve (com desfecho) ou anula o incidente.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentPayload {
    pub state: IncidentState,

    pub outcome: Option<IncidentOutcome>,

    #[validate(range(min = 1, message = "Deve ser um inteiro maior que zero."))]
    pub quantity_replaced: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct IncidentListQuery {
    pub state: Option<IncidentState>,
    pub rental_item_id: Option<Uuid>,
}

#[utoipa::path(
    post,
    path = "/api/incidents",
    tag = "Incidents",
    request_body = CreateIncidentPayload,
    responses(
        (status = 201, description = "Incidente aberto", body = Incident),
        (status = 400, description = "Quantidade acima do teto do item")
    )
)]
pub async fn create_incident(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateIncidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let incident = app_state
        .incident_service
        .create(
            &app_state.db_pool,
            payload.rental_item_id,
            payload.description.as_deref(),
            payload.kind,
            payload.quantity_affected,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(incident)))
}

#[utoipa::path(
    get,
    path = "/api/incidents",
    tag = "Incidents",
    responses((status = 200, description = "Lista de incidentes", body = [Incident]))
)]
pub async fn list_incidents(
    State(app_state): State<AppState>,
    Query(query): Query<IncidentListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let incidents = app_state
        .incident_service
        .list(query.state, query.rental_item_id)
        .await?;
    Ok((StatusCode::OK, Json(incidents)))
}

#[utoipa::path(
    patch,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    request_body = UpdateIncidentPayload,
    responses(
        (status = 200, description = "Incidente resolvido/anulado", body = Incident),
        (status = 400, description = "Transição ou desfecho inválido")
    )
)]
pub async fn update_incident(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateIncidentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let incident = match payload.state {
        IncidentState::Resolved => {
            let outcome = payload.outcome.ok_or_else(|| {
                AppError::Validation(
                    "Informe o desfecho ('replaced' ou 'reintegrated') para resolver.".into(),
                )
            })?;
            app_state
                .incident_service
                .resolve(&app_state.db_pool, id, outcome, payload.quantity_replaced)
                .await?
        }
        IncidentState::Voided => {
            app_state
                .incident_service
                .void(&app_state.db_pool, id)
                .await?
        }
        IncidentState::Open => {
            return Err(AppError::Validation(
                "Um incidente não pode voltar para 'open'.".into(),
            ));
        }
    };

    Ok((StatusCode::OK, Json(incident)))
}

#[utoipa::path(
    delete,
    path = "/api/incidents/{id}",
    tag = "Incidents",
    responses(
        (status = 204, description = "Incidente removido"),
        (status = 400, description = "Incidente ainda não resolvido")
    )
)]
pub async fn delete_incident(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .incident_service
        .delete(&app_state.db_pool, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
