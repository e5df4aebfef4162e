// src/models/incidents.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "incident_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentState {
    Open,
    Resolved,
    Voided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "incident_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    Repairable,
    Irreparable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "incident_outcome", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentOutcome {
    NoAction,
    Replaced,
    Reintegrated,
}

// Dano/perda registrado contra um item de aluguel. Enquanto aberto,
// "reivindica" unidades do item (ver teto em IncidentService::create).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: Uuid,
    pub rental_item_id: Uuid,
    pub description: Option<String>,

    pub state: IncidentState,
    pub kind: IncidentKind,

    #[schema(example = 1)]
    pub quantity_affected: i32,
    #[schema(example = 0)]
    pub quantity_replaced: i32,
    pub outcome: IncidentOutcome,

    pub occurred_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

