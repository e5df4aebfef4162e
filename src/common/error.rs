use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Cada variante mapeia para um status HTTP no IntoResponse abaixo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validações de regra de negócio com mensagem pronta (quantidade inválida,
    // datas fora de ordem, pedido sem vínculo, etc.)
    #[error("{0}")]
    Validation(String),

    #[error("Sem estoque disponível para {product}. Disponível: {available}")]
    InsufficientStock { product: String, available: i32 },

    #[error("Transição inválida: {entity} está em '{state}'")]
    InvalidTransition { entity: &'static str, state: String },

    #[error("{0}")]
    Conflict(String),

    // Operação recusada pelo ciclo de vida do recurso (ex.: apagar um
    // pedido que ainda não foi entregue nem cancelado)
    #[error("{0}")]
    NotAllowed(String),

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Não há caixa aberto")]
    NoOpenRegister,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::Validation(message) => {
                let body = Json(json!({ "error": message }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::InsufficientStock { ref product, available } => {
                let body = Json(json!({
                    "error": format!("Sem estoque disponível para {product}."),
                    "available": available,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::InvalidTransition { entity, ref state } => {
                let body = Json(json!({
                    "error": format!("Operação não permitida: {entity} está em '{state}'."),
                    "state": state,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::Conflict(message) => {
                let body = Json(json!({ "error": message }));
                (StatusCode::CONFLICT, body).into_response()
            }
            AppError::NotAllowed(message) => {
                let body = Json(json!({ "error": message }));
                (StatusCode::METHOD_NOT_ALLOWED, body).into_response()
            }
            AppError::NotFound(entity) => {
                let body = Json(json!({ "error": format!("{entity} não encontrado.") }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            AppError::NoOpenRegister => {
                let body = Json(json!({
                    "error": "Não há caixa aberto.",
                    "detail": "Abra uma caixa antes de registrar a operação.",
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo opaco.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                let body = Json(json!({ "error": "Ocorreu um erro inesperado." }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
