// src/services/client_service.rs

use uuid::Uuid;

use crate::{common::error::AppError, db::ClientRepository, models::clients::Client};

#[derive(Clone)]
pub struct ClientService {
    client_repo: ClientRepository,
}

impl ClientService {
    pub fn new(client_repo: ClientRepository) -> Self {
        Self { client_repo }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        document: Option<&str>,
        phone: Option<&str>,
        email: Option<&str>,
        address: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Client, AppError> {
        self.client_repo
            .create(first_name, last_name, document, phone, email, address, notes)
            .await
    }

    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Client>, AppError> {
        self.client_repo.list(search).await
    }

    pub async fn get(&self, pool: &sqlx::PgPool, id: Uuid) -> Result<Client, AppError> {
        self.client_repo
            .find_by_id(pool, id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }
}
