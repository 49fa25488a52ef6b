//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Los RFPs viven en memoria; la persistencia
//! real es responsabilidad de un colaborador externo.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::models::rfp::Rfp;
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub rfps: Arc<RwLock<HashMap<Uuid, Rfp>>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            rfps: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Almacenar un RFP y devolver su id
    pub async fn insert_rfp(&self, rfp: Rfp) -> Uuid {
        let id = rfp.id;
        let mut rfps = self.rfps.write().await;
        rfps.insert(id, rfp);
        log::info!("💾 RFP {} almacenado. Total en memoria: {}", id, rfps.len());
        id
    }

    /// Obtener una copia de un RFP
    pub async fn get_rfp(&self, id: Uuid) -> AppResult<Rfp> {
        let rfps = self.rfps.read().await;
        rfps.get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("RFP", &id.to_string()))
    }

    /// Listar RFPs ordenados por fecha de creación
    pub async fn list_rfps(&self) -> Vec<Rfp> {
        let rfps = self.rfps.read().await;
        let mut list: Vec<Rfp> = rfps.values().cloned().collect();
        list.sort_by_key(|rfp| rfp.created_at);
        list
    }

    /// Ejecutar una mutación sobre un RFP bajo el lock de escritura.
    ///
    /// Si `f` falla el RFP no se marca como modificado; `f` debe validar
    /// antes de mutar para que los cambios en lote sean atómicos.
    pub async fn update_rfp<T, F>(&self, id: Uuid, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Rfp) -> AppResult<T>,
    {
        let mut rfps = self.rfps.write().await;
        let rfp = rfps
            .get_mut(&id)
            .ok_or_else(|| not_found_error("RFP", &id.to_string()))?;

        if rfp.is_submitted() {
            return Err(AppError::Conflict(format!("RFP '{}' was already submitted", id)));
        }

        let result = f(rfp)?;
        rfp.touch();
        Ok(result)
    }
}
