//! Establishment CRUD client methods

use crate::PadronClient;
use crate::error::{PadronError, normalize_error};
use padron_core::{Establishment, EstablishmentCreate, EstablishmentPatch, Paginated, Validate};
use serde::Serialize;
use std::time::Duration;

pub(crate) const ESTABLISHMENTS_PATH: &str = "/core/establishments/";

const ESTABLISHMENTS_STALE: Duration = Duration::from_secs(60);
const LIST_KEY_PREFIX: &str = "establishments:list";

/// Query parameters for the establishment list.
#[derive(Debug, Clone, Serialize)]
pub struct EstablishmentListParams {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for EstablishmentListParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            search: None,
        }
    }
}

fn list_key(params: &EstablishmentListParams) -> String {
    format!(
        "{LIST_KEY_PREFIX}:{}:{}:{}",
        params.page,
        params.page_size,
        params.search.as_deref().unwrap_or("")
    )
}

fn item_key(id: i64) -> String {
    format!("establishments:item:{id}")
}

fn item_path(id: i64) -> String {
    format!("{ESTABLISHMENTS_PATH}{id}/")
}

impl PadronClient {
    /// Fetch one page of establishments.
    pub async fn list_establishments(
        &self,
        params: &EstablishmentListParams,
    ) -> Result<Paginated<Establishment>, PadronError> {
        let key = list_key(params);
        if let Some(cached) = self.cache().get_fresh(&key, ESTABLISHMENTS_STALE) {
            return Ok(cached);
        }

        let page: Paginated<Establishment> = self
            .get_json(ESTABLISHMENTS_PATH, Some(params))
            .await
            .map_err(|error| normalize_error(&error))?;
        self.cache().put(&key, &page);
        Ok(page)
    }

    /// Fetch a single establishment by id.
    pub async fn get_establishment(&self, id: i64) -> Result<Establishment, PadronError> {
        let key = item_key(id);
        if let Some(cached) = self.cache().get_fresh(&key, ESTABLISHMENTS_STALE) {
            return Ok(cached);
        }

        let establishment: Establishment = self
            .get_json(&item_path(id), None::<&()>)
            .await
            .map_err(|error| normalize_error(&error))?;
        self.cache().put(&key, &establishment);
        Ok(establishment)
    }

    /// Create an establishment. The payload is validated before dispatch.
    pub async fn create_establishment(
        &self,
        payload: &EstablishmentCreate,
    ) -> Result<Establishment, PadronError> {
        payload.validate()?;

        let created: Establishment = self
            .post_json(ESTABLISHMENTS_PATH, payload)
            .await
            .map_err(|error| normalize_error(&error))?;
        self.cache().invalidate_prefix(LIST_KEY_PREFIX);
        if let Some(id) = created.id {
            self.cache().put(&item_key(id), &created);
        }
        Ok(created)
    }

    /// Apply a partial update. Only fields present in the patch are
    /// validated and sent.
    pub async fn update_establishment(
        &self,
        id: i64,
        patch: &EstablishmentPatch,
    ) -> Result<Establishment, PadronError> {
        patch.validate()?;

        let updated: Establishment = self
            .put_json(&item_path(id), patch)
            .await
            .map_err(|error| normalize_error(&error))?;
        self.cache().put(&item_key(id), &updated);
        self.cache().invalidate_prefix(LIST_KEY_PREFIX);
        Ok(updated)
    }

    /// Delete an establishment by id.
    pub async fn delete_establishment(&self, id: i64) -> Result<(), PadronError> {
        self.delete_empty(&item_path(id))
            .await
            .map_err(|error| normalize_error(&error))?;
        self.cache().remove(&item_key(id));
        self.cache().invalidate_prefix(LIST_KEY_PREFIX);
        Ok(())
    }
}
