//! Environments API client methods

use crate::PadronClient;
use crate::error::{PadronError, normalize_error};
use padron_core::LocationNode;
use std::time::Duration;

pub(crate) const ENVIRONMENTS_PATH: &str = "/common/environments/";

const ENVIRONMENTS_STALE: Duration = Duration::from_secs(5 * 60);
const ENVIRONMENTS_KEY: &str = "environments";

impl PadronClient {
    /// Fetch the location tree behind the environment picker.
    pub async fn list_environments(&self) -> Result<Vec<LocationNode>, PadronError> {
        if let Some(cached) = self
            .cache()
            .get_fresh::<Vec<LocationNode>>(ENVIRONMENTS_KEY, ENVIRONMENTS_STALE)
        {
            return Ok(cached);
        }

        let tree: Vec<LocationNode> = self
            .get_json(ENVIRONMENTS_PATH, None::<&()>)
            .await
            .map_err(|error| normalize_error(&error))?;
        self.cache().put(ENVIRONMENTS_KEY, &tree);
        Ok(tree)
    }
}
