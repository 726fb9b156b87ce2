use std::sync::Arc;

use anyhow::Result;

use crate::backend::{IdentityProvider, SupabaseClient};
use crate::config::Config;
use crate::repository::ListingRepository;

pub struct AppState {
    pub repository: ListingRepository,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Arc<Self>> {
        let client = Arc::new(SupabaseClient::new(config)?);

        Ok(Arc::new(Self {
            repository: ListingRepository::new(client.clone(), client.clone()),
            identity: client,
        }))
    }
}
