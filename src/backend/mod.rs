//! Inventory API backend
//!
//! - [`http`] - HTTP client wrapper for the inventory API
//! - [`fetcher`] - Catalogue driven [`HttpEnumerator`]
//!
//! # Example
//!
//! ```ignore
//! let client = ApiHttpClient::new("https://inventory.example.com")?;
//! let registry = catalogue_registry(&client);
//! ```

pub mod fetcher;
pub mod http;

pub use fetcher::HttpEnumerator;
pub use http::{format_api_error, ApiHttpClient};

use crate::resource::{get_catalogue, Registry, ResourceKey};
use std::sync::Arc;

/// Registry with one [`HttpEnumerator`] per catalogue definition
pub fn catalogue_registry(client: &ApiHttpClient) -> Registry {
    let mut registry = Registry::new();

    for entry in get_catalogue() {
        registry.register(
            ResourceKey::new(&entry.provider, &entry.service, &entry.resource_type),
            Arc::new(HttpEnumerator::new(client.clone(), &entry.def)),
        );
    }

    tracing::debug!("Registered {} catalogue resource types", registry.len());
    registry
}
