//! Resource Catalogue - Load resource definitions from JSON
//!
//! Every enumerable resource type is described by an entry in an embedded
//! JSON file. The HTTP backend turns each entry into an enumerator.

use super::registry::ResourceKey;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/aws.json")];

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub display_name: String,
    /// API operation listing every object of this type
    pub enum_operation: String,
    /// Dot path to the item array in the operation response
    pub response_path: String,
    /// Field holding the id; empty when items are bare id strings
    pub id_field: String,
    #[serde(default)]
    pub name_field: Option<String>,
    #[serde(default)]
    pub date_field: Option<String>,
    /// Request parameter that restricts the listing to one id
    #[serde(default)]
    pub filter_name: Option<String>,
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct CatalogueFile {
    provider: String,
    /// Keyed by `service.type`
    #[serde(default)]
    resources: BTreeMap<String, ResourceDef>,
}

/// One catalogue entry with its fully qualified name
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    pub provider: String,
    pub service: String,
    pub resource_type: String,
    pub def: ResourceDef,
}

/// Global catalogue loaded from JSON
static CATALOGUE: OnceLock<Vec<CatalogueEntry>> = OnceLock::new();

/// Get the catalogue (loads from embedded JSON on first access)
pub fn get_catalogue() -> &'static [CatalogueEntry] {
    CATALOGUE.get_or_init(|| {
        let mut entries = Vec::new();

        for content in RESOURCE_FILES {
            let file: CatalogueFile = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));

            for (name, def) in file.resources {
                let path = format!("{}.{}", file.provider, name);
                let Some(key) = ResourceKey::from_path(&path) else {
                    panic!("Resource name {:?} is not of the form service.type", name);
                };
                entries.push(CatalogueEntry {
                    provider: key.provider,
                    service: key.service,
                    resource_type: key.resource_type,
                    def,
                });
            }
        }

        entries
    })
}

/// Get a resource definition by provider, service and type
pub fn get_definition(
    provider: &str,
    service: &str,
    resource_type: &str,
) -> Option<&'static ResourceDef> {
    get_catalogue()
        .iter()
        .find(|e| e.provider == provider && e.service == service && e.resource_type == resource_type)
        .map(|e| &e.def)
}
