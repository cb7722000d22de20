//! Resource abstraction layer
//!
//! # Architecture
//!
//! - [`registry`] - Maps resource types to the enumerators that list them
//! - [`catalogue`] - Resource definitions loaded from embedded JSON
//! - [`record`] - The records enumerators produce
//!
//! Resource definitions are loaded from JSON files under `src/resources/`,
//! so new resource types can be served by the HTTP backend without code
//! changes. Any other backend plugs in by implementing [`Enumerator`].

pub mod catalogue;
mod record;
mod registry;

pub use catalogue::{get_catalogue, get_definition, CatalogueEntry, ResourceDef};
pub use record::Resource;
pub use registry::{EnumerateRequest, Enumerator, Registry, ResourceKey};
