//! Resolve ARN-style locators into live cloud resources.
//!
//! A locator such as `arn:aws:ec2:us-*:*:instance` names a set of resources
//! with a literal, `*`, or regex fragment at each of its six levels. An
//! [`Arn`] expands it against a [`Registry`] of resource types and the
//! accounts of a [`ConfigStore`], then streams the resources the registered
//! enumerators return.
//!
//! # Module Structure
//!
//! - [`arn`] - Locator parsing, matching and traversal
//! - [`resource`] - Resource registry, catalogue and records
//! - [`backend`] - HTTP enumerators for the inventory API
//! - [`config`] - Accounts and credentials
//! - [`query`] - Filter expressions applied to results

pub mod arn;
pub mod backend;
pub mod config;
pub mod error;
pub mod query;
pub mod resource;

pub use arn::{Arn, Context, Fanout, Level, ResourceStream, DEFAULT_ARN};
pub use config::{AccountConfig, Config, ConfigStore, Credentials};
pub use error::{ArnError, EnumerateError};
pub use query::{Query, QueryError};
pub use resource::{EnumerateRequest, Enumerator, Registry, Resource, ResourceKey};
