//! Resource Registry
//!
//! Maps a `(provider, service, resource type)` key to the enumerator that
//! lists live objects of that type. The registry also answers which
//! services and resource types exist, which drives the choices offered at
//! the service and resource levels of an ARN.

use super::record::Resource;
use crate::arn::Arn;
use crate::config::Credentials;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Fully qualified resource type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceKey {
    pub provider: String,
    pub service: String,
    pub resource_type: String,
}

impl ResourceKey {
    pub fn new(provider: &str, service: &str, resource_type: &str) -> Self {
        Self {
            provider: provider.to_string(),
            service: service.to_string(),
            resource_type: resource_type.to_string(),
        }
    }

    /// Parse a dotted `provider.service.type` path
    pub fn from_path(path: &str) -> Option<Self> {
        let mut parts = path.splitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(provider), Some(service), Some(resource_type))
                if !provider.is_empty() && !service.is_empty() && !resource_type.is_empty() =>
            {
                Some(Self::new(provider, service, resource_type))
            }
            _ => None,
        }
    }

    /// Dotted `provider.service.type` path
    pub fn path(&self) -> String {
        format!("{}.{}.{}", self.provider, self.service, self.resource_type)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Everything a backend needs to list one resource type in one place
pub struct EnumerateRequest<'a> {
    /// ARN being enumerated
    pub arn: &'a Arn,
    pub key: ResourceKey,
    pub region: String,
    pub account: String,
    /// Id portion of the resource pattern, passed through unmatched
    pub resource_id: Option<String>,
    pub credentials: Option<&'a Credentials>,
}

impl EnumerateRequest<'_> {
    /// ARN of a concrete resource of the requested type
    pub fn resource_arn(&self, id: &str) -> String {
        format!(
            "arn:{}:{}:{}:{}:{}/{}",
            self.key.provider, self.key.service, self.region, self.account, self.key.resource_type, id
        )
    }
}

/// Lists live objects of one resource type
#[async_trait]
pub trait Enumerator: Send + Sync {
    async fn enumerate(&self, request: &EnumerateRequest<'_>) -> anyhow::Result<Vec<Resource>>;
}

/// Registry of enumerators keyed by resource type
///
/// A type may be declared without an enumerator; it is then offered as a
/// choice but cannot be resolved.
#[derive(Clone, Default)]
pub struct Registry {
    enumerators: BTreeMap<ResourceKey, Option<Arc<dyn Enumerator>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an enumerator, replacing any previous one for `key`
    pub fn register(&mut self, key: ResourceKey, enumerator: Arc<dyn Enumerator>) {
        if let Some(Some(_)) = self.enumerators.insert(key.clone(), Some(enumerator)) {
            tracing::debug!("Replaced enumerator for {}", key);
        }
    }

    /// Make a resource type known without a backend for it
    pub fn declare(&mut self, key: ResourceKey) {
        self.enumerators.entry(key).or_insert(None);
    }

    /// Builder form of [`Registry::register`]
    pub fn with(mut self, key: ResourceKey, enumerator: Arc<dyn Enumerator>) -> Self {
        self.register(key, enumerator);
        self
    }

    /// Services known for a provider, sorted
    pub fn list_services(&self, provider: &str) -> Vec<String> {
        let mut services: Vec<String> = self
            .enumerators
            .keys()
            .filter(|k| k.provider == provider)
            .map(|k| k.service.clone())
            .collect();
        services.dedup();
        services
    }

    /// Resource types known for a provider and service, sorted
    pub fn list_resource_types(&self, provider: &str, service: &str) -> Vec<String> {
        self.enumerators
            .keys()
            .filter(|k| k.provider == provider && k.service == service)
            .map(|k| k.resource_type.clone())
            .collect()
    }

    /// Enumerator for a resource type
    pub fn resolve(&self, key: &ResourceKey) -> Option<Arc<dyn Enumerator>> {
        self.enumerators.get(key).cloned().flatten()
    }

    pub fn len(&self) -> usize {
        self.enumerators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enumerators.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.enumerators.keys().map(ResourceKey::path))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nothing;

    #[async_trait]
    impl Enumerator for Nothing {
        async fn enumerate(&self, _: &EnumerateRequest<'_>) -> anyhow::Result<Vec<Resource>> {
            Ok(Vec::new())
        }
    }

    fn registry() -> Registry {
        let nothing: Arc<dyn Enumerator> = Arc::new(Nothing);
        Registry::new()
            .with(ResourceKey::new("aws", "sqs", "queue"), nothing.clone())
            .with(ResourceKey::new("aws", "ec2", "volume"), nothing.clone())
            .with(ResourceKey::new("aws", "ec2", "instance"), nothing.clone())
            .with(ResourceKey::new("other", "ec2", "vm"), nothing)
    }

    #[test]
    fn test_services_are_sorted_and_unique() {
        assert_eq!(registry().list_services("aws"), vec!["ec2", "sqs"]);
        assert_eq!(registry().list_services("other"), vec!["ec2"]);
        assert!(registry().list_services("*").is_empty());
    }

    #[test]
    fn test_resource_types_per_service() {
        let registry = registry();
        assert_eq!(
            registry.list_resource_types("aws", "ec2"),
            vec!["instance", "volume"]
        );
        assert!(registry.list_resource_types("aws", "s3").is_empty());
    }

    #[test]
    fn test_resolve() {
        let registry = registry();
        assert!(registry.resolve(&ResourceKey::new("aws", "sqs", "queue")).is_some());
        assert!(registry.resolve(&ResourceKey::new("aws", "sqs", "topic")).is_none());
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_declared_type_is_listed_but_unresolvable() {
        let mut registry = registry();
        let key = ResourceKey::new("aws", "sqs", "dlq");
        registry.declare(key.clone());

        assert_eq!(registry.list_resource_types("aws", "sqs"), vec!["dlq", "queue"]);
        assert!(registry.resolve(&key).is_none());

        // declaring an enumerated type keeps its enumerator
        registry.declare(ResourceKey::new("aws", "sqs", "queue"));
        assert!(registry.resolve(&ResourceKey::new("aws", "sqs", "queue")).is_some());
    }

    #[test]
    fn test_key_paths() {
        let key = ResourceKey::new("aws", "elb", "loadbalancer");
        assert_eq!(key.path(), "aws.elb.loadbalancer");
        assert_eq!(ResourceKey::from_path("aws.elb.loadbalancer"), Some(key));
        assert_eq!(ResourceKey::from_path("aws.elb"), None);
        assert_eq!(ResourceKey::from_path("aws..x"), None);
    }
}
