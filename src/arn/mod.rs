//! ARN resolution and enumeration
//!
//! An [`Arn`] is parsed from a colon separated locator
//! (`scheme:provider:service:region:account:resource`) where every token is
//! `*`, a literal, or a regex fragment. Missing trailing tokens default to
//! `*`, and an optional `|expression` suffix carries a filter [`Query`] for
//! the consumer.
//!
//! Enumeration walks the levels depth first. At each level the component
//! lists its choices for the current [`Context`], keeps the ones matching
//! its pattern, and descends once per match with the match appended to the
//! context. The resource level resolves each matching type in the
//! [`Registry`] and calls its enumerator.
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let arn = Arn::new("arn:aws:ec2:us-*:*:instance", registry, &config)?;
//! let mut resources = arn.iter();
//! while let Some(result) = resources.next().await {
//!     match result {
//!         Ok(resource) => println!("{}", resource.arn),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

mod component;
mod context;
pub mod region;
mod resource;

pub use component::{ComponentRef, Level, Matcher, PROVIDERS, SCHEMES, WILDCARD};
pub use context::Context;
pub use resource::{split_resource, ResourcePattern};

use crate::config::{ConfigStore, Credentials};
use crate::error::{ArnError, EnumerateError};
use crate::query::Query;
use crate::resource::{EnumerateRequest, Registry, Resource, ResourceKey};
use component::Component;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Locator matching every resource of the default provider
pub const DEFAULT_ARN: &str = "arn:aws:*:*:*:*";

/// Separator between the address and its filter expression
pub const QUERY_SEPARATOR: char = '|';

/// Stream of enumerated resources, with per-branch failures inline
pub type ResourceStream<'a> = BoxStream<'a, Result<Resource, EnumerateError>>;

/// How sibling branches of the traversal are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fanout {
    /// One branch at a time, depth first, left to right
    Ordered,
    /// Up to `n` sibling branches in flight per level (0 for no limit),
    /// output order unspecified
    Unordered(usize),
}

/// A parsed locator
pub struct Arn {
    components: Vec<Component>,
    query: Option<Query>,
    registry: Arc<Registry>,
    accounts: Vec<String>,
    account_credentials: BTreeMap<String, Credentials>,
    credentials: Option<Credentials>,
}

impl Arn {
    /// Parse `locator`, snapshotting the accounts known to `config`
    pub fn new(
        locator: &str,
        registry: Arc<Registry>,
        config: &dyn ConfigStore,
    ) -> Result<Self, ArnError> {
        let (address, query) = match locator.split_once(QUERY_SEPARATOR) {
            Some((address, expression)) => (address, Some(Query::compile(expression)?)),
            None => (locator, None),
        };

        let mut tokens = address.splitn(Level::ALL.len(), ':');
        let components = Level::ALL
            .iter()
            .map(|&level| {
                let pattern = tokens.next().unwrap_or(WILDCARD);
                Component::new(level, pattern).map_err(|source| ArnError::InvalidPattern {
                    level,
                    pattern: pattern.to_string(),
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let accounts = config.accounts();
        let account_credentials = accounts
            .iter()
            .filter_map(|(id, account)| account.credentials().map(|c| (id.clone(), c)))
            .collect();

        let arn = Self {
            components,
            query,
            registry,
            accounts: accounts.into_keys().collect(),
            account_credentials,
            credentials: None,
        };
        tracing::debug!("Parsed ARN {} ({} accounts)", arn, arn.accounts.len());

        Ok(arn)
    }

    /// Use `credentials` for every backend call instead of per-account ones
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn component(&self, level: Level) -> ComponentRef<'_> {
        ComponentRef::new(self, &self.components[level.index()])
    }

    pub fn scheme(&self) -> ComponentRef<'_> {
        self.component(Level::Scheme)
    }

    pub fn provider(&self) -> ComponentRef<'_> {
        self.component(Level::Provider)
    }

    pub fn service(&self) -> ComponentRef<'_> {
        self.component(Level::Service)
    }

    pub fn region(&self) -> ComponentRef<'_> {
        self.component(Level::Region)
    }

    pub fn account(&self) -> ComponentRef<'_> {
        self.component(Level::Account)
    }

    pub fn resource(&self) -> ComponentRef<'_> {
        self.component(Level::Resource)
    }

    /// Id portion of the resource pattern (`type/id` or `type:id`)
    ///
    /// An empty or `*` id places no constraint and reads as `None`.
    pub fn resource_id(&self) -> Option<&str> {
        split_resource(self.resource().pattern())
            .resource_id
            .filter(|id| !id.is_empty() && *id != WILDCARD)
    }

    /// Filter expression given after `|`
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Account ids known when this ARN was built
    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// Credentials a backend call for `account` runs with
    pub fn credentials_for(&self, account: &str) -> Option<&Credentials> {
        self.credentials
            .as_ref()
            .or_else(|| self.account_credentials.get(account))
    }

    /// Every matching resource, depth first
    pub fn iter(&self) -> ResourceStream<'_> {
        self.enumerate(Level::Scheme, &Context::new(), Fanout::Ordered)
    }

    /// Every matching resource, with up to `limit` sibling branches per level
    /// enumerated concurrently (0 for no limit)
    pub fn iter_unordered(&self, limit: usize) -> ResourceStream<'_> {
        self.enumerate(Level::Scheme, &Context::new(), Fanout::Unordered(limit))
    }

    /// Drain the traversal, keeping records and failures apart
    pub async fn collect_partial(&self) -> (Vec<Resource>, Vec<EnumerateError>) {
        self.iter()
            .fold(
                (Vec::new(), Vec::new()),
                |(mut resources, mut errors), result| {
                    match result {
                        Ok(resource) => resources.push(resource),
                        Err(e) => errors.push(e),
                    }
                    future::ready((resources, errors))
                },
            )
            .await
    }

    /// Drain the traversal, stopping at the first failure
    pub async fn try_collect_all(&self) -> Result<Vec<Resource>, EnumerateError> {
        self.iter().try_collect().await
    }

    /// Enumerate `level` and everything below it under `context`
    ///
    /// `context` must hold exactly the values of the levels above `level`;
    /// otherwise the stream yields a single `ContextMismatch` error.
    pub fn enumerate(&self, level: Level, context: &Context, fanout: Fanout) -> ResourceStream<'_> {
        if context.next_level() != Some(level) {
            let error = EnumerateError::ContextMismatch {
                level,
                context: context.to_string(),
            };
            return stream::once(future::ready(Err(error))).boxed();
        }
        tracing::debug!("{}.enumerate {}", level, context);

        let matches = self.component(level).matches(Some(context));
        let context = context.clone();

        match level.next() {
            Some(next) => fan_out(matches, fanout, move |value| {
                self.enumerate(next, &context.push(value), fanout)
            }),
            None => fan_out(matches, fanout, move |resource_type| {
                self.enumerate_type(&context, &resource_type)
            }),
        }
    }

    /// Terminal fan-out: one backend call for one resource type
    fn enumerate_type(&self, context: &Context, resource_type: &str) -> ResourceStream<'_> {
        let (Some(provider), Some(service), Some(region), Some(account)) = (
            context.provider(),
            context.service(),
            context.region(),
            context.account(),
        ) else {
            return stream::empty().boxed();
        };

        let key = ResourceKey::new(provider, service, resource_type);
        let Some(enumerator) = self.registry.resolve(&key) else {
            tracing::warn!("No enumerator registered for {}", key);
            let error = EnumerateError::UnresolvableResourceType { path: key.path() };
            return stream::once(future::ready(Err(error))).boxed();
        };

        let request = EnumerateRequest {
            arn: self,
            key,
            region: region.to_string(),
            account: account.to_string(),
            resource_id: self.resource_id().map(str::to_string),
            credentials: self.credentials_for(account),
        };

        stream::once(async move {
            tracing::debug!(
                "Enumerating {} in region={:?} account={} id={:?}",
                request.key,
                request.region,
                request.account,
                request.resource_id
            );

            match enumerator.enumerate(&request).await {
                Ok(resources) => {
                    tracing::debug!("{} returned {} resources", request.key, resources.len());
                    stream::iter(resources.into_iter().map(Ok)).boxed()
                }
                Err(e) => {
                    tracing::warn!("Enumerating {} failed: {:#}", request.key, e);
                    let error = EnumerateError::Backend {
                        path: request.key.path(),
                        region: request.region.clone(),
                        account: request.account.clone(),
                        source: e.into(),
                    };
                    stream::once(future::ready(Err(error))).boxed()
                }
            }
        })
        .flatten()
        .boxed()
    }
}

/// For each match, yield everything `descend` produces for it
fn fan_out<'a, F>(matches: Vec<String>, fanout: Fanout, descend: F) -> ResourceStream<'a>
where
    F: FnMut(String) -> ResourceStream<'a> + Send + 'a,
{
    let branches = stream::iter(matches);
    match fanout {
        Fanout::Ordered => branches.flat_map(descend).boxed(),
        Fanout::Unordered(limit) => branches
            .flat_map_unordered((limit > 0).then_some(limit), descend)
            .boxed(),
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<&str> = self.components.iter().map(Component::pattern).collect();
        f.write_str(&patterns.join(":"))
    }
}

impl fmt::Debug for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arn")
            .field("arn", &self.to_string())
            .field("query", &self.query)
            .field("accounts", &self.accounts)
            .finish()
    }
}
