//! ARN components
//!
//! An ARN has six fixed levels. Each level owns a pattern (`*`, a literal or
//! a regex fragment) and knows how to list its candidate values given the
//! values chosen at the levels above it.

use super::context::Context;
use super::region::{regions_for_service, ALL_REGIONS};
use super::resource::split_resource;
use super::Arn;
use regex::Regex;
use std::fmt;

/// Token that matches every candidate
pub const WILDCARD: &str = "*";

/// The only supported scheme
pub const SCHEMES: &[&str] = &["arn"];

/// Supported cloud providers
pub const PROVIDERS: &[&str] = &["aws"];

/// Position of a component inside an ARN
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Scheme,
    Provider,
    Service,
    Region,
    Account,
    Resource,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Scheme,
        Level::Provider,
        Level::Service,
        Level::Region,
        Level::Account,
        Level::Resource,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Level below this one, `None` for the terminal resource level
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Scheme => "scheme",
            Level::Provider => "provider",
            Level::Service => "service",
            Level::Region => "region",
            Level::Account => "account",
            Level::Resource => "resource",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiled pattern for one level
///
/// `*` compiles to a match-all expression; anything else is a regular
/// expression searched anywhere in the candidate (`east` matches
/// `us-east-1`).
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

impl Matcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let source = if pattern == WILDCARD { ".*" } else { pattern };
        Ok(Self {
            regex: Regex::new(source)?,
        })
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Keep matching candidates, in the order given
    pub fn filter<I, S>(&self, choices: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        choices
            .into_iter()
            .filter(|choice| self.is_match(choice.as_ref()))
            .map(|choice| choice.as_ref().to_string())
            .collect()
    }
}

/// A parsed component, owned by its [`Arn`]
#[derive(Debug, Clone)]
pub(crate) struct Component {
    level: Level,
    pattern: String,
    matcher: Matcher,
}

impl Component {
    pub(crate) fn new(level: Level, pattern: &str) -> Result<Self, regex::Error> {
        let matcher = Matcher::new(match_portion(level, pattern))?;
        Ok(Self {
            level,
            pattern: pattern.to_string(),
            matcher,
        })
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// Part of a pattern that is matched against choices
fn match_portion(level: Level, pattern: &str) -> &str {
    match level {
        Level::Resource => split_resource(pattern).resource_type,
        _ => pattern,
    }
}

/// Borrowed view of one component together with the ARN it belongs to
#[derive(Clone, Copy)]
pub struct ComponentRef<'a> {
    arn: &'a Arn,
    component: &'a Component,
}

impl<'a> ComponentRef<'a> {
    pub(crate) fn new(arn: &'a Arn, component: &'a Component) -> Self {
        Self { arn, component }
    }

    pub fn level(&self) -> Level {
        self.component.level
    }

    pub fn pattern(&self) -> &'a str {
        &self.component.pattern
    }

    /// Every legal value for this level
    ///
    /// Without a context (or with one that does not reach the level this
    /// component depends on), the declared pattern of that level stands in
    /// for its resolved value. Regions are the exception: they fall back to
    /// every known region.
    pub fn choices(&self, context: Option<&Context>) -> Vec<String> {
        let arn = self.arn;

        match self.level() {
            Level::Scheme => to_strings(SCHEMES),
            Level::Provider => to_strings(PROVIDERS),
            Level::Service => arn
                .registry()
                .list_services(self.resolved(context, Level::Provider)),
            Level::Region => match context.and_then(Context::service) {
                Some(service) => to_strings(regions_for_service(service)),
                None => to_strings(ALL_REGIONS),
            },
            Level::Account => arn.accounts().to_vec(),
            Level::Resource => {
                let types = arn.registry().list_resource_types(
                    self.resolved(context, Level::Provider),
                    self.resolved(context, Level::Service),
                );
                if types.is_empty() {
                    vec![WILDCARD.to_string()]
                } else {
                    types
                }
            }
        }
    }

    fn resolved<'c>(&self, context: Option<&'c Context>, level: Level) -> &'c str
    where
        'a: 'c,
    {
        context
            .and_then(|ctx| ctx.get(level))
            .unwrap_or_else(|| self.arn.component(level).pattern())
    }

    /// Choices matching an arbitrary pattern
    ///
    /// At the resource level only the type portion of `pattern` is matched.
    pub fn match_pattern(
        &self,
        pattern: &str,
        context: Option<&Context>,
    ) -> Result<Vec<String>, regex::Error> {
        let matcher = Matcher::new(match_portion(self.level(), pattern))?;
        Ok(matcher.filter(self.choices(context)))
    }

    /// Choices matching this component's own pattern
    pub fn matches(&self, context: Option<&Context>) -> Vec<String> {
        self.component.matcher.filter(self.choices(context))
    }

    /// Choices starting with `prefix`, for interactive completion
    pub fn complete(&self, prefix: &str, context: Option<&Context>) -> Vec<String> {
        self.choices(context)
            .into_iter()
            .filter(|choice| choice.starts_with(prefix))
            .collect()
    }
}

impl fmt::Debug for ComponentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("level", &self.level())
            .field("pattern", &self.pattern())
            .finish()
    }
}

impl fmt::Display for ComponentRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
