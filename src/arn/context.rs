//! Traversal context
//!
//! The concrete values resolved at the levels above the one being
//! enumerated. A context is never mutated in place: descending one level
//! produces a new value, so every branch of the traversal owns its own copy
//! and the caller's context is untouched on every exit path.

use super::component::Level;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: Vec<String>,
}

impl Context {
    /// Empty context, used at the scheme level
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from already resolved values (scheme first)
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        debug_assert!(values.len() <= Level::ALL.len());
        Self { values }
    }

    /// Copy of this context with `value` appended
    pub fn push(&self, value: impl Into<String>) -> Self {
        let mut values = Vec::with_capacity(self.values.len() + 1);
        values.extend(self.values.iter().cloned());
        values.push(value.into());
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Level that a component must resolve next under this context
    pub fn next_level(&self) -> Option<Level> {
        Level::from_index(self.values.len())
    }

    /// Value resolved at `level`, if the traversal got that far
    pub fn get(&self, level: Level) -> Option<&str> {
        self.values.get(level.index()).map(String::as_str)
    }

    pub fn provider(&self) -> Option<&str> {
        self.get(Level::Provider)
    }

    pub fn service(&self) -> Option<&str> {
        self.get(Level::Service)
    }

    pub fn region(&self) -> Option<&str> {
        self.get(Level::Region)
    }

    pub fn account(&self) -> Option<&str> {
        self.get(Level::Account)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.values.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_leaves_original_untouched() {
        let root = Context::new();
        let child = root.push("arn").push("aws");

        assert!(root.is_empty());
        assert_eq!(child.len(), 2);
        assert_eq!(child.provider(), Some("aws"));
        assert_eq!(child.next_level(), Some(Level::Service));
    }

    #[test]
    fn test_accessors_follow_level_order() {
        let ctx = Context::from_values(["arn", "aws", "ec2", "us-east-1", "123456789012"]);
        assert_eq!(ctx.service(), Some("ec2"));
        assert_eq!(ctx.region(), Some("us-east-1"));
        assert_eq!(ctx.account(), Some("123456789012"));
        assert_eq!(ctx.next_level(), Some(Level::Resource));
    }

    #[test]
    fn test_missing_levels_are_none() {
        let ctx = Context::from_values(["arn"]);
        assert_eq!(ctx.service(), None);
        assert_eq!(ctx.to_string(), "[arn]");
    }
}
