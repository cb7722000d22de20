//! Resource records produced by enumerators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A live cloud resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Fully qualified ARN of this resource
    pub arn: String,
    pub resource_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Raw object returned by the backend
    #[serde(default)]
    pub data: Value,
}

impl Resource {
    pub fn new(arn: impl Into<String>, resource_type: &str, id: &str, data: Value) -> Self {
        Self {
            arn: arn.into(),
            resource_type: resource_type.to_string(),
            id: id.to_string(),
            name: None,
            created: None,
            data,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_created(mut self, created: Option<DateTime<Utc>>) -> Self {
        self.created = created;
        self
    }

    /// JSON view used by filter expressions and output
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_skips_empty_optionals() {
        let resource = Resource::new(
            "arn:aws:sqs:us-east-1:123456789012:queue/jobs",
            "queue",
            "jobs",
            json!({"QueueUrl": "https://sqs/jobs"}),
        );
        let value = resource.to_json();

        assert_eq!(value["id"], "jobs");
        assert_eq!(value["data"]["QueueUrl"], "https://sqs/jobs");
        assert!(value.get("name").is_none());
        assert!(value.get("created").is_none());
    }
}
