//! Resource Fetcher
//!
//! Enumerates resources from the inventory API based on catalogue
//! definitions.

use super::http::ApiHttpClient;
use crate::resource::{EnumerateRequest, Enumerator, Resource, ResourceDef};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Enumerator backed by one catalogue definition
pub struct HttpEnumerator {
    client: ApiHttpClient,
    def: &'static ResourceDef,
}

impl HttpEnumerator {
    pub fn new(client: ApiHttpClient, def: &'static ResourceDef) -> Self {
        Self { client, def }
    }
}

#[async_trait]
impl Enumerator for HttpEnumerator {
    async fn enumerate(&self, request: &EnumerateRequest<'_>) -> Result<Vec<Resource>> {
        let def = self.def;
        tracing::debug!(
            "Listing {} ({}) in {:?}/{}",
            def.display_name,
            request.key,
            request.region,
            request.account
        );

        let mut params = vec![
            ("Action", def.enum_operation.as_str()),
            ("Region", request.region.as_str()),
            ("Account", request.account.as_str()),
        ];
        let server_filter = match (&def.filter_name, &request.resource_id) {
            (Some(name), Some(id)) => {
                params.push((name.as_str(), id.as_str()));
                true
            }
            _ => false,
        };

        let url = self.client.url(&request.key.service, &params)?;
        let token = request.credentials.map(|c| c.token.as_str());
        let response = self.client.get(&url, token).await?;

        let resources = extract_items(&response, &def.response_path)
            .into_iter()
            .filter_map(|item| build_resource(request, def, item))
            .filter(|resource| {
                server_filter
                    || request
                        .resource_id
                        .as_deref()
                        .map_or(true, |id| resource.id == id)
            })
            .collect();

        Ok(resources)
    }
}

/// Extract items from response using the response_path
///
/// Arrays met along the path are flattened, so `Reservations.Instances`
/// collects the instances of every reservation.
pub fn extract_items(response: &Value, path: &str) -> Vec<Value> {
    let mut current = vec![response];

    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = current
            .into_iter()
            .flat_map(|value| match value {
                Value::Array(items) => items.iter().filter_map(|v| v.get(part)).collect(),
                other => other.get(part).into_iter().collect::<Vec<_>>(),
            })
            .collect();
    }

    current
        .into_iter()
        .flat_map(|value| match value {
            Value::Array(items) => items.clone(),
            Value::Null => Vec::new(),
            other => vec![other.clone()],
        })
        .collect()
}

fn build_resource(request: &EnumerateRequest<'_>, def: &ResourceDef, item: Value) -> Option<Resource> {
    let id = if def.id_field.is_empty() {
        item.as_str().map(str::to_string)
    } else {
        extract_json_value(&item, &def.id_field)
    };
    let Some(id) = id else {
        tracing::warn!("{} item without {:?}, skipping", request.key, def.id_field);
        return None;
    };

    let name = def
        .name_field
        .as_deref()
        .and_then(|field| extract_json_value(&item, field));
    let created = def
        .date_field
        .as_deref()
        .and_then(|field| extract_json_value(&item, field))
        .and_then(|date| parse_timestamp(&date));

    Some(
        Resource::new(request.resource_arn(&id), &request.key.resource_type, &id, item)
            .with_name(name)
            .with_created(created),
    )
}

/// Extract a scalar from JSON using a dot-notation path
pub fn extract_json_value(item: &Value, path: &str) -> Option<String> {
    let mut current = item;

    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(idx) => current.get(idx)?,
            Err(_) => current.get(part)?,
        };
    }

    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse an RFC 3339 timestamp, or epoch seconds
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    value
        .parse::<f64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs.trunc() as i64, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_items_simple_path() {
        let response = json!({"Vpcs": [{"VpcId": "vpc-1"}, {"VpcId": "vpc-2"}]});
        assert_eq!(extract_items(&response, "Vpcs").len(), 2);
    }

    #[test]
    fn test_extract_items_flattens_nested_arrays() {
        let response = json!({
            "Reservations": [
                {"Instances": [{"InstanceId": "i-1"}, {"InstanceId": "i-2"}]},
                {"Instances": [{"InstanceId": "i-3"}]}
            ]
        });
        let items = extract_items(&response, "Reservations.Instances");
        let ids: Vec<_> = items.iter().map(|i| i["InstanceId"].clone()).collect();
        assert_eq!(ids, vec![json!("i-1"), json!("i-2"), json!("i-3")]);
    }

    #[test]
    fn test_extract_items_missing_path() {
        let response = json!({"Other": []});
        assert!(extract_items(&response, "Vpcs").is_empty());
        assert!(extract_items(&json!({"Vpcs": null}), "Vpcs").is_empty());
    }

    #[test]
    fn test_extract_json_value() {
        let item = json!({"Endpoint": {"Address": "db.local", "Port": 5432}, "Tags": ["a"]});
        assert_eq!(extract_json_value(&item, "Endpoint.Address").as_deref(), Some("db.local"));
        assert_eq!(extract_json_value(&item, "Endpoint.Port").as_deref(), Some("5432"));
        assert_eq!(extract_json_value(&item, "Tags.0").as_deref(), Some("a"));
        assert_eq!(extract_json_value(&item, "Tags"), None);
        assert_eq!(extract_json_value(&item, "Missing.Path"), None);
    }

    #[test]
    fn test_parse_timestamp() {
        let date = parse_timestamp("2015-03-04T18:11:09.000Z").unwrap();
        assert_eq!(date.to_rfc3339(), "2015-03-04T18:11:09+00:00");
        assert_eq!(parse_timestamp("1425492669.0").unwrap().timestamp(), 1425492669);
        assert!(parse_timestamp("yesterday").is_none());
    }
}
