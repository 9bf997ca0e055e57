//! Parameter definitions for people-mcp tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::{PersonPatch, DEFAULT_READ_QUERY};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddDataParams {
    #[schemars(description = "Name of the person")]
    pub name: String,
    #[schemars(description = "Age of the person")]
    pub age: i64,
    #[schemars(description = "Job/profession")]
    pub profession: String,
}

fn default_query() -> String {
    DEFAULT_READ_QUERY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadDataParams {
    /// SQL statement to run against the people table
    #[serde(default = "default_query")]
    pub query: String,
}

impl Default for ReadDataParams {
    fn default() -> Self {
        Self {
            query: default_query(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateDataParams {
    #[schemars(description = "Name of the person to update")]
    pub name: String,
    #[serde(default)]
    #[schemars(description = "New age")]
    pub age: Option<i64>,
    #[serde(default)]
    #[schemars(description = "New profession")]
    pub profession: Option<String>,
}

impl UpdateDataParams {
    pub fn patch(&self) -> PersonPatch {
        PersonPatch {
            age: self.age,
            profession: self.profession.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteDataParams {
    #[schemars(description = "Name of the person to delete")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_query_defaults_to_select_all() {
        let params: ReadDataParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(params.query, "SELECT * FROM people");
    }

    #[test]
    fn test_update_optional_fields() {
        let params: UpdateDataParams =
            serde_json::from_value(json!({"name": "Grace", "age": 41})).unwrap();
        assert_eq!(
            params.patch(),
            PersonPatch {
                age: Some(41),
                profession: None
            }
        );

        let params: UpdateDataParams = serde_json::from_value(json!({"name": "Grace"})).unwrap();
        assert!(params.patch().is_empty());
    }

    #[test]
    fn test_add_rejects_non_integer_age() {
        let result: Result<AddDataParams, _> =
            serde_json::from_value(json!({"name": "Ada", "age": "thirty", "profession": "Engineer"}));
        assert!(result.is_err());
    }
}
