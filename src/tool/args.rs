//! Validated tool arguments.

use super::ToolParam;
use crate::error::{DaisyError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Named string arguments, with every declared parameter present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs {
    values: HashMap<String, String>,
}

impl ToolArgs {
    /// Validate `raw` (a JSON object, or nothing) against `params`.
    ///
    /// Numbers and booleans are accepted and converted to strings; `null`
    /// counts as omitted. Undeclared keys are ignored.
    pub(crate) fn bind(tool: &str, params: &[ToolParam], raw: Option<&Value>) -> Result<Self> {
        let object = match raw {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(DaisyError::InvalidArguments(format!(
                    "{} expects an object of arguments, got {}",
                    tool, other
                )))
            }
        };

        let mut values = HashMap::with_capacity(params.len());
        for param in params {
            let supplied = object.and_then(|m| m.get(&param.name));
            let value = match supplied {
                None | Some(Value::Null) => match &param.default {
                    Some(default) => default.clone(),
                    None => {
                        return Err(DaisyError::InvalidArguments(format!(
                            "{} is missing required argument '{}'",
                            tool, param.name
                        )))
                    }
                },
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                Some(_) => {
                    return Err(DaisyError::InvalidArguments(format!(
                        "{} argument '{}' must be a string",
                        tool, param.name
                    )))
                }
            };
            values.insert(param.name.clone(), value);
        }

        Ok(Self { values })
    }

    /// Get an argument if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get an argument, or the empty string.
    pub fn str(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> Vec<ToolParam> {
        vec![
            ToolParam::required("genre", "Genre"),
            ToolParam::optional("region", "Region", "global"),
        ]
    }

    #[test]
    fn test_bind_with_all_arguments() {
        let args =
            ToolArgs::bind("t", &params(), Some(&json!({"genre": "pop", "region": "UK"}))).unwrap();
        assert_eq!(args.str("genre"), "pop");
        assert_eq!(args.str("region"), "UK");
    }

    #[test]
    fn test_bind_null_uses_default() {
        let args =
            ToolArgs::bind("t", &params(), Some(&json!({"genre": "pop", "region": null}))).unwrap();
        assert_eq!(args.str("region"), "global");
    }

    #[test]
    fn test_bind_converts_numbers() {
        let args = ToolArgs::bind("t", &params(), Some(&json!({"genre": 2024}))).unwrap();
        assert_eq!(args.str("genre"), "2024");
    }

    #[test]
    fn test_bind_rejects_nested_values() {
        let result = ToolArgs::bind("t", &params(), Some(&json!({"genre": ["pop"]})));
        assert!(matches!(result, Err(DaisyError::InvalidArguments(_))));
    }

    #[test]
    fn test_bind_rejects_non_object() {
        let result = ToolArgs::bind("t", &params(), Some(&json!("pop")));
        assert!(matches!(result, Err(DaisyError::InvalidArguments(_))));
    }

    #[test]
    fn test_bind_without_arguments() {
        let result = ToolArgs::bind("t", &params(), None);
        assert!(result.is_err());

        let only_optional = [ToolParam::optional("timeframe", "When", "current")];
        let args = ToolArgs::bind("t", &only_optional, None).unwrap();
        assert_eq!(args.str("timeframe"), "current");
    }
}
