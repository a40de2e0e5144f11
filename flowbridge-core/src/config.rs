//! Flow configuration types and loading
//!
//! A configuration document is a YAML sequence of flow entries:
//!
//! ```yaml
//! - flow_id: "7330***"
//!   name: weather_report
//!   description: Fetch a weather report for a city
//!   api_key: "key:secret"
//!   params:
//!     - name: city
//!       type: string
//!       description: City name
//!       required: true
//! ```
//!
//! The whole document either loads into a fully valid flow list or the
//! load fails; a partial catalog is never produced.

use serde::Deserialize;
use std::path::Path;

use crate::error::{FlowBridgeError, Result};

/// Parameter value type, used only to build the tool input schema.
///
/// Types are never enforced at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    pub fn as_str(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
        }
    }
}

/// One declared input parameter of a flow
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

/// One remotely-hosted workflow, addressable as a tool by `name`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Flow {
    /// Remote-system identifier, opaque to this crate
    #[serde(rename = "flow_id")]
    pub id: String,
    /// Externally visible tool name, unique across the catalog
    pub name: String,
    pub description: String,
    /// Secret used as the bearer credential for this flow's requests
    #[serde(rename = "api_key")]
    pub credential: String,
    #[serde(default, rename = "params")]
    pub parameters: Vec<Param>,
}

/// Load the flow list from a YAML configuration file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file cannot be read, and
/// `ConfigInvalid` if the document is malformed or any entry is missing
/// a required field. No partial result is ever returned.
pub fn load_flows(path: impl AsRef<Path>) -> Result<Vec<Flow>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| FlowBridgeError::ConfigNotFound(format!("{}: {}", path.display(), e)))?;

    serde_yaml::from_str(&contents).map_err(|e| FlowBridgeError::ConfigInvalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID_CONFIG: &str = r#"
- flow_id: "id-1"
  name: weather
  description: Weather lookup
  api_key: "key:secret"
  params:
    - name: city
      type: string
      description: City name
      required: true
    - name: days
      type: number
      description: Forecast horizon
      required: false
- flow_id: "id-2"
  name: translate
  description: Translation flow
  api_key: "key:other"
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(VALID_CONFIG);
        let flows = load_flows(file.path()).unwrap();

        assert_eq!(flows.len(), 2);
        assert_eq!(flows[0].id, "id-1");
        assert_eq!(flows[0].name, "weather");
        assert_eq!(flows[0].credential, "key:secret");
        assert_eq!(flows[0].parameters.len(), 2);
        assert_eq!(flows[0].parameters[0].name, "city");
        assert_eq!(flows[0].parameters[0].param_type, ParamType::String);
        assert!(flows[0].parameters[0].required);
        assert!(!flows[0].parameters[1].required);
    }

    #[test]
    fn test_params_default_to_empty() {
        let file = write_config(VALID_CONFIG);
        let flows = load_flows(file.path()).unwrap();
        assert!(flows[1].parameters.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let result = load_flows("/nonexistent/flows.yaml");
        assert!(matches!(result, Err(FlowBridgeError::ConfigNotFound(_))));
    }

    #[test]
    fn test_malformed_document() {
        let file = write_config("not: [a, sequence");
        let result = load_flows(file.path());
        assert!(matches!(result, Err(FlowBridgeError::ConfigInvalid(_))));
    }

    #[test]
    fn test_missing_required_field_fails_whole_load() {
        // Second entry lacks api_key; the first entry must not survive either.
        let config = r#"
- flow_id: "id-1"
  name: weather
  description: Weather lookup
  api_key: "key:secret"
- flow_id: "id-2"
  name: translate
  description: Translation flow
"#;
        let file = write_config(config);
        let result = load_flows(file.path());
        assert!(matches!(result, Err(FlowBridgeError::ConfigInvalid(_))));
    }

    #[test]
    fn test_unknown_param_type_rejected() {
        let config = r#"
- flow_id: "id-1"
  name: weather
  description: Weather lookup
  api_key: "key:secret"
  params:
    - name: city
      type: text
      description: City name
      required: true
"#;
        let file = write_config(config);
        let result = load_flows(file.path());
        assert!(matches!(result, Err(FlowBridgeError::ConfigInvalid(_))));
    }
}
