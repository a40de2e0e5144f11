//! Flow catalog: ownership, name lookup, and schema derivation
//!
//! The catalog is built once at startup from the loaded flow list and is
//! read-only afterwards, so it can be shared across concurrent tool
//! calls behind an `Arc` without locking.

use serde_json::{json, Map, Value};
use std::collections::HashMap;

use crate::config::Flow;
use crate::error::{FlowBridgeError, Result};
use crate::mcp::protocol::McpTool;

/// Immutable collection of flows with O(1) lookup by tool name
#[derive(Debug)]
pub struct FlowCatalog {
    flows: Vec<Flow>,
    index: HashMap<String, usize>,
}

impl FlowCatalog {
    /// Build a catalog from a flow list, rejecting duplicate names.
    pub fn build(flows: Vec<Flow>) -> Result<Self> {
        let mut index = HashMap::with_capacity(flows.len());
        for (i, flow) in flows.iter().enumerate() {
            if index.insert(flow.name.clone(), i).is_some() {
                return Err(FlowBridgeError::DuplicateFlow(flow.name.clone()));
            }
        }
        Ok(Self { flows, index })
    }

    /// Look up a flow by its externally visible tool name.
    pub fn resolve(&self, name: &str) -> Option<&Flow> {
        self.index.get(name).map(|&i| &self.flows[i])
    }

    /// All flows in declaration order.
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Tool descriptors for MCP listing, one per flow in catalog order.
    pub fn descriptors(&self) -> Vec<McpTool> {
        self.flows
            .iter()
            .map(|flow| McpTool {
                name: flow.name.clone(),
                description: flow.description.clone(),
                input_schema: input_schema(flow),
            })
            .collect()
    }
}

/// Derive the JSON-Schema input description for a flow.
///
/// Properties follow parameter declaration order; `required` collects
/// the names of parameters marked required.
pub fn input_schema(flow: &Flow) -> Value {
    let mut properties = Map::new();
    for param in &flow.parameters {
        properties.insert(
            param.name.clone(),
            json!({
                "type": param.param_type.as_str(),
                "description": param.description,
            }),
        );
    }

    let required: Vec<&str> = flow
        .parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.as_str())
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Check that every required parameter is present in the arguments.
///
/// Values are passed through to the remote API untyped; only presence
/// is checked here.
pub fn check_arguments(flow: &Flow, arguments: &Map<String, Value>) -> Result<()> {
    let missing: Vec<&str> = flow
        .parameters
        .iter()
        .filter(|p| p.required && !arguments.contains_key(&p.name))
        .map(|p| p.name.as_str())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FlowBridgeError::InvalidArguments(format!(
            "flow '{}' missing required parameters: {}",
            flow.name,
            missing.join(", ")
        )))
    }
}
