//! Policy documents on disk (JSON or YAML), strict parsing.

use std::fs;
use std::path::Path;

use ciliumd_core::error::{CiliumError, Result};
use ciliumd_core::policy::PolicyNode;

pub fn load_node_from_file(path: impl AsRef<Path>) -> Result<PolicyNode> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        CiliumError::Internal(format!("read policy {} failed: {e}", path.display()))
    })?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_node_from_json(&s),
        Some("yaml" | "yml") => load_node_from_yaml(&s),
        _ => Err(CiliumError::BadRequest(format!(
            "unsupported policy file {} (expected .json, .yaml or .yml)",
            path.display()
        ))),
    }
}

pub fn load_node_from_json(s: &str) -> Result<PolicyNode> {
    let mut node: PolicyNode = serde_json::from_str(s)
        .map_err(|e| CiliumError::BadRequest(format!("invalid policy json: {e}")))?;
    node.normalize()?;
    Ok(node)
}

pub fn load_node_from_yaml(s: &str) -> Result<PolicyNode> {
    let mut node: PolicyNode = serde_yaml::from_str(s)
        .map_err(|e| CiliumError::BadRequest(format!("invalid policy yaml: {e}")))?;
    node.normalize()?;
    Ok(node)
}
