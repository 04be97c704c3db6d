use serde::Deserialize;
use ciliumd_core::error::{CiliumError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    pub version: u32,

    #[serde(default)]
    pub policy: PolicySection,

    #[serde(default)]
    pub labels: LabelsSection,
}

impl DaemonConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CiliumError::UnsupportedVersion);
        }

        self.policy.validate()?;
        self.labels.validate()?;

        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            version: 1,
            policy: PolicySection::default(),
            labels: LabelsSection::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    /// Namespace prefix every policy path starts with.
    #[serde(default = "default_root")]
    pub root: String,

    /// Policy document (JSON or YAML) loaded at the root on startup.
    #[serde(default)]
    pub import: Option<String>,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            root: default_root(),
            import: None,
        }
    }
}

impl PolicySection {
    pub fn validate(&self) -> Result<()> {
        if self.root.is_empty() {
            return Err(CiliumError::BadRequest("policy.root must not be empty".into()));
        }
        if self.root.split('.').any(str::is_empty) {
            return Err(CiliumError::BadRequest(format!(
                "policy.root has an empty segment: {}",
                self.root
            )));
        }
        Ok(())
    }
}

fn default_root() -> String {
    "io.cilium".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelsSection {
    /// Upper bound (exclusive) on label identifiers.
    #[serde(default = "default_max_set_of_labels")]
    pub max_set_of_labels: u32,

    /// First identifier handed out by a fresh allocator.
    #[serde(default)]
    pub first_free_id: u32,
}

impl Default for LabelsSection {
    fn default() -> Self {
        Self {
            max_set_of_labels: default_max_set_of_labels(),
            first_free_id: 0,
        }
    }
}

impl LabelsSection {
    pub fn validate(&self) -> Result<()> {
        if self.max_set_of_labels == 0 {
            return Err(CiliumError::BadRequest(
                "labels.max_set_of_labels must be greater than 0".into(),
            ));
        }
        if self.first_free_id >= self.max_set_of_labels {
            return Err(CiliumError::BadRequest(
                "labels.first_free_id must be less than max_set_of_labels".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_set_of_labels() -> u32 {
    0xFFFF
}
