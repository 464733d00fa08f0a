//! # Input Files
//!
//! Loading of form records and session configuration from disk. Records
//! are YAML or JSON (YAML is a superset), keyed by field wire name:
//!
//! ```yaml
//! full_name: Jane Doe
//! email: jane@example.com
//! password: Str0ng!Pass
//! mobile_number: "+905551234567"
//! terms: true
//! ```
//!
//! Missing keys take their session-creation defaults.

use std::path::Path;

use anyhow::Context;

use signup_core::{FormConfig, FormInput};

/// Read a form record from a YAML or JSON file.
pub fn load_form_input(path: &Path) -> anyhow::Result<FormInput> {
    let doc = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read form input '{}'", path.display()))?;
    if doc.trim().is_empty() {
        return Ok(FormInput::default());
    }
    serde_yaml::from_str(&doc)
        .with_context(|| format!("invalid form input document '{}'", path.display()))
}

/// Read the session configuration, or use defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<FormConfig> {
    match path {
        Some(path) => FormConfig::load(path)
            .with_context(|| format!("cannot load config '{}'", path.display())),
        None => Ok(FormConfig::default()),
    }
}
