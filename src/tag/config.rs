use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_form_prefix() -> String {
    "ref-form".to_string()
}

fn default_mod_prefix() -> String {
    "ref-mod".to_string()
}

fn default_sentinel() -> String {
    "simple".to_string()
}

/// Tier naming and sentinel options. Every field has a default matching
/// the annotation convention of the lab rotation files, so an empty config
/// file and no config file behave the same.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TagConfig {
    /// Name prefix of the parent tiers (`ref-form` -> `ref-form1`, ...).
    #[serde(default = "default_form_prefix")]
    pub form_prefix: String,
    /// Name prefix of the paired sub-annotation tiers.
    #[serde(default = "default_mod_prefix")]
    pub mod_prefix: String,
    /// Value written into synthesized cells.
    #[serde(default = "default_sentinel")]
    pub sentinel: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            form_prefix: default_form_prefix(),
            mod_prefix: default_mod_prefix(),
            sentinel: default_sentinel(),
        }
    }
}

impl TagConfig {
    pub fn load(path: &Path) -> Result<TagConfig> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&contents).context("parsing config toml")?;
        Ok(config)
    }

    /// Name of the mandatory first form tier, `ref-form1` by default.
    pub fn base_tier(&self) -> String {
        self.form_tier(1)
    }

    pub fn form_tier(&self, n: u32) -> String {
        format!("{}{}", self.form_prefix, n)
    }

    pub fn mod_tier(&self, n: u32) -> String {
        format!("{}{}", self.mod_prefix, n)
    }
}
