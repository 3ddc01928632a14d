// Metadata trailer of CHIRP .img files
// Reference: chirp/chirp_common.py lines 1582-1596

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata stored after the image bytes
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Metadata {
    /// Radio class name
    #[serde(default)]
    pub rclass: String,

    /// Vendor name
    #[serde(default)]
    pub vendor: String,

    /// Model name
    #[serde(default)]
    pub model: String,

    /// Model variant
    #[serde(default)]
    pub variant: String,

    /// CHIRP version that created the file
    #[serde(default)]
    pub chirp_version: String,

    /// Additional properties
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Metadata {
    pub fn new(vendor: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// True when the file carried no usable identification
    pub fn is_empty(&self) -> bool {
        self.vendor.is_empty() && self.model.is_empty() && self.rclass.is_empty()
    }

    /// Text to match against layout tokens: the model name, or failing that
    /// the radio class (e.g. `BaofengUV5R`)
    pub fn model_hint(&self) -> Option<&str> {
        [self.model.as_str(), self.rclass.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Get an extra property
    pub fn get_extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
