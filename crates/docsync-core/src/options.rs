//! Render configuration.
//!
//! Built once per batch run and passed by reference into every conversion.

use serde::{Deserialize, Serialize};

/// Options that affect the generated HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// `target` attribute for generated links (`None` omits it).
    pub link_target: Option<String>,
    /// `class` attribute for `<table>` (`None` omits it).
    pub table_class: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            link_target: Some("_blank".to_string()),
            table_class: Some("md-table".to_string()),
        }
    }
}

impl RenderOptions {
    /// Options that emit bare elements with no extra attributes.
    pub fn bare() -> Self {
        Self {
            link_target: None,
            table_class: None,
        }
    }

    /// Set the link target.
    pub fn with_link_target(mut self, target: impl Into<String>) -> Self {
        self.link_target = Some(target.into());
        self
    }

    /// Set the table class.
    pub fn with_table_class(mut self, class: impl Into<String>) -> Self {
        self.table_class = Some(class.into());
        self
    }
}
