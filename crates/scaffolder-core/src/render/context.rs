//! Values exposed to bundle templates

use serde::Serialize;

/// Bindings visible to every template during one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    /// Last path component of the project root
    pub app_name: String,
    pub framework: String,
    pub template: String,
}

impl RenderContext {
    pub fn new(
        app_name: impl Into<String>,
        framework: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            framework: framework.into(),
            template: template.into(),
        }
    }
}
