//! Product configuration trait for CLI binaries
//!
//! A binary built on this crate describes itself through `ProductConfig`: where its
//! catalog lives, how to override it and how it presents itself.

/// Configuration trait for a scaffolding product
///
/// Each binary implements this trait to define:
/// - Product identity (name, display name)
/// - Catalog source URL and its environment override
/// - Documentation links
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default base URL holding `catalog.yaml` and the bundle zips
    fn default_catalog_url(&self) -> &'static str;

    /// Environment variable name for overriding the catalog URL
    fn catalog_url_env(&self) -> &'static str;

    /// URL for product documentation
    fn docs_url(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Message used for the initial commit of a freshly scaffolded project
    fn initial_commit_message(&self) -> String {
        format!("Initial commit from {}", self.display_name())
    }

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
