//! Version comparison for CLI and catalog compatibility

use semver::Version;

/// Compare CLI version against the catalog's minimum version
/// Returns a warning message if the CLI is older than the catalog expects
pub fn check_compatibility(
    cli_version: &str,
    required_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli_ver = parse_version(cli_version)?;
    let required_ver = parse_version(required_version)?;

    if cli_ver < required_ver {
        Some(format!(
            "The bundle catalog was published for CLI version {} or newer, \
             you are running {}. Consider updating: {}",
            required_version, cli_version, upgrade_command
        ))
    } else {
        None
    }
}

/// Parse version string, tolerating a leading 'v'
fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).ok()
}
