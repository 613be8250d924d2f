//! Template alias normalization

/// Short template names and the versioned template they stand for
const TEMPLATE_ALIASES: &[(&str, &str)] = &[("sablier", "sablier-v1"), ("uniswap", "uniswap-v2")];

/// Map a user-supplied template name to its canonical identifier.
/// Names without an alias pass through unchanged.
pub fn normalize_template(raw: &str) -> String {
    TEMPLATE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| raw.to_string())
}
