//! String helpers available inside bundle templates
//!
//! All helpers are pure: `{{kebabCase appName}}` and friends only reshape
//! their single string argument.

use handlebars::{handlebars_helper, Handlebars};
use inflector::Inflector;

handlebars_helper!(camel_case: |s: str| s.to_camel_case());
handlebars_helper!(pascal_case: |s: str| s.to_pascal_case());
handlebars_helper!(kebab_case: |s: str| s.to_kebab_case());
handlebars_helper!(snake_case: |s: str| s.to_snake_case());
handlebars_helper!(upper_case: |s: str| s.to_uppercase());
handlebars_helper!(lower_case: |s: str| s.to_lowercase());
handlebars_helper!(capitalize: |s: str| capitalize_first(s));

/// Names under which the helpers are registered
pub(crate) const HELPER_NAMES: [&str; 7] = [
    "camelCase",
    "pascalCase",
    "kebabCase",
    "snakeCase",
    "upperCase",
    "lowerCase",
    "capitalize",
];

/// Upper-case the first character, leave the rest alone
pub fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Install every helper into `registry`, replacing same-named ones
pub(crate) fn register_all(registry: &mut Handlebars<'static>) {
    registry.register_helper("camelCase", Box::new(camel_case));
    registry.register_helper("pascalCase", Box::new(pascal_case));
    registry.register_helper("kebabCase", Box::new(kebab_case));
    registry.register_helper("snakeCase", Box::new(snake_case));
    registry.register_helper("upperCase", Box::new(upper_case));
    registry.register_helper("lowerCase", Box::new(lower_case));
    registry.register_helper("capitalize", Box::new(capitalize));
}
