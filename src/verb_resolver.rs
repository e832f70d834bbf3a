//! HTTP verb resolution for candidate methods.
//!
//! The verb comes from the configured verb attribute when the method carries
//! one, otherwise from a verb token embedded in the configured attribute
//! type-name itself. Exactly one verb is derived per method; multiple verbs
//! per operation set come from multiple resolved paths, never from here.

use crate::descriptor::{split_dotted, MethodDescriptor};
use crate::error::{Error, Result};
use crate::settings::GeneratorSettings;
use crate::swagger::Verb;
use regex::Regex;

const VERB_TOKEN_PATTERN: &str = r"(?i)(?P<verb>get|post|put|delete|patch|head|options)";

/// Resolves the HTTP verb for one method.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when the dotted setting names a property
/// the matching attribute's shape does not have. This aborts the whole run,
/// not just the current operation.
pub fn resolve_verb(settings: &GeneratorSettings, method: &MethodDescriptor) -> Result<Verb> {
    let Some(setting) = settings.verb_attribute.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(Verb::Post);
    };

    let (type_name, property) = split_dotted(setting);

    let verb_string = match method.attributes.first(type_name) {
        Some(attribute) => match property {
            Some(property) => {
                if !attribute.has_property(property) {
                    return Err(Error::missing_property(type_name, property));
                }
                attribute
                    .string_property(property)
                    .map(str::to_lowercase)
                    .unwrap_or_default()
            }
            None => String::new(),
        },
        None => {
            // No attribute on the method: the configured type-name itself may
            // embed the verb (e.g. "HttpGetAttribute").
            let regex = Regex::new(VERB_TOKEN_PATTERN).expect("verb token pattern is valid");
            regex
                .captures(type_name)
                .and_then(|captures| captures.name("verb"))
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_default()
        }
    };

    Ok(Verb::parse(&verb_string).unwrap_or(Verb::Post))
}
