//! Path template resolution for candidate methods.
//!
//! A method's templates come from explicit route attributes when present,
//! otherwise a single template is synthesized from the configured
//! namespace/controller/action extraction regexes. Every template is
//! normalized, run through the optional-segment expander, and de-duplicated
//! preserving first-seen order.

use crate::descriptor::{MethodDescriptor, ParameterDescriptor, TypeDescriptor};
use crate::error::{Error, Result};
use crate::settings::GeneratorSettings;
use log::debug;
use regex::Regex;

/// Resolves the ordered, de-duplicated path templates for one method.
pub fn resolve_paths(
    settings: &GeneratorSettings,
    type_descriptor: &TypeDescriptor,
    method: &MethodDescriptor,
) -> Result<Vec<String>> {
    let route_names = settings.route_attribute_names();

    let explicit_templates: Vec<String> = method
        .attributes
        .matching_with_property(&route_names, "Template")
        .filter_map(|a| a.string_property("Template"))
        .map(str::to_string)
        .collect();

    let mut templates = Vec::new();

    if !explicit_templates.is_empty() {
        let class_route = type_descriptor
            .attributes
            .matching_with_property(&route_names, "Template")
            .find_map(|a| a.string_property("Template"));
        let class_prefix = type_descriptor
            .attributes
            .first(&settings.route_prefix_attribute)
            .and_then(|a| a.string_property("Prefix"));

        for template in explicit_templates {
            if let Some(stripped) = template.strip_prefix("~/") {
                // Override marker: the template is used verbatim.
                templates.push(stripped.to_string());
            } else if let Some(prefix) = class_prefix {
                templates.push(format!("{}/{}", prefix, template));
            } else if let Some(class_template) = class_route {
                templates.push(format!("{}/{}", class_template, template));
            } else {
                templates.push(template);
            }
        }
    } else {
        let namespace_part = match &type_descriptor.namespace {
            Some(namespace) => extract_group(
                &settings.namespace_path_regex,
                "namespace",
                namespace,
                "namespace_path_regex",
            )?,
            None => String::new(),
        };
        let controller_part = extract_group(
            &settings.controller_path_regex,
            "controller",
            &type_descriptor.simple_name,
            "controller_path_regex",
        )?;
        let action_part = extract_group(
            &settings.action_path_regex,
            "action",
            &method.name,
            "action_path_regex",
        )?;

        templates.push(format!(
            "{}/{}/{}",
            namespace_part, controller_part, action_part
        ));
    }

    let mut paths = Vec::new();
    for template in templates {
        let normalized = normalize(&template);
        for expanded in expand_optional_segments(&normalized, &method.parameters) {
            if !paths.contains(&expanded) {
                paths.push(expanded);
            }
        }
    }

    debug!(
        "Resolved {} path(s) for {}.{}",
        paths.len(),
        type_descriptor.simple_name,
        method.name
    );
    Ok(paths)
}

/// Runs one configured extraction regex against the input and returns the
/// named group's value. An unset setting or a non-matching regex contributes
/// an empty segment, not an error.
fn extract_group(
    pattern: &Option<String>,
    group: &str,
    input: &str,
    setting_name: &str,
) -> Result<String> {
    let Some(pattern) = pattern.as_deref().filter(|p| !p.is_empty()) else {
        return Ok(String::new());
    };

    let regex = Regex::new(pattern).map_err(|e| Error::Configuration {
        attribute: setting_name.to_string(),
        message: format!("invalid regex '{}': {}", pattern, e),
    })?;

    Ok(regex
        .captures(input)
        .and_then(|captures| captures.name(group))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default())
}

/// Normalizes a template: bracket placeholders become braces, slashes are
/// collapsed, and the result has a single leading slash and no trailing one.
fn normalize(template: &str) -> String {
    let braced = template.replace('[', "{").replace(']', "}");
    let joined = braced
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

/// Expands every `{name?}` segment into present/absent alternatives,
/// recursively left-to-right.
///
/// The absent variant is always emitted. The present variant is emitted only
/// when a method parameter matches the segment name (with or without a
/// trailing type-constraint token); otherwise expansion along that branch
/// stops and only variants already produced to its left survive.
pub fn expand_optional_segments(
    path: &str,
    parameters: &[ParameterDescriptor],
) -> Vec<String> {
    let segments: Vec<&str> = path.split('/').collect();

    for (index, segment) in segments.iter().enumerate() {
        if !segment.ends_with("?}") {
            continue;
        }

        let mut variants = Vec::new();

        let without: Vec<&str> = segments
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .map(|(_, s)| *s)
            .collect();
        variants.extend(expand_optional_segments(&without.join("/"), parameters));

        let parameter_present = parameters.iter().any(|p| {
            segment.starts_with(&format!("{{{}:", p.name))
                || segment.starts_with(&format!("{{{}?", p.name))
        });
        if parameter_present {
            let kept = segment.replace('?', "");
            let with: Vec<&str> = segments
                .iter()
                .enumerate()
                .map(|(j, s)| if j == index { kept.as_str() } else { *s })
                .collect();
            variants.extend(expand_optional_segments(&with.join("/"), parameters));
        }

        return variants;
    }

    vec![path.to_string()]
}
