use std::fs;
use std::io::ErrorKind;

use serde_json::Value;

use crate::documents::rendering::{ViewError, ViewGenerator};
use crate::documents::view_model::ApplicationViewModel;

/// Reads an HTML template from disk and fills `{{ field }}` placeholders from the model.
///
/// Placeholders are dotted paths into the serialized model. A trailing `?`
/// (`{{ legal_entity.company_name? }}`) renders an empty string when the
/// field is absent; any other unresolved placeholder fails the render.
///
/// `{{#portfolio_funds}}...{{/portfolio_funds}}` repeats its body for every
/// list item, resolving paths against the item before the enclosing model.
/// An object section renders once, and a missing, null, false or empty one
/// renders nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileViewGenerator;

impl ViewGenerator for FileViewGenerator {
    fn generate_from_path(
        &self,
        location: &str,
        model: &ApplicationViewModel,
    ) -> Result<String, ViewError> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        let template = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ViewError::TemplateNotFound {
                location: location.to_string(),
            },
            _ => ViewError::Io {
                location: location.to_string(),
                source,
            },
        })?;

        let values = serde_json::to_value(model)?;
        fill_placeholders(location, &template, &values)
    }
}

pub(crate) fn fill_placeholders(
    location: &str,
    template: &str,
    values: &Value,
) -> Result<String, ViewError> {
    render_block(location, template, &[values])
}

fn render_block(location: &str, template: &str, scopes: &[&Value]) -> Result<String, ViewError> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| ViewError::UnterminatedPlaceholder {
                location: location.to_string(),
            })?;
        let placeholder = after[..end].trim();
        rest = &after[end + 2..];

        if let Some(section) = placeholder.strip_prefix('#') {
            let section = section.trim();
            let (body, remainder) =
                split_section(rest, section).ok_or_else(|| ViewError::UnterminatedSection {
                    location: location.to_string(),
                    section: section.to_string(),
                })?;
            render_section(location, section, body, scopes, &mut output)?;
            rest = remainder;
            continue;
        }

        if let Some(section) = placeholder.strip_prefix('/') {
            return Err(ViewError::UnexpectedSectionEnd {
                location: location.to_string(),
                section: section.trim().to_string(),
            });
        }

        let (path, optional) = match placeholder.strip_suffix('?') {
            Some(path) => (path.trim_end(), true),
            None => (placeholder, false),
        };

        match resolve(scopes, path) {
            Some(value) => output.push_str(&escape_html(&display_value(value))),
            None if optional => {}
            None => {
                return Err(ViewError::UnknownPlaceholder {
                    location: location.to_string(),
                    placeholder: path.to_string(),
                })
            }
        }
    }

    output.push_str(rest);
    Ok(output)
}

fn render_section(
    location: &str,
    section: &str,
    body: &str,
    scopes: &[&Value],
    output: &mut String,
) -> Result<(), ViewError> {
    let Some(value) = resolve(scopes, section) else {
        return Ok(());
    };

    match value {
        Value::Null | Value::Bool(false) => Ok(()),
        Value::Bool(true) => render_scoped(location, body, scopes, None, output),
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| render_scoped(location, body, scopes, Some(item), output)),
        other => render_scoped(location, body, scopes, Some(other), output),
    }
}

fn render_scoped(
    location: &str,
    body: &str,
    scopes: &[&Value],
    item: Option<&Value>,
    output: &mut String,
) -> Result<(), ViewError> {
    let mut nested = scopes.to_vec();
    nested.extend(item);
    output.push_str(&render_block(location, body, &nested)?);
    Ok(())
}

/// Splits `text` at the `{{/section}}` matching an already consumed opening tag.
fn split_section<'t>(text: &'t str, section: &str) -> Option<(&'t str, &'t str)> {
    let mut depth = 0usize;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find("{{") {
        let open = cursor + offset;
        let inner = open + 2;
        let close = inner + text[inner..].find("}}")?;
        let tag = text[inner..close].trim();
        cursor = close + 2;

        if tag.strip_prefix('#').map(str::trim) == Some(section) {
            depth += 1;
        } else if tag.strip_prefix('/').map(str::trim) == Some(section) {
            if depth == 0 {
                return Some((&text[..open], &text[cursor..]));
            }
            depth -= 1;
        }
    }

    None
}

/// Innermost scope first; `.` is the current item itself.
fn resolve<'a>(scopes: &[&'a Value], path: &str) -> Option<&'a Value> {
    if path == "." {
        return scopes.last().copied();
    }
    scopes
        .iter()
        .rev()
        .find_map(|&scope| lookup(scope, path))
}

fn lookup<'a>(values: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(values, |current, segment| match current {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
