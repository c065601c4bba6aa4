//! Deploy-time `{{ name }}` placeholder substitution

use std::collections::BTreeMap;

use crate::error::UnresolvedPlaceholder;

/// A placeholder occurrence: byte range in the template and the trimmed name
struct Placeholder<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

fn scan(template: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut offset = 0;

    while let Some(open) = template[offset..].find("{{") {
        let start = offset + open;
        let Some(close) = template[start + 2..].find("}}") else {
            break;
        };
        let end = start + 2 + close + 2;
        let name = template[start + 2..end - 2].trim();

        if !name.is_empty() {
            found.push(Placeholder { start, end, name });
        }
        offset = end;
    }

    found
}

/// Names of every placeholder in `template`, in order of appearance
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    scan(template).into_iter().map(|p| p.name).collect()
}

/// Fails on the first placeholder missing from `names`
///
/// # Errors
///
/// Returns `UnresolvedPlaceholder` with the missing name
pub fn check<'a, I>(template: &str, names: I) -> Result<(), UnresolvedPlaceholder>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();

    match placeholders(template)
        .into_iter()
        .find(|name| !names.contains(name))
    {
        Some(missing) => Err(UnresolvedPlaceholder(missing.to_string())),
        None => Ok(()),
    }
}

/// Replaces every `{{ name }}` with its value
///
/// # Errors
///
/// Returns `UnresolvedPlaceholder` if any placeholder has no value
pub fn render(
    template: &str,
    values: &BTreeMap<String, String>,
) -> Result<String, UnresolvedPlaceholder> {
    let mut rendered = String::with_capacity(template.len());
    let mut cursor = 0;

    for placeholder in scan(template) {
        let value = values
            .get(placeholder.name)
            .ok_or_else(|| UnresolvedPlaceholder(placeholder.name.to_string()))?;

        rendered.push_str(&template[cursor..placeholder.start]);
        rendered.push_str(value);
        cursor = placeholder.end;
    }

    rendered.push_str(&template[cursor..]);
    Ok(rendered)
}
