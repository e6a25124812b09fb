//! Singularization of table and field names (basic English heuristics)

const UNCOUNTABLE: &[&str] = &[
    "data",
    "metadata",
    "news",
    "series",
    "species",
    "equipment",
    "information",
    "sheep",
    "fish",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
];

/// Suffixes that pluralize with "es"
const ES_SUFFIXES: &[&str] = &["sses", "shes", "ches", "xes", "zzes", "atuses", "puses", "ruses"];

/// Returns the singular form of a snake_case or camelCase name
///
/// Names listed in `exclusions` are returned unchanged. Only the last
/// underscore segment is inflected, so `user_accounts` becomes `user_account`.
pub fn singular(name: &str, exclusions: &[String]) -> String {
    if exclusions.iter().any(|e| e == name) {
        return name.to_string();
    }

    let (prefix, word) = match name.rfind('_') {
        Some(idx) => name.split_at(idx + 1),
        None => ("", name),
    };

    format!("{}{}", prefix, singular_word(word))
}

fn singular_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.iter().any(|u| lower.ends_with(u)) {
        return word.to_string();
    }

    for (plural, single) in IRREGULAR {
        if lower.ends_with(plural) {
            let stem = &word[..word.len() - plural.len()];
            return format!("{}{}", stem, keep_case(&word[word.len() - plural.len()..], single));
        }
    }

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }

    if ES_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return word[..word.len() - 2].to_string();
    }

    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }

    match word.strip_suffix('s').or_else(|| word.strip_suffix('S')) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

/// Apply the capitalization of the first character of `original` to `replacement`
fn keep_case(original: &str, replacement: &str) -> String {
    match original.chars().next() {
        Some(c) if c.is_uppercase() => {
            let mut chars = replacement.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
        _ => replacement.to_string(),
    }
}
