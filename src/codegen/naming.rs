//! Identifier synthesis
//!
//! Turns raw SQL identifiers into Java class, member and constant names.

use std::sync::LazyLock;

use regex::Regex;

/// Marker appended to identifiers that collide with a reserved word
pub const RESERVED_MARKER: char = '_';

/// Java keywords and reserved literals (exact, case-sensitive match)
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "if", "goto", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while",
];

static NON_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9_]+").expect("valid identifier pattern"));

/// Convert snake_case to PascalCase
///
/// Only the first character of each segment is upper-cased; the rest is kept
/// as written so embedded acronyms survive (`user_ID` -> `UserID`).
pub fn class_name(name: &str) -> String {
    name.split('_').map(upper_first).collect()
}

/// Convert snake_case to camelCase
pub fn member_name(name: &str) -> String {
    lower_first(&class_name(name))
}

/// Method argument name: first segment lower-cased, later segments title-cased
pub fn arg_name(name: &str) -> String {
    name.split('_')
        .enumerate()
        .map(|(i, part)| {
            if i == 0 {
                part.to_lowercase()
            } else {
                upper_first(part)
            }
        })
        .collect()
}

/// Enum constant name for a literal value (`in-progress` -> `IN_PROGRESS`)
pub fn enum_constant_name(value: &str) -> String {
    let id = value.replace(['-', ':', '/'], "_");
    NON_IDENT.replace_all(&id, "").to_uppercase()
}

/// Constant name for a camelCase name (`GetUserByID` -> `GET_USER_BY_ID`)
///
/// A word starts where an upper-case character follows a non-upper-case one,
/// or where an upper-case run is followed by a lower-case character.
pub fn constant_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let boundary = i > 0
            && c.is_uppercase()
            && (!chars[i - 1].is_uppercase()
                || chars.get(i + 1).is_some_and(|next| next.is_lowercase()));
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn is_reserved(ident: &str) -> bool {
    RESERVED_WORDS.contains(&ident)
}

/// Append [`RESERVED_MARKER`] when `ident` is a reserved word
///
/// Escaped identifiers are never reserved themselves, so escaping twice is a
/// no-op.
pub fn escape_reserved(ident: &str) -> String {
    if is_reserved(ident) {
        format!("{}{}", ident, RESERVED_MARKER)
    } else {
        ident.to_string()
    }
}

/// Upper-case the first character, keep the rest
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lower-case the first character, keep the rest
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("user"), "User");
        assert_eq!(class_name("order_status"), "OrderStatus");
        assert_eq!(class_name("order_line_items"), "OrderLineItems");
        assert_eq!(class_name("user_ID"), "UserID");
        assert_eq!(class_name("spotifyPlaylist"), "SpotifyPlaylist");
    }

    #[test]
    fn test_class_name_idempotent_without_underscores() {
        for name in ["User", "OrderStatus", "x", ""] {
            assert_eq!(class_name(&class_name(name)), class_name(name));
        }
    }

    #[test]
    fn test_member_name() {
        assert_eq!(member_name("id"), "id");
        assert_eq!(member_name("spotify_playlist"), "spotifyPlaylist");
        assert_eq!(member_name("Email_Address"), "emailAddress");
    }

    #[test]
    fn test_member_name_of_class_name_lowers_first_char_only() {
        for name in ["created_at", "HTTP_code", "user_ID"] {
            let class = class_name(name);
            assert_eq!(member_name(&class), lower_first(&class));
        }
    }

    #[test]
    fn test_arg_name() {
        assert_eq!(arg_name("user_id"), "userId");
        assert_eq!(arg_name("User_ID"), "userID");
        assert_eq!(arg_name("slug"), "slug");
    }

    #[test]
    fn test_enum_constant_name() {
        assert_eq!(enum_constant_name("in-progress"), "IN_PROGRESS");
        assert_eq!(enum_constant_name("done"), "DONE");
        assert_eq!(enum_constant_name("a:b/c"), "A_B_C");
        assert_eq!(enum_constant_name("what's up?"), "WHATSUP");
        assert_eq!(enum_constant_name(""), "");
    }

    #[test]
    fn test_enum_constant_names_can_collide() {
        assert_eq!(enum_constant_name("a-b"), enum_constant_name("a_b"));
    }

    #[test]
    fn test_constant_name() {
        assert_eq!(constant_name("GetUser"), "GET_USER");
        assert_eq!(constant_name("listUsers"), "LIST_USERS");
        assert_eq!(constant_name("GetUserByID"), "GET_USER_BY_ID");
        assert_eq!(constant_name("HTTPServerStatus"), "HTTP_SERVER_STATUS");
        assert_eq!(constant_name("a"), "A");
        assert_eq!(constant_name(""), "");
    }

    #[test]
    fn test_escape_reserved() {
        assert_eq!(escape_reserved("class"), "class_");
        assert_eq!(escape_reserved("name"), "name");
        assert_eq!(escape_reserved("Class"), "Class");
    }

    #[test]
    fn test_escape_reserved_every_word() {
        for word in RESERVED_WORDS {
            let escaped = escape_reserved(word);
            assert_ne!(&escaped, word);
            assert_eq!(escape_reserved(&escaped), escaped);
        }
    }
}
