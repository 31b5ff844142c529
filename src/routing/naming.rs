//! Name normalization and method keys.
//!
//! # Responsibilities
//! - Convert camel-case identifiers to lowercase snake form
//! - Build the `"<Verb>/<name>"` key used to index a controller's methods
//! - Normalize raw HTTP method strings to the `Get`/`Post` spelling used in keys
//!
//! # Design Decisions
//! - Verb prefix detection is case-sensitive (`DeleteUser`, not `deleteUser`)
//! - First verb in [`REQUEST_METHODS`] that prefixes the name wins

/// Verbs recognized as method name prefixes, in match order.
pub const REQUEST_METHODS: [&str; 6] = ["Get", "Post", "Delete", "Put", "Patch", "Head"];

/// Verb used for methods whose name carries no verb prefix.
pub const DEFAULT_REQUEST_METHOD: &str = "Get";

/// Convert an identifier to lowercase snake case.
///
/// An underscore is inserted before every uppercase ASCII letter that is not the
/// first character, provided a non-underscore character has been seen before it.
/// `"GetUser"` becomes `"get_user"`, `"ID"` becomes `"i_d"`, and `"_Id"` stays `"_id"`.
pub fn snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    let mut seen_word = false;
    for (i, c) in s.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() && seen_word {
            out.push('_');
        }
        if c != '_' {
            seen_word = true;
        }
        out.push(c);
    }
    out.to_lowercase()
}

/// Build the lookup key for a controller method.
///
/// If `name` starts with one of [`REQUEST_METHODS`], that verb is used and the rest of
/// the name becomes the key's name part. Otherwise `default_verb` is used with the
/// whole name.
pub fn method_key(name: &str, default_verb: &str) -> String {
    for verb in REQUEST_METHODS {
        if let Some(rest) = name.strip_prefix(verb) {
            return format!("{}/{}", verb, snake_case(rest));
        }
    }
    format!("{}/{}", default_verb, snake_case(name))
}

/// Normalize an HTTP method to first-letter-uppercase form (`GET` -> `Get`).
pub fn normalize_verb(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => {
            let mut out = first.to_uppercase().collect::<String>();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}
