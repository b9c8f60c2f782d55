// src/utils/url.rs

//! URL template utilities.

/// Characters left unescaped besides ASCII alphanumerics.
const SAFE: &[u8] = b"_.-~/";

/// Percent-escape a value for use inside a URL path or query.
///
/// Slashes are kept so category-qualified names such as `www/firefox`
/// still form valid paths.
///
/// # Examples
/// ```
/// use repology_wikidata_bot::utils::url::quote;
///
/// assert_eq!(quote("dev-libs/foo bar"), "dev-libs/foo%20bar");
/// ```
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || SAFE.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Replace every `{}` placeholder of a template with the escaped value.
pub fn substitute(template: &str, value: &str) -> String {
    template.replace("{}", &quote(value))
}
