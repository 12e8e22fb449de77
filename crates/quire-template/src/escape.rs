//! HTML entity escaping for `{{name}}` substitutions.

/// Escapes `&`, `<`, `>`, `"`, `'`, `/`, the backtick and `=` as HTML entities.
///
/// # Example
///
/// ```rust
/// use quire_template::escape_html;
///
/// assert_eq!(escape_html("<a href=\"/\">"), "&lt;a href&#x3D;&quot;&#x2F;&quot;&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(ch),
        }
    }
    out
}
