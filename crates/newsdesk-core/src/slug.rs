//! URL slug derivation for sources and topics.

/// Derive a URL-safe slug from a display name.
///
/// ASCII letters and digits are lowercased and kept, as are `_` and `-`.
/// Runs of whitespace and hyphens collapse to a single `-`. Everything else
/// is dropped, and leading/trailing separators are trimmed.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut pending_dash = false;

  for c in name.chars() {
    if c.is_ascii_alphanumeric() || c == '_' {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c.to_ascii_lowercase());
    } else if c == '-' || c.is_whitespace() {
      pending_dash = true;
    }
  }

  slug.trim_matches(|c| c == '-' || c == '_').to_string()
}
