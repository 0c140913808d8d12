/// Canonical form of user text: surrounding whitespace removed, lowercased.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
