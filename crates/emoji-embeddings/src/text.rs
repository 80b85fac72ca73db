//! Embedding text for catalog entries.

use emoji_core::EmojiEntry;

/// Build the text an entry is embedded from.
///
/// The display name, followed by the space-joined keywords when there are
/// any.
pub fn description_text(entry: &EmojiEntry) -> String {
    if entry.keywords.is_empty() {
        return entry.name.clone();
    }
    format!("{} {}", entry.name, entry.keywords.join(" "))
}
