//! Dataset loading: raw `(symbol, name)` rows → ordered [`EmojiEntry`] list.
//!
//! Loading is total. Rows carrying a skin-tone modifier are dropped, every
//! other row becomes exactly one entry, in input order.

use crate::entry::{Category, EmojiEntry};

/// One row of the raw emoji table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEmoji {
    /// Emoji string (or its code form, e.g. `1F44D 1F3FB`).
    pub symbol: String,
    /// Source name, words separated by spaces or underscores.
    pub name: String,
}

impl RawEmoji {
    /// Build a raw row.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// Fitzpatrick skin-tone modifiers U+1F3FB..=U+1F3FF.
const SKIN_TONE_MODIFIERS: [char; 5] = ['\u{1F3FB}', '\u{1F3FC}', '\u{1F3FD}', '\u{1F3FE}', '\u{1F3FF}'];

/// Hex code form of [`SKIN_TONE_MODIFIERS`].
const SKIN_TONE_CODES: [&str; 5] = ["1F3FB", "1F3FC", "1F3FD", "1F3FE", "1F3FF"];

/// Ordered classifier rules; the first rule with a matching needle wins.
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (&["face", "emotion"], Category::FacesEmotions),
    (&["hand", "person"], Category::PeopleBody),
    (&["flag"], Category::Flags),
    (&["food", "drink", "fruit"], Category::FoodDrink),
    (&["animal", "plant"], Category::AnimalsNature),
    (&["travel", "place"], Category::TravelPlaces),
    (&["activity", "sport"], Category::Activities),
    (&["object", "tool"], Category::Objects),
    (&["symbol"], Category::Symbols),
];

/// Whether a symbol carries any skin-tone modifier, as a code point or as
/// its upper/lowercase hex code.
pub fn has_skin_tone_modifier(symbol: &str) -> bool {
    if symbol.chars().any(|c| SKIN_TONE_MODIFIERS.contains(&c)) {
        return true;
    }
    let upper = symbol.to_ascii_uppercase();
    SKIN_TONE_CODES.iter().any(|code| upper.contains(code))
}

/// Classify a display name. Case-insensitive substring rules, first match wins.
pub fn classify(name: &str) -> Category {
    let lower = name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map_or(Category::Other, |(_, category)| *category)
}

/// Lowercase whitespace tokens of a name.
pub fn keywords(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Underscores to spaces, then upper-case the first letter of every word and
/// lower-case the rest.
pub fn display_name(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut at_word_start = true;
    for c in word.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = !c.is_alphanumeric() && c != '\'' && c != '\u{2019}';
        }
    }
    out
}

/// Turn one raw row into an entry, or `None` if it is a skin-tone variant.
pub fn to_entry(raw: &RawEmoji) -> Option<EmojiEntry> {
    if has_skin_tone_modifier(&raw.symbol) {
        return None;
    }
    let name = display_name(&raw.name);
    Some(EmojiEntry {
        symbol: raw.symbol.clone(),
        category: classify(&name),
        keywords: keywords(&name),
        name,
    })
}

/// Immutable, ordered emoji collection.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Vec<EmojiEntry>,
}

impl Catalog {
    /// Load a catalog from raw rows, preserving input order.
    pub fn load<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawEmoji>,
    {
        let mut skipped = 0usize;
        let entries: Vec<EmojiEntry> = rows
            .into_iter()
            .filter_map(|raw| {
                let entry = to_entry(&raw);
                if entry.is_none() {
                    skipped += 1;
                }
                entry
            })
            .collect();
        tracing::debug!(entries = entries.len(), skipped, "emoji catalog loaded");
        Self { entries }
    }

    /// Load the catalog bundled with the binary.
    pub fn builtin() -> Self {
        Self::load(crate::source::builtin_table())
    }

    /// All entries, in load order.
    pub fn entries(&self) -> &[EmojiEntry] {
        &self.entries
    }

    /// Entry count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted, de-duplicated category labels that occur in the catalog.
    pub fn groups(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> =
            self.entries.iter().map(|e| e.category.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Entries of one category, in load order.
    pub fn by_category(&self, category: Category) -> Vec<&EmojiEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }
}
