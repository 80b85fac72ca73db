//! Emoji entry, category, and search result types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse category label derived from an emoji's display name.
///
/// Serialized as its human-readable label (e.g. `"Faces & Emotions"`).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    /// Faces and emotional expressions.
    #[serde(rename = "Faces & Emotions")]
    FacesEmotions,
    /// Hands, people, and body parts.
    #[serde(rename = "People & Body")]
    PeopleBody,
    /// Country and other flags.
    #[serde(rename = "Flags")]
    Flags,
    /// Food, drink, and fruit.
    #[serde(rename = "Food & Drink")]
    FoodDrink,
    /// Animals and plants.
    #[serde(rename = "Animals & Nature")]
    AnimalsNature,
    /// Travel and places.
    #[serde(rename = "Travel & Places")]
    TravelPlaces,
    /// Activities and sports.
    #[serde(rename = "Activities")]
    Activities,
    /// Objects and tools.
    #[serde(rename = "Objects")]
    Objects,
    /// Symbols.
    #[serde(rename = "Symbols")]
    Symbols,
    /// Anything the classifier could not place.
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in classifier priority order with `Other` last.
    pub const ALL: [Category; 10] = [
        Category::FacesEmotions,
        Category::PeopleBody,
        Category::Flags,
        Category::FoodDrink,
        Category::AnimalsNature,
        Category::TravelPlaces,
        Category::Activities,
        Category::Objects,
        Category::Symbols,
        Category::Other,
    ];

    /// Human-readable label, identical to the serialized form.
    pub fn label(self) -> &'static str {
        match self {
            Category::FacesEmotions => "Faces & Emotions",
            Category::PeopleBody => "People & Body",
            Category::Flags => "Flags",
            Category::FoodDrink => "Food & Drink",
            Category::AnimalsNature => "Animals & Nature",
            Category::TravelPlaces => "Travel & Places",
            Category::Activities => "Activities",
            Category::Objects => "Objects",
            Category::Symbols => "Symbols",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string is not one of the known category labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// One emoji's static metadata, created once at load time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiEntry {
    /// The emoji itself.
    pub symbol: String,
    /// Title-cased display name.
    pub name: String,
    /// Derived category label.
    pub category: Category,
    /// Lowercase whitespace tokens of the name.
    pub keywords: Vec<String>,
}

/// An entry decorated with its similarity to a query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchResult {
    /// Copy of the matched entry.
    #[serde(flatten)]
    pub entry: EmojiEntry,
    /// Cosine similarity between the query and the entry description.
    pub score: f32,
}
