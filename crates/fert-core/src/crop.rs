//! Fixed crop table.
//!
//! The index of each crop is a model feature, so the order below is part of
//! the contract with the trained predictors and must never change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Number of entries in the crop table.
pub const CROP_COUNT: usize = 21;

/// Crop the recommendation is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Apple,
    Banana,
    Blackgram,
    Chickpea,
    Coconut,
    Coffee,
    Cotton,
    Grapes,
    Jute,
    Lentil,
    Maize,
    Mango,
    Mothbeans,
    Mungbean,
    Muskmelon,
    Orange,
    Papaya,
    Pigeonpeas,
    Pomegranate,
    Rice,
    Watermelon,
}

impl Crop {
    /// All crops in table order; `ALL[c.index()] == c`.
    pub const ALL: [Crop; CROP_COUNT] = [
        Crop::Apple,
        Crop::Banana,
        Crop::Blackgram,
        Crop::Chickpea,
        Crop::Coconut,
        Crop::Coffee,
        Crop::Cotton,
        Crop::Grapes,
        Crop::Jute,
        Crop::Lentil,
        Crop::Maize,
        Crop::Mango,
        Crop::Mothbeans,
        Crop::Mungbean,
        Crop::Muskmelon,
        Crop::Orange,
        Crop::Papaya,
        Crop::Pigeonpeas,
        Crop::Pomegranate,
        Crop::Rice,
        Crop::Watermelon,
    ];

    /// Position in the crop table (0-20).
    pub fn index(self) -> usize {
        match self {
            Crop::Apple => 0,
            Crop::Banana => 1,
            Crop::Blackgram => 2,
            Crop::Chickpea => 3,
            Crop::Coconut => 4,
            Crop::Coffee => 5,
            Crop::Cotton => 6,
            Crop::Grapes => 7,
            Crop::Jute => 8,
            Crop::Lentil => 9,
            Crop::Maize => 10,
            Crop::Mango => 11,
            Crop::Mothbeans => 12,
            Crop::Mungbean => 13,
            Crop::Muskmelon => 14,
            Crop::Orange => 15,
            Crop::Papaya => 16,
            Crop::Pigeonpeas => 17,
            Crop::Pomegranate => 18,
            Crop::Rice => 19,
            Crop::Watermelon => 20,
        }
    }

    pub fn from_index(index: usize) -> Option<Crop> {
        Crop::ALL.get(index).copied()
    }

    /// Lowercase label as shown in the crop picker.
    pub fn label(self) -> &'static str {
        match self {
            Crop::Apple => "apple",
            Crop::Banana => "banana",
            Crop::Blackgram => "blackgram",
            Crop::Chickpea => "chickpea",
            Crop::Coconut => "coconut",
            Crop::Coffee => "coffee",
            Crop::Cotton => "cotton",
            Crop::Grapes => "grapes",
            Crop::Jute => "jute",
            Crop::Lentil => "lentil",
            Crop::Maize => "maize",
            Crop::Mango => "mango",
            Crop::Mothbeans => "mothbeans",
            Crop::Mungbean => "mungbean",
            Crop::Muskmelon => "muskmelon",
            Crop::Orange => "orange",
            Crop::Papaya => "papaya",
            Crop::Pigeonpeas => "pigeonpeas",
            Crop::Pomegranate => "pomegranate",
            Crop::Rice => "rice",
            Crop::Watermelon => "watermelon",
        }
    }

    /// Resolve a picker entry: either a label or a decimal table index.
    pub fn resolve(input: &str) -> Result<Crop, InvalidInput> {
        let trimmed = input.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Crop::from_index(index).ok_or(InvalidInput::CropIndexOutOfRange(index));
        }
        trimmed.parse()
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Crop {
    type Err = InvalidInput;

    /// Case-insensitive label lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Crop::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InvalidInput::UnknownCrop(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Table order is the model contract: spot-check both ends and the middle.
    #[test]
    fn table_order_matches_model_contract() {
        assert_eq!(Crop::Apple.index(), 0);
        assert_eq!(Crop::Maize.index(), 10);
        assert_eq!(Crop::Rice.index(), 19);
        assert_eq!(Crop::Watermelon.index(), 20);
    }

    #[test]
    fn all_is_consistent_with_index() {
        for (i, crop) in Crop::ALL.iter().enumerate() {
            assert_eq!(crop.index(), i, "{crop} listed at position {i}");
            assert_eq!(Crop::from_index(i), Some(*crop));
        }
        assert_eq!(Crop::from_index(CROP_COUNT), None);
    }

    #[test]
    fn labels_are_sorted_and_round_trip() {
        let labels: Vec<&str> = Crop::ALL.iter().map(|c| c.label()).collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted, "crop table is alphabetical");

        for crop in Crop::ALL {
            assert_eq!(crop.label().parse::<Crop>().unwrap(), crop);
        }
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(" Rice ".parse::<Crop>().unwrap(), Crop::Rice);
        assert_eq!("PIGEONPEAS".parse::<Crop>().unwrap(), Crop::Pigeonpeas);
    }

    #[test]
    fn unknown_label_is_invalid_input() {
        let err = "durian".parse::<Crop>().unwrap_err();
        assert_eq!(err, InvalidInput::UnknownCrop("durian".to_string()));
    }

    #[test]
    fn resolve_accepts_index_or_label() {
        assert_eq!(Crop::resolve("19").unwrap(), Crop::Rice);
        assert_eq!(Crop::resolve("coffee").unwrap(), Crop::Coffee);
        assert_eq!(
            Crop::resolve("21").unwrap_err(),
            InvalidInput::CropIndexOutOfRange(21)
        );
    }

    #[test]
    fn serde_uses_lowercase_labels() {
        let json = serde_json::to_string(&Crop::Muskmelon).unwrap();
        assert_eq!(json, "\"muskmelon\"");
        let back: Crop = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Crop::Muskmelon);
    }
}
