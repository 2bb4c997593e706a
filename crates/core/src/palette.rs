//! Ordered table of named printing inks.
//!
//! The palette is read-only input to trait generation. Order matters: a
//! choice draw indexes into it, so reordering the table changes which inks a
//! given seed picks.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::ArtError;

/// A named ink with 8-bit RGB channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ink {
    pub name: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Ink {
    pub fn new(name: impl Into<String>, r: u8, g: u8, b: u8) -> Self {
        Self {
            name: name.into(),
            r,
            g,
            b,
        }
    }

    /// The ink as an sRGB fill color.
    pub fn to_srgb(&self) -> Srgb {
        Srgb::from_rgb8(self.r, self.g, self.b)
    }
}

/// Built-in risograph ink table: `(name, r, g, b)`.
const RISO_INKS: &[(&str, u8, u8, u8)] = &[
    ("Black", 0, 0, 0),
    ("Burgundy", 145, 78, 114),
    ("Blue", 0, 120, 191),
    ("Green", 0, 169, 92),
    ("Medium Blue", 50, 85, 164),
    ("Bright Red", 241, 80, 96),
    ("Federal Blue", 61, 85, 136),
    ("Purple", 118, 91, 167),
    ("Teal", 0, 131, 138),
    ("Flat Gold", 187, 139, 65),
    ("Hunter Green", 64, 112, 96),
    ("Red", 255, 102, 94),
    ("Brown", 146, 95, 82),
    ("Yellow", 255, 232, 0),
    ("Marine Red", 210, 81, 94),
    ("Orange", 255, 108, 47),
    ("Fluorescent Pink", 255, 72, 176),
    ("Light Gray", 136, 137, 138),
    ("Metallic Gold", 172, 147, 110),
    ("Crimson", 228, 93, 80),
    ("Fluorescent Orange", 255, 116, 119),
    ("Cornflower", 98, 168, 229),
    ("Sky Blue", 73, 130, 207),
    ("Sea Blue", 0, 116, 162),
    ("Lake", 35, 91, 168),
    ("Indigo", 72, 77, 122),
    ("Midnight", 67, 80, 96),
    ("Mist", 213, 228, 192),
    ("Granite", 165, 170, 168),
    ("Charcoal", 112, 116, 124),
    ("Steel", 55, 94, 119),
    ("Turquoise", 0, 170, 147),
    ("Kelly Green", 103, 179, 70),
    ("Violet", 157, 122, 210),
    ("Orchid", 170, 96, 191),
    ("Plum", 132, 89, 145),
    ("Scarlet", 246, 80, 88),
    ("Cranberry", 209, 81, 122),
    ("Brick", 167, 81, 84),
    ("Bright Olive Green", 180, 159, 41),
];

/// An ordered, non-empty list of inks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkPalette {
    inks: Vec<Ink>,
}

impl InkPalette {
    /// Creates a palette from a list of inks.
    ///
    /// Requires at least one ink and a non-empty name for every ink.
    pub fn new(inks: Vec<Ink>) -> Result<Self, ArtError> {
        if inks.is_empty() {
            return Err(ArtError::InvalidPalette(
                "palette requires at least 1 ink".to_string(),
            ));
        }
        if let Some(pos) = inks.iter().position(|ink| ink.name.trim().is_empty()) {
            return Err(ArtError::InvalidPalette(format!(
                "ink at index {pos} has an empty name"
            )));
        }
        Ok(Self { inks })
    }

    /// Parses a JSON array of `{"name", "r", "g", "b"}` objects.
    pub fn from_json(json: &str) -> Result<Self, ArtError> {
        let inks: Vec<Ink> = serde_json::from_str(json)
            .map_err(|e| ArtError::InvalidPalette(format!("invalid ink JSON: {e}")))?;
        Self::new(inks)
    }

    /// The built-in risograph ink table.
    pub fn riso() -> Self {
        Self {
            inks: RISO_INKS
                .iter()
                .map(|&(name, r, g, b)| Ink::new(name, r, g, b))
                .collect(),
        }
    }

    /// Returns the inks in palette order.
    pub fn inks(&self) -> &[Ink] {
        &self.inks
    }

    /// Returns the number of inks.
    pub fn len(&self) -> usize {
        self.inks.len()
    }

    /// Returns true if this palette has no inks. (Always false for valid palettes.)
    pub fn is_empty(&self) -> bool {
        self.inks.is_empty()
    }

    /// Looks up an ink by exact name.
    pub fn get(&self, name: &str) -> Option<&Ink> {
        self.inks.iter().find(|ink| ink.name == name)
    }

    /// Number of distinct ink names.
    pub fn distinct_names(&self) -> usize {
        let mut names: Vec<&str> = self.inks.iter().map(|ink| ink.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}

impl Default for InkPalette {
    fn default() -> Self {
        Self::riso()
    }
}
