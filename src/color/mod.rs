//! Color economy: color types, the collected-color ledger, and the
//! effects a color grants once painted onto a sprite.

pub mod affectable;
pub mod effect;
pub mod inventory;
pub mod registry;

pub use affectable::ColorAffectable;
pub use effect::{ColorEffect, ColorEffectDescriptor};
pub use inventory::{ColorEntry, ColorInventory};
pub use registry::ColorEffectRegistry;

use serde::{Deserialize, Serialize};

/// A paint color. `None` is the "no color" sentinel used for an empty
/// palette selection and is never stored in a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorType {
    #[default]
    None,
    Red,
    Green,
    Blue,
    Black,
    Yellow,
}

impl ColorType {
    /// Every real color, in palette order
    pub const ALL: [ColorType; 5] = [
        ColorType::Red,
        ColorType::Green,
        ColorType::Blue,
        ColorType::Black,
        ColorType::Yellow,
    ];

    pub fn is_none(self) -> bool {
        self == ColorType::None
    }
}

impl std::fmt::Display for ColorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColorType::None => "none",
            ColorType::Red => "red",
            ColorType::Green => "green",
            ColorType::Blue => "blue",
            ColorType::Black => "black",
            ColorType::Yellow => "yellow",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_excludes_none() {
        assert!(!ColorType::ALL.contains(&ColorType::None));
        assert_eq!(ColorType::default(), ColorType::None);
    }

    #[test]
    fn test_color_type_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            color: ColorType,
        }
        let w: Wrapper = toml::from_str("color = \"yellow\"").unwrap();
        assert_eq!(w.color, ColorType::Yellow);
    }
}
