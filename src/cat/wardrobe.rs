use std::str::FromStr;

use serde::Deserialize;

/// Hat worn on the cat's head. Follows the head's offset and tilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hat {
    None,
    #[default]
    SantaRed,
    SantaGreen,
    Reindeer,
}

/// Item worn around the neck. Follows the body, not the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessory {
    None,
    ScarfRed,
    #[default]
    ScarfGreen,
    Bell,
}

impl Hat {
    pub const ALL: [Hat; 4] = [Self::None, Self::SantaRed, Self::SantaGreen, Self::Reindeer];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::SantaRed => "santa-red",
            Self::SantaGreen => "santa-green",
            Self::Reindeer => "reindeer",
        }
    }

    /// Next hat in wardrobe order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::SantaRed,
            Self::SantaRed => Self::SantaGreen,
            Self::SantaGreen => Self::Reindeer,
            Self::Reindeer => Self::None,
        }
    }
}

impl Accessory {
    pub const ALL: [Accessory; 4] = [Self::None, Self::ScarfRed, Self::ScarfGreen, Self::Bell];

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ScarfRed => "scarf-red",
            Self::ScarfGreen => "scarf-green",
            Self::Bell => "bell",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::None => Self::ScarfRed,
            Self::ScarfRed => Self::ScarfGreen,
            Self::ScarfGreen => Self::Bell,
            Self::Bell => Self::None,
        }
    }
}

/// Error for a wardrobe name that matches no variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wardrobe item '{0}'")]
pub struct UnknownVariant(pub String);

impl FromStr for Hat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|h| h.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant(wanted.to_string()))
    }
}

impl FromStr for Accessory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant(wanted.to_string()))
    }
}

/// Cosmetic outfit. Set from outside the simulation, read only by the pose renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Customization {
    pub hat: Hat,
    pub accessory: Accessory,
}
