use std::{fmt, str::FromStr};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use crate::{EngineError, core::clue::Clue};

/// The weapon catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Weapon {
    Wrench = 0,
    Rope = 1,
    Revolver = 2,
    #[serde(rename = "Lead Pipe")]
    LeadPipe = 3,
    Knife = 4,
    Candlestick = 5,
}

impl Distribution<Weapon> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Weapon {
        Weapon::ALL[rng.random_range(0..Weapon::LEN)]
    }
}

impl Weapon {
    /// Number of weapons (6).
    pub const LEN: usize = 6;

    pub const ALL: [Self; Self::LEN] = [
        Self::Wrench,
        Self::Rope,
        Self::Revolver,
        Self::LeadPipe,
        Self::Knife,
        Self::Candlestick,
    ];

    /// Canonical display name, e.g. `"Lead Pipe"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wrench => "Wrench",
            Self::Rope => "Rope",
            Self::Revolver => "Revolver",
            Self::LeadPipe => "Lead Pipe",
            Self::Knife => "Knife",
            Self::Candlestick => "Candlestick",
        }
    }

    /// The trace this weapon leaves at the scene.
    #[must_use]
    pub const fn clue(self) -> Clue {
        match self {
            Self::Wrench => Clue::WallDent,
            Self::Rope => Clue::RopeFibers,
            Self::Revolver => Clue::GunpowderResidue,
            Self::LeadPipe => Clue::CylindricalTrauma,
            Self::Knife => Clue::DeepCut,
            Self::Candlestick => Clue::WaxDroplets,
        }
    }

    /// Looks up a weapon by canonical name, ignoring ASCII case and
    /// surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|weapon| weapon.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Weapon {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EngineError::UnknownWeapon {
            name: s.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_names_case_insensitively() {
        assert_eq!("lead pipe".parse::<Weapon>().unwrap(), Weapon::LeadPipe);
        assert_eq!(" KNIFE ".parse::<Weapon>().unwrap(), Weapon::Knife);
    }

    #[test]
    fn rejects_aliases_and_unknown_names() {
        // short aliases belong to the transport adapters
        let err = "pipe".parse::<Weapon>().unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownWeapon {
                name: "pipe".to_owned()
            }
        );
    }

    #[test]
    fn every_weapon_has_a_distinct_clue() {
        let mut clues = Weapon::ALL.map(Weapon::clue).to_vec();
        clues.sort();
        clues.dedup();
        assert_eq!(clues.len(), Weapon::LEN);
    }

    #[test]
    fn display_and_serde_use_the_canonical_name() {
        for weapon in Weapon::ALL {
            assert_eq!(weapon.to_string(), weapon.name());
            assert_eq!(serde_json::to_value(weapon).unwrap(), weapon.name());
        }
        assert_eq!(format!("[{:<10}]", Weapon::LeadPipe), "[Lead Pipe ]");
    }
}
