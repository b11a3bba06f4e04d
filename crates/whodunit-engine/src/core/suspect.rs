use std::{
    array, fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap as _};

use crate::{
    EngineError,
    core::{clue::Clue, location::Location},
};

/// The suspect roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suspect {
    #[serde(rename = "Chris Blaine")]
    ChrisBlaine = 0,
    #[serde(rename = "Jason Blue")]
    JasonBlue = 1,
    #[serde(rename = "Kate Ivory")]
    KateIvory = 2,
    #[serde(rename = "Poppy Green")]
    PoppyGreen = 3,
    #[serde(rename = "Violet Riley")]
    VioletRiley = 4,
    #[serde(rename = "Zehab Rose")]
    ZehabRose = 5,
}

impl Distribution<Suspect> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Suspect {
        Suspect::ALL[rng.random_range(0..Suspect::LEN)]
    }
}

impl Suspect {
    /// Number of suspects (6).
    pub const LEN: usize = 6;

    /// The roster in case-file order. Every roster-wide scan follows this order.
    pub const ALL: [Self; Self::LEN] = [
        Self::ChrisBlaine,
        Self::JasonBlue,
        Self::KateIvory,
        Self::PoppyGreen,
        Self::VioletRiley,
        Self::ZehabRose,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ChrisBlaine => "Chris Blaine",
            Self::JasonBlue => "Jason Blue",
            Self::KateIvory => "Kate Ivory",
            Self::PoppyGreen => "Poppy Green",
            Self::VioletRiley => "Violet Riley",
            Self::ZehabRose => "Zehab Rose",
        }
    }

    /// Looks up a suspect by canonical full name, ignoring ASCII case and
    /// surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|suspect| suspect.name().eq_ignore_ascii_case(name))
    }

    /// Static case-file traits of this suspect.
    #[must_use]
    pub fn profile(self) -> &'static SuspectProfile {
        &CASE_FILE[self.index()]
    }

    /// Every suspect except `self`, in roster order.
    pub fn others(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |s| *s != self)
    }
}

impl fmt::Display for Suspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Suspect {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| EngineError::UnknownSuspect {
            name: s.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum HairColor {
    #[display("black")]
    Black,
    #[display("brown")]
    Brown,
    #[display("blonde")]
    Blonde,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum EyeColor {
    #[display("blue")]
    Blue,
    #[display("brown")]
    Brown,
    #[display("green")]
    Green,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Occupation {
    #[display("CEO")]
    Ceo,
    #[display("singer")]
    Singer,
    #[display("banker")]
    Banker,
    #[display("model")]
    Model,
    #[display("florist")]
    Florist,
    #[display("writer")]
    Writer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[display("{feet} feet {inches} inches")]
pub struct Height {
    pub feet: u8,
    pub inches: u8,
}

impl Height {
    #[must_use]
    pub const fn is_tall(self) -> bool {
        self.feet >= 6
    }
}

/// A single motive category. A suspect's [`Motive`] combines one or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MotiveKind {
    Financial,
    Romantic,
    Rejection,
    Revenge,
    Jealousy,
    Ambition,
    HiddenPast,
    Inheritance,
    Family,
}

impl MotiveKind {
    /// Whether this category is strong enough to satisfy the motive constraint
    /// on its own.
    #[must_use]
    pub const fn is_strong(self) -> bool {
        matches!(
            self,
            Self::Revenge | Self::Jealousy | Self::Inheritance | Self::Financial | Self::Romantic
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[display("{label}")]
pub struct Motive {
    pub label: &'static str,
    pub kinds: &'static [MotiveKind],
}

impl Motive {
    #[must_use]
    pub fn is_strong(&self) -> bool {
        self.kinds.iter().any(|kind| kind.is_strong())
    }

    #[must_use]
    pub fn has(&self, kind: MotiveKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Fixed traits of a suspect.
///
/// `home` is the suspect's true whereabouts on the night of the murder and
/// `lie_probability` its propensity to fabricate; neither is ever shown to
/// the player directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspectProfile {
    pub age: u8,
    pub height: Height,
    pub hair_color: HairColor,
    pub eye_color: EyeColor,
    pub occupation: Occupation,
    pub motive: Motive,
    pub home: Location,
    pub knows_victim: bool,
    pub lie_probability: f64,
    pub prior: f64,
}

impl SuspectProfile {
    /// Derives every clue this suspect's traits could leave behind.
    #[must_use]
    pub fn clues(&self) -> Vec<Clue> {
        let mut clues = Vec::new();

        if self.height.is_tall() {
            clues.push(Clue::TallShadow);
        }
        clues.push(match self.hair_color {
            HairColor::Black => Clue::BlackHair,
            HairColor::Brown => Clue::BrownHair,
            HairColor::Blonde => Clue::BlondeHair,
        });
        match self.eye_color {
            EyeColor::Blue => clues.push(Clue::BlueEyes),
            EyeColor::Green => clues.push(Clue::GreenEyes),
            EyeColor::Brown => {}
        }
        match self.occupation {
            Occupation::Ceo => clues.push(Clue::CompanyPen),
            Occupation::Singer => clues.push(Clue::ConcertTicket),
            Occupation::Banker => clues.push(Clue::BankCufflink),
            Occupation::Model => clues.push(Clue::DesignerPerfume),
            Occupation::Writer => clues.push(Clue::TornNovelPage),
            Occupation::Florist => {}
        }

        let motive = &self.motive;
        if motive.has(MotiveKind::Financial) {
            clues.push(Clue::BankStatements);
        }
        if motive.has(MotiveKind::Romantic) || motive.has(MotiveKind::Rejection) {
            clues.push(Clue::LoveLetter);
        }
        if motive.has(MotiveKind::Revenge) {
            clues.push(Clue::RevengeJournal);
        }
        if motive.has(MotiveKind::Jealousy) || motive.has(MotiveKind::Ambition) {
            clues.push(Clue::DeletedPost);
        }
        if motive.has(MotiveKind::HiddenPast) {
            clues.push(Clue::ScratchedPhotographs);
        }
        if motive.has(MotiveKind::Inheritance) || motive.has(MotiveKind::Family) {
            clues.push(Clue::ForgedWill);
        }

        clues
    }
}

static CASE_FILE: [SuspectProfile; Suspect::LEN] = [
    SuspectProfile {
        age: 28,
        height: Height { feet: 6, inches: 3 },
        hair_color: HairColor::Black,
        eye_color: EyeColor::Blue,
        occupation: Occupation::Ceo,
        motive: Motive {
            label: "Financial Loss",
            kinds: &[MotiveKind::Financial],
        },
        home: Location::Office,
        knows_victim: true,
        lie_probability: 0.2,
        prior: 0.2,
    },
    SuspectProfile {
        age: 31,
        height: Height { feet: 5, inches: 11 },
        hair_color: HairColor::Brown,
        eye_color: EyeColor::Blue,
        occupation: Occupation::Singer,
        motive: Motive {
            label: "Romantic Fallout / Rejection",
            kinds: &[MotiveKind::Romantic, MotiveKind::Rejection],
        },
        home: Location::Home,
        knows_victim: false,
        lie_probability: 0.3,
        prior: 0.2,
    },
    SuspectProfile {
        age: 35,
        height: Height { feet: 5, inches: 8 },
        hair_color: HairColor::Black,
        eye_color: EyeColor::Brown,
        occupation: Occupation::Banker,
        motive: Motive {
            label: "Revenge / Financial Disputes",
            kinds: &[MotiveKind::Revenge, MotiveKind::Financial],
        },
        home: Location::Studio,
        knows_victim: true,
        lie_probability: 0.25,
        prior: 0.2,
    },
    SuspectProfile {
        age: 26,
        height: Height { feet: 5, inches: 5 },
        hair_color: HairColor::Brown,
        eye_color: EyeColor::Green,
        occupation: Occupation::Model,
        motive: Motive {
            label: "Jealousy / Career Ambition",
            kinds: &[MotiveKind::Jealousy, MotiveKind::Ambition],
        },
        home: Location::FlowerShop,
        knows_victim: true,
        lie_probability: 0.45,
        prior: 0.2,
    },
    SuspectProfile {
        age: 27,
        height: Height { feet: 5, inches: 9 },
        hair_color: HairColor::Blonde,
        eye_color: EyeColor::Brown,
        occupation: Occupation::Florist,
        motive: Motive {
            label: "Hidden Past / Buried Secrets",
            kinds: &[MotiveKind::HiddenPast],
        },
        home: Location::Gallery,
        knows_victim: true,
        lie_probability: 0.1,
        prior: 0.2,
    },
    SuspectProfile {
        age: 22,
        height: Height { feet: 5, inches: 5 },
        hair_color: HairColor::Brown,
        eye_color: EyeColor::Brown,
        occupation: Occupation::Writer,
        motive: Motive {
            label: "Inheritance Dispute / Family Resentment",
            kinds: &[MotiveKind::Inheritance, MotiveKind::Family],
        },
        home: Location::Library,
        knows_victim: true,
        lie_probability: 0.5,
        prior: 0.4,
    },
];

/// A fixed-size table with one entry per suspect.
///
/// Serializes as a map keyed by canonical suspect name, in roster order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspectMap<T>([T; Suspect::LEN]);

impl<T> SuspectMap<T> {
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Suspect) -> T,
    {
        Self(array::from_fn(|i| f(Suspect::ALL[i])))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Suspect, &T)> + '_ {
        Suspect::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.0.iter_mut()
    }

    #[must_use]
    pub fn map<U, F>(&self, mut f: F) -> SuspectMap<U>
    where
        F: FnMut(Suspect, &T) -> U,
    {
        SuspectMap::from_fn(|suspect| f(suspect, &self[suspect]))
    }
}

impl<T: Default> Default for SuspectMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Suspect> for SuspectMap<T> {
    type Output = T;

    fn index(&self, suspect: Suspect) -> &T {
        &self.0[suspect.index()]
    }
}

impl<T> IndexMut<Suspect> for SuspectMap<T> {
    fn index_mut(&mut self, suspect: Suspect) -> &mut T {
        &mut self.0[suspect.index()]
    }
}

impl<T: Serialize> Serialize for SuspectMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(Suspect::LEN))?;
        for (suspect, value) in self.iter() {
            map.serialize_entry(suspect.name(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_order_matches_discriminants() {
        for (i, suspect) in Suspect::ALL.into_iter().enumerate() {
            assert_eq!(suspect.index(), i);
        }
    }

    #[test]
    fn every_suspect_has_a_distinct_home() {
        let mut homes = Suspect::ALL.map(|s| s.profile().home).to_vec();
        homes.sort();
        homes.dedup();
        assert_eq!(homes.len(), Suspect::LEN);
    }

    #[test]
    fn resolves_names_case_insensitively() {
        assert_eq!(
            "kate ivory".parse::<Suspect>().unwrap(),
            Suspect::KateIvory
        );
        assert_eq!(
            "  ZEHAB ROSE ".parse::<Suspect>().unwrap(),
            Suspect::ZehabRose
        );
        assert_eq!(
            "chris".parse::<Suspect>().unwrap_err(),
            EngineError::UnknownSuspect {
                name: "chris".to_owned()
            }
        );
    }

    #[test]
    fn derives_clues_from_traits() {
        assert_eq!(
            Suspect::ChrisBlaine.profile().clues(),
            vec![
                Clue::TallShadow,
                Clue::BlackHair,
                Clue::BlueEyes,
                Clue::CompanyPen,
                Clue::BankStatements,
            ]
        );
        // florist with brown eyes: only hair and motive
        assert_eq!(
            Suspect::VioletRiley.profile().clues(),
            vec![Clue::BlondeHair, Clue::ScratchedPhotographs]
        );
        assert_eq!(
            Suspect::ZehabRose.profile().clues(),
            vec![Clue::BrownHair, Clue::TornNovelPage, Clue::ForgedWill]
        );
    }

    #[test]
    fn strong_motives() {
        let strong = Suspect::ALL.map(|s| s.profile().motive.is_strong());
        assert_eq!(strong, [true, true, true, true, false, true]);
    }

    #[test]
    fn height_display() {
        assert_eq!(
            Suspect::ChrisBlaine.profile().height.to_string(),
            "6 feet 3 inches"
        );
    }

    #[test]
    fn display_and_serde_use_the_canonical_name() {
        for suspect in Suspect::ALL {
            assert_eq!(suspect.to_string(), suspect.name());
            assert_eq!(serde_json::to_value(suspect).unwrap(), suspect.name());
        }
        assert_eq!(format!("[{:>12}]", Suspect::JasonBlue), "[  Jason Blue]");
    }

    #[test]
    fn suspect_map_serializes_by_name() {
        let map = SuspectMap::from_fn(Suspect::index);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["Chris Blaine"], 0);
        assert_eq!(json["Zehab Rose"], 5);
    }
}
