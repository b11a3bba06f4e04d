use rand::Rng;
use serde::{Deserialize, Serialize};

/// Places a suspect can be (or claim to be) on the night of the murder.
///
/// Every suspect's home location is distinct, so the catalog doubles as the
/// set of candidate alibis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Location {
    #[display("office")]
    Office = 0,
    #[display("home")]
    Home = 1,
    #[display("studio")]
    Studio = 2,
    #[display("flower shop")]
    #[serde(rename = "flower shop")]
    FlowerShop = 3,
    #[display("gallery")]
    Gallery = 4,
    #[display("library")]
    Library = 5,
}

impl Location {
    /// Number of locations (6).
    pub const LEN: usize = 6;

    pub const ALL: [Self; Self::LEN] = [
        Self::Office,
        Self::Home,
        Self::Studio,
        Self::FlowerShop,
        Self::Gallery,
        Self::Library,
    ];

    /// Draws a location uniformly from every location except `self`.
    ///
    /// Used to fabricate an alibi: the result is never the true location.
    pub fn fabricate<R>(self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut index = rng.random_range(0..Self::LEN - 1);
        if index >= self as usize {
            index += 1;
        }
        Self::ALL[index]
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn fabricated_location_never_matches_truth() {
        let mut rng = Pcg32::seed_from_u64(7);
        for truth in Location::ALL {
            for _ in 0..200 {
                assert_ne!(truth.fabricate(&mut rng), truth);
            }
        }
    }

    #[test]
    fn fabrication_reaches_every_other_location() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut seen = [false; Location::LEN];
        for _ in 0..500 {
            seen[Location::Gallery.fabricate(&mut rng) as usize] = true;
        }
        assert!(!seen[Location::Gallery as usize]);
        assert_eq!(seen.iter().filter(|s| **s).count(), Location::LEN - 1);
    }

    #[test]
    fn serializes_with_display_names() {
        let json = serde_json::to_string(&Location::FlowerShop).unwrap();
        assert_eq!(json, "\"flower shop\"");
        assert_eq!(Location::FlowerShop.to_string(), "flower shop");
    }
}
