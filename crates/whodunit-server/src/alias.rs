//! Short public names used by the browser client.

use std::collections::BTreeMap;

use whodunit_engine::{Suspect, SuspectMap};

const SUSPECT_ALIASES: [(&str, Suspect); Suspect::LEN] = [
    ("chris", Suspect::ChrisBlaine),
    ("jason", Suspect::JasonBlue),
    ("kate", Suspect::KateIvory),
    ("poppy", Suspect::PoppyGreen),
    ("violet", Suspect::VioletRiley),
    ("zehab", Suspect::ZehabRose),
];

pub(crate) const fn suspect_alias(suspect: Suspect) -> &'static str {
    SUSPECT_ALIASES[suspect.index()].0
}

/// Maps an alias to the canonical suspect name; anything else passes through
/// for the engine to resolve or reject.
pub(crate) fn canonical_suspect(name: &str) -> &str {
    let trimmed = name.trim();
    SUSPECT_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map_or(name, |(_, suspect)| suspect.name())
}

/// Weapon names already resolve case-insensitively; only the pipe needs help.
pub(crate) fn canonical_weapon(name: &str) -> &str {
    if name.trim().eq_ignore_ascii_case("pipe") {
        "Lead Pipe"
    } else {
        name
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Beliefs keyed by alias, rounded to two decimals.
pub(crate) fn alias_beliefs(beliefs: &SuspectMap<f64>) -> BTreeMap<&'static str, f64> {
    beliefs
        .iter()
        .map(|(suspect, p)| (suspect_alias(suspect), round2(*p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_follow_roster_order() {
        for suspect in Suspect::ALL {
            assert_eq!(SUSPECT_ALIASES[suspect.index()].1, suspect);
        }
        assert_eq!(suspect_alias(Suspect::ZehabRose), "zehab");
    }

    #[test]
    fn resolves_aliases_and_passes_through_the_rest() {
        assert_eq!(canonical_suspect("Kate"), "Kate Ivory");
        assert_eq!(canonical_suspect("Kate Ivory"), "Kate Ivory");
        assert_eq!(canonical_suspect("mustard"), "mustard");
        assert_eq!(canonical_weapon("pipe"), "Lead Pipe");
        assert_eq!(canonical_weapon("knife"), "knife");
    }

    #[test]
    fn beliefs_are_rounded() {
        let beliefs = SuspectMap::from_fn(|s| if s == Suspect::PoppyGreen { 0.456 } else { 0.1 });
        let map = alias_beliefs(&beliefs);
        assert_eq!(map.len(), Suspect::LEN);
        assert!((map["poppy"] - 0.46).abs() < 1e-12);
        assert!((map["chris"] - 0.1).abs() < 1e-12);
    }
}
