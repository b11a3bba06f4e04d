use crate::{Location, StatedAlibis, Suspect};

/// Filters suspects that could plausibly have committed the murder.
///
/// Constraints are checked independently per suspect; there is no search.
#[derive(Debug, Clone, Copy)]
pub struct ConsistencyChecker<'a> {
    stated: &'a StatedAlibis,
    crime_scene: Location,
}

impl<'a> ConsistencyChecker<'a> {
    #[must_use]
    pub const fn new(stated: &'a StatedAlibis, crime_scene: Location) -> Self {
        Self {
            stated,
            crime_scene,
        }
    }

    /// Opportunity (claims to have been at the scene) plus either a strong
    /// motive or a known lie.
    #[must_use]
    pub fn is_consistent(&self, suspect: Suspect) -> bool {
        let opportunity = self.stated.claimed(suspect) == self.crime_scene;
        let motive = suspect.profile().motive.is_strong() || self.stated.is_liar(suspect);
        opportunity && motive
    }

    /// Every consistent suspect, in roster order.
    #[must_use]
    pub fn solve(&self) -> Vec<Suspect> {
        Suspect::ALL
            .into_iter()
            .filter(|suspect| self.is_consistent(*suspect))
            .collect()
    }
}
