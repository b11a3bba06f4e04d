//! Stated whereabouts and the who-saw-whom claims graph.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use rand::{Rng, seq::IndexedRandom as _};
use serde::Serialize;

use crate::{Location, Suspect, SuspectMap};

/// Targets named by each accuser in the claims graph.
pub const CLAIMS_PER_ACCUSER: usize = 2;

/// Where each suspect says they were, and who is lying about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatedAlibis {
    claimed: SuspectMap<Location>,
    liars: BTreeSet<Suspect>,
}

impl StatedAlibis {
    /// Draws a stated location for every suspect.
    ///
    /// The killer always lies. Everyone else lies with their own propensity,
    /// and if nobody else happened to lie, one innocent is picked at random and
    /// made to lie so the killer never stands out as the only liar.
    pub fn generate<R>(killer: Suspect, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut liars = BTreeSet::new();
        let mut claimed = SuspectMap::from_fn(|suspect| suspect.profile().home);

        for suspect in Suspect::ALL {
            let profile = suspect.profile();
            if suspect == killer || rng.random_bool(profile.lie_probability) {
                claimed[suspect] = profile.home.fabricate(rng);
                liars.insert(suspect);
            }
        }

        if liars.len() == 1 {
            let innocents = killer.others().collect::<Vec<_>>();
            if let Some(&forced) = innocents.choose(rng) {
                claimed[forced] = forced.profile().home.fabricate(rng);
                liars.insert(forced);
            }
        }

        Self { claimed, liars }
    }

    #[must_use]
    pub fn claimed(&self, suspect: Suspect) -> Location {
        self.claimed[suspect]
    }

    #[must_use]
    pub fn claimed_locations(&self) -> &SuspectMap<Location> {
        &self.claimed
    }

    #[must_use]
    pub fn liars(&self) -> &BTreeSet<Suspect> {
        &self.liars
    }

    #[must_use]
    pub fn is_liar(&self, suspect: Suspect) -> bool {
        self.liars.contains(&suspect)
    }
}

/// "I saw `target` at `location`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlibiClaim {
    pub target: Suspect,
    pub location: Location,
}

/// Every accuser's claims about other suspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AlibiClaims(SuspectMap<ArrayVec<AlibiClaim, CLAIMS_PER_ACCUSER>>);

impl AlibiClaims {
    /// Each accuser names distinct other suspects. A claim is false when the
    /// accuser is the killer, or otherwise with the accuser's lie propensity.
    pub fn generate<R>(killer: Suspect, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut graph = SuspectMap::<ArrayVec<_, CLAIMS_PER_ACCUSER>>::default();
        for accuser in Suspect::ALL {
            let lie_probability = accuser.profile().lie_probability;
            let others = accuser.others().collect::<Vec<_>>();
            for &target in others.choose_multiple(rng, CLAIMS_PER_ACCUSER) {
                let truth = target.profile().home;
                let location = if accuser == killer || rng.random_bool(lie_probability) {
                    truth.fabricate(rng)
                } else {
                    truth
                };
                graph[accuser].push(AlibiClaim { target, location });
            }
        }
        Self(graph)
    }

    #[must_use]
    pub fn by(&self, accuser: Suspect) -> &[AlibiClaim] {
        &self.0[accuser]
    }

    /// Claims naming `target`, with their accuser, in roster order of accusers.
    pub fn about(&self, target: Suspect) -> impl Iterator<Item = (Suspect, Location)> + '_ {
        self.0.iter().flat_map(move |(accuser, claims)| {
            claims
                .iter()
                .filter(move |claim| claim.target == target)
                .map(move |claim| (accuser, claim.location))
        })
    }

    /// How many claims name `target`.
    #[must_use]
    pub fn mentions(&self, target: Suspect) -> usize {
        self.about(target).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Suspect, &[AlibiClaim])> + '_ {
        self.0.iter().map(|(accuser, claims)| (accuser, claims.as_slice()))
    }
}

/// One accuser's claim about a verified suspect, judged against the truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccuserStatement {
    pub accuser: Suspect,
    pub claimed_location: Location,
    pub is_correct: bool,
}

/// The outcome of checking a suspect's whereabouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlibiVerification {
    pub suspect: Suspect,
    pub claimed_location: Location,
    pub actual_location: Location,
    pub is_alibi_valid: bool,
    pub statements: Vec<AccuserStatement>,
}

/// Compares `suspect`'s stated location and every claim about it with where
/// the suspect really was.
#[must_use]
pub fn verify_alibi(suspect: Suspect, stated: &StatedAlibis, claims: &AlibiClaims) -> AlibiVerification {
    let actual_location = suspect.profile().home;
    let claimed_location = stated.claimed(suspect);
    let statements = claims
        .about(suspect)
        .map(|(accuser, location)| AccuserStatement {
            accuser,
            claimed_location: location,
            is_correct: location == actual_location,
        })
        .collect();
    AlibiVerification {
        suspect,
        claimed_location,
        actual_location,
        is_alibi_valid: claimed_location == actual_location,
        statements,
    }
}
