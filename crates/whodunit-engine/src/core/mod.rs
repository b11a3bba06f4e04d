//! Static case-file data shared by every session.
//!
//! - [`Suspect`] / [`SuspectProfile`] - the roster and each suspect's fixed traits
//! - [`Weapon`] - the weapon catalog
//! - [`Location`] - where suspects were, or claim to have been
//! - [`Clue`] - evidence derived from traits and weapons
//!
//! Nothing here is mutable; sessions copy what they need.

pub use self::{clue::*, location::*, suspect::*, weapon::*};

mod clue;
mod location;
mod suspect;
mod weapon;
