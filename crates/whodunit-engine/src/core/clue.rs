use serde::{Serialize, Serializer};

/// A piece of physical or documentary evidence found at the crime scene.
///
/// Suspect clues are derived from a suspect's traits (see
/// [`SuspectProfile::clues`](crate::SuspectProfile::clues)); weapon clues
/// from the murder weapon (see [`Weapon::clue`](crate::Weapon::clue)).
/// Evidence is compared by identity, never by text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum Clue {
    // appearance
    #[display("A tall shadow was seen on the hallway camera.")]
    TallShadow,
    #[display("A few strands of black hair were found near the body.")]
    BlackHair,
    #[display("A brown hair strand was caught on the broken window.")]
    BrownHair,
    #[display("Golden strands were found on the victim's shoulder.")]
    BlondeHair,
    #[display("Witnesses mentioned piercing blue eyes behind a mask.")]
    BlueEyes,
    #[display("A reflection of green eyes was seen in a mirror snapshot.")]
    GreenEyes,
    // occupation
    #[display("A branded pen was left behind, engraved with the CEO's company logo.")]
    CompanyPen,
    #[display("A torn concert ticket was found near the scene.")]
    ConcertTicket,
    #[display("An expensive cufflink with bank initials was discovered under the couch.")]
    BankCufflink,
    #[display("Traces of high-end perfume lingered in the air.")]
    DesignerPerfume,
    #[display("A page torn from a novel with handwritten notes was found crumpled.")]
    TornNovelPage,
    // motive
    #[display("Bank statements revealed sudden financial pressure related to Sierra.")]
    BankStatements,
    #[display("A torn love letter was found in the fireplace.")]
    LoveLetter,
    #[display("A journal entry from Sierra hinted at someone vowing revenge.")]
    RevengeJournal,
    #[display("A social media post was deleted minutes after the murder, one laced with envy.")]
    DeletedPost,
    #[display("Old photographs were scattered, some with faces scratched out.")]
    ScratchedPhotographs,
    #[display("A forged will was discovered hidden in the victim's drawer.")]
    ForgedWill,
    // weapon
    #[display("A heavy metallic object left a dent on the wall.")]
    WallDent,
    #[display("Rope fibers were found on the victim's wrist.")]
    RopeFibers,
    #[display("Gunpowder residue was detected in the air.")]
    GunpowderResidue,
    #[display("Blunt force trauma marks match a cylindrical shape.")]
    CylindricalTrauma,
    #[display("A clean, deep cut suggests a sharp blade was used.")]
    DeepCut,
    #[display("Wax droplets were found near the impact site.")]
    WaxDroplets,
}

impl Serialize for Clue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Weapon;

    #[test]
    fn serializes_as_its_display_text() {
        for weapon in Weapon::ALL {
            let clue = weapon.clue();
            assert_eq!(serde_json::to_value(clue).unwrap(), clue.to_string());
        }
        assert_eq!(
            Weapon::Candlestick.clue().to_string(),
            "Wax droplets were found near the impact site."
        );
    }
}
