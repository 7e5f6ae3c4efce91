//! Placement staging.
//!
//! The tiles offered to the current player for the next placement. An offer only records
//! which kind it carries and where the player is currently dragging it.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::game::entities::tile::pick;
use crate::game::types::{ScreenPos, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedOffer {
    pub kind: TileKind,
    /// Last drag position, `None` while resting in its slot.
    pub drag: Option<ScreenPos>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staging {
    offers: Vec<StagedOffer>,
}

impl Staging {
    /// Draw `count` independent uniformly random offers.
    pub fn roll<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let offers = (0..count)
            .map(|_| StagedOffer { kind: pick(&TileKind::OFFERS, rng), drag: None })
            .collect();
        Self { offers }
    }

    pub fn from_kinds(kinds: &[TileKind]) -> Self {
        let offers = kinds
            .iter()
            .map(|&kind| StagedOffer { kind, drag: None })
            .collect();
        Self { offers }
    }

    pub fn offers(&self) -> &[StagedOffer] {
        &self.offers
    }

    pub fn get(&self, slot: usize) -> Option<&StagedOffer> {
        self.offers.get(slot)
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        self.offers.iter().any(|offer| offer.kind == kind)
    }

    /// Move an offer to `pos`. Returns `false` for an unknown slot.
    pub fn drag(&mut self, slot: usize, pos: ScreenPos) -> bool {
        match self.offers.get_mut(slot) {
            Some(offer) => {
                offer.drag = Some(pos);
                true
            }
            None => false,
        }
    }

    /// Drop an offer back into its slot.
    pub fn release(&mut self, slot: usize) {
        if let Some(offer) = self.offers.get_mut(slot) {
            offer.drag = None;
        }
    }
}
