//! Hatch detection.
//!
//! The inventory service has no reliable "egg hatched" notification, so a
//! hatch is inferred: an egg we remember putting into an incubator now shows
//! up in the inventory as a regular pokemon.

use std::collections::HashMap;

use hatchery_events::EggHatchedPayload;
use hatchery_id::ItemId;
use hatchery_reconcile::AssignmentRecord;
use tracing::debug;

use crate::model::Pokemon;
use crate::pokemon;

/// Return one hatch payload per remembered egg that has hatched.
///
/// Remembered eggs that are still eggs, or that vanished from the
/// inventory entirely, produce nothing.
pub fn detect_hatched(
    remembered: &[AssignmentRecord],
    inventory: &[Pokemon],
) -> Vec<EggHatchedPayload> {
    let by_id: HashMap<ItemId, &Pokemon> = inventory.iter().map(|p| (p.id, p)).collect();

    remembered
        .iter()
        .filter_map(|record| {
            let Some(hatched) = by_id.get(&record.item_id).filter(|p| p.is_hatched()) else {
                debug!(
                    incubator_id = %record.slot_id,
                    egg_id = %record.item_id,
                    "Remembered egg has not hatched"
                );
                return None;
            };

            Some(EggHatchedPayload {
                id: hatched.id,
                species_id: hatched.species_id,
                level: pokemon::level(hatched),
                cp: hatched.cp,
                max_cp: pokemon::max_cp(hatched),
                perfection: pokemon::perfection(hatched),
            })
        })
        .collect()
}
