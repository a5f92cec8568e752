//! Propagates known-but-unobserved stars into the current turn.

use crate::world::{StarKnowledge, WorldState};

/// Inject every star known to `previous` but absent from `current` as a
/// [`StarKnowledge::Remembered`] copy, returning how many were injected.
///
/// Stars merged this turn are already `Observed` and are never touched, so a
/// remembered copy can only ever carry the record from the last turn the star
/// was actually seen. Fleets are deliberately not propagated: a fleet outside
/// everyone's sensor range has usually moved, and a last-known copy would
/// misrepresent the map.
///
/// With no previous state (the first processed turn) this is a no-op.
pub fn carry_forward(previous: Option<&WorldState>, current: &mut WorldState) -> usize {
    let Some(previous) = previous else {
        return 0;
    };

    let mut injected = 0;
    for (id, knowledge) in &previous.stars {
        if !current.stars.contains_key(id) {
            current
                .stars
                .insert(*id, StarKnowledge::Remembered(knowledge.star().clone()));
            injected += 1;
        }
    }
    injected
}
