//! The DP driver: walks the bucket store in non-decreasing time order,
//! extending every resident label once.

use std::collections::HashSet;

use crate::activity::Activity;
use crate::arena::LabelArena;
use crate::bucket::BucketStore;
use crate::extension::extend;
use crate::params::Parameters;

/// Runs one DP sweep over `[0, horizon]`, extending every label as it
/// becomes resident. A label can, in rare zero-travel-time/zero-duration
/// edge cases, produce a successor resident at the very same time index in
/// a bucket that has already been swept this tick; the inner loop keeps
/// redraining each time slice until no activity's bucket grew, so those
/// same-tick successors are never silently skipped.
pub fn run_dp(
    arena: &mut LabelArena,
    store: &mut BucketStore,
    params: &Parameters,
    activities: &[Activity],
    forbidden: &HashSet<usize>,
) -> Result<(), crate::errors::ResourceError> {
    let n_acts = store.activities();
    let horizon = store.horizon() as u32;

    for t in 0..=horizon {
        let mut processed = vec![0usize; n_acts];
        loop {
            let mut progress = false;
            for act_id in 0..n_acts {
                let cell_len = store.cell(act_id, t).len();
                if processed[act_id] < cell_len {
                    let pending: Vec<_> = store.cell(act_id, t)[processed[act_id]..cell_len].to_vec();
                    for label_id in pending {
                        extend(arena, store, params, activities, label_id, forbidden)?;
                    }
                    processed[act_id] = cell_len;
                    progress = true;
                }
            }
            if !progress {
                break;
            }
        }
    }

    Ok(())
}
