//! Morsel-based work-stealing within a single operator.
//!
//! Work is chunked into fixed-size morsels of rows. A shared atomic cursor
//! hands the next morsel to whichever worker asks first; each worker
//! accumulates (morsel id, result) pairs, and the merge pass orders results
//! by morsel id. The merged output is therefore identical to the serial
//! output regardless of worker count or scheduling, which is the ordering
//! contract the operators and tests rely on.

// dependencies
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::config::EngineConfig;

/// Run `f` once per morsel of `n_rows` rows with the process-wide worker
/// and morsel configuration, returning per-morsel results in morsel order.
pub fn run_morsels<R, F>(n_rows: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize, Range<usize>) -> R + Sync,
{
    let config = EngineConfig::get();
    run_morsels_with(n_rows, config.morsel_size, config.worker_count, f)
}

/// `run_morsels` with explicit morsel size and worker count; the
/// determinism tests drive this directly with different worker counts.
pub fn run_morsels_with<R, F>(n_rows: usize, morsel_size: usize, workers: usize, f: F) -> Vec<R>
where
    R: Send,
    F: Fn(usize, Range<usize>) -> R + Sync,
{
    let morsel_size = morsel_size.max(1);
    let n_morsels = n_rows.div_ceil(morsel_size);
    if workers <= 1 || n_morsels <= 1 {
        return (0..n_morsels)
            .map(|id| f(id, morsel_range(id, morsel_size, n_rows)))
            .collect();
    }

    let cursor = AtomicUsize::new(0);
    let mut tagged: Vec<(usize, R)> = crossbeam::scope(|scope| {
        let handles: Vec<_> = (0..workers.min(n_morsels))
            .map(|_| {
                let cursor = &cursor;
                let f = &f;
                scope.spawn(move |_| {
                    let mut local: Vec<(usize, R)> = Vec::new();
                    loop {
                        let id = cursor.fetch_add(1, Ordering::Relaxed);
                        if id >= n_morsels {
                            break;
                        }
                        local.push((id, f(id, morsel_range(id, morsel_size, n_rows))));
                    }
                    local
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect()
    })
    .unwrap();

    // merge pass: morsel id order restores the serial output order
    tagged.sort_by_key(|(id, _)| *id);
    tagged.into_iter().map(|(_, result)| result).collect()
}

fn morsel_range(id: usize, morsel_size: usize, n_rows: usize) -> Range<usize> {
    let start = id * morsel_size;
    start..((start + morsel_size).min(n_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn morsels_cover_all_rows_exactly_once() {
        let ranges = run_morsels_with(10, 3, 4, |_, range| range);
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[0], 0..3);
        assert_eq!(ranges[3], 9..10);
        let total: usize = ranges.iter().map(|r| r.len()).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn zero_rows_produce_zero_morsels() {
        let results = run_morsels_with(0, 64, 4, |_, _| 1);
        assert!(results.is_empty());
    }

    #[test]
    fn merged_order_is_independent_of_worker_count() {
        let work = |id: usize, range: Range<usize>| -> Vec<usize> {
            // uneven per-morsel work to encourage out-of-order completion
            if id % 3 == 0 {
                std::thread::sleep(std::time::Duration::from_millis(2));
            }
            range.collect()
        };
        let serial: Vec<usize> = run_morsels_with(1000, 37, 1, work).concat();
        let parallel: Vec<usize> = run_morsels_with(1000, 37, 8, work).concat();
        assert_eq!(serial, parallel);
        assert_eq!(serial, (0..1000).collect::<Vec<_>>());
    }
}
