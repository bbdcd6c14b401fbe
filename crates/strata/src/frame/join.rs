//! Hash equi-joins (inner, left, right, outer) and the cross join.
//!
//! The inner-join pipeline is the template: hash the build side's keys into
//! a partitioned hash table, hash the probe side, probe morsel-parallel
//! collecting (probe, build) row pairs, then gather every output column
//! through the pair index arrays. Left join also emits unmatched probe
//! rows with a -1 build index; outer join additionally appends build rows
//! that no probe row touched; right join runs the left pipeline with the
//! sides swapped.
//!
//! Result order is deterministic: ascending probe row index, then build
//! row index within one probe row (for right joins the probe side is the
//! right frame). Hashes use the fixed-seed kernels, so results are
//! identical across runs and worker counts.

// dependencies
use std::collections::HashMap;
use rayon::prelude::*;
use crate::config::EngineConfig;
use crate::error::{Result, StrataError};
use crate::exec::columns::build_columns_parallel;
use crate::exec::cost::{self, OpKind};
use crate::exec::morsel;
use crate::series::Series;
use super::DataFrame;

// partition count for the parallel hash table build; power of two
const BUILD_PARTITIONS: usize = 16;

/* -----------------------------------------------------------------------------
join specification
----------------------------------------------------------------------------- */
/// The five join modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
    Cross,
}

/// Which key columns to join on, plus the suffix applied to right-side
/// column names that collide with left-side names (default `_right`).
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    left_on:  Vec<String>,
    right_on: Vec<String>,
    suffix:   String,
}

impl JoinSpec {
    /// Join on columns with the same name on both sides.
    pub fn on(columns: &[&str]) -> JoinSpec {
        let names: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        JoinSpec { left_on: names.clone(), right_on: names, suffix: "_right".to_string() }
    }
    /// Join on differently named key columns of equal arity.
    pub fn left_right(left_on: &[&str], right_on: &[&str]) -> JoinSpec {
        JoinSpec {
            left_on:  left_on.iter().map(|c| c.to_string()).collect(),
            right_on: right_on.iter().map(|c| c.to_string()).collect(),
            suffix:   "_right".to_string(),
        }
    }
    /// Override the collision suffix.
    pub fn with_suffix(mut self, suffix: &str) -> JoinSpec {
        self.suffix = suffix.to_string();
        self
    }
    pub fn left_on(&self) -> &[String] {
        &self.left_on
    }
    pub fn right_on(&self) -> &[String] {
        &self.right_on
    }

    fn validate(&self, left: &DataFrame, right: &DataFrame) -> Result<()> {
        if self.left_on.is_empty() || self.right_on.is_empty() {
            return Err(StrataError::JoinSpec(
                "join requires key columns: use on() or left_right()".to_string(),
            ));
        }
        if self.left_on.len() != self.right_on.len() {
            return Err(StrataError::Arity(format!(
                "left_on has {} columns but right_on has {}",
                self.left_on.len(), self.right_on.len()
            )));
        }
        for name in &self.left_on {
            if !left.schema().contains(name) {
                return Err(StrataError::JoinSpec(format!(
                    "join column {name} missing on the left side"
                )));
            }
        }
        for name in &self.right_on {
            if !right.schema().contains(name) {
                return Err(StrataError::JoinSpec(format!(
                    "join column {name} missing on the right side"
                )));
            }
        }
        // key dtypes must agree, except String and Categorical which
        // compare by decoded value
        for (left_name, right_name) in self.left_on.iter().zip(&self.right_on) {
            let left_dtype = left.column_by_name(left_name)?.dtype();
            let right_dtype = right.column_by_name(right_name)?.dtype();
            let string_like = |d: crate::dtype::Dtype| {
                matches!(d, crate::dtype::Dtype::String | crate::dtype::Dtype::Categorical)
            };
            if left_dtype != right_dtype && !(string_like(left_dtype) && string_like(right_dtype)) {
                return Err(StrataError::Type(format!(
                    "join keys {left_name} ({left_dtype}) and {right_name} ({right_dtype}) have incompatible dtypes"
                )));
            }
        }
        Ok(())
    }

    // right key columns omitted from the output: same name and key
    // position on both sides
    fn shared_keys(&self) -> Vec<&str> {
        self.left_on
            .iter()
            .zip(&self.right_on)
            .filter(|(l, r)| l == r)
            .map(|(l, _)| l.as_str())
            .collect()
    }
}

/// Resolve the output column names: all left names in order, then every
/// right column that is not a shared key, suffixed on collision with any
/// left name. Shared exposure for the join itself and the optimiser.
pub(crate) fn output_names(
    left_names: &[&str], right_names: &[&str], spec: &JoinSpec,
) -> Vec<String> {
    let shared = spec.shared_keys();
    let mut names: Vec<String> = left_names.iter().map(|n| n.to_string()).collect();
    for right_name in right_names {
        if shared.contains(right_name) {
            continue;
        }
        if left_names.contains(right_name) {
            names.push(format!("{right_name}{}", spec.suffix));
        } else {
            names.push(right_name.to_string());
        }
    }
    names
}

/* -----------------------------------------------------------------------------
match pair collection
----------------------------------------------------------------------------- */
// the probe result: parallel (probe, build) row index arrays, -1 = null,
// plus the build rows some probe row matched (outer join bookkeeping)
struct MatchPairs {
    probe_idx:     Vec<i32>,
    build_idx:     Vec<i32>,
    build_matched: Vec<bool>,
}

// a partitioned hash table over the build side: bucket lists of build row
// indices per 64-bit key hash, partitions read-only after the build
struct BuildTable {
    partitions: Vec<HashMap<u64, Vec<u32>>>,
    mask:       u64,
}

impl BuildTable {
    fn build(hashes: &[u64]) -> BuildTable {
        let n_partitions = if cost::should_parallelize(OpKind::JoinBuild, hashes.len()) {
            BUILD_PARTITIONS
        } else {
            1
        };
        let mask = (n_partitions - 1) as u64;
        log::debug!("hash join build: {} rows into {n_partitions} partition(s)", hashes.len());

        if n_partitions == 1 {
            let mut table: HashMap<u64, Vec<u32>> = HashMap::with_capacity(hashes.len());
            for (row, &hash) in hashes.iter().enumerate() {
                table.entry(hash).or_default().push(row as u32);
            }
            return BuildTable { partitions: vec![table], mask };
        }

        // scatter rows by partition, then build each partition's map
        // independently; workers never share a map, so no lock contention
        let mut partition_rows: Vec<Vec<u32>> = vec![Vec::new(); n_partitions];
        for (row, &hash) in hashes.iter().enumerate() {
            partition_rows[(hash & mask) as usize].push(row as u32);
        }
        let partitions = partition_rows
            .into_par_iter()
            .map(|rows| {
                let mut table: HashMap<u64, Vec<u32>> = HashMap::with_capacity(rows.len());
                for row in rows {
                    table.entry(hashes[row as usize]).or_default().push(row);
                }
                table
            })
            .collect();
        BuildTable { partitions, mask }
    }

    fn candidates(&self, hash: u64) -> Option<&Vec<u32>> {
        self.partitions[(hash & self.mask) as usize].get(&hash)
    }
}

// hash one side's key columns, folding multi-key hashes per row; the
// group-by pipeline shares this so join and grouping agree on key hashing
pub(crate) fn hash_keys(df: &DataFrame, keys: &[String]) -> Result<Vec<u64>> {
    let mut hashes = df.column_by_name(&keys[0])?.hash_rows()?;
    for key in &keys[1..] {
        df.column_by_name(key)?.combine_hash_rows(&mut hashes)?;
    }
    Ok(hashes)
}

// probe the build table, morsel-parallel, merging per-morsel pair vectors
// in morsel order so the output order matches the serial pass
fn probe(
    probe_df: &DataFrame,
    probe_keys: &[String],
    build_df: &DataFrame,
    build_keys: &[String],
    keep_unmatched_probe: bool,
) -> Result<MatchPairs> {
    let probe_hashes = hash_keys(probe_df, probe_keys)?;
    let build_hashes = hash_keys(build_df, build_keys)?;
    let table = BuildTable::build(&build_hashes);

    let probe_columns: Vec<&Series> = probe_keys
        .iter()
        .map(|k| probe_df.column_by_name(k))
        .collect::<Result<_>>()?;
    let build_columns: Vec<&Series> = build_keys
        .iter()
        .map(|k| build_df.column_by_name(k))
        .collect::<Result<_>>()?;
    // typed key equality: hash buckets only nominate candidates
    let rows_equal = |probe_row: usize, build_row: usize| {
        probe_columns
            .iter()
            .zip(&build_columns)
            .all(|(p, b)| p.key_eq(probe_row, b, build_row))
    };

    let config = EngineConfig::get();
    let workers = if cost::should_parallelize(OpKind::JoinProbe, probe_df.height()) {
        config.worker_count
    } else {
        1
    };
    let morsel_results = morsel::run_morsels_with(
        probe_df.height(),
        config.morsel_size,
        workers,
        |_, rows| {
            let mut probe_idx: Vec<i32> = Vec::new();
            let mut build_idx: Vec<i32> = Vec::new();
            let mut matched: Vec<u32> = Vec::new();
            for probe_row in rows {
                let mut hits = 0usize;
                if let Some(bucket) = table.candidates(probe_hashes[probe_row]) {
                    for &build_row in bucket {
                        if rows_equal(probe_row, build_row as usize) {
                            probe_idx.push(probe_row as i32);
                            build_idx.push(build_row as i32);
                            matched.push(build_row);
                            hits += 1;
                        }
                    }
                }
                if hits == 0 && keep_unmatched_probe {
                    probe_idx.push(probe_row as i32);
                    build_idx.push(-1);
                }
            }
            (probe_idx, build_idx, matched)
        },
    );

    let mut pairs = MatchPairs {
        probe_idx:     Vec::new(),
        build_idx:     Vec::new(),
        build_matched: vec![false; build_df.height()],
    };
    for (probe_idx, build_idx, matched) in morsel_results {
        pairs.probe_idx.extend(probe_idx);
        pairs.build_idx.extend(build_idx);
        for build_row in matched {
            pairs.build_matched[build_row as usize] = true;
        }
    }
    Ok(pairs)
}

/* -----------------------------------------------------------------------------
the Int64 single-key fast path
----------------------------------------------------------------------------- */
// chained index-linked hash table: `head` maps a key to its first build
// row, `next[row]` links rows sharing a key in ascending order
fn probe_i64_single_key(
    probe_keys: &[i64], build_keys: &[i64], keep_unmatched_probe: bool,
) -> MatchPairs {
    let mut head: HashMap<i64, i32> = HashMap::with_capacity(build_keys.len());
    let mut next: Vec<i32> = vec![-1; build_keys.len()];
    for row in (0..build_keys.len()).rev() {
        match head.insert(build_keys[row], row as i32) {
            Some(previous_first) => next[row] = previous_first,
            None => next[row] = -1,
        }
    }

    let mut pairs = MatchPairs {
        probe_idx:     Vec::new(),
        build_idx:     Vec::new(),
        build_matched: vec![false; build_keys.len()],
    };
    for (probe_row, key) in probe_keys.iter().enumerate() {
        let mut build_row = head.get(key).copied().unwrap_or(-1);
        if build_row < 0 {
            if keep_unmatched_probe {
                pairs.probe_idx.push(probe_row as i32);
                pairs.build_idx.push(-1);
            }
            continue;
        }
        while build_row >= 0 {
            pairs.probe_idx.push(probe_row as i32);
            pairs.build_idx.push(build_row);
            pairs.build_matched[build_row as usize] = true;
            build_row = next[build_row as usize];
        }
    }
    pairs
}

// both sides use the fast path only for a dense single Int64 key
fn i64_fast_path_keys<'a>(
    probe_df: &'a DataFrame, probe_keys: &[String],
    build_df: &'a DataFrame, build_keys: &[String],
) -> Option<(&'a [i64], &'a [i64])> {
    if probe_keys.len() != 1 {
        return None;
    }
    let probe_col = probe_df.column_by_name(&probe_keys[0]).ok()?;
    let build_col = build_df.column_by_name(&build_keys[0]).ok()?;
    if probe_col.validity().is_some() || build_col.validity().is_some() {
        return None;
    }
    Some((probe_col.int64().ok()?, build_col.int64().ok()?))
}

// run the pair-collection pipeline: Int64 fast path or general probe
fn equi_pairs(
    probe_df: &DataFrame, build_df: &DataFrame,
    probe_keys: &[String], build_keys: &[String],
    keep_unmatched_probe: bool,
) -> Result<MatchPairs> {
    if let Some((probe_slice, build_slice)) =
        i64_fast_path_keys(probe_df, probe_keys, build_df, build_keys)
    {
        return Ok(probe_i64_single_key(probe_slice, build_slice, keep_unmatched_probe));
    }
    probe(probe_df, probe_keys, build_df, build_keys, keep_unmatched_probe)
}

/* -----------------------------------------------------------------------------
join entry points
----------------------------------------------------------------------------- */
impl DataFrame {
    /// Join against `other` under a spec and join type. Cross joins ignore
    /// the key columns of the spec.
    pub fn join(&self, other: &DataFrame, spec: &JoinSpec, how: JoinType) -> Result<DataFrame> {
        match how {
            JoinType::Cross => self.cross_join(other),
            JoinType::Right => {
                spec.validate(self, other)?;
                // build on the left, probe with the right; the mirror of
                // the left pipeline, ordered by right row then left row
                let pairs = equi_pairs(other, self, &spec.right_on, &spec.left_on, true)?;
                self.assemble(other, spec, &pairs.build_idx, &pairs.probe_idx)
            }
            JoinType::Inner | JoinType::Left | JoinType::Outer => {
                spec.validate(self, other)?;
                let keep_unmatched = how != JoinType::Inner;
                let mut pairs =
                    equi_pairs(self, other, &spec.left_on, &spec.right_on, keep_unmatched)?;
                if how == JoinType::Outer {
                    // second pass: append right rows no left row matched
                    for (build_row, matched) in pairs.build_matched.iter().enumerate() {
                        if !matched {
                            pairs.probe_idx.push(-1);
                            pairs.build_idx.push(build_row as i32);
                        }
                    }
                }
                self.assemble(other, spec, &pairs.probe_idx, &pairs.build_idx)
            }
        }
    }

    /// Inner join: all and only key-equal row pairs.
    pub fn inner_join(&self, other: &DataFrame, spec: &JoinSpec) -> Result<DataFrame> {
        self.join(other, spec, JoinType::Inner)
    }
    /// Left join: every left row at least once, null right fields when
    /// unmatched.
    pub fn left_join(&self, other: &DataFrame, spec: &JoinSpec) -> Result<DataFrame> {
        self.join(other, spec, JoinType::Left)
    }
    /// Right join: every right row at least once, null left fields when
    /// unmatched.
    pub fn right_join(&self, other: &DataFrame, spec: &JoinSpec) -> Result<DataFrame> {
        self.join(other, spec, JoinType::Right)
    }
    /// Outer join: left join plus unmatched right rows.
    pub fn outer_join(&self, other: &DataFrame, spec: &JoinSpec) -> Result<DataFrame> {
        self.join(other, spec, JoinType::Outer)
    }

    /// Cross join: the cartesian product, row-major in left order.
    pub fn cross_join(&self, other: &DataFrame) -> Result<DataFrame> {
        let rows = self.height() * other.height();
        let mut left_idx: Vec<i32> = Vec::with_capacity(rows);
        let mut right_idx: Vec<i32> = Vec::with_capacity(rows);
        for left_row in 0..self.height() as i32 {
            for right_row in 0..other.height() as i32 {
                left_idx.push(left_row);
                right_idx.push(right_row);
            }
        }
        let spec = JoinSpec { left_on: Vec::new(), right_on: Vec::new(), suffix: "_right".to_string() };
        self.assemble(other, &spec, &left_idx, &right_idx)
    }

    // gather all output columns through the pair index arrays, in parallel
    fn assemble(
        &self, right: &DataFrame, spec: &JoinSpec,
        left_idx: &[i32], right_idx: &[i32],
    ) -> Result<DataFrame> {
        let shared = spec.shared_keys();
        let left_names = self.column_names();
        let kept_right: Vec<&Series> = right
            .columns()
            .iter()
            .filter(|c| !shared.contains(&c.name()))
            .collect();
        let names = output_names(
            &left_names,
            &right.column_names(),
            spec,
        );
        let width = self.width() + kept_right.len();
        let columns = build_columns_parallel(width, left_idx.len(), |i| {
            let gathered = if i < self.width() {
                self.columns()[i].gather_i32(left_idx)
            } else {
                kept_right[i - self.width()].gather_i32(right_idx)
            };
            Ok(gathered.renamed(&names[i]))
        })?;
        DataFrame::new(columns)
    }
}
