//! Hash-grouped aggregation: `df.group_by(keys).agg(aggs)`.
//!
//! The grouping pass resolves, for every row, the first row holding an
//! equal key (its "leader"), then assigns dense group ids in first-seen
//! row order; one pass per aggregation over (group id, value) pairs fills
//! a typed accumulator sized by the group count. The output holds the key
//! columns (deduplicated, in input order, gathered from the representative
//! rows) followed by one column per aggregation, named by alias or the
//! `<col>_<op>` convention.
//!
//! Above the `OpKind::GroupBy` threshold the leader pass runs partitioned
//! by hash, the way the join builds its hash table: equal keys share a
//! hash, so each partition resolves its leaders independently with no
//! shared state. The id-assignment pass stays serial either way, so group
//! ids and output order are deterministic given the input.

// dependencies
use std::collections::{HashMap, HashSet};
use rayon::prelude::*;
use crate::bitmap::Bitmap;
use crate::error::{Result, StrataError};
use crate::exec::cost::{self, ExecPath, OpKind};
use crate::expr::{col, AggKind, Expr};
use crate::kernels::reduce;
use crate::series::{normalize_f64_bits, Series, SeriesData};
use super::join::hash_keys;
use super::DataFrame;

// partition count for the parallel leader pass; power of two
const GROUP_PARTITIONS: usize = 16;

/* -----------------------------------------------------------------------------
group id assignment
----------------------------------------------------------------------------- */
// dense group ids plus one representative (first) row per group
struct Groups {
    ids:             Vec<u32>,
    representatives: Vec<u32>,
}

impl Groups {
    fn n_groups(&self) -> usize {
        self.representatives.len()
    }
}

// resolve leaders (cost-model routed), then assign dense group ids in
// first-seen row order; null keys group together per column
fn compute_group_ids(df: &DataFrame, keys: &[String]) -> Result<Groups> {
    let hashes = hash_keys(df, keys)?;
    let key_columns: Vec<&Series> = keys
        .iter()
        .map(|k| df.column_by_name(k))
        .collect::<Result<_>>()?;
    let rows_in_same_group = |a: usize, b: usize| {
        key_columns.iter().all(|c| {
            match (c.is_valid(a), c.is_valid(b)) {
                (false, false) => true,
                (true, true)   => c.key_eq(a, c, b),
                _ => false,
            }
        })
    };

    let parallel = cost::decide(OpKind::GroupBy, df.height()) == ExecPath::Parallel;
    let leaders = compute_leaders(&hashes, &rows_in_same_group, parallel);

    // a leader always precedes its followers, so its id is already set
    // when a follower reads it
    let mut ids: Vec<u32> = vec![0; df.height()];
    let mut representatives: Vec<u32> = Vec::new();
    for (row, &leader) in leaders.iter().enumerate() {
        if leader as usize == row {
            ids[row] = representatives.len() as u32;
            representatives.push(row as u32);
        } else {
            ids[row] = ids[leader as usize];
        }
    }
    log::debug!(
        "group_by: {} rows into {} group(s), parallel leader pass: {parallel}",
        df.height(), representatives.len()
    );
    Ok(Groups { ids, representatives })
}

// for every row, the first row holding an equal key. Equal keys share a
// hash, so hash-partitioned row sets resolve their leaders independently
// and the partition-local first occurrence is the global one.
fn compute_leaders(
    hashes: &[u64], same_key: &(impl Fn(usize, usize) -> bool + Sync), parallel: bool,
) -> Vec<u32> {
    let mut leaders = vec![0u32; hashes.len()];
    if !parallel {
        let all_rows: Vec<u32> = (0..hashes.len() as u32).collect();
        for (row, leader) in partition_leaders(&all_rows, hashes, same_key) {
            leaders[row as usize] = leader;
        }
        return leaders;
    }

    let mask = (GROUP_PARTITIONS - 1) as u64;
    let mut partition_rows: Vec<Vec<u32>> = vec![Vec::new(); GROUP_PARTITIONS];
    for (row, &hash) in hashes.iter().enumerate() {
        partition_rows[(hash & mask) as usize].push(row as u32);
    }
    let resolved: Vec<Vec<(u32, u32)>> = partition_rows
        .into_par_iter()
        .map(|rows| partition_leaders(&rows, hashes, same_key))
        .collect();
    for pairs in resolved {
        for (row, leader) in pairs {
            leaders[row as usize] = leader;
        }
    }
    leaders
}

// hash-bucketed scan over one ascending row set: the first row of each
// distinct key leads every later equal-key row
fn partition_leaders(
    rows: &[u32], hashes: &[u64], same_key: &(impl Fn(usize, usize) -> bool + Sync),
) -> Vec<(u32, u32)> {
    let mut table: HashMap<u64, Vec<u32>> = HashMap::with_capacity(rows.len());
    let mut pairs: Vec<(u32, u32)> = Vec::with_capacity(rows.len());
    for &row in rows {
        let candidates = table.entry(hashes[row as usize]).or_default();
        match candidates.iter().copied().find(|&c| same_key(row as usize, c as usize)) {
            Some(leader) => pairs.push((row, leader)),
            None => {
                candidates.push(row);
                pairs.push((row, row));
            }
        }
    }
    pairs
}

/* -----------------------------------------------------------------------------
GroupBy handle
----------------------------------------------------------------------------- */
/// A pending grouped aggregation over a borrowed DataFrame.
pub struct GroupBy<'a> {
    df:   &'a DataFrame,
    keys: Vec<String>,
}

impl DataFrame {
    /// Group rows by the named key columns (deduplicated, in input order).
    pub fn group_by(&self, keys: &[&str]) -> Result<GroupBy<'_>> {
        if keys.is_empty() {
            return Err(StrataError::Schema("group_by requires at least one key".to_string()));
        }
        let mut deduplicated: Vec<String> = Vec::with_capacity(keys.len());
        for key in keys {
            if !self.schema().contains(key) {
                return Err(StrataError::column_not_found("group_by", key));
            }
            if !deduplicated.iter().any(|k| k == key) {
                deduplicated.push(key.to_string());
            }
        }
        Ok(GroupBy { df: self, keys: deduplicated })
    }
}

macro_rules! group_by_agg_method {
    ($($fn_name:ident, $builder:ident;)+) => {
        $(
            #[doc = concat!("Aggregate one column with `", stringify!($builder), "`.")]
            pub fn $fn_name(&self, column: &str) -> Result<DataFrame> {
                self.agg(&[col(column).$builder()])
            }
        )+
    };
}

impl GroupBy<'_> {
    group_by_agg_method! {
        sum, sum;
        mean, mean;
        min, min;
        max, max;
        first, first;
        last, last;
        var, var;
        std, std;
        median, median;
        n_unique, count_distinct;
    }

    /// Rows per group, named `<first_key>_count`.
    pub fn count(&self) -> Result<DataFrame> {
        self.agg(&[col(&self.keys[0]).count()])
    }

    /// Run one or more aggregation expressions; each must be an
    /// `Aggregate` (optionally aliased).
    pub fn agg(&self, aggs: &[Expr]) -> Result<DataFrame> {
        let groups = compute_group_ids(self.df, &self.keys)?;
        let mut columns: Vec<Series> = self
            .keys
            .iter()
            .map(|key| Ok(self.df.column_by_name(key)?.take_u32(&groups.representatives)))
            .collect::<Result<_>>()?;
        let agg_columns: Vec<Series> = aggs
            .par_iter()
            .map(|expr| {
                let (kind, child, name) = resolve_agg_expr(expr)?;
                let values = child.evaluate(self.df)?;
                Ok(accumulate(kind, &values, &groups)?.renamed(&name))
            })
            .collect::<Result<_>>()?;
        columns.extend(agg_columns);
        DataFrame::new(columns)
    }
}

// unwrap Alias(Aggregate(..)) | Aggregate(..) into kind, child, output name
fn resolve_agg_expr(expr: &Expr) -> Result<(AggKind, &Expr, String)> {
    match expr {
        Expr::Aggregate { kind, expr: child } => {
            Ok((*kind, child.as_ref(), expr.output_name()?))
        }
        Expr::Alias { name, expr: inner } => match inner.as_ref() {
            Expr::Aggregate { kind, expr: child } => Ok((*kind, child.as_ref(), name.clone())),
            _ => Err(StrataError::Type(format!(
                "group_by.agg requires aggregate expressions, got alias of {inner:?}"
            ))),
        },
        _ => Err(StrataError::Type(format!(
            "group_by.agg requires aggregate expressions, got {expr:?}"
        ))),
    }
}

/* -----------------------------------------------------------------------------
typed accumulators, one pass over (group id, value)
----------------------------------------------------------------------------- */
fn accumulate(kind: AggKind, values: &Series, groups: &Groups) -> Result<Series> {
    let n_groups = groups.n_groups();
    match kind {
        AggKind::Sum    => accumulate_sum(values, groups, n_groups),
        AggKind::Mean   => {
            let (sums, counts) = sums_and_counts(values, groups, n_groups)?;
            let means = sums
                .iter()
                .zip(&counts)
                .map(|(&s, &n)| if n == 0 { f64::NAN } else { s / n as f64 })
                .collect();
            Ok(Series::new_float64(values.name(), means))
        }
        AggKind::Min    => accumulate_extreme(values, groups, n_groups, true),
        AggKind::Max    => accumulate_extreme(values, groups, n_groups, false),
        AggKind::Count  => {
            let mut counts = vec![0u32; n_groups];
            for &gid in &groups.ids {
                counts[gid as usize] += 1;
            }
            Ok(Series::new_uint32(values.name(), counts))
        }
        AggKind::First  => {
            // a group's representative is its first row by construction
            let indices: Vec<i32> = groups.representatives.iter().map(|&r| r as i32).collect();
            Ok(values.gather_i32(&indices))
        }
        AggKind::Last   => {
            let mut last_rows = vec![-1i32; n_groups];
            for (row, &gid) in groups.ids.iter().enumerate() {
                last_rows[gid as usize] = row as i32;
            }
            Ok(values.gather_i32(&last_rows))
        }
        AggKind::Var | AggKind::Std => accumulate_welford(kind, values, groups, n_groups),
        AggKind::Median => {
            let mut per_group: Vec<Vec<f64>> = vec![Vec::new(); n_groups];
            for_each_valid_f64(values, groups, |gid, value| per_group[gid].push(value))?;
            let medians = per_group.iter().map(|g| reduce::median(g)).collect();
            Ok(Series::new_float64(values.name(), medians))
        }
        AggKind::CountDistinct => accumulate_distinct(values, groups, n_groups),
    }
}

// walk valid rows as f64 with their group id
fn for_each_valid_f64(
    values: &Series, groups: &Groups, mut visit: impl FnMut(usize, f64),
) -> Result<()> {
    let raw = values.raw_f64_lossy()?;
    for (row, (&gid, &value)) in groups.ids.iter().zip(&raw).enumerate() {
        if values.is_valid(row) {
            visit(gid as usize, value);
        }
    }
    Ok(())
}

fn sums_and_counts(
    values: &Series, groups: &Groups, n_groups: usize,
) -> Result<(Vec<f64>, Vec<u32>)> {
    let mut sums = vec![0.0f64; n_groups];
    let mut counts = vec![0u32; n_groups];
    for_each_valid_f64(values, groups, |gid, value| {
        sums[gid] += value;
        counts[gid] += 1;
    })?;
    Ok((sums, counts))
}

// sums accumulate natively: floats in f64, signed in i64, unsigned in u64
fn accumulate_sum(values: &Series, groups: &Groups, n_groups: usize) -> Result<Series> {
    macro_rules! summed {
        ($slice:expr, $acc:ty, $constructor:ident) => {{
            let mut sums = vec![<$acc>::default(); n_groups];
            for (row, (&gid, &value)) in groups.ids.iter().zip($slice).enumerate() {
                if values.is_valid(row) {
                    sums[gid as usize] += value as $acc;
                }
            }
            Series::$constructor(values.name(), sums)
        }};
    }
    Ok(match values.data() {
        SeriesData::Float64(v) => summed!(v, f64, new_float64),
        SeriesData::Float32(v) => summed!(v, f64, new_float64),
        SeriesData::Int64(v)   => summed!(v, i64, new_int64),
        SeriesData::Int32(v)   => summed!(v, i64, new_int64),
        SeriesData::UInt64(v)  => summed!(v, u64, new_uint64),
        SeriesData::UInt32(v)  => summed!(v, u64, new_uint64),
        _ => {
            return Err(StrataError::Type(format!(
                "sum requires a numeric column, got {} of dtype {}", values.name(), values.dtype()
            )))
        }
    })
}

// min/max registers per group: conditional write against the running
// extreme, null result for groups with no valid rows
fn accumulate_extreme(
    values: &Series, groups: &Groups, n_groups: usize, minimum: bool,
) -> Result<Series> {
    macro_rules! extreme {
        ($slice:expr, $prim:ty, $constructor:ident) => {{
            let mut registers: Vec<Option<$prim>> = vec![None; n_groups];
            for (row, (&gid, &value)) in groups.ids.iter().zip($slice).enumerate() {
                if !values.is_valid(row) {
                    continue;
                }
                let register = &mut registers[gid as usize];
                let replace = match register {
                    None => true,
                    Some(current) => {
                        use crate::kernels::NumericElement;
                        let ordering = value.ord_cmp(*current);
                        if minimum {
                            ordering == std::cmp::Ordering::Less
                        } else {
                            ordering == std::cmp::Ordering::Greater
                        }
                    }
                };
                if replace {
                    *register = Some(value);
                }
            }
            let validity = Bitmap::from_bools(
                &registers.iter().map(|r| r.is_some()).collect::<Vec<bool>>(),
            );
            let dense: Vec<$prim> = registers.into_iter().map(|r| r.unwrap_or_default()).collect();
            if validity.count_null() == 0 {
                Series::$constructor(values.name(), dense)
            } else {
                Series::$constructor(values.name(), dense).with_validity(validity)?
            }
        }};
    }
    Ok(match values.data() {
        SeriesData::Float64(v) => extreme!(v, f64, new_float64),
        SeriesData::Float32(v) => extreme!(v, f32, new_float32),
        SeriesData::Int64(v)   => extreme!(v, i64, new_int64),
        SeriesData::Int32(v)   => extreme!(v, i32, new_int32),
        SeriesData::UInt64(v)  => extreme!(v, u64, new_uint64),
        SeriesData::UInt32(v)  => extreme!(v, u32, new_uint32),
        _ => {
            return Err(StrataError::Type(format!(
                "min/max require a numeric column, got {} of dtype {}",
                values.name(), values.dtype()
            )))
        }
    })
}

// Welford's online algorithm per group, sample (N-1) convention
fn accumulate_welford(
    kind: AggKind, values: &Series, groups: &Groups, n_groups: usize,
) -> Result<Series> {
    let mut counts = vec![0u32; n_groups];
    let mut means = vec![0.0f64; n_groups];
    let mut m2s = vec![0.0f64; n_groups];
    for_each_valid_f64(values, groups, |gid, value| {
        counts[gid] += 1;
        let delta = value - means[gid];
        means[gid] += delta / counts[gid] as f64;
        m2s[gid] += delta * (value - means[gid]);
    })?;
    let variances = m2s.iter().zip(&counts).map(|(&m2, &n)| {
        if n < 2 {
            f64::NAN
        } else {
            m2 / (n - 1) as f64
        }
    });
    let result: Vec<f64> = if kind == AggKind::Std {
        variances.map(|v| v.sqrt()).collect()
    } else {
        variances.collect()
    };
    Ok(Series::new_float64(values.name(), result))
}

// exact distinct counts: a per-group hash set keyed by the dtype's value
// identity (normalized float bits, dictionary index for Categorical)
fn accumulate_distinct(values: &Series, groups: &Groups, n_groups: usize) -> Result<Series> {
    fn count_keys<K: std::hash::Hash + Eq>(
        n_groups: usize,
        rows: impl Iterator<Item = (usize, K)>,
    ) -> Vec<u32> {
        let mut sets: Vec<HashSet<K>> = (0..n_groups).map(|_| HashSet::new()).collect();
        for (gid, key) in rows {
            sets[gid].insert(key);
        }
        sets.iter().map(|s| s.len() as u32).collect()
    }
    let valid_rows = |len: usize| {
        (0..len).filter(|&row| values.is_valid(row))
    };
    let counts = match values.data() {
        SeriesData::Float64(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, normalize_f64_bits(v[r]))),
        ),
        SeriesData::Float32(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, normalize_f64_bits(v[r] as f64))),
        ),
        SeriesData::Int64(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, v[r])),
        ),
        SeriesData::Int32(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, v[r])),
        ),
        SeriesData::UInt64(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, v[r])),
        ),
        SeriesData::UInt32(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, v[r])),
        ),
        SeriesData::Bool(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, v[r])),
        ),
        SeriesData::String(v) => count_keys(
            n_groups,
            valid_rows(v.len()).map(|r| (groups.ids[r] as usize, v[r].as_str())),
        ),
        SeriesData::Categorical(c) => count_keys(
            n_groups,
            valid_rows(c.len()).map(|r| (groups.ids[r] as usize, c.indices[r])),
        ),
    };
    Ok(Series::new_uint32(values.name(), counts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new_str("group", &["A", "A", "B", "B", "B", "C"]),
            Series::new_int64("value", vec![1, 2, 3, 4, 5, 6]),
            Series::new_float64("score", vec![1.0, 3.0, 2.0, 2.0, 8.0, 5.0]),
        ])
        .unwrap()
    }

    #[test]
    fn grouped_sum_matches_the_pinned_scenario() {
        // A:3, B:12, C:6
        let out = sample().group_by(&["group"]).unwrap().agg(&[col("value").sum()]).unwrap();
        assert_eq!(out.column_names(), vec!["group", "value_sum"]);
        assert_eq!(out.column_by_name("group").unwrap().strings().unwrap(), &["A", "B", "C"]);
        assert_eq!(out.column_by_name("value_sum").unwrap().int64().unwrap(), &[3, 12, 6]);
    }

    #[test]
    fn multiple_aggregations_in_one_pass() {
        let out = sample()
            .group_by(&["group"])
            .unwrap()
            .agg(&[
                col("value").min().alias("lo"),
                col("value").max().alias("hi"),
                col("value").mean(),
                col("value").count(),
            ])
            .unwrap();
        assert_eq!(out.column_names(), vec!["group", "lo", "hi", "value_mean", "value_count"]);
        assert_eq!(out.column_by_name("lo").unwrap().int64().unwrap(), &[1, 3, 6]);
        assert_eq!(out.column_by_name("hi").unwrap().int64().unwrap(), &[2, 5, 6]);
        assert_eq!(out.column_by_name("value_mean").unwrap().float64().unwrap(), &[1.5, 4.0, 6.0]);
        assert_eq!(out.column_by_name("value_count").unwrap().uint32().unwrap(), &[2, 3, 1]);
    }

    #[test]
    fn first_last_follow_row_order() {
        let out = sample()
            .group_by(&["group"])
            .unwrap()
            .agg(&[col("score").first().alias("f"), col("score").last().alias("l")])
            .unwrap();
        assert_eq!(out.column_by_name("f").unwrap().float64().unwrap(), &[1.0, 2.0, 5.0]);
        assert_eq!(out.column_by_name("l").unwrap().float64().unwrap(), &[3.0, 8.0, 5.0]);
    }

    #[test]
    fn variance_uses_welford_sample_convention() {
        let out = sample()
            .group_by(&["group"])
            .unwrap()
            .agg(&[col("score").var().alias("v"), col("score").std().alias("s")])
            .unwrap();
        let variance = out.column_by_name("v").unwrap().float64().unwrap();
        assert!((variance[0] - 2.0).abs() < 1e-12); // var([1, 3]) = 2
        assert!((variance[1] - 12.0).abs() < 1e-12); // var([2, 2, 8]) = 12
        assert!(variance[2].is_nan()); // single element
        let stddev = out.column_by_name("s").unwrap().float64().unwrap();
        assert!((stddev[1] - 12.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn median_and_count_distinct() {
        let out = sample()
            .group_by(&["group"])
            .unwrap()
            .agg(&[
                col("score").median().alias("med"),
                col("score").count_distinct().alias("uniq"),
            ])
            .unwrap();
        assert_eq!(out.column_by_name("med").unwrap().float64().unwrap(), &[2.0, 2.0, 5.0]);
        assert_eq!(out.column_by_name("uniq").unwrap().uint32().unwrap(), &[2, 2, 1]);
    }

    #[test]
    fn multi_key_grouping() {
        let df = DataFrame::new(vec![
            Series::new_str("a", &["x", "x", "y", "x"]),
            Series::new_int64("b", vec![1, 1, 1, 2]),
            Series::new_int64("v", vec![10, 20, 30, 40]),
        ])
        .unwrap();
        let out = df.group_by(&["a", "b"]).unwrap().sum("v").unwrap();
        assert_eq!(out.height(), 3);
        assert_eq!(out.column_by_name("v_sum").unwrap().int64().unwrap(), &[30, 30, 40]);
    }

    #[test]
    fn categorical_and_string_keys_group_identically() {
        let strings = sample();
        let categorical = DataFrame::new(vec![
            Series::new_categorical("group", &["A", "A", "B", "B", "B", "C"]),
            Series::new_int64("value", vec![1, 2, 3, 4, 5, 6]),
        ])
        .unwrap();
        let by_string = strings.group_by(&["group"]).unwrap().sum("value").unwrap();
        let by_categorical = categorical.group_by(&["group"]).unwrap().sum("value").unwrap();
        assert_eq!(
            by_string.column_by_name("value_sum").unwrap().int64().unwrap(),
            by_categorical.column_by_name("value_sum").unwrap().int64().unwrap()
        );
        // key column values agree after decoding
        assert!(by_string
            .column_by_name("group")
            .unwrap()
            .equals(by_categorical.column_by_name("group").unwrap()));
    }

    #[test]
    fn null_values_are_skipped_null_keys_group_together() {
        let df = DataFrame::new(vec![
            Series::new_str("k", &["a", "b", "a", "b"]),
            Series::new_int64("v", vec![1, 2, 3, 4])
                .with_validity(Bitmap::from_bools(&[true, false, true, true]))
                .unwrap(),
        ])
        .unwrap();
        let out = df.group_by(&["k"]).unwrap().agg(&[col("v").sum(), col("v").count()]).unwrap();
        assert_eq!(out.column_by_name("v_sum").unwrap().int64().unwrap(), &[4, 4]);
        // count is group size, independent of validity
        assert_eq!(out.column_by_name("v_count").unwrap().uint32().unwrap(), &[2, 2]);
    }

    #[test]
    fn aggregating_a_string_column_numerically_is_a_type_error() {
        let result = sample().group_by(&["group"]).unwrap().sum("group");
        assert!(matches!(result, Err(StrataError::Type(_))));
    }

    #[test]
    fn non_aggregate_expressions_are_rejected() {
        let result = sample().group_by(&["group"]).unwrap().agg(&[col("value")]);
        assert!(matches!(result, Err(StrataError::Type(_))));
    }

    #[test]
    fn parallel_and_serial_leader_passes_agree() {
        // enough distinct keys and repeats to populate every partition
        let keys: Vec<i64> = (0..4000).map(|i| (i * 31) % 97).collect();
        let df = DataFrame::new(vec![Series::new_int64("k", keys)]).unwrap();
        let hashes = hash_keys(&df, &["k".to_string()]).unwrap();
        let column = df.column_by_name("k").unwrap();
        let same_key = |a: usize, b: usize| column.key_eq(a, column, b);
        assert_eq!(
            compute_leaders(&hashes, &same_key, false),
            compute_leaders(&hashes, &same_key, true)
        );
    }

    #[test]
    fn empty_frame_groups_to_zero_rows() {
        let df = DataFrame::new(vec![
            Series::new_str("k", &[]),
            Series::new_int64("v", vec![]),
        ])
        .unwrap();
        let out = df.group_by(&["k"]).unwrap().sum("v").unwrap();
        assert_eq!(out.height(), 0);
    }
}
