//! Property tests for the quantified invariants: filter soundness and row
//! integrity, sort and gather laws, join key equality and completeness,
//! and grouped-sum correctness against a serial reference.

use proptest::prelude::*;
use std::collections::HashMap;
use strata::kernels::sort::{argsort, sort_values};
use strata::prelude::*;

proptest! {
    #[test]
    fn filter_keeps_exactly_the_matching_rows(
        values in prop::collection::vec(-50i64..50, 0..200),
        threshold in -50i64..50,
    ) {
        let tags: Vec<String> = (0..values.len()).map(|i| format!("r{i}")).collect();
        let tag_refs: Vec<&str> = tags.iter().map(|s| s.as_str()).collect();
        let df = DataFrame::new(vec![
            Series::new_int64("x", values.clone()),
            Series::new_str("tag", &tag_refs),
        ]).unwrap();

        let filtered = df.filter(&col("x").gt(lit(threshold))).unwrap();

        // soundness: every surviving row satisfies the predicate, and the
        // count matches the reference count
        let kept = filtered.column_by_name("x").unwrap().int64().unwrap().to_vec();
        prop_assert!(kept.iter().all(|&v| v > threshold));
        prop_assert_eq!(kept.len(), values.iter().filter(|&&v| v > threshold).count());

        // row integrity: the tag column still points at the same source row
        let kept_tags = filtered.column_by_name("tag").unwrap().strings().unwrap().to_vec();
        for (value, tag) in kept.iter().zip(&kept_tags) {
            let source_row: usize = tag[1..].parse().unwrap();
            prop_assert_eq!(values[source_row], *value);
        }
    }

    #[test]
    fn argsort_orders_and_sort_agrees_with_std(values in prop::collection::vec(-1000i64..1000, 0..300)) {
        let order = argsort(&values, true);
        for pair in order.windows(2) {
            prop_assert!(values[pair[0] as usize] <= values[pair[1] as usize]);
        }
        // gather round-trip: gathering through argsort equals direct sort
        let gathered: Vec<i64> = order.iter().map(|&i| values[i as usize]).collect();
        prop_assert_eq!(&gathered, &sort_values(&values, true));
        let mut std_sorted = values.clone();
        std_sorted.sort();
        prop_assert_eq!(gathered, std_sorted);
    }

    #[test]
    fn series_sort_round_trip_via_take(values in prop::collection::vec(-1000i64..1000, 0..300)) {
        let series = Series::new_int64("v", values.clone());
        let sorted = series.sort(true).unwrap();
        let mut expected = values;
        expected.sort();
        prop_assert_eq!(sorted.int64().unwrap(), &expected[..]);
    }

    #[test]
    fn inner_join_is_complete_and_key_equal(
        left_keys in prop::collection::vec(0i64..10, 0..40),
        right_keys in prop::collection::vec(0i64..10, 0..40),
    ) {
        let left = DataFrame::new(vec![
            Series::new_int64("k", left_keys.clone()),
            Series::new_int64("li", (0..left_keys.len() as i64).collect()),
        ]).unwrap();
        let right = DataFrame::new(vec![
            Series::new_int64("k", right_keys.clone()),
            Series::new_int64("ri", (0..right_keys.len() as i64).collect()),
        ]).unwrap();

        let joined = left.inner_join(&right, &JoinSpec::on(&["k"])).unwrap();
        let out_left = joined.column_by_name("li").unwrap().int64().unwrap().to_vec();
        let out_right = joined.column_by_name("ri").unwrap().int64().unwrap().to_vec();

        // key equality for every emitted pair
        for (&li, &ri) in out_left.iter().zip(&out_right) {
            prop_assert_eq!(left_keys[li as usize], right_keys[ri as usize]);
        }
        // completeness: all and only the nested-loop pairs, in order
        let mut expected: Vec<(i64, i64)> = Vec::new();
        for (li, lk) in left_keys.iter().enumerate() {
            for (ri, rk) in right_keys.iter().enumerate() {
                if lk == rk {
                    expected.push((li as i64, ri as i64));
                }
            }
        }
        let emitted: Vec<(i64, i64)> = out_left.into_iter().zip(out_right).collect();
        prop_assert_eq!(emitted, expected);
    }

    #[test]
    fn left_join_preserves_every_left_row(
        left_keys in prop::collection::vec(0i64..8, 1..30),
        right_keys in prop::collection::vec(0i64..8, 0..30),
    ) {
        let left = DataFrame::new(vec![Series::new_int64("k", left_keys.clone())]).unwrap();
        let right = DataFrame::new(vec![
            Series::new_int64("k", right_keys.clone()),
            Series::new_int64("v", (0..right_keys.len() as i64).collect()),
        ]).unwrap();
        let joined = left.left_join(&right, &JoinSpec::on(&["k"])).unwrap();

        // every left key appears at least once
        let out_keys = joined.column_by_name("k").unwrap().int64().unwrap();
        for key in &left_keys {
            prop_assert!(out_keys.contains(key));
        }
        // unmatched left rows carry null right fields
        let v = joined.column_by_name("v").unwrap();
        let unmatched = left_keys.iter().filter(|k| !right_keys.contains(k)).count();
        prop_assert_eq!(v.null_count(), unmatched);
    }

    #[test]
    fn cross_join_cardinality(left_rows in 0usize..20, right_rows in 0usize..20) {
        let left = DataFrame::new(vec![Series::new_int64("a", (0..left_rows as i64).collect())]).unwrap();
        let right = DataFrame::new(vec![Series::new_int64("b", (0..right_rows as i64).collect())]).unwrap();
        let product = left.cross_join(&right).unwrap();
        prop_assert_eq!(product.height(), left_rows * right_rows);
    }

    #[test]
    fn grouped_sum_matches_a_serial_reference(
        rows in prop::collection::vec((0i64..6, -100i64..100), 0..200),
    ) {
        let keys: Vec<i64> = rows.iter().map(|(k, _)| *k).collect();
        let values: Vec<i64> = rows.iter().map(|(_, v)| *v).collect();
        let df = DataFrame::new(vec![
            Series::new_int64("k", keys.clone()),
            Series::new_int64("v", values.clone()),
        ]).unwrap();
        let out = df.group_by(&["k"]).unwrap().sum("v").unwrap();

        let mut reference: HashMap<i64, i64> = HashMap::new();
        for (k, v) in keys.iter().zip(&values) {
            *reference.entry(*k).or_default() += v;
        }
        let out_keys = out.column_by_name("k").unwrap().int64().unwrap();
        let out_sums = out.column_by_name("v_sum").unwrap().int64().unwrap();
        prop_assert_eq!(out_keys.len(), reference.len());
        for (k, s) in out_keys.iter().zip(out_sums) {
            prop_assert_eq!(reference[k], *s);
        }
    }

    #[test]
    fn mask_and_indices_paths_agree(mask_bits in prop::collection::vec(any::<bool>(), 0..200)) {
        let values: Vec<i64> = (0..mask_bits.len() as i64).collect();
        let df = DataFrame::new(vec![Series::new_int64("v", values)]).unwrap();
        let mask: Vec<u8> = mask_bits.iter().map(|&b| b as u8).collect();
        let indices: Vec<u32> = mask_bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| i as u32)
            .collect();
        let by_mask = df.filter_by_mask(&mask).unwrap();
        let by_indices = df.filter_by_indices(&indices).unwrap();
        prop_assert!(by_mask.equals(&by_indices));
    }
}
