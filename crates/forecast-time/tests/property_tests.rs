//! Property-based tests for coordinate construction, best-axis derivation
//! and partition merging.

mod common;

use std::collections::BTreeSet;

use common::point_builder;
use forecast_time::{ForecastRecord, LocalValue, Time2DCoordinate, TimeAxis};
use proptest::prelude::*;
use test_utils::run_time;

/// Records from up to eight 6-hourly runs with leads up to two days.
fn records_strategy() -> impl Strategy<Value = Vec<ForecastRecord>> {
    prop::collection::vec((0i64..8, 0i32..=48), 1..60).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(run, lead)| ForecastRecord::point(run_time(run * 6), lead))
            .collect()
    })
}

fn build(records: &[ForecastRecord]) -> Time2DCoordinate {
    let mut builder = point_builder();
    builder.add_records(records).unwrap();
    builder.finalize().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_runtimes_ascending_and_first_alignment_zero(records in records_strategy()) {
        let coord = build(&records);
        let dates = coord.runtime_axis().dates();
        prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(coord.alignments()[0], 0);
        for (date, &shift) in dates.iter().zip(coord.alignments()) {
            prop_assert_eq!(i64::from(shift), (*date - dates[0]).num_hours());
        }
    }

    #[test]
    fn prop_org_value_index_round_trip(records in records_strategy()) {
        let coord = build(&records);
        for run_idx in 0..coord.n_runs() {
            for time_idx in 0..coord.n_times() {
                if let Some(value) = coord.org_value_at(run_idx, time_idx).unwrap() {
                    prop_assert_eq!(coord.index_of(&value).unwrap(), (run_idx, Some(time_idx)));
                }
            }
        }
    }

    #[test]
    fn prop_best_axis_bounds(records in records_strategy()) {
        let coord = build(&records);
        let best: Vec<LocalValue> = coord.best_axis().iter().collect();
        prop_assert!(best.windows(2).all(|w| w[0] < w[1]));

        let sum: usize = coord.times().iter().map(TimeAxis::size).sum();
        let max = coord.times().iter().map(TimeAxis::size).max().unwrap_or(0);
        prop_assert!(best.len() <= sum);
        prop_assert!(best.len() >= max);
    }

    #[test]
    fn prop_attribution_picks_latest_contributor(records in records_strategy()) {
        let coord = build(&records);
        let best = coord.best_axis();
        let map = coord.attribute_best_axis(&best, None).unwrap();
        prop_assert_eq!(map.len(), best.size());
        prop_assert_eq!(map.missing_count(), 0);

        for (slot, value) in best.iter().enumerate() {
            let entry = map.entries()[slot];
            prop_assert!((1..=coord.n_runs()).contains(&entry));

            let latest = coord
                .times()
                .iter()
                .zip(coord.alignments())
                .enumerate()
                .filter(|(_, (time, shift))| {
                    time.iter().any(|local| local.shift(**shift).ok() == Some(value))
                })
                .map(|(run_idx, _)| run_idx)
                .max();
            prop_assert_eq!(map.run_for_slot(slot), latest);
        }
    }

    #[test]
    fn prop_arrival_order_irrelevant(records in records_strategy()) {
        let mut reversed = records.clone();
        reversed.reverse();
        prop_assert_eq!(build(&records), build(&reversed));
    }

    #[test]
    fn prop_merge_is_union(records in records_strategy(), split in 0usize..60) {
        let split = split.clamp(1, records.len());
        prop_assume!(split < records.len());
        let (left, right) = records.split_at(split);

        let a = build(left);
        let b = build(right);
        let mut builder = point_builder();
        builder.merge_from(&a).unwrap().merge_from(&b).unwrap();
        let merged = builder.finalize().unwrap();

        let expected: BTreeSet<_> = a.values().iter().chain(b.values()).copied().collect();
        let actual: BTreeSet<_> = merged.values().iter().copied().collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(merged, build(&records));
    }
}
