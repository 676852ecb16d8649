//! Exact per-owner bucket sums
//!
//! Row values arrive already rounded to [`Amount`] precision, group sums are
//! exact decimal additions, and `Total` is the sum of the seven group sums.
//! Pivot rows come out in ascending owner order.

use crate::config::{BUCKETS, TOTAL_COLUMN};
use crate::core::amount::Amount;
use crate::error::{ArError, ArResult};
use crate::types::{PivotRow, ResolvedRow};
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulates bucket sums per owner
#[derive(Debug, Default)]
pub struct DecimalAggregator {
    groups: BTreeMap<String, [Amount; 7]>,
}

impl DecimalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row into its owner's sums; the group is left unchanged on overflow
    pub fn add(&mut self, resolved: &ResolvedRow) -> ArResult<()> {
        let sums = self
            .groups
            .entry(resolved.owner.clone())
            .or_insert_with(|| std::array::from_fn(|_| Amount::zero()));

        let mut updated = *sums;
        for (b, (sum, value)) in updated
            .iter_mut()
            .zip(resolved.row.buckets.iter())
            .enumerate()
        {
            *sum = sum
                .checked_add(*value)
                .ok_or_else(|| overflow(&resolved.owner, BUCKETS[b]))?;
        }

        *sums = updated;
        Ok(())
    }

    /// One pivot row per owner, ascending by owner
    pub fn finish(self) -> ArResult<Vec<PivotRow>> {
        let pivot = self
            .groups
            .into_iter()
            .map(|(owner, buckets)| {
                let total =
                    Amount::checked_sum(&buckets).ok_or_else(|| overflow(&owner, TOTAL_COLUMN))?;
                Ok(PivotRow {
                    total,
                    owner,
                    buckets,
                })
            })
            .collect::<ArResult<Vec<PivotRow>>>()?;

        debug!(owners = pivot.len(), "pivot aggregated");
        Ok(pivot)
    }
}

fn overflow(owner: &str, bucket: &str) -> ArError {
    ArError::AmountOverflow {
        owner: owner.to_string(),
        bucket: bucket.to_string(),
    }
}

/// Group `rows` by owner and sum every bucket
pub fn aggregate(rows: &[ResolvedRow]) -> ArResult<Vec<PivotRow>> {
    let mut aggregator = DecimalAggregator::new();
    for row in rows {
        aggregator.add(row)?;
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amount::NumberParser;
    use crate::types::{Cell, LedgerRow};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn resolved(owner: &str, values: [f64; 7]) -> ResolvedRow {
        let parser = NumberParser::new().unwrap();
        ResolvedRow {
            row: LedgerRow {
                index: 0,
                customer_id: "C1".to_string(),
                company: "Acme".to_string(),
                buckets: std::array::from_fn(|b| {
                    Amount::from_cell(&Cell::Number(values[b]), &parser)
                }),
            },
            owner: owner.to_string(),
        }
    }

    fn current(owner: &str, value: f64) -> ResolvedRow {
        resolved(owner, [value, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_current_sums_without_drift() {
        let pivot = aggregate(&[
            current("Smith", 0.1),
            current("Smith", 0.2),
            current("Smith", 0.3),
        ])
        .unwrap();
        assert_eq!(pivot.len(), 1);
        assert_eq!(pivot[0].buckets[0].value(), dec!(0.6));
        assert_eq!(pivot[0].buckets[0].to_string(), "0.60000");
        assert_eq!(pivot[0].total.to_string(), "0.60000");
    }

    #[test]
    fn test_values_rounded_before_summation() {
        // Each 10.000005 rounds to 10.00001 first: 3 x 10.00001 = 30.00003,
        // not round(30.000015) = 30.00002
        let pivot = aggregate(&[
            current("Smith", 10.000005),
            current("Smith", 10.000005),
            current("Smith", 10.000005),
        ])
        .unwrap();
        assert_eq!(pivot[0].buckets[0].value(), dec!(30.00003));
    }

    #[test]
    fn test_total_is_sum_of_bucket_sums() {
        let pivot = aggregate(&[
            resolved("Lee", [1.1, 2.2, 3.3, 4.4, 5.5, 6.6, 7.7]),
            resolved("Lee", [0.000004, 0.000006, 0.0, 0.0, 0.0, 0.0, -1.0]),
        ])
        .unwrap();
        let row = &pivot[0];
        let by_hand = Amount::checked_sum(&row.buckets).unwrap();
        assert_eq!(row.total, by_hand);
        assert_eq!(row.buckets[0].value(), dec!(1.1));
        assert_eq!(row.buckets[1].value(), dec!(2.20001));
        assert_eq!(row.buckets[6].value(), dec!(6.7));
        assert_eq!(row.total.value(), dec!(29.80001));
    }

    #[test]
    fn test_groups_sorted_by_owner_including_sentinel() {
        let pivot = aggregate(&[
            current("Unassigned", 5.0),
            current("Jones", 1.0),
            current("Smith", 2.0),
            current("Jones", 3.0),
        ])
        .unwrap();
        let owners: Vec<&str> = pivot.iter().map(|p| p.owner.as_str()).collect();
        assert_eq!(owners, vec!["Jones", "Smith", "Unassigned"]);
        assert_eq!(pivot[0].buckets[0].value(), dec!(4));
        assert_eq!(pivot[2].total.value(), dec!(5));
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let rows = vec![
            resolved("B", [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]),
            resolved("A", [1.0; 7]),
            resolved("B", [0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1]),
        ];
        assert_eq!(aggregate(&rows).unwrap(), aggregate(&rows).unwrap());
    }

    #[test]
    fn test_empty_input_yields_no_rows() {
        assert!(aggregate(&[]).unwrap().is_empty());
    }

    fn with_current(owner: &str, value: Decimal) -> ResolvedRow {
        let mut row = current(owner, 0.0);
        row.row.buckets[0] = Amount::new(value);
        row
    }

    #[test]
    fn test_bucket_overflow_names_owner_and_bucket() {
        let half = Decimal::MAX / dec!(2);
        let result = aggregate(&[with_current("Smith", half), with_current("Smith", half)]);

        match result {
            Err(ArError::AmountOverflow { owner, bucket }) => {
                assert_eq!(owner, "Smith");
                assert_eq!(bucket, "Current");
            }
            other => panic!("Expected AmountOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_total_overflow_reported_on_total_column() {
        let half = Decimal::MAX / dec!(2);
        let mut row = with_current("Lee", half);
        row.row.buckets[6] = Amount::new(half);

        match aggregate(&[row]) {
            Err(ArError::AmountOverflow { owner, bucket }) => {
                assert_eq!(owner, "Lee");
                assert_eq!(bucket, "Total");
            }
            other => panic!("Expected AmountOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_row_leaves_group_unchanged() {
        let half = Decimal::MAX / dec!(2);
        let mut aggregator = DecimalAggregator::new();
        aggregator.add(&with_current("Smith", half)).unwrap();
        assert!(aggregator.add(&with_current("Smith", half)).is_err());

        let pivot = aggregator.finish().unwrap();
        assert_eq!(pivot[0].buckets[0], Amount::new(half));
    }
}
