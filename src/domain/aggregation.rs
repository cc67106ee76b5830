//! Group-by and reduce helpers shared by every resource summary.
//!
//! All helpers return zero for empty input; averages never yield `NaN`.

use std::collections::BTreeMap;

/// Counts records per key.
pub fn count_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

/// Counts records satisfying a predicate.
pub fn count_where<T, F>(items: &[T], predicate: F) -> usize
where
    F: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(*item)).count()
}

/// Sums an optional numeric attribute; absent values count as zero.
pub fn sum_by<T, F>(items: &[T], value: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    items.iter().filter_map(value).sum()
}

/// Averages an optional numeric attribute over records that have it.
pub fn average_by<T, F>(items: &[T], value: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    let (sum, n) = items
        .iter()
        .filter_map(value)
        .fold((0.0, 0_u32), |(sum, n), v| (sum + v, n + 1));

    if n == 0 { 0.0 } else { sum / f64::from(n) }
}

/// Counts for a fixed list of labels, keeping zero entries and label order.
///
/// Keys are compared case-insensitively; records whose key matches none of
/// the labels are ignored.
pub fn count_labels<T, F>(items: &[T], labels: &[&str], key: F) -> Vec<(String, usize)>
where
    F: Fn(&T) -> Option<String>,
{
    let counts = count_by(items, |item| key(item).map(|k| k.to_lowercase()));
    labels
        .iter()
        .map(|label| {
            let n = counts
                .get(&Some(label.to_lowercase()))
                .copied()
                .unwrap_or(0);
            ((*label).to_string(), n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        kind: &'static str,
        amount: Option<f64>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                kind: "VIP",
                amount: Some(40.0),
            },
            Row {
                kind: "Standard",
                amount: Some(30.0),
            },
            Row {
                kind: "VIP",
                amount: None,
            },
        ]
    }

    #[test]
    fn test_count_by() {
        let counts = count_by(&rows(), |r| r.kind);
        assert_eq!(counts.get("VIP"), Some(&2));
        assert_eq!(counts.get("Standard"), Some(&1));
    }

    #[test]
    fn test_sum_and_average_skip_absent_values() {
        assert_eq!(sum_by(&rows(), |r| r.amount), 70.0);
        assert_eq!(average_by(&rows(), |r| r.amount), 35.0);
    }

    #[test]
    fn test_empty_input_is_zero() {
        let empty: Vec<Row> = Vec::new();

        assert!(count_by(&empty, |r| r.kind).is_empty());
        assert_eq!(count_where(&empty, |_| true), 0);
        assert_eq!(sum_by(&empty, |r| r.amount), 0.0);

        let avg = average_by(&empty, |r| r.amount);
        assert_eq!(avg, 0.0);
        assert!(!avg.is_nan());
    }

    #[test]
    fn test_count_labels_keeps_zero_entries() {
        let counts = count_labels(&rows(), &["Standard", "VIP", "Minibus"], |r| {
            Some(r.kind.to_string())
        });
        assert_eq!(
            counts,
            vec![
                ("Standard".to_string(), 1),
                ("VIP".to_string(), 2),
                ("Minibus".to_string(), 0)
            ]
        );
    }
}
