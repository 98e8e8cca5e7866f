//! Picking the most recent entry out of unordered dated samples

/// Return the item with the greatest key among those accepted by `valid`.
///
/// Input order does not matter. On equal keys the earliest item in the slice
/// wins.
pub fn latest_by<T, K, F, P>(items: &[T], key: F, valid: P) -> Option<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| valid(item)).fold(None, |best, item| match best {
        Some(current) if key(current) >= key(item) => Some(current),
        _ => Some(item),
    })
}

/// [`latest_by`] without a validity filter
pub fn latest<T, K, F>(items: &[T], key: F) -> Option<&T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    latest_by(items, key, |_| true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use node_api::models::StorageDaily;

    fn day(d: u32, hours: i64, bytes: f64) -> StorageDaily {
        StorageDaily {
            at_rest_total: bytes * 24.0,
            at_rest_total_bytes: bytes,
            interval_in_hours: hours,
            interval_start: Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap(),
        }
    }

    fn start(s: &StorageDaily) -> DateTime<Utc> {
        s.interval_start
    }

    fn positive(s: &StorageDaily) -> bool {
        s.interval_in_hours > 0
    }

    #[test]
    fn test_latest_independent_of_order() {
        let forward = vec![day(1, 24, 1.0), day(2, 24, 2.0), day(3, 24, 3.0)];
        let shuffled = vec![day(2, 24, 2.0), day(3, 24, 3.0), day(1, 24, 1.0)];
        let reversed: Vec<_> = forward.iter().rev().copied().collect();

        for items in [&forward, &shuffled, &reversed] {
            let newest = latest_by(items, start, positive).unwrap();
            assert_eq!(newest.at_rest_total_bytes, 3.0);
        }
    }

    #[test]
    fn test_invalid_latest_never_selected() {
        let items = vec![day(1, 24, 1.0), day(5, 0, 5.0), day(4, -3, 4.0), day(2, 24, 2.0)];
        let newest = latest_by(&items, start, positive).unwrap();
        assert_eq!(newest.at_rest_total_bytes, 2.0);
    }

    #[test]
    fn test_no_valid_items() {
        let items = vec![day(1, 0, 1.0)];
        assert!(latest_by(&items, start, positive).is_none());
        assert!(latest::<StorageDaily, _, _>(&[], start).is_none());
    }

    #[test]
    fn test_tie_keeps_first() {
        let items = vec![day(3, 24, 1.0), day(3, 24, 2.0)];
        assert_eq!(latest(&items, start).unwrap().at_rest_total_bytes, 1.0);
    }
}
