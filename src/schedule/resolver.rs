use crate::errors::{Result, YieldError};
use crate::types::{Timestamp, YieldRate};

/// Inclusive `(start, end)` indices of the schedule entries whose windows
/// overlap `[from, to)`.
///
/// Walks the schedule from the newest entry backward, so lookups near the end
/// of a long schedule stay short. Entries starting at or after `to` are
/// skipped; the first one starting before `to` is `end`; the first one
/// starting at or before `from` is `start`.
pub fn resolve_rate_range(
    rates: &[YieldRate],
    from: Timestamp,
    to: Timestamp,
) -> Result<(usize, usize)> {
    if rates.is_empty() {
        return Err(YieldError::EmptyRateSchedule);
    }
    if from >= to {
        return Err(YieldError::InvalidTimeRange { from, to });
    }

    let mut end = None;
    let mut start = 0;

    for (i, rate) in rates.iter().enumerate().rev() {
        let window_start = rate.effective_from();
        if window_start >= to {
            continue;
        }
        if end.is_none() {
            end = Some(i);
        }
        if window_start <= from {
            start = i;
            break;
        }
    }

    let end = end.ok_or_else(|| YieldError::InvalidScheduleOrdering {
        message: format!("no rate in effect before {}", to),
    })?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Rate, SECONDS_PER_DAY};
    use crate::types::RateTier;

    const DAY: u64 = SECONDS_PER_DAY;

    fn schedule(days: &[u64]) -> Vec<YieldRate> {
        days.iter()
            .map(|d| YieldRate::new(*d, vec![RateTier::unbounded(Rate::from_bps(1))]))
            .collect()
    }

    #[test]
    fn test_single_entry_always_resolves_to_itself() {
        let rates = schedule(&[0]);
        assert_eq!(resolve_rate_range(&rates, 0, 1).unwrap(), (0, 0));
        assert_eq!(resolve_rate_range(&rates, 5 * DAY + 7, 900 * DAY).unwrap(), (0, 0));
    }

    #[test]
    fn test_interval_inside_one_entry() {
        let rates = schedule(&[0, 10, 20]);
        assert_eq!(resolve_rate_range(&rates, 11 * DAY, 15 * DAY).unwrap(), (1, 1));
        assert_eq!(resolve_rate_range(&rates, 25 * DAY, 30 * DAY).unwrap(), (2, 2));
    }

    #[test]
    fn test_interval_spanning_entries() {
        let rates = schedule(&[0, 10, 20, 30]);
        assert_eq!(resolve_rate_range(&rates, 5 * DAY, 25 * DAY).unwrap(), (0, 2));
        assert_eq!(resolve_rate_range(&rates, 15 * DAY, 40 * DAY).unwrap(), (1, 3));
    }

    #[test]
    fn test_boundaries_are_half_open() {
        let rates = schedule(&[0, 10, 20]);
        // ends exactly where entry 1 starts: entry 1 not touched
        assert_eq!(resolve_rate_range(&rates, 5 * DAY, 10 * DAY).unwrap(), (0, 0));
        // starts exactly where entry 1 starts: entry 0 not touched
        assert_eq!(resolve_rate_range(&rates, 10 * DAY, 12 * DAY).unwrap(), (1, 1));
    }

    #[test]
    fn test_future_entries_skipped() {
        let rates = schedule(&[0, 100]);
        assert_eq!(resolve_rate_range(&rates, DAY, 2 * DAY).unwrap(), (0, 0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(resolve_rate_range(&[], 0, 1).unwrap_err(), YieldError::EmptyRateSchedule);

        let rates = schedule(&[0]);
        assert_eq!(
            resolve_rate_range(&rates, 5, 5).unwrap_err(),
            YieldError::InvalidTimeRange { from: 5, to: 5 }
        );
        assert!(resolve_rate_range(&rates, 6, 5).is_err());

        let late = schedule(&[10]);
        assert!(matches!(
            resolve_rate_range(&late, 0, DAY).unwrap_err(),
            YieldError::InvalidScheduleOrdering { .. }
        ));
    }
}
