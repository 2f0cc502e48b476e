//! Shared descriptive-statistics helpers
//!
//! All helpers return `None` instead of a number when there is nothing to
//! measure, so callers can omit a figure rather than report a fake zero.

/// Extension trait for tracking minimum and maximum values in `Option<f64>`.
///
/// # Example
///
/// ```
/// use typing_log_analyzer::utils::MinMaxExt;
///
/// let mut min: Option<f64> = None;
/// let mut max: Option<f64> = None;
///
/// for v in [50.0, 30.0, 70.0] {
///     min.update_min(v);
///     max.update_max(v);
/// }
/// assert_eq!(min, Some(30.0));
/// assert_eq!(max, Some(70.0));
/// ```
pub trait MinMaxExt {
    /// Stores `value` if it is smaller than the current minimum or if no
    /// minimum exists yet.
    fn update_min(&mut self, value: f64);

    /// Stores `value` if it is larger than the current maximum or if no
    /// maximum exists yet.
    fn update_max(&mut self, value: f64);
}

impl MinMaxExt for Option<f64> {
    fn update_min(&mut self, value: f64) {
        *self = Some(self.map(|m| m.min(value)).unwrap_or(value));
    }

    fn update_max(&mut self, value: f64) {
        *self = Some(self.map(|m| m.max(value)).unwrap_or(value));
    }
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median; the average of the two middle values for even-length input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// `part / whole * 100`, or `None` for an empty whole.
pub fn percent(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some(part as f64 / whole as f64 * 100.0)
}

/// Running tally of a boolean column: how many values were present and how
/// many of them were `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub hits: usize,
    pub total: usize,
}

impl Tally {
    pub fn add(&mut self, value: Option<bool>) {
        if let Some(v) = value {
            self.total += 1;
            if v {
                self.hits += 1;
            }
        }
    }

    pub fn rate_pct(&self) -> Option<f64> {
        percent(self.hits, self.total)
    }
}

impl FromIterator<Option<bool>> for Tally {
    fn from_iter<I: IntoIterator<Item = Option<bool>>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for value in iter {
            tally.add(value);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_min_from_none() {
        let mut min: Option<f64> = None;
        min.update_min(100.0);
        assert_eq!(min, Some(100.0));
    }

    #[test]
    fn update_max_keeps_larger() {
        let mut max: Option<f64> = Some(200.0);
        max.update_max(100.0);
        assert_eq!(max, Some(200.0));
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[10.0, 20.0, 30.0]), Some(20.0));
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn std_dev_uses_sample_denominator() {
        // mean 5, squared deviations sum 32, n - 1 = 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let sd = std_dev(&values).unwrap();
        assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn std_dev_needs_two_values() {
        assert_eq!(std_dev(&[5.0]), None);
    }

    #[test]
    fn percent_of_zero_whole_is_none() {
        assert_eq!(percent(0, 0), None);
        assert_eq!(percent(1, 4), Some(25.0));
    }

    #[test]
    fn tally_ignores_missing_values() {
        let tally: Tally = [Some(true), None, Some(false), Some(true)].into_iter().collect();
        assert_eq!(tally, Tally { hits: 2, total: 3 });
        let rate = tally.rate_pct().unwrap();
        assert!((rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn empty_tally_has_no_rate() {
        assert_eq!(Tally::default().rate_pct(), None);
    }
}
