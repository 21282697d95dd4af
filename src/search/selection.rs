//! Weighted random selection (Luce's choice rule with distance weighting)
//!
//! Each candidate owns a contiguous slice of [0, 1) proportional to its
//! selection mass (priority × distance weight). A single uniform draw picks
//! the candidate whose slice contains it.

/// Partition [0, 1) in candidate order, proportional to `masses`
///
/// Negative or non-finite masses count as zero. Returns `None` when the
/// total mass is zero, in which case nothing can be selected. The last
/// candidate with positive mass always closes at exactly 1.0.
pub fn assign_subranges(masses: &[f64]) -> Option<Vec<(f64, f64)>> {
    let clean: Vec<f64> = masses
        .iter()
        .map(|&m| if m.is_finite() && m > 0.0 { m } else { 0.0 })
        .collect();
    let total: f64 = clean.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let mut ranges = Vec::with_capacity(clean.len());
    let mut bottom = 0.0;
    for mass in &clean {
        let top = bottom + mass / total;
        ranges.push((bottom, top));
        bottom = top;
    }

    // absorb rounding drift into the last candidate that can be chosen
    if let Some(last) = clean.iter().rposition(|&m| m > 0.0) {
        ranges[last].1 = 1.0;
        for range in ranges.iter_mut().skip(last + 1) {
            *range = (1.0, 1.0);
        }
    }

    Some(ranges)
}

/// Index of the subrange containing `draw` (half-open on the right)
pub fn pick(subranges: &[(f64, f64)], draw: f64) -> Option<usize> {
    subranges
        .iter()
        .position(|&(bottom, top)| draw >= bottom && draw < top)
}

/// Convenience: partition and pick in one go
pub fn choose(masses: &[f64], draw: f64) -> Option<usize> {
    assign_subranges(masses).and_then(|ranges| pick(&ranges, draw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_lands_in_proportional_slice() {
        let masses = [0.2, 0.8];
        assert_eq!(choose(&masses, 0.5), Some(1));
        assert_eq!(choose(&masses, 0.1), Some(0));
        assert_eq!(choose(&masses, 0.0), Some(0));
        assert_eq!(choose(&masses, 0.999_999), Some(1));
    }

    #[test]
    fn test_zero_total_selects_nothing() {
        assert!(assign_subranges(&[0.0, 0.0]).is_none());
        assert!(assign_subranges(&[]).is_none());
        assert_eq!(choose(&[0.0, -1.0], 0.3), None);
    }

    #[test]
    fn test_negative_mass_gets_empty_slice() {
        let ranges = assign_subranges(&[-2.0, 1.0, 1.0]).unwrap();
        assert_eq!(ranges[0], (0.0, 0.0));
        assert_eq!(ranges[1], (0.0, 0.5));
        assert_eq!(ranges[2], (0.5, 1.0));
    }

    #[test]
    fn test_trailing_zero_mass_never_chosen() {
        let ranges = assign_subranges(&[1.0, 0.0]).unwrap();
        assert_eq!(ranges[0], (0.0, 1.0));
        assert_eq!(ranges[1], (1.0, 1.0));
        assert_eq!(pick(&ranges, 0.999), Some(0));
    }

    #[test]
    fn test_contiguous_and_closed() {
        let ranges = assign_subranges(&[0.1, 0.3, 0.7, 0.05, 1.3]).unwrap();
        assert_eq!(ranges[0].0, 0.0);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
            assert!(pair[0].0 <= pair[0].1);
        }
        assert_eq!(ranges.last().unwrap().1, 1.0);
    }
}
