// Quality scoring of tailored output against the job description and the
// retrieval evidence. Pure functions; a report is always produced.

pub mod coverage;
pub mod readability;
pub mod scorer;

pub use coverage::score_retrieval_coverage;
pub use scorer::evaluate;

/// Rounds half-to-even at `decimals` places so reported scores are stable.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(4.0 / 7.0, 3), 0.571);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(0.0, 3), 0.0);
    }
}
