use crate::UnderperformerRecord;

/// Number of ranked underperformers surfaced by default.
pub const DEFAULT_TOP_N: usize = 10;

/// Rank underperformers by ascending percent change and keep the first `n`.
///
/// The most negative deviation surfaces first. The sort is stable, so
/// records with equal percent change keep their relative order from the
/// pipeline, which is watchlist input order.
pub fn rank(mut candidates: Vec<UnderperformerRecord>, n: usize) -> Vec<UnderperformerRecord> {
    candidates.sort_by(|a, b| a.percent_change.total_cmp(&b.percent_change));
    candidates.truncate(n);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    fn candidate(ticker: &str, percent_change: f64) -> UnderperformerRecord {
        UnderperformerRecord {
            symbol: Symbol::qualify(ticker),
            price: 100.0,
            percent_change,
        }
    }

    #[test]
    fn sorts_ascending_most_negative_first() {
        let ranked = rank(
            vec![candidate("A", -3.0), candidate("B", -10.0), candidate("C", -1.0)],
            DEFAULT_TOP_N,
        );

        let changes: Vec<f64> = ranked.iter().map(|r| r.percent_change).collect();
        assert_eq!(changes, vec![-10.0, -3.0, -1.0]);
    }

    #[test]
    fn truncates_to_n_most_negative() {
        let candidates: Vec<_> = (1..=15)
            .map(|i| candidate(&format!("ETF{i}"), -f64::from(i)))
            .collect();

        let ranked = rank(candidates, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), DEFAULT_TOP_N);

        let changes: Vec<f64> = ranked.iter().map(|r| r.percent_change).collect();
        let expected: Vec<f64> = (6..=15).rev().map(|i| -f64::from(i)).collect();
        assert_eq!(changes, expected);
    }

    #[test]
    fn shorter_input_is_returned_whole() {
        let ranked = rank(vec![candidate("A", -2.0)], DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn ties_preserve_input_order() {
        let ranked = rank(
            vec![candidate("FIRST", -2.0), candidate("SECOND", -2.0)],
            DEFAULT_TOP_N,
        );

        assert_eq!(ranked[0].symbol.as_str(), "FIRST.NS");
        assert_eq!(ranked[1].symbol.as_str(), "SECOND.NS");
    }
}
