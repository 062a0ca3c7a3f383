use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{SupplierId, SupplierQuote, SupplierStats};
use super::repository::{QuoteLedger, RepositoryError, StatsRepository};

/// Recomputes a supplier's stats row from the full ledger on every new quote.
///
/// The replay is O(n) in the supplier's history; the stored row is only a cache of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsTracker;

impl StatisticsTracker {
    pub fn refresh<L, S>(
        &self,
        ledger: &L,
        stats: &S,
        supplier_id: &SupplierId,
        now: DateTime<Utc>,
    ) -> Result<SupplierStats, RepositoryError>
    where
        L: QuoteLedger + ?Sized,
        S: StatsRepository + ?Sized,
    {
        let history = ledger.for_supplier(supplier_id)?;
        let computed =
            compute_stats(supplier_id, &history, now).ok_or(RepositoryError::NotFound)?;

        debug!(
            supplier_id = %supplier_id,
            quotes = computed.quote_sample_size,
            median = computed.median_total_amount,
            drift_pct = computed.price_change_pct_vs_last,
            "supplier stats recomputed"
        );

        stats.upsert(computed.clone())?;
        Ok(computed)
    }
}

/// Build the stats row from quotes ordered newest first. `None` when there is no history.
pub fn compute_stats(
    supplier_id: &SupplierId,
    newest_first: &[SupplierQuote],
    now: DateTime<Utc>,
) -> Option<SupplierStats> {
    let latest = newest_first.first()?;

    let mut totals: Vec<f64> = newest_first.iter().map(|quote| quote.total_amount).collect();
    totals.sort_by(f64::total_cmp);

    let min_total_amount = *totals.first()?;
    let max_total_amount = *totals.last()?;
    let median_total_amount = median(&totals)?;

    let price_change_pct_vs_last = newest_first
        .get(1)
        .map(|previous| percent_change(previous.total_amount, latest.total_amount))
        .unwrap_or(0.0);

    Some(SupplierStats {
        supplier_id: supplier_id.clone(),
        last_total_amount: latest.total_amount,
        median_total_amount,
        min_total_amount,
        max_total_amount,
        last_quote_date: latest
            .quote_date
            .or_else(|| Some(latest.recorded_at.date_naive())),
        price_change_pct_vs_last,
        quote_sample_size: newest_first.len() as u32,
        computed_at: now,
    })
}

/// Median of an ascending slice; the mean of the two central values for even lengths.
pub fn median(sorted: &[f64]) -> Option<f64> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }

    let mid = len / 2;
    if len % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Percent change from `previous` to `latest`, unrounded. Zero when `previous` is zero.
pub fn percent_change(previous: f64, latest: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }

    (latest - previous) * 100.0 / previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suppliers::domain::{QuoteId, ScoreBreakdown};
    use chrono::NaiveDate;

    fn history(newest_first: &[f64]) -> Vec<SupplierQuote> {
        let count = newest_first.len() as u64;
        newest_first
            .iter()
            .enumerate()
            .map(|(index, total)| SupplierQuote {
                id: QuoteId(format!("q-{index}")),
                supplier_id: SupplierId("sup-1".to_string()),
                job: None,
                quote_number: None,
                quote_date: None,
                total_amount: *total,
                currency: "AUD".to_string(),
                trade_category: None,
                raw_text: None,
                scores: ScoreBreakdown {
                    completeness: 0,
                    clarity: 0,
                    risk: 0,
                    total: 0,
                },
                recorded_at: Utc::now(),
                sequence: count - index as u64,
            })
            .collect()
    }

    fn stats_for(newest_first: &[f64]) -> SupplierStats {
        compute_stats(
            &SupplierId("sup-1".to_string()),
            &history(newest_first),
            Utc::now(),
        )
        .expect("stats for non-empty history")
    }

    #[test]
    fn median_of_odd_history_is_middle_value() {
        let stats = stats_for(&[200.0, 300.0, 100.0]);
        assert_eq!(stats.median_total_amount, 200.0);
        assert_eq!(stats.min_total_amount, 100.0);
        assert_eq!(stats.max_total_amount, 300.0);
        assert_eq!(stats.quote_sample_size, 3);
    }

    #[test]
    fn median_of_even_history_averages_central_values() {
        let stats = stats_for(&[400.0, 200.0, 300.0, 100.0]);
        assert_eq!(stats.median_total_amount, 250.0);
    }

    #[test]
    fn drift_compares_two_newest_quotes() {
        assert_eq!(stats_for(&[1200.0, 1000.0]).price_change_pct_vs_last, 20.0);
        assert_eq!(stats_for(&[800.0, 1000.0]).price_change_pct_vs_last, -20.0);
        assert_eq!(
            stats_for(&[1100.0, 1000.0, 5.0]).price_change_pct_vs_last,
            10.0
        );
    }

    #[test]
    fn single_quote_has_no_drift() {
        let stats = stats_for(&[950.0]);
        assert_eq!(stats.price_change_pct_vs_last, 0.0);
        assert_eq!(stats.last_total_amount, 950.0);
        assert_eq!(stats.median_total_amount, 950.0);
    }

    #[test]
    fn zero_previous_total_reports_no_drift() {
        assert_eq!(percent_change(0.0, 500.0), 0.0);
    }

    #[test]
    fn drift_keeps_full_precision() {
        let drift = percent_change(3.0, 4.0);
        assert!((drift - 100.0 / 3.0).abs() < 1e-9);
        assert_ne!(drift, 33.33);
        assert_eq!(stats_for(&[4.0, 3.0]).price_change_pct_vs_last, drift);
    }

    #[test]
    fn last_quote_date_falls_back_to_recorded_date() {
        let mut quotes = history(&[500.0, 400.0]);
        let stats = compute_stats(&SupplierId("sup-1".to_string()), &quotes, Utc::now())
            .expect("stats");
        assert_eq!(stats.last_quote_date, Some(quotes[0].recorded_at.date_naive()));

        let dated = NaiveDate::from_ymd_opt(2025, 2, 3).expect("valid date");
        quotes[0].quote_date = Some(dated);
        let stats = compute_stats(&SupplierId("sup-1".to_string()), &quotes, Utc::now())
            .expect("stats");
        assert_eq!(stats.last_quote_date, Some(dated));
    }

    #[test]
    fn empty_history_has_no_stats() {
        assert!(compute_stats(&SupplierId("sup-1".to_string()), &[], Utc::now()).is_none());
        assert!(median(&[]).is_none());
    }
}
