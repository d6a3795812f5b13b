//! Segmentation engine: rank the whole population, score, and label.

use std::time::Instant;

use tracing::debug;

use rfm_core::{CustomerMetrics, CustomerSegment, Result, RfmError, ScoringParams, SegmentedCustomer};

use super::ranking::{average_rank, normalize_ranks, RankOrder};

/// Score and segment every customer in `metrics`.
///
/// Ranking is population-wide, so the full set must be passed at once.
/// Recency ranks descending (the most recent customer gets the highest
/// rank); frequency and monetary rank ascending. Output order matches input.
///
/// The score is computed from unrounded norms. The emitted norms and
/// `monetary` are then rounded the same way as the score.
pub fn segment(metrics: &[CustomerMetrics], params: &ScoringParams) -> Result<Vec<SegmentedCustomer>> {
    if metrics.is_empty() {
        return Err(RfmError::EmptyPopulation);
    }

    let start = Instant::now();

    let recency: Vec<f64> = metrics.iter().map(|m| m.recency as f64).collect();
    let frequency: Vec<f64> = metrics.iter().map(|m| m.frequency as f64).collect();
    let monetary: Vec<f64> = metrics.iter().map(|m| m.monetary).collect();

    let r_norm = normalize_ranks(&average_rank(&recency, RankOrder::Descending));
    let f_norm = normalize_ranks(&average_rank(&frequency, RankOrder::Ascending));
    let m_norm = normalize_ranks(&average_rank(&monetary, RankOrder::Ascending));

    let round = |value: f64| params.rounding.round(value, params.decimals);

    let segmented: Vec<SegmentedCustomer> = metrics
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let rfm_score = params.score(r_norm[i], f_norm[i], m_norm[i]);
            SegmentedCustomer {
                customer_id: m.customer_id.clone(),
                frequency: m.frequency,
                monetary: round(m.monetary),
                recency: m.recency,
                r_rank_norm: round(r_norm[i]),
                f_rank_norm: round(f_norm[i]),
                m_rank_norm: round(m_norm[i]),
                rfm_score,
                customer_segment: CustomerSegment::from_score(rfm_score, &params.thresholds),
            }
        })
        .collect();

    debug!(
        customers = segmented.len(),
        elapsed_us = start.elapsed().as_micros(),
        "segment completed"
    );

    Ok(segmented)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(id: &str, recency: i64, frequency: u64, monetary: f64) -> CustomerMetrics {
        CustomerMetrics {
            customer_id: id.to_owned(),
            recency,
            frequency,
            monetary,
        }
    }

    #[test]
    fn empty_population_is_an_error() {
        let err = segment(&[], &ScoringParams::default()).unwrap_err();
        assert_eq!(err, RfmError::EmptyPopulation);
    }

    #[test]
    fn single_customer_is_top() {
        let out = segment(&[metrics("c1", 30, 1, 10.0)], &ScoringParams::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].r_rank_norm, 100.0);
        assert_eq!(out[0].f_rank_norm, 100.0);
        assert_eq!(out[0].m_rank_norm, 100.0);
        assert_eq!(out[0].rfm_score, 5.0);
        assert_eq!(out[0].customer_segment, CustomerSegment::TopCustomers);
    }

    #[test]
    fn recency_ranks_most_recent_highest() {
        let population = vec![
            metrics("old", 300, 1, 10.0),
            metrics("recent", 2, 1, 10.0),
            metrics("middle", 50, 1, 10.0),
        ];
        let out = segment(&population, &ScoringParams::default()).unwrap();
        assert_eq!(out[1].r_rank_norm, 100.0);
        assert_eq!(out[0].r_rank_norm, 33.33);
        assert_eq!(out[2].r_rank_norm, 66.67);
    }

    #[test]
    fn negative_recency_ranks_most_recent() {
        let population = vec![
            metrics("future", -3, 1, 10.0),
            metrics("recent", 5, 1, 10.0),
            metrics("old", 40, 1, 10.0),
        ];
        let out = segment(&population, &ScoringParams::default()).unwrap();
        assert_eq!(out[0].recency, -3);
        assert_eq!(out[0].r_rank_norm, 100.0);
        assert_eq!(out[1].r_rank_norm, 66.67);
        assert_eq!(out[2].r_rank_norm, 33.33);
    }

    #[test]
    fn emitted_norms_and_monetary_are_rounded() {
        let population = vec![
            metrics("a", 10, 1, 10.123),
            metrics("b", 20, 2, 20.0),
            metrics("c", 30, 3, 30.0),
        ];
        let out = segment(&population, &ScoringParams::default()).unwrap();

        assert_eq!(out[0].r_rank_norm, 100.0);
        assert_eq!(out[0].f_rank_norm, 33.33);
        assert_eq!(out[0].m_rank_norm, 33.33);
        assert_eq!(out[0].monetary, 10.12);
        // Scored from unrounded norms: (15 + 28.333..) * 0.05 = 2.1666..
        assert_eq!(out[0].rfm_score, 2.17);

        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json["f_rank_norm"], 33.33);
        assert_eq!(json["m_rank_norm"], 33.33);
        assert_eq!(json["monetary"], 10.12);
    }

    #[test]
    fn norm_rounding_follows_params() {
        let mut params = ScoringParams::default();
        params.decimals = 4;
        let population = vec![
            metrics("a", 10, 1, 1.0),
            metrics("b", 20, 2, 2.0),
            metrics("c", 30, 3, 3.0),
        ];
        let out = segment(&population, &params).unwrap();
        assert_eq!(out[0].f_rank_norm, 33.3333);
    }

    #[test]
    fn known_population_scores() {
        // recency   [10, 20, 30, 40] desc → ranks [4, 3, 2, 1] → norms [100, 75, 50, 25]
        // frequency [1, 1, 2, 5]    asc  → ranks [1.5, 1.5, 3, 4] → norms [37.5, 37.5, 75, 100]
        // monetary  [50, 10, 20, 90] asc → ranks [3, 1, 2, 4] → norms [75, 25, 50, 100]
        let population = vec![
            metrics("a", 10, 1, 50.0),
            metrics("b", 20, 1, 10.0),
            metrics("c", 30, 2, 20.0),
            metrics("d", 40, 5, 90.0),
        ];
        let out = segment(&population, &ScoringParams::default()).unwrap();

        // a: (15 + 10.5 + 42.75) * 0.05 = 3.4125 → 3.41
        assert_eq!(out[0].rfm_score, 3.41);
        assert_eq!(out[0].customer_segment, CustomerSegment::MediumValue);
        // b: (11.25 + 10.5 + 14.25) * 0.05 = 1.8
        assert_eq!(out[1].rfm_score, 1.8);
        assert_eq!(out[1].customer_segment, CustomerSegment::LowValue);
        // c: (7.5 + 21 + 28.5) * 0.05 = 2.85
        assert_eq!(out[2].rfm_score, 2.85);
        assert_eq!(out[2].customer_segment, CustomerSegment::LowValue);
        // d: (3.75 + 28 + 57) * 0.05 = 4.4375 → 4.44
        assert_eq!(out[3].rfm_score, 4.44);
        assert_eq!(out[3].customer_segment, CustomerSegment::HighValue);
    }

    #[test]
    fn output_preserves_input_fields_and_order() {
        let population = vec![metrics("z", 5, 3, 7.5), metrics("a", 1, 1, 2.0)];
        let out = segment(&population, &ScoringParams::default()).unwrap();
        assert_eq!(out[0].customer_id, "z");
        assert_eq!(out[0].recency, 5);
        assert_eq!(out[0].frequency, 3);
        assert_eq!(out[0].monetary, 7.5);
        assert_eq!(out[1].customer_id, "a");
    }

    #[test]
    fn thresholds_come_from_params() {
        let mut params = ScoringParams::default();
        params.thresholds.top_customers = 5.0;
        let out = segment(&[metrics("c1", 0, 1, 1.0)], &params).unwrap();
        // 5.0 is not strictly greater than 5.0
        assert_eq!(out[0].customer_segment, CustomerSegment::HighValue);
    }

    #[test]
    fn all_tied_population_scores_full_marks() {
        let population: Vec<_> = (0..4)
            .map(|i| metrics(&format!("c{i}"), 10, 2, 20.0))
            .collect();
        let out = segment(&population, &ScoringParams::default()).unwrap();
        for customer in &out {
            assert_eq!(customer.rfm_score, 5.0);
            assert_eq!(customer.customer_segment, CustomerSegment::TopCustomers);
        }
    }
}
