//! Energy vs mood regression
//!
//! Ordinary least squares fit of `Mood After ≈ intercept + slope × Energy Level After`
//! over every record, with the coefficient statistics a fit summary shows.

use crate::error::AnalyticsError;
use crate::stats::{ols, t_two_sided_p};
use crate::store::RecordStore;
use crate::types::{EnergyMoodPoint, RegressionResult};
use tracing::debug;

/// Fit mood on energy across all records.
///
/// Fails with `InsufficientData` for fewer than two records or when every
/// energy value is the same.
pub fn energy_mood_regression(store: &RecordStore) -> Result<RegressionResult, AnalyticsError> {
    let points = store
        .records()
        .iter()
        .map(|record| {
            Ok(EnergyMoodPoint {
                energy: f64::from(record.energy()?),
                mood: f64::from(record.mood()?),
            })
        })
        .collect::<Result<Vec<_>, AnalyticsError>>()?;

    if points.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "regression needs at least 2 records, found {}",
            points.len()
        )));
    }

    let x: Vec<f64> = points.iter().map(|p| p.energy).collect();
    let y: Vec<f64> = points.iter().map(|p| p.mood).collect();
    let fit = ols(&x, &y).ok_or_else(|| {
        AnalyticsError::InsufficientData(
            "insufficient variance: every Energy Level After value is the same".into(),
        )
    })?;

    let coefficients = [fit.intercept, fit.slope];
    let std_errors = fit.std_errors();
    let (t_values, p_values) = match std_errors {
        Some(se) if se.iter().all(|s| *s > 0.0) => {
            let t = [coefficients[0] / se[0], coefficients[1] / se[1]];
            let df = fit.df_resid as f64;
            (Some(t), Some([t_two_sided_p(t[0], df), t_two_sided_p(t[1], df)]))
        }
        // A perfect fit leaves no residual variance: any non-zero
        // coefficient is certain, a zero one carries no evidence.
        Some(_) => (
            None,
            Some(coefficients.map(|c| if c == 0.0 { 1.0 } else { 0.0 })),
        ),
        None => (None, None),
    };

    debug!(
        n = fit.n,
        slope = fit.slope,
        intercept = fit.intercept,
        r_squared = ?fit.r_squared,
        "fitted energy/mood regression"
    );

    let mut result = RegressionResult {
        intercept: fit.intercept,
        slope: fit.slope,
        r_squared: fit.r_squared,
        adj_r_squared: fit.adj_r_squared(),
        std_errors,
        t_values,
        p_values,
        n_observations: fit.n,
        fitted: Vec::new(),
        points,
    };
    result.fitted = result.points.iter().map(|p| result.predict(p.energy)).collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::SAMPLE_CSV;

    const HEADER: &str = "Activity,Start Time,End Time,Date,Location,Energy Level After,Mood After\n";

    fn store_from_pairs(pairs: &[(u8, u8)]) -> RecordStore {
        let mut csv = HEADER.to_string();
        for (energy, mood) in pairs {
            csv.push_str(&format!("A,09:00,10:00,2023-10-09,X,{energy},{mood}\n"));
        }
        RecordStore::from_csv_str(&csv).unwrap()
    }

    #[test]
    fn test_exact_linear_relationship() {
        // mood = 2 + 0.5 * energy
        let store = store_from_pairs(&[(2, 3), (4, 4), (6, 5), (8, 6), (10, 7)]);
        let result = energy_mood_regression(&store).unwrap();

        assert!((result.slope - 0.5).abs() < 1e-9);
        assert!((result.intercept - 2.0).abs() < 1e-9);
        assert!((result.r_squared.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(result.n_observations, 5);
        let p = result.p_values.unwrap();
        assert!(p[1] < 1e-6);
        for (fitted, point) in result.fitted.iter().zip(&result.points) {
            assert!((fitted - point.mood).abs() < 1e-9);
        }
    }

    #[test]
    fn test_no_energy_variance_is_insufficient() {
        let store = store_from_pairs(&[(5, 3), (5, 7), (5, 9)]);
        let err = energy_mood_regression(&store).unwrap_err();
        assert!(err.is_insufficient_data());
        assert!(err.to_string().contains("variance"));
    }

    #[test]
    fn test_single_record_is_insufficient() {
        let store = store_from_pairs(&[(5, 3)]);
        assert!(energy_mood_regression(&store)
            .unwrap_err()
            .is_insufficient_data());
    }

    #[test]
    fn test_constant_mood_leaves_r_squared_undefined() {
        let store = store_from_pairs(&[(2, 6), (5, 6), (8, 6), (9, 6)]);
        let result = energy_mood_regression(&store).unwrap();
        assert_eq!(result.slope, 0.0);
        assert_eq!(result.r_squared, None);
        assert_eq!(result.adj_r_squared, None);
        assert_eq!(result.fitted, vec![6.0; 4]);
    }

    #[test]
    fn test_two_points_have_no_p_values() {
        let store = store_from_pairs(&[(2, 4), (6, 8)]);
        let result = energy_mood_regression(&store).unwrap();
        assert!((result.slope - 1.0).abs() < 1e-12);
        assert_eq!(result.p_values, None);
        assert_eq!(result.adj_r_squared, None);
    }

    #[test]
    fn test_noisy_fit_statistics() {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        let result = energy_mood_regression(&store).unwrap();

        assert!(result.slope > 0.0);
        let r2 = result.r_squared.unwrap();
        assert!(r2 > 0.0 && r2 < 1.0);
        let p = result.p_values.unwrap();
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
        // Strong positive relationship in the sample log
        assert!(p[1] < 0.01);
        assert_eq!(result.fitted.len(), store.len());
    }
}
