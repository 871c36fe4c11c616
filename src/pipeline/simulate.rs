//! Scoring arbitrary product profiles through a fitted model

use serde::Serialize;

use super::encoder::Encoder;
use super::fitter::{sigmoid, FittedModel};
use crate::error::{ConjointError, Result};

/// Predicted total utility and choice probability of one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileScore {
    pub profile: Vec<String>,
    /// Linear predictor including the intercept, in log-odds
    pub utility: f64,
    pub probability: f64,
}

/// Score a profile (attribute values in catalog order).
///
/// The encoder must be the one whose layout the model was fitted on; a level
/// outside that universe is a `SchemaMismatch`.
pub fn simulate_profile(
    encoder: &dyn Encoder,
    model: &FittedModel,
    profile: &[String],
) -> Result<ProfileScore> {
    if encoder.layout() != &model.layout {
        return Err(ConjointError::SchemaMismatch(
            "encoder layout differs from the layout the model was fitted on".to_string(),
        ));
    }

    let row = encoder.encode_profile(profile)?;
    let utility = model.linear_predictor(&row)?;

    Ok(ProfileScore {
        profile: profile.to_vec(),
        utility,
        probability: sigmoid(utility),
    })
}

/// Score every profile and return them from most to least preferred
pub fn rank_profiles(
    encoder: &dyn Encoder,
    model: &FittedModel,
    profiles: &[Vec<String>],
) -> Result<Vec<ProfileScore>> {
    let mut scores = profiles
        .iter()
        .map(|p| simulate_profile(encoder, model, p))
        .collect::<Result<Vec<_>>>()?;
    scores.sort_by(|a, b| {
        b.utility
            .partial_cmp(&a.utility)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::catalog::{Attribute, AttributeCatalog};
    use crate::pipeline::encoder::DummyEncoder;
    use crate::pipeline::fitter::Coefficient;

    fn fixture() -> (DummyEncoder, FittedModel, AttributeCatalog) {
        let catalog = AttributeCatalog::new(vec![
            Attribute::new("Price", ["High", "Low"]),
            Attribute::new("Brand", ["A", "B"]),
        ]);
        let encoder = DummyEncoder::new(&catalog);
        let layout = encoder.layout().clone();
        let coefficients = layout
            .columns()
            .iter()
            .zip([-0.5, 1.0, 0.25])
            .map(|(column, estimate)| Coefficient {
                column: column.clone(),
                estimate,
                std_error: 0.2,
                z_value: estimate / 0.2,
                p_value: 0.1,
            })
            .collect();
        let model = FittedModel {
            coefficients,
            log_likelihood: -3.0,
            null_log_likelihood: -4.0,
            pseudo_r_squared: 0.25,
            iterations: 5,
            n_observations: 8,
            layout,
        };
        (encoder, model, catalog)
    }

    fn profile(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reference_profile_scores_intercept() {
        let (encoder, model, _) = fixture();
        let score = simulate_profile(&encoder, &model, &profile(&["High", "A"])).unwrap();
        assert!((score.utility + 0.5).abs() < 1e-12);
        assert!((score.probability - sigmoid(-0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_unseen_level_is_rejected() {
        let (encoder, model, _) = fixture();
        let result = simulate_profile(&encoder, &model, &profile(&["Premium", "A"]));
        assert!(matches!(result, Err(ConjointError::SchemaMismatch(_))));
    }

    #[test]
    fn test_foreign_encoder_is_rejected() {
        let (_, model, _) = fixture();
        let other = DummyEncoder::new(&AttributeCatalog::new(vec![Attribute::new(
            "Price",
            ["High", "Low", "Mid"],
        )]));
        let result = simulate_profile(&other, &model, &profile(&["High"]));
        assert!(matches!(result, Err(ConjointError::SchemaMismatch(_))));
    }

    #[test]
    fn test_rank_full_factorial() {
        let (encoder, model, catalog) = fixture();
        let ranked = rank_profiles(&encoder, &model, &catalog.enumerate_profiles()).unwrap();
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[0].profile, profile(&["Low", "B"]));
        assert_eq!(ranked[3].profile, profile(&["High", "A"]));
    }
}
