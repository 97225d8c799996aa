//! Disease Classifier
//!
//! Simulated classification: the verdict depends only on the crop type and
//! the random source, never on image content.
//! Input: CropType, Rng
//! Output: Option<Classification> (None = low confidence)

use rand::Rng;

use super::catalog::{self, DiseaseProfile};
use crate::models::{CropType, NewClassification};

// ============================================================================
// RULES
// ============================================================================

/// Probability of short-circuiting to the healthy profile
pub const HEALTHY_BIAS: f64 = 0.40;

/// Verdicts below this confidence are rejected
pub const CONFIDENCE_THRESHOLD: f64 = 70.0;

/// Tunable knobs of the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierRules {
    pub healthy_bias: f64,
    pub confidence_threshold: f64,
    pub healthy_center: f64,
    /// Half-open jitter range added to `healthy_center`
    pub healthy_jitter: (f64, f64),
    pub healthy_clamp: (f64, f64),
    /// Half-open jitter range added to the profile's base confidence
    pub disease_jitter: (f64, f64),
    pub disease_clamp: (f64, f64),
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            healthy_bias: HEALTHY_BIAS,
            confidence_threshold: CONFIDENCE_THRESHOLD,
            healthy_center: 88.0,
            healthy_jitter: (-3.0, 7.0),
            healthy_clamp: (82.0, 96.0),
            disease_jitter: (-8.0, 8.0),
            // NOTE: floor equals the threshold, so the rejection branch is
            // unreachable with default rules.
            disease_clamp: (70.0, 93.0),
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// A verdict: catalog profile plus the realized confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub profile: &'static DiseaseProfile,
    pub confidence: f64,
}

impl Classification {
    pub fn is_healthy(&self) -> bool {
        self.profile.is_healthy()
    }

    /// Build the insert payload for the history store
    pub fn to_new_classification(
        &self,
        crop_type: CropType,
        image_data: String,
        session_id: Option<String>,
        ip_hash: Option<String>,
    ) -> NewClassification {
        NewClassification {
            crop_type,
            disease_name: self.profile.name.to_string(),
            confidence_level: self.confidence,
            severity: self.profile.severity,
            recommendations: self.profile.recommendations(),
            causes: self.profile.causes(),
            resources: self.profile.resources(),
            image_data,
            session_id,
            ip_hash,
        }
    }
}

// ============================================================================
// MAIN CLASSIFICATION FUNCTION
// ============================================================================

/// Candidate disease pool for a crop type
pub fn candidate_pool(crop_type: CropType) -> &'static [usize] {
    use catalog::*;

    match crop_type {
        CropType::Tomato => &[EARLY_BLIGHT, LATE_BLIGHT, LEAF_SPOT, POWDERY_MILDEW],
        CropType::Potato => &[EARLY_BLIGHT, LATE_BLIGHT],
        CropType::Pepper => &[LEAF_SPOT, BACTERIAL_WILT],
        CropType::Cucumber => &[LEAF_SPOT, MOSAIC_VIRUS],
        _ => &DISEASES,
    }
}

/// Classify with the default rules
pub fn classify<R: Rng + ?Sized>(crop_type: CropType, rng: &mut R) -> Option<Classification> {
    classify_with_rules(crop_type, rng, &ClassifierRules::default())
}

/// Classification with custom rules
pub fn classify_with_rules<R: Rng + ?Sized>(
    crop_type: CropType,
    rng: &mut R,
    rules: &ClassifierRules,
) -> Option<Classification> {
    let roll: f64 = rng.gen();

    // Healthy path is never subject to the threshold
    if roll < rules.healthy_bias {
        let (lo, hi) = rules.healthy_jitter;
        let (floor, ceil) = rules.healthy_clamp;
        let confidence = (rules.healthy_center + rng.gen_range(lo..hi)).clamp(floor, ceil);

        return Some(Classification {
            profile: catalog::healthy(),
            confidence,
        });
    }

    let pool = candidate_pool(crop_type);
    let profile = catalog::profile(pool[rng.gen_range(0..pool.len())]);

    let (lo, hi) = rules.disease_jitter;
    let (floor, ceil) = rules.disease_clamp;
    let confidence = (profile.base_confidence + rng.gen_range(lo..hi)).clamp(floor, ceil);

    if confidence < rules.confidence_threshold {
        tracing::debug!(
            "Rejected {} for {}: confidence {:.1} < {:.1}",
            profile.name, crop_type, confidence, rules.confidence_threshold
        );
        return None;
    }

    Some(Classification { profile, confidence })
}
