//! Disease Catalog
//!
//! Static profiles used by the simulated classifier.
//! Data only - selection logic lives in `classifier`.

use crate::models::{Resource, Severity};

/// Static reference link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLink {
    pub title: &'static str,
    pub url: &'static str,
}

impl From<&ResourceLink> for Resource {
    fn from(link: &ResourceLink) -> Self {
        Resource {
            title: link.title.to_string(),
            url: link.url.to_string(),
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiseaseProfile {
    pub name: &'static str,
    pub base_confidence: f64,
    pub severity: Severity,
    pub recommendations: &'static [&'static str],
    pub causes: &'static [&'static str],
    pub resources: &'static [ResourceLink],
}

impl DiseaseProfile {
    pub fn is_healthy(&self) -> bool {
        self.name == CATALOG[HEALTHY].name
    }

    pub fn recommendations(&self) -> Vec<String> {
        self.recommendations.iter().map(|s| s.to_string()).collect()
    }

    pub fn causes(&self) -> Vec<String> {
        self.causes.iter().map(|s| s.to_string()).collect()
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.resources.iter().map(Resource::from).collect()
    }
}

// ============================================================================
// PROFILE INDICES
// ============================================================================

pub const EARLY_BLIGHT: usize = 0;
pub const LATE_BLIGHT: usize = 1;
pub const LEAF_SPOT: usize = 2;
pub const POWDERY_MILDEW: usize = 3;
pub const BACTERIAL_WILT: usize = 4;
pub const MOSAIC_VIRUS: usize = 5;
pub const HEALTHY: usize = 6;

/// Non-healthy profiles, in catalog order
pub const DISEASES: [usize; 6] = [
    EARLY_BLIGHT,
    LATE_BLIGHT,
    LEAF_SPOT,
    POWDERY_MILDEW,
    BACTERIAL_WILT,
    MOSAIC_VIRUS,
];

pub fn profile(index: usize) -> &'static DiseaseProfile {
    &CATALOG[index]
}

pub fn healthy() -> &'static DiseaseProfile {
    &CATALOG[HEALTHY]
}

// ============================================================================
// CATALOG
// ============================================================================

pub static CATALOG: [DiseaseProfile; 7] = [
    DiseaseProfile {
        name: "Early Blight",
        base_confidence: 87.5,
        severity: Severity::Medium,
        recommendations: &[
            "Remove and destroy infected leaves immediately",
            "Apply copper-based fungicide every 7-10 days",
            "Ensure proper spacing between plants for air circulation",
            "Avoid overhead watering to reduce leaf wetness",
        ],
        causes: &[
            "Fungus Alternaria solani thrives in warm, humid conditions",
            "Water splash from rain or irrigation spreads spores",
            "Poor air circulation around plants",
            "Stressed plants due to nutrient deficiency or drought",
        ],
        resources: &[
            ResourceLink {
                title: "Copper Fungicide for Early Blight Control",
                url: "https://www.amazon.com/s?k=copper+fungicide",
            },
            ResourceLink {
                title: "Organic Neem Oil Spray",
                url: "https://www.amazon.com/s?k=neem+oil+spray",
            },
            ResourceLink {
                title: "Garden Pruning Shears for Leaf Removal",
                url: "https://www.amazon.com/s?k=pruning+shears",
            },
        ],
    },
    DiseaseProfile {
        name: "Late Blight",
        base_confidence: 92.3,
        severity: Severity::Critical,
        recommendations: &[
            "Apply fungicide containing chlorothalonil immediately",
            "Remove all infected plant parts and destroy them",
            "Avoid working with plants when wet",
            "Consider destroying severely infected plants",
            "Monitor weather conditions - disease spreads rapidly in cool, wet conditions",
        ],
        causes: &[
            "Phytophthora infestans pathogen spreads through airborne spores",
            "Cool temperatures (60-70°F) combined with high humidity",
            "Infected seed tubers or transplants",
            "Wind-blown spores from neighboring infected crops",
        ],
        resources: &[
            ResourceLink {
                title: "Chlorothalonil Fungicide",
                url: "https://www.amazon.com/s?k=chlorothalonil+fungicide",
            },
            ResourceLink {
                title: "Daconil Fungicide for Late Blight",
                url: "https://www.amazon.com/s?k=daconil+fungicide",
            },
            ResourceLink {
                title: "Heavy-Duty Garden Gloves",
                url: "https://www.amazon.com/s?k=garden+gloves",
            },
        ],
    },
    DiseaseProfile {
        name: "Leaf Spot",
        base_confidence: 78.9,
        severity: Severity::Low,
        recommendations: &[
            "Remove affected leaves to prevent spread",
            "Apply neem oil or copper fungicide",
            "Improve air circulation around plants",
            "Water at the base of plants, not overhead",
        ],
        causes: &[
            "Various fungal pathogens (Septoria, Cercospora)",
            "Prolonged leaf wetness from dew, rain, or irrigation",
            "Overcrowded planting reducing air flow",
            "Infected plant debris left in the field",
        ],
        resources: &[
            ResourceLink {
                title: "Organic Neem Oil Concentrate",
                url: "https://www.amazon.com/s?k=neem+oil+concentrate",
            },
            ResourceLink {
                title: "Copper-Based Fungicide Spray",
                url: "https://www.amazon.com/s?k=copper+spray+fungicide",
            },
            ResourceLink {
                title: "Drip Irrigation System Kit",
                url: "https://www.amazon.com/s?k=drip+irrigation+kit",
            },
        ],
    },
    DiseaseProfile {
        name: "Powdery Mildew",
        base_confidence: 85.2,
        severity: Severity::Medium,
        recommendations: &[
            "Spray with sulfur or potassium bicarbonate solution",
            "Increase spacing between plants",
            "Remove heavily infected leaves",
            "Ensure good air circulation and sunlight exposure",
        ],
        causes: &[
            "Fungal pathogen thrives in moderate temperatures and dry conditions",
            "High humidity at night followed by dry, warm days",
            "Shaded areas with poor air circulation",
            "Stressed plants from water or nutrient deficiency",
        ],
        resources: &[
            ResourceLink {
                title: "Sulfur Dust Fungicide for Powdery Mildew",
                url: "https://www.amazon.com/s?k=sulfur+dust+fungicide",
            },
            ResourceLink {
                title: "Potassium Bicarbonate Spray",
                url: "https://www.amazon.com/s?k=potassium+bicarbonate+spray",
            },
            ResourceLink {
                title: "Garden Spacing Stakes & Ties",
                url: "https://www.amazon.com/s?k=plant+spacing+stakes",
            },
        ],
    },
    DiseaseProfile {
        name: "Bacterial Wilt",
        base_confidence: 90.1,
        severity: Severity::High,
        recommendations: &[
            "Remove and destroy infected plants immediately",
            "Do not compost diseased material",
            "Disinfect tools after use",
            "Practice crop rotation with non-host plants",
            "Control cucumber beetles which spread the disease",
        ],
        causes: &[
            "Erwinia tracheiphila bacteria spread by cucumber beetles",
            "Bacteria multiply and block water-conducting vessels",
            "Infected beetles feeding on healthy plants",
            "No cure once plant is infected",
        ],
        resources: &[
            ResourceLink {
                title: "Cucumber Beetle Traps",
                url: "https://www.amazon.com/s?k=cucumber+beetle+trap",
            },
            ResourceLink {
                title: "Insecticidal Soap for Beetle Control",
                url: "https://www.amazon.com/s?k=insecticidal+soap",
            },
            ResourceLink {
                title: "Tool Disinfectant Spray",
                url: "https://www.amazon.com/s?k=garden+tool+disinfectant",
            },
        ],
    },
    DiseaseProfile {
        name: "Mosaic Virus",
        base_confidence: 83.7,
        severity: Severity::High,
        recommendations: &[
            "Remove and destroy infected plants",
            "Control aphids which transmit the virus",
            "Wash hands and tools after handling infected plants",
            "Plant resistant varieties in future seasons",
            "Remove weeds that may harbor the virus",
        ],
        causes: &[
            "Viral infection transmitted by aphids and other insects",
            "Mechanical transmission through contaminated tools",
            "Infected seeds or transplants",
            "Weeds serving as virus reservoir hosts",
        ],
        resources: &[
            ResourceLink {
                title: "Aphid Control Spray",
                url: "https://www.amazon.com/s?k=aphid+spray",
            },
            ResourceLink {
                title: "Yellow Sticky Traps for Aphids",
                url: "https://www.amazon.com/s?k=yellow+sticky+traps",
            },
            ResourceLink {
                title: "Disease-Resistant Seed Varieties",
                url: "https://www.amazon.com/s?k=disease+resistant+tomato+seeds",
            },
        ],
    },
    DiseaseProfile {
        name: "Healthy",
        base_confidence: 95.0,
        severity: Severity::Low,
        recommendations: &[
            "Continue current care practices",
            "Monitor plants regularly for any changes",
            "Maintain proper watering and fertilization",
            "Ensure good air circulation and sunlight",
        ],
        causes: &["No disease detected - plant appears healthy"],
        resources: &[
            ResourceLink {
                title: "All-Purpose Plant Fertilizer",
                url: "https://www.amazon.com/s?k=plant+fertilizer",
            },
            ResourceLink {
                title: "Soil pH Test Kit",
                url: "https://www.amazon.com/s?k=soil+ph+test+kit",
            },
            ResourceLink {
                title: "Garden Moisture Meter",
                url: "https://www.amazon.com/s?k=soil+moisture+meter",
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(CATALOG.len(), 7);
        assert_eq!(healthy().name, "Healthy");
        assert!(healthy().is_healthy());
        assert!(DISEASES.iter().all(|&i| !profile(i).is_healthy()));
    }

    #[test]
    fn test_base_confidence_in_range() {
        for p in CATALOG.iter() {
            assert!((0.0..=100.0).contains(&p.base_confidence), "{}", p.name);
            assert!(!p.recommendations.is_empty());
            assert!(!p.causes.is_empty());
            assert_eq!(p.resources.len(), 3);
        }
    }

    #[test]
    fn test_candidate_indices_point_at_diseases() {
        assert_eq!(profile(LATE_BLIGHT).severity, Severity::Critical);
        assert_eq!(profile(MOSAIC_VIRUS).name, "Mosaic Virus");
    }
}
