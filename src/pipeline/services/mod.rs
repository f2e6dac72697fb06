pub mod classification;
pub mod enrichment;

pub use classification::{Classifier, HttpClassifier};
pub use enrichment::{Enricher, HttpEnricher, NutritionCredentials};
