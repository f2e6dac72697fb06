pub mod controller;
pub mod metrics;
pub mod services;
pub mod state;
pub mod types;

pub use controller::PipelineController;
pub use state::{ErrorKind, PipelineState, Stage};
pub use types::{ImageArtifact, Label, Nutrient, NutrientKey, NutrientSet};
