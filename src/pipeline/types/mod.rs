mod artifact;
mod label;
mod nutrients;

pub use artifact::ImageArtifact;
pub use label::Label;
pub use nutrients::{Nutrient, NutrientKey, NutrientSet};
