use crate::pipeline::state::PipelineState;
use crate::pipeline::types::{NutrientKey, NutrientSet};

/// Renders a state snapshot as display lines. Anything richer (styling,
/// modals) belongs to the embedding front end.
pub fn render(state: &PipelineState) -> Vec<String> {
    match state {
        PipelineState::Idle => vec!["Take a photo to begin".to_string()],
        PipelineState::AwaitingClassification => vec!["Identifying fruit...".to_string()],
        PipelineState::Classified(label) => {
            vec![format!("Predicted Fruit: {label}")]
        }
        PipelineState::AwaitingEnrichment(label) => {
            vec![format!("Looking up nutrition for {label}...")]
        }
        PipelineState::Enriched(label, nutrients) => {
            let mut lines = vec![format!("Nutrition Information for {label}")];
            lines.extend(nutrient_lines(nutrients));
            lines
        }
        PipelineState::Failed { kind, stage, label } => {
            let mut lines = vec![format!("Could not {stage}: {kind}")];
            if let Some(label) = label {
                lines.push(format!("Predicted Fruit: {label}"));
            }
            lines
        }
    }
}

// A nutrient the service did not report shows as unknown, never as zero.
fn nutrient_lines(nutrients: &NutrientSet) -> Vec<String> {
    NutrientKey::ALL
        .iter()
        .map(|key| match nutrients.get(*key) {
            Some(nutrient) => format!(
                "{}: {:.1} {}",
                key.display_name(),
                nutrient.quantity,
                nutrient.unit
            ),
            None => format!("{}: unknown", key.display_name()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::state::{ErrorKind, Stage};
    use crate::pipeline::types::{Label, Nutrient};

    #[test]
    fn absent_nutrients_render_as_unknown() {
        let mut nutrients = NutrientSet::new();
        nutrients.insert(
            NutrientKey::Energy,
            Nutrient {
                quantity: 52.0,
                unit: "kcal".to_string(),
            },
        );
        let state = PipelineState::Enriched(Label::parse("apple").unwrap(), nutrients);

        let lines = render(&state);
        assert!(lines.contains(&"Calories: 52.0 kcal".to_string()));
        assert!(lines.contains(&"Protein: unknown".to_string()));
        assert!(!lines.iter().any(|line| line.contains("Protein: 0")));
    }

    #[test]
    fn failure_with_label_still_shows_the_prediction() {
        let state = PipelineState::Failed {
            kind: ErrorKind::Service(401),
            stage: Stage::Enrich,
            label: Label::parse("apple"),
        };
        let lines = render(&state);
        assert_eq!(lines[0], "Could not enrich: service error (401)");
        assert_eq!(lines[1], "Predicted Fruit: apple");
    }
}
