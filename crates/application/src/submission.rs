use polaroid_studio_domain::{ColorTheme, ImageId, PresentationType, SelectionState};
use serde::Serialize;

use crate::ApplicationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedOutput {
    pub image_id: ImageId,
    pub source_name: String,
    pub output_name: String,
}

/// What a submit hands over to whatever renders the frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPlan {
    pub presentation_type: PresentationType,
    pub color_theme: ColorTheme,
    pub outputs: Vec<PlannedOutput>,
}

pub fn plan_submission(state: &SelectionState) -> Result<SubmissionPlan, ApplicationError> {
    if !state.has_images() {
        return Err(ApplicationError::IncompleteSelection(
            "no images uploaded".to_string(),
        ));
    }
    let presentation_type = state.presentation_type().ok_or_else(|| {
        ApplicationError::IncompleteSelection("no presentation type chosen".to_string())
    })?;
    let color_theme = state
        .color_theme()
        .ok_or_else(|| ApplicationError::IncompleteSelection("no color theme chosen".to_string()))?;

    let outputs = state
        .images()
        .iter()
        .map(|image| PlannedOutput {
            image_id: image.id,
            source_name: image.name.clone(),
            output_name: output_file_name(&image.name, presentation_type, color_theme),
        })
        .collect();

    Ok(SubmissionPlan {
        presentation_type,
        color_theme,
        outputs,
    })
}

/// Download name of one framed image: `{stem}_{type code}_{theme code}.png`,
/// the same codes the form posts.
pub fn output_file_name(source_name: &str, kind: PresentationType, theme: ColorTheme) -> String {
    let stem = match source_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => source_name,
    };
    format!("{stem}_{}_{}.png", kind.code(), theme.code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_strip_only_the_last_extension() {
        assert_eq!(
            output_file_name("beach.day.jpg", PresentationType::FullPolaroid, ColorTheme::Dark),
            "beach.day_F_D.png"
        );
        assert_eq!(
            output_file_name("scan", PresentationType::InstaSquaredCompact, ColorTheme::Light),
            "scan_ISC_L.png"
        );
    }

    #[test]
    fn incomplete_selection_cannot_be_submitted() {
        let mut state = SelectionState::default();
        assert!(matches!(
            plan_submission(&state),
            Err(ApplicationError::IncompleteSelection(_))
        ));

        let batch = state.issue_batch();
        state.activate_batch(batch);
        state.append_decoded(batch, "a.jpg", "x");
        state.select_presentation_type(PresentationType::HalfPolaroid);
        assert!(matches!(
            plan_submission(&state),
            Err(ApplicationError::IncompleteSelection(reason)) if reason.contains("color")
        ));

        state.select_color_theme(ColorTheme::Light);
        let plan = plan_submission(&state).expect("complete");
        assert_eq!(plan.outputs.len(), 1);
        assert_eq!(plan.outputs[0].output_name, "a_H_L.png");
    }
}
