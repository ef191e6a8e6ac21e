//! Pure projection of the selection into a view description.

use std::sync::Arc;

use polaroid_studio_domain::{
    ColorTheme, ImageEntry, ImageId, PresentationType, SelectionState, WizardStep,
};
use serde::Serialize;

use crate::effects::option_lift;
use crate::{ApplicationError, LabelCatalog};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub upload: UploadView,
    pub presentation: PresentationView,
    pub color: ColorView,
    pub confirmation: Option<ConfirmationView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThumbnailView {
    pub id: ImageId,
    /// Shares the image's data URL; rendering never copies the payload.
    pub src: Arc<str>,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadView {
    pub gallery_visible: bool,
    pub thumbnails: Vec<ThumbnailView>,
    pub count_label: String,
    pub failed_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionView {
    pub kind: PresentationType,
    pub code: String,
    pub label: String,
    pub selected: bool,
    pub lift: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationView {
    pub unlocked: bool,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeButtonView {
    pub theme: ColorTheme,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorView {
    pub unlocked: bool,
    pub buttons: Vec<ThemeButtonView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationView {
    pub previews: Vec<ThumbnailView>,
    pub preview_count: usize,
    pub total_images: usize,
    pub type_label: Option<String>,
    pub color_label: Option<String>,
    pub submit_enabled: bool,
}

pub fn render(
    state: &SelectionState,
    labels: &dyn LabelCatalog,
) -> Result<WizardView, ApplicationError> {
    let confirmation = if state.progress().confirmation_visible {
        Some(render_confirmation(state, labels)?)
    } else {
        None
    };

    Ok(WizardView {
        step: state.step(),
        upload: render_gallery(state),
        presentation: render_presentation(state, labels),
        color: render_color(state),
        confirmation,
    })
}

pub fn render_gallery(state: &SelectionState) -> UploadView {
    UploadView {
        gallery_visible: state.progress().gallery_visible,
        thumbnails: thumbnails(state.images()),
        count_label: count_label(state.images().len()),
        failed_files: state.failed_files().to_vec(),
    }
}

pub fn render_presentation(state: &SelectionState, labels: &dyn LabelCatalog) -> PresentationView {
    let options = PresentationType::ALL
        .into_iter()
        .map(|kind| {
            let selected = state.presentation_type() == Some(kind);
            OptionView {
                kind,
                code: kind.code().to_string(),
                label: labels
                    .display_text(kind)
                    .unwrap_or_else(|| kind.default_label().to_string()),
                selected,
                lift: option_lift(selected),
            }
        })
        .collect();

    PresentationView {
        unlocked: state.type_step_unlocked(),
        options,
    }
}

pub fn render_color(state: &SelectionState) -> ColorView {
    let buttons = ColorTheme::ALL
        .into_iter()
        .map(|theme| ThemeButtonView {
            theme,
            label: theme.name().to_string(),
            active: state.color_theme() == Some(theme),
        })
        .collect();

    ColorView {
        unlocked: state.progress().color_step_unlocked,
        buttons,
    }
}

/// Rebuilds the confirmation panel from scratch.
///
/// A chosen type without a display label is a wiring bug and fails the whole render.
pub fn render_confirmation(
    state: &SelectionState,
    labels: &dyn LabelCatalog,
) -> Result<ConfirmationView, ApplicationError> {
    let type_label = state
        .presentation_type()
        .map(|kind| {
            labels
                .display_text(kind)
                .map(|text| capitalize_first(&text))
                .ok_or_else(|| ApplicationError::MissingLabel(kind.code().to_string()))
        })
        .transpose()?;

    let count = state.images().len();
    Ok(ConfirmationView {
        previews: thumbnails(state.images()),
        preview_count: count,
        total_images: count,
        type_label,
        color_label: state.color_theme().map(|theme| theme.name().to_string()),
        submit_enabled: state.is_complete(),
    })
}

pub fn count_label(count: usize) -> String {
    if count == 1 {
        format!("{count} image")
    } else {
        format!("{count} images")
    }
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn thumbnails(images: &[ImageEntry]) -> Vec<ThumbnailView> {
    images
        .iter()
        .map(|image| ThumbnailView {
            id: image.id,
            src: Arc::clone(&image.data_url),
            alt: image.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DefaultLabels;

    impl LabelCatalog for DefaultLabels {
        fn display_text(&self, kind: PresentationType) -> Option<String> {
            Some(kind.default_label().to_string())
        }
    }

    struct NoLabels;

    impl LabelCatalog for NoLabels {
        fn display_text(&self, _kind: PresentationType) -> Option<String> {
            None
        }
    }

    fn state_with_images(count: usize) -> SelectionState {
        let mut state = SelectionState::default();
        let batch = state.issue_batch();
        state.activate_batch(batch);
        for index in 0..count {
            state.append_decoded(batch, format!("img-{index}.png"), "data:image/png;base64,AA==");
        }
        state
    }

    #[test]
    fn count_label_pluralizes() {
        assert_eq!(count_label(0), "0 images");
        assert_eq!(count_label(1), "1 image");
        assert_eq!(count_label(3), "3 images");
    }

    #[test]
    fn capitalize_first_only_touches_first_letter() {
        assert_eq!(capitalize_first("half polaroid"), "Half polaroid");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("Dark"), "Dark");
    }

    #[test]
    fn gallery_projects_every_image_with_its_id() {
        let state = state_with_images(2);
        let gallery = render_gallery(&state);
        assert!(gallery.gallery_visible);
        assert_eq!(gallery.count_label, "2 images");
        let ids: Vec<_> = gallery.thumbnails.iter().map(|thumb| thumb.id).collect();
        let expected: Vec<_> = state.images().iter().map(|image| image.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn repeated_renders_share_one_payload_per_image() {
        let mut state = state_with_images(2);
        state.select_presentation_type(PresentationType::FullPolaroid);
        state.select_color_theme(ColorTheme::Light);

        let first = render(&state, &DefaultLabels).expect("render");
        let second = render(&state, &DefaultLabels).expect("render");
        let previews = &first.confirmation.as_ref().expect("confirmation").previews;

        for (index, image) in state.images().iter().enumerate() {
            assert!(Arc::ptr_eq(&first.upload.thumbnails[index].src, &image.data_url));
            assert!(Arc::ptr_eq(&second.upload.thumbnails[index].src, &image.data_url));
            assert!(Arc::ptr_eq(&previews[index].src, &image.data_url));
        }
    }

    #[test]
    fn exactly_one_option_is_raised() {
        let mut state = state_with_images(1);
        state.select_presentation_type(PresentationType::HalfPolaroid);
        state.select_presentation_type(PresentationType::InstaSquared);

        let view = render_presentation(&state, &DefaultLabels);
        let raised: Vec<_> = view.options.iter().filter(|option| option.selected).collect();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].code, "IS");
        assert_eq!(raised[0].lift, -8.0);
        assert!(view
            .options
            .iter()
            .filter(|option| !option.selected)
            .all(|option| option.lift == 0.0));
    }

    #[test]
    fn confirmation_counts_and_labels() {
        let mut state = state_with_images(3);
        state.select_presentation_type(PresentationType::QuarterPolaroidCompact);
        state.select_color_theme(ColorTheme::Dark);

        let view = render(&state, &DefaultLabels).expect("render");
        let confirmation = view.confirmation.expect("confirmation visible");
        assert_eq!(confirmation.previews.len(), 3);
        assert_eq!(confirmation.preview_count, 3);
        assert_eq!(confirmation.total_images, 3);
        assert_eq!(
            confirmation.type_label.as_deref(),
            Some("Quarter polaroid compact")
        );
        assert_eq!(confirmation.color_label.as_deref(), Some("Dark"));
        assert!(confirmation.submit_enabled);
    }

    #[test]
    fn confirmation_without_type_renders_empty_type_label() {
        let mut state = state_with_images(1);
        state.select_color_theme(ColorTheme::Light);

        let confirmation = render_confirmation(&state, &DefaultLabels).expect("render");
        assert_eq!(confirmation.type_label, None);
        assert!(!confirmation.submit_enabled);
    }

    #[test]
    fn missing_label_for_chosen_type_fails_the_render() {
        let mut state = state_with_images(1);
        state.select_presentation_type(PresentationType::FullPolaroid);
        state.select_color_theme(ColorTheme::Light);

        let result = render(&state, &NoLabels);
        assert!(matches!(result, Err(ApplicationError::MissingLabel(code)) if code == "F"));
    }

    #[test]
    fn hidden_confirmation_is_not_rendered() {
        let state = state_with_images(1);
        let view = render(&state, &DefaultLabels).expect("render");
        assert!(view.confirmation.is_none());
        assert!(view.presentation.unlocked);
        assert!(!view.color.unlocked);
        assert!(view.color.buttons.iter().all(|button| !button.active));
    }
}
