use polaroid_studio_application::view::WizardView;
use polaroid_studio_application::{DecodeMetrics, PollReport, SubmissionPlan, UploadReport};
use polaroid_studio_domain::PresentationType;

pub fn present_upload_report(report: &UploadReport) -> String {
    format!(
        "batch {}: decoding {} file(s), ignored {} non-image file(s)",
        report.batch.get(),
        report.accepted_files,
        report.rejected_files
    )
}

pub fn present_poll_report(report: &PollReport) -> String {
    format!(
        "decoded {} image(s), {} failed, {} stale",
        report.appended, report.failed, report.stale
    )
}

/// One `types` row: code, name, label and the layout traits of the frame.
pub fn present_presentation_type(kind: PresentationType) -> String {
    let mut traits = Vec::new();
    if kind.is_compact() {
        traits.push("corner caption");
    }
    if kind.blurs_portrait() {
        traits.push("blurred padding");
    }
    let traits = if traits.is_empty() {
        "-".to_string()
    } else {
        traits.join(", ")
    };
    format!(
        "{}\t{}\t{}\t{}",
        kind.code(),
        kind.name(),
        kind.default_label(),
        traits
    )
}

/// Multi-line summary of the wizard as it would currently be drawn.
pub fn present_view(view: &WizardView) -> String {
    let mut lines = vec![format!("step: {:?}", view.step)];

    lines.push(format!("gallery: {}", view.upload.count_label));
    for thumbnail in &view.upload.thumbnails {
        lines.push(format!("  #{} {}", thumbnail.id.get(), thumbnail.alt));
    }
    for failed in &view.upload.failed_files {
        lines.push(format!("  failed: {failed}"));
    }

    if view.presentation.unlocked {
        let chosen = view
            .presentation
            .options
            .iter()
            .find(|option| option.selected)
            .map_or("none", |option| option.label.as_str());
        lines.push(format!("presentation type: {chosen}"));
    }
    if view.color.unlocked {
        let chosen = view
            .color
            .buttons
            .iter()
            .find(|button| button.active)
            .map_or("none", |button| button.label.as_str());
        lines.push(format!("color theme: {chosen}"));
    }

    if let Some(confirmation) = &view.confirmation {
        lines.push(format!(
            "confirm: {} of {} image(s), type={}, color={}, submit={}",
            confirmation.preview_count,
            confirmation.total_images,
            confirmation.type_label.as_deref().unwrap_or("-"),
            confirmation.color_label.as_deref().unwrap_or("-"),
            if confirmation.submit_enabled { "enabled" } else { "disabled" }
        ));
    }

    lines.join("\n")
}

pub fn present_plan(plan: &SubmissionPlan) -> String {
    let mut lines = vec![format!(
        "submitting {} image(s) as {} / {}",
        plan.outputs.len(),
        plan.presentation_type.name(),
        plan.color_theme.name()
    )];
    lines.extend(
        plan.outputs
            .iter()
            .map(|output| format!("  {} -> {}", output.source_name, output.output_name)),
    );
    lines.join("\n")
}

pub fn present_metrics(metrics: &DecodeMetrics) -> String {
    format!(
        "decode jobs: submitted={} encoded={} failed={} skipped={}",
        metrics.submitted_jobs, metrics.encoded_jobs, metrics.failed_jobs, metrics.skipped_jobs
    )
}
