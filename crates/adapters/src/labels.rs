use std::collections::HashMap;

use polaroid_studio_application::LabelCatalog;
use polaroid_studio_domain::PresentationType;

/// Built-in option labels, optionally overridden per type code.
#[derive(Debug, Clone, Default)]
pub struct StaticLabelCatalog {
    overrides: HashMap<PresentationType, String>,
}

impl StaticLabelCatalog {
    pub fn with_override(mut self, kind: PresentationType, text: impl Into<String>) -> Self {
        self.overrides.insert(kind, text.into());
        self
    }
}

impl LabelCatalog for StaticLabelCatalog {
    fn display_text(&self, kind: PresentationType) -> Option<String> {
        let text = self
            .overrides
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_label());
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let catalog = StaticLabelCatalog::default()
            .with_override(PresentationType::HalfPolaroid, "half-size polaroid");

        assert_eq!(
            catalog.display_text(PresentationType::HalfPolaroid).as_deref(),
            Some("half-size polaroid")
        );
        assert_eq!(
            catalog.display_text(PresentationType::FullPolaroid).as_deref(),
            Some("full polaroid")
        );
    }
}
