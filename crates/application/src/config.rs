use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Whether clearing the gallery also forgets the type and color choices.
    pub clear_resets_choices: bool,
    /// Queue cosmetic effects. Headless runs turn this off.
    pub staged_reveals: bool,
    pub expand_delay_ms: u64,
    pub reveal_delay_ms: u64,
    pub scroll_delay_ms: u64,
    pub fade_in_delay_ms: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            clear_resets_choices: false,
            staged_reveals: true,
            expand_delay_ms: 500,
            reveal_delay_ms: 300,
            scroll_delay_ms: 350,
            fade_in_delay_ms: 10,
        }
    }
}

impl WizardConfig {
    pub fn expand_delay(&self) -> Duration {
        Duration::from_millis(self.expand_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn fade_in_delay(&self) -> Duration {
        Duration::from_millis(self.fade_in_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_wizard_timings() {
        let config = WizardConfig::default();
        assert!(!config.clear_resets_choices);
        assert!(config.staged_reveals);
        assert_eq!(config.expand_delay(), Duration::from_millis(500));
        assert_eq!(config.reveal_delay(), Duration::from_millis(300));
        assert_eq!(config.scroll_delay(), Duration::from_millis(350));
    }
}
