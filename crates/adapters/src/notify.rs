use polaroid_studio_application::Notifier;
use tracing::{info, warn};

/// Notifier for runs without a user at the keyboard. Alerts go to the log and
/// every confirmation gets the same scripted answer.
#[derive(Debug)]
pub struct LogNotifier {
    assume_yes: bool,
}

impl LogNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(%message, "alert");
    }

    fn confirm(&self, message: &str) -> bool {
        info!(%message, answer = self.assume_yes, "confirmation answered without prompting");
        self.assume_yes
    }
}
