//! Run notifications: Slack delivery, report formatting, logging setup.

mod logging;
mod report;
mod slack;

pub use logging::setup_logging;
pub use report::{build_notification, fills_digest, format_usd};
pub use slack::SlackNotifier;
