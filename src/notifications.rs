//! User-facing notification events and their delivery
//! Desktop notifications are only implemented on macOS

use crate::domain::Severity;
use std::fmt;

#[cfg(target_os = "macos")]
use std::process::Command;

/// A discrete `{message, severity}` event for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    /// Terminal marker for the severity
    pub fn marker(&self) -> &'static str {
        match self.severity {
            Severity::Info => "ℹ",
            Severity::Success => "✔",
            Severity::Error => "✖",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.message)
    }
}

/// Show a notice in the terminal; errors go to stderr
pub fn deliver(notice: &Notice) {
    match notice.severity {
        Severity::Error => {
            tracing::debug!(message = %notice.message, "error notice");
            eprintln!("{}", notice);
        }
        _ => {
            tracing::debug!(message = %notice.message, severity = ?notice.severity, "notice");
            println!("{}", notice);
        }
    }
}

/// Show a notice in the terminal and as a desktop notification
pub fn deliver_with_alert(notice: &Notice) {
    deliver(notice);
    notify_desktop("StudyFlow", &notice.message);
}

fn notify_desktop(title: &str, body: &str) {
    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "{}" sound name "Glass""#,
            body.replace('"', "\\\""),
            title.replace('"', "\\\"")
        );

        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(error = %e, "desktop notification failed");
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        // No-op on other platforms
        let _ = (title, body);
    }
}
