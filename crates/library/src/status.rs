//! One-line auto-backup status for the editor header.

use crate::session::Session;
use derive_more::Display;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BackupStatus {
    /// No book is open, so there is nothing to back up.
    #[display("Auto-backup active")]
    Active,
    /// A book is open but has no history yet.
    #[display("Creating first backup...")]
    FirstBackupPending,
    #[display("Last backup: {}", format_age(*age))]
    LastBackup { age: Duration },
}
impl BackupStatus {
    /// Highlight the status until a first capture exists.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::FirstBackupPending)
    }
}

fn format_age(age: Duration) -> String {
    let minutes = age.as_secs() / 60;
    match minutes {
        0 => "Just now".to_string(),
        1..60 => format!("{minutes}m ago"),
        _ => format!("{}h ago", minutes / 60),
    }
}

impl Session {
    pub fn backup_status(&self) -> BackupStatus {
        let Some(book) = self.current_book() else {
            return BackupStatus::Active;
        };
        match book.latest_history_entry() {
            Some(entry) => BackupStatus::LastBackup { age: self.clock.now().since(entry.timestamp) },
            None => BackupStatus::FirstBackupPending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::Fixture;
    use rstest::rstest;

    #[rstest]
    #[case(0, "Last backup: Just now")]
    #[case(59, "Last backup: Just now")]
    #[case(60, "Last backup: 1m ago")]
    #[case(59 * 60 + 59, "Last backup: 59m ago")]
    #[case(60 * 60, "Last backup: 1h ago")]
    #[case(5 * 60 * 60 + 30 * 60, "Last backup: 5h ago")]
    fn test_last_backup_display(#[case] secs: u64, #[case] expected: &str) {
        let status = BackupStatus::LastBackup { age: Duration::from_secs(secs) };
        assert_eq!(status.to_string(), expected);
        assert!(!status.is_warning());
    }

    #[test]
    fn test_status_follows_session() {
        let mut fx = Fixture::new();
        assert_eq!(fx.session.backup_status(), BackupStatus::Active);

        fx.session.create_book().unwrap();
        let status = fx.session.backup_status();
        assert_eq!(status, BackupStatus::FirstBackupPending);
        assert_eq!(status.to_string(), "Creating first backup...");
        assert!(status.is_warning());

        fx.session.capture_current().unwrap();
        fx.tick(3 * 60 * 1000);
        assert_eq!(fx.session.backup_status().to_string(), "Last backup: 3m ago");

        fx.session.close_book();
        assert_eq!(fx.session.backup_status().to_string(), "Auto-backup active");
    }
}
