use std::time::{Duration, Instant};

use ratatui::style::{Color, Style};

/// How long a notification stays on screen.
pub(crate) const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Severity levels shown in the footer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    pub(crate) fn style(&self) -> Style {
        match self {
            NotificationKind::Success => Style::default().fg(Color::Green),
            NotificationKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Message text plus its severity and the moment it appeared.
#[derive(Clone, Debug)]
pub(crate) struct Notification {
    pub(crate) text: String,
    pub(crate) kind: NotificationKind,
    shown_at: Instant,
}

/// Holds at most one notification. A new message replaces the current one and
/// restarts the timer.
#[derive(Default, Debug)]
pub(crate) struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub(crate) fn show<S: Into<String>>(&mut self, text: S, kind: NotificationKind, now: Instant) {
        self.current = Some(Notification {
            text: text.into(),
            kind,
            shown_at: now,
        });
    }

    /// The notification still on screen at `now`, if any.
    pub(crate) fn visible(&self, now: Instant) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|note| now.saturating_duration_since(note.shown_at) < NOTIFICATION_TTL)
    }

    /// The current notification regardless of age. The draw path uses this
    /// because expiry is driven by [`Notifier::expire`] on every tick.
    pub(crate) fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Drop the notification once its time is up.
    pub(crate) fn expire(&mut self, now: Instant) {
        if self.visible(now).is_none() {
            self.current = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_after_five_seconds() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.show("Student added successfully.", NotificationKind::Success, start);

        assert!(notifier.visible(start + Duration::from_millis(4_999)).is_some());
        assert!(notifier.visible(start + NOTIFICATION_TTL).is_none());

        notifier.expire(start + Duration::from_secs(6));
        assert!(notifier.current().is_none());
    }

    #[test]
    fn new_message_replaces_and_restarts_the_timer() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.show("first", NotificationKind::Success, start);

        let later = start + Duration::from_secs(4);
        notifier.show("second", NotificationKind::Error, later);

        let check = start + Duration::from_secs(6);
        notifier.expire(check);
        let note = notifier.visible(check).expect("second message still visible");
        assert_eq!(note.text, "second");
        assert_eq!(note.kind, NotificationKind::Error);

        notifier.expire(later + NOTIFICATION_TTL);
        assert!(notifier.current().is_none());
    }

    #[test]
    fn expire_keeps_fresh_messages() {
        let start = Instant::now();
        let mut notifier = Notifier::default();
        notifier.show("fresh", NotificationKind::Success, start);
        notifier.expire(start + Duration::from_secs(1));
        assert!(notifier.current().is_some());
    }
}
