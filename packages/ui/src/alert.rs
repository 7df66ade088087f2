//! Alert channel: the single notification banner shared by every view.

use crate::observable::{Observable, Subscription};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

impl AlertKind {
    pub fn css_class(self) -> &'static str {
        match self {
            AlertKind::Success => "alert alert-success",
            AlertKind::Error => "alert alert-error",
            AlertKind::Info => "alert alert-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    /// Survive the next route change (once).
    pub keep_after_route_change: bool,
}

/// Holds at most one alert; the latest call wins.
#[derive(Clone, Debug, Default)]
pub struct AlertChannel {
    current: Observable<Option<Alert>>,
}

impl AlertChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Alert> {
        self.current.get()
    }

    pub fn subscribe(&self, listener: impl Fn(&Option<Alert>) + 'static) -> Subscription {
        self.current.subscribe(listener)
    }

    pub fn success(&self, message: impl Into<String>, keep_after_route_change: bool) {
        self.show(AlertKind::Success, message.into(), keep_after_route_change);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(AlertKind::Error, message.into(), false);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.show(AlertKind::Info, message.into(), false);
    }

    pub fn clear(&self) {
        if self.current.with(Option::is_some) {
            self.current.set(None);
        }
    }

    /// Called once per navigation. A flagged alert loses its flag and stays for
    /// the new page; anything else is cleared.
    pub fn route_changed(&self) {
        match self.current.get() {
            Some(alert) if alert.keep_after_route_change => {
                self.current.set(Some(Alert {
                    keep_after_route_change: false,
                    ..alert
                }));
            }
            Some(_) => self.current.set(None),
            None => {}
        }
    }

    fn show(&self, kind: AlertKind, message: String, keep_after_route_change: bool) {
        tracing::debug!("alert ({:?}): {}", kind, message);
        self.current.set(Some(Alert {
            kind,
            message,
            keep_after_route_change,
        }));
    }
}
