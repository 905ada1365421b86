//! Alert request factory.
//!
//! Turns caller arguments into a normalised [`AlertRequest`]: assigns the
//! next id and fills in the default button and type.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::alerts::types::{AlertButton, AlertId, AlertRequest, AlertType, DismissHandle};

/// Caller-side description of an alert, before normalisation.
#[derive(Debug, Clone, Default)]
pub struct NewAlert {
    title: String,
    message: Option<String>,
    buttons: Vec<AlertButton>,
    kind: Option<AlertType>,
}

impl NewAlert {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn button(mut self, button: AlertButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn buttons(mut self, buttons: impl IntoIterator<Item = AlertButton>) -> Self {
        self.buttons.extend(buttons);
        self
    }

    pub fn kind(mut self, kind: AlertType) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl From<&str> for NewAlert {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<String> for NewAlert {
    fn from(title: String) -> Self {
        Self::new(title)
    }
}

/// Builds requests with strictly increasing ids.
#[derive(Debug, Default)]
pub struct AlertFactory {
    next_id: AtomicU64,
}

impl AlertFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, alert: NewAlert, on_dismiss: DismissHandle) -> AlertRequest {
        let id = AlertId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));

        let buttons = if alert.buttons.is_empty() {
            vec![AlertButton::ok()]
        } else {
            alert.buttons
        };

        AlertRequest::new(
            id,
            alert.title,
            alert.message,
            buttons,
            alert.kind.unwrap_or_default(),
            on_dismiss,
        )
    }
}
