//! Alert scripts for the demo binary.
//!
//! A script is a JSON array of alerts queued in order:
//!
//! ```json
//! [
//!   { "title": "Booking confirmed", "kind": "success" },
//!   { "title": "Cancel booking?", "message": "The professional will be notified",
//!     "buttons": [
//!       { "text": "Keep", "style": "cancel" },
//!       { "text": "Cancel booking", "style": "destructive",
//!         "then": { "title": "Booking cancelled", "kind": "info" } }
//!     ],
//!     "after_ms": 200 }
//! ]
//! ```
//!
//! `then` on a button queues a follow-up alert from that button's handler.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::time;

use crate::alerts::{
    AlertButton, AlertManager, AlertType, ButtonStyle, NewAlert, WeakAlertManager,
};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedAlert {
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub buttons: Vec<ScriptedButton>,
    #[serde(default)]
    pub kind: Option<AlertType>,
    /// Wait this long after the previous entry before queueing.
    #[serde(default)]
    pub after_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedButton {
    pub text: String,
    #[serde(default)]
    pub style: ButtonStyle,
    #[serde(default)]
    pub then: Option<Box<ScriptedAlert>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AlertScript {
    pub alerts: Vec<ScriptedAlert>,
}

impl AlertScript {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|source| AppError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// One plain alert per title.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alerts: titles
                .into_iter()
                .map(|title| ScriptedAlert {
                    title: title.into(),
                    message: None,
                    buttons: Vec::new(),
                    kind: None,
                    after_ms: 0,
                })
                .collect(),
        }
    }

    pub fn extend(&mut self, other: AlertScript) {
        self.alerts.extend(other.alerts);
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Queue every entry on `manager`, honouring `after_ms`.
    pub async fn play(&self, manager: &AlertManager) {
        let weak = manager.downgrade();
        for entry in &self.alerts {
            if entry.after_ms > 0 {
                time::sleep(Duration::from_millis(entry.after_ms)).await;
            }
            manager.alert(entry.to_new_alert(&weak));
        }
    }
}

impl ScriptedAlert {
    pub fn to_new_alert(&self, manager: &WeakAlertManager) -> NewAlert {
        let mut alert = NewAlert::new(self.title.clone())
            .buttons(self.buttons.iter().map(|b| b.to_button(manager)));
        if let Some(message) = &self.message {
            alert = alert.message(message.clone());
        }
        if let Some(kind) = self.kind {
            alert = alert.kind(kind);
        }
        alert
    }
}

impl ScriptedButton {
    fn to_button(&self, manager: &WeakAlertManager) -> AlertButton {
        let button = AlertButton::new(self.text.clone()).with_style(self.style);
        match &self.then {
            None => button,
            Some(follow_up) => {
                let follow_up = follow_up.as_ref().clone();
                let manager = manager.clone();
                button.on_press(move || {
                    if let Some(manager) = manager.upgrade() {
                        manager.alert(follow_up.to_new_alert(&manager.downgrade()));
                    }
                })
            }
        }
    }
}
