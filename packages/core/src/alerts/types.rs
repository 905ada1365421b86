//! Core data types for alert requests.

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label used when a request is created without any buttons.
pub const DEFAULT_BUTTON_TEXT: &str = "OK";

/// Opaque identifier correlating a dismissal with the request it targets.
///
/// Ids are handed out by a single manager in strictly increasing order and
/// are never reused by that manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AlertId(u64);

impl AlertId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alert-{}", self.0)
    }
}

/// Presentational category of an alert. Has no effect on ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    #[default]
    Default,
    Success,
    Error,
    Warning,
    Info,
}

/// Visual role of a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Default,
    Cancel,
    Destructive,
}

/// Handler run when the user presses a button, before the alert is dismissed.
pub type PressHandler = Arc<dyn Fn() + Send + Sync>;

/// A single button shown on an alert.
#[derive(Clone)]
pub struct AlertButton {
    pub text: String,
    pub style: ButtonStyle,
    on_press: Option<PressHandler>,
}

impl AlertButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: ButtonStyle::Default,
            on_press: None,
        }
    }

    /// The button used when a caller supplies none.
    pub fn ok() -> Self {
        Self::new(DEFAULT_BUTTON_TEXT)
    }

    pub fn cancel(text: impl Into<String>) -> Self {
        Self::new(text).with_style(ButtonStyle::Cancel)
    }

    pub fn destructive(text: impl Into<String>) -> Self {
        Self::new(text).with_style(ButtonStyle::Destructive)
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Attach a handler invoked when this button is pressed.
    pub fn on_press(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_press = Some(Arc::new(handler));
        self
    }

    pub fn has_handler(&self) -> bool {
        self.on_press.is_some()
    }

    pub(crate) fn run_handler(&self) {
        if let Some(handler) = &self.on_press {
            handler();
        }
    }
}

impl fmt::Debug for AlertButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertButton")
            .field("text", &self.text)
            .field("style", &self.style)
            .field("on_press", &self.on_press.is_some())
            .finish()
    }
}

/// Something that can take a dismissal for a given id.
///
/// Implemented by the manager; requests only ever hold it weakly.
pub(crate) trait DismissRoute: Send + Sync {
    fn dismiss(&self, id: AlertId);
}

struct Detached;

impl DismissRoute for Detached {
    fn dismiss(&self, _id: AlertId) {}
}

/// Dismiss path bound to one request id by the manager that created it.
#[derive(Clone)]
pub struct DismissHandle {
    route: Weak<dyn DismissRoute>,
}

impl DismissHandle {
    pub(crate) fn new(route: Weak<dyn DismissRoute>) -> Self {
        Self { route }
    }

    /// A handle that routes nowhere; dismissing through it does nothing.
    pub fn detached() -> Self {
        let route: Weak<dyn DismissRoute> = Weak::<Detached>::new();
        Self { route }
    }

    fn dismiss(&self, id: AlertId) {
        match self.route.upgrade() {
            Some(route) => route.dismiss(id),
            None => tracing::debug!(%id, "dismiss after manager was dropped, ignoring"),
        }
    }
}

/// A normalised alert request.
#[derive(Clone)]
pub struct AlertRequest {
    id: AlertId,
    title: String,
    message: Option<String>,
    buttons: Vec<AlertButton>,
    kind: AlertType,
    created_at: DateTime<Utc>,
    on_dismiss: DismissHandle,
}

impl AlertRequest {
    pub(crate) fn new(
        id: AlertId,
        title: String,
        message: Option<String>,
        buttons: Vec<AlertButton>,
        kind: AlertType,
        on_dismiss: DismissHandle,
    ) -> Self {
        debug_assert!(!buttons.is_empty());
        Self {
            id,
            title,
            message,
            buttons,
            kind,
            created_at: Utc::now(),
            on_dismiss,
        }
    }

    pub fn id(&self) -> AlertId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Buttons in display order. Never empty.
    pub fn buttons(&self) -> &[AlertButton] {
        &self.buttons
    }

    pub fn kind(&self) -> AlertType {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Hand this request back to its manager as dismissed.
    ///
    /// Ignored unless this request is the one currently active.
    pub fn dismiss(&self) {
        self.on_dismiss.dismiss(self.id);
    }

    /// Run the handler of the button at `index`, then dismiss.
    ///
    /// The handler runs first so it can chain a follow-up alert, which is
    /// queued behind anything already waiting. An index with no button
    /// just dismisses.
    pub fn press(&self, index: usize) {
        match self.buttons.get(index) {
            Some(button) => button.run_handler(),
            None => tracing::warn!(id = %self.id, index, "pressed a button that does not exist"),
        }
        self.dismiss();
    }

    /// Callback-free view of this request.
    pub fn snapshot(&self) -> AlertView {
        AlertView {
            id: self.id,
            title: self.title.clone(),
            message: self.message.clone(),
            buttons: self
                .buttons
                .iter()
                .map(|b| ButtonView {
                    text: b.text.clone(),
                    style: b.style,
                })
                .collect(),
            kind: self.kind,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for AlertRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertRequest")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("message", &self.message)
            .field("buttons", &self.buttons)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Serialisable view of a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub text: String,
    pub style: ButtonStyle,
}

/// Serialisable view of a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertView {
    pub id: AlertId,
    pub title: String,
    pub message: Option<String>,
    pub buttons: Vec<ButtonView>,
    pub kind: AlertType,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<AlertId>>);

    impl DismissRoute for Recorder {
        fn dismiss(&self, id: AlertId) {
            self.0.lock().unwrap().push(id);
        }
    }

    fn make_request(route: &Arc<Recorder>, buttons: Vec<AlertButton>) -> AlertRequest {
        let weak: Weak<dyn DismissRoute> = Arc::downgrade(route) as Weak<dyn DismissRoute>;
        AlertRequest::new(
            AlertId::from_raw(7),
            "Title".to_string(),
            None,
            buttons,
            AlertType::Info,
            DismissHandle::new(weak),
        )
    }

    #[test]
    fn alert_id_displays_with_prefix() {
        assert_eq!(AlertId::from_raw(3).to_string(), "alert-3");
    }

    #[test]
    fn dismiss_routes_own_id() {
        let route = Arc::new(Recorder(Mutex::new(Vec::new())));
        let request = make_request(&route, vec![AlertButton::ok()]);

        request.dismiss();

        assert_eq!(*route.0.lock().unwrap(), vec![AlertId::from_raw(7)]);
    }

    #[test]
    fn press_runs_handler_before_dismissing() {
        let route = Arc::new(Recorder(Mutex::new(Vec::new())));
        let seen_before_dismiss = Arc::new(AtomicUsize::new(usize::MAX));

        let route_probe = route.clone();
        let seen = seen_before_dismiss.clone();
        let button = AlertButton::new("Go").on_press(move || {
            seen.store(route_probe.0.lock().unwrap().len(), Ordering::SeqCst);
        });
        let request = make_request(&route, vec![button]);

        request.press(0);

        assert_eq!(seen_before_dismiss.load(Ordering::SeqCst), 0);
        assert_eq!(route.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn press_out_of_range_still_dismisses() {
        let route = Arc::new(Recorder(Mutex::new(Vec::new())));
        let request = make_request(&route, vec![AlertButton::ok()]);

        request.press(5);

        assert_eq!(route.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn detached_handle_is_a_no_op() {
        let request = AlertRequest::new(
            AlertId::from_raw(1),
            "Orphan".to_string(),
            None,
            vec![AlertButton::ok()],
            AlertType::Default,
            DismissHandle::detached(),
        );
        request.press(0);
    }

    #[test]
    fn snapshot_drops_callbacks_and_keeps_fields() {
        let route = Arc::new(Recorder(Mutex::new(Vec::new())));
        let request = make_request(
            &route,
            vec![AlertButton::cancel("No").on_press(|| {}), AlertButton::destructive("Delete")],
        );

        let view = request.snapshot();
        assert_eq!(view.title, "Title");
        assert_eq!(view.kind, AlertType::Info);
        assert_eq!(
            view.buttons,
            vec![
                ButtonView { text: "No".into(), style: ButtonStyle::Cancel },
                ButtonView { text: "Delete".into(), style: ButtonStyle::Destructive },
            ]
        );
    }

    #[test]
    fn styles_and_types_use_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&ButtonStyle::Destructive).unwrap(), "\"destructive\"");
        let kind: AlertType = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(kind, AlertType::Warning);
    }
}
