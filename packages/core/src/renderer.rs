//! Console stand-in for the on-screen alert renderer.
//!
//! Subscribes to an [`AlertManager`], logs every alert it is given and,
//! after a hold period, presses the alert's preferred button exactly like
//! a user would: the button handler runs first, then the dismissal.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time;

use crate::alerts::{AlertManager, AlertRequest, ButtonStyle, Subscription};

pub struct ConsoleRenderer {
    subscription: Subscription,
    shown: Arc<AtomicUsize>,
}

impl ConsoleRenderer {
    /// Start rendering alerts published by `manager`.
    pub fn attach(manager: &AlertManager, hold: Duration) -> Self {
        let shown = Arc::new(AtomicUsize::new(0));
        let counter = shown.clone();

        let subscription = manager.subscribe(move |current| match current {
            Some(request) => {
                counter.fetch_add(1, Ordering::SeqCst);
                present(request);
                schedule_press(request.clone(), hold);
            }
            None => tracing::info!("Alert hidden"),
        });

        Self {
            subscription,
            shown,
        }
    }

    /// Number of alerts presented so far.
    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }

    pub fn detach(&self) {
        self.subscription.unsubscribe();
    }
}

/// Index of the button a hurried user would press: the first cancel-style
/// button, else the first one.
pub fn preferred_button(request: &AlertRequest) -> usize {
    request
        .buttons()
        .iter()
        .position(|b| b.style == ButtonStyle::Cancel)
        .unwrap_or(0)
}

fn present(request: &AlertRequest) {
    let buttons: Vec<&str> = request.buttons().iter().map(|b| b.text.as_str()).collect();
    tracing::info!(
        "[{:?}] {}{} {:?}",
        request.kind(),
        request.title(),
        request
            .message()
            .map(|m| format!(" - {}", m))
            .unwrap_or_default(),
        buttons,
    );
}

fn schedule_press(request: AlertRequest, hold: Duration) {
    let Ok(runtime) = Handle::try_current() else {
        tracing::warn!("No Tokio runtime; alert {} will stay up", request.id());
        return;
    };
    runtime.spawn(async move {
        time::sleep(hold).await;
        let index = preferred_button(&request);
        tracing::info!(
            "Pressing {:?} on {}",
            request.buttons()[index].text,
            request.id()
        );
        request.press(index);
    });
}
