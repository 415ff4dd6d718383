//! Desktop notifications.
//!
//! Notices are queued to a dedicated thread so callers never block, and that
//! thread keeps consecutive toasts at least `min_spacing` apart.

use crate::{AppResult, config::NotificationConfig};

use std::{
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use cursor_lock_core::{Notice, Notifier};
use notify_rust::{Notification, Timeout};
use tracing::{debug, info, instrument, warn};

/// Application name shown on toasts.
const APP_NAME: &str = "Cursor Lock";

/// How long to wait before showing the next toast.
pub fn spacing_delay(last_shown: Option<Instant>, now: Instant, min_spacing: Duration) -> Duration {
    match last_shown {
        Some(last) => min_spacing.saturating_sub(now.saturating_duration_since(last)),
        None => Duration::ZERO,
    }
}

/// [`Notifier`] backed by `notify-rust`.
pub struct ToastNotifier {
    tx: mpsc::Sender<Notice>,
}

impl ToastNotifier {
    /// Start the delivery thread.
    #[instrument(skip(config))]
    pub fn spawn(config: &NotificationConfig) -> AppResult<Self> {
        let (tx, rx) = mpsc::channel::<Notice>();
        let enabled = config.enabled;
        let min_spacing = config.min_spacing();

        thread::Builder::new()
            .name("notifier".to_string())
            .spawn(move || deliver(rx, enabled, min_spacing))?;

        info!(enabled, min_spacing_ms = min_spacing.as_millis(), "Notifier started");
        Ok(Self { tx })
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            warn!("Notifier thread is gone, dropping notice");
        }
    }
}

fn deliver(rx: mpsc::Receiver<Notice>, enabled: bool, min_spacing: Duration) {
    let mut last_shown: Option<Instant> = None;

    for notice in rx {
        info!(title = %notice.title, message = %notice.message, "Notice");
        if !enabled {
            continue;
        }

        let delay = spacing_delay(last_shown, Instant::now(), min_spacing);
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        show(&notice);
        last_shown = Some(Instant::now());
    }

    debug!("Notifier channel closed");
}

fn show(notice: &Notice) {
    let timeout_ms = u32::try_from(notice.duration.as_millis()).unwrap_or(u32::MAX);

    match Notification::new()
        .appname(APP_NAME)
        .summary(&notice.title)
        .body(&notice.message)
        .timeout(Timeout::Milliseconds(timeout_ms))
        .show()
    {
        Ok(_) => debug!(title = %notice.title, "Notification shown"),
        Err(e) => warn!(title = %notice.title, error = %e, "Failed to show notification"),
    }
}
