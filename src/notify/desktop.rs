//! Freedesktop notifications over D-Bus, through `notify-rust`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use notify_rust::{CloseReason, Hint, Notification, NotificationResponse, Timeout, Urgency};
use tracing::{debug, trace, warn};

use super::Notifier;
use super::backend::{LoadBackend, NotificationBackend, NotificationFields};
use super::request::{ActionCallback, HintValue};
use crate::error::NotifyError;

const REASON_UNSET: i32 = -1;
const DEFAULT_APP_NAME: &str = "panelkit";

/// Facade wired to the session's notification daemon.
#[must_use]
pub fn notifier() -> Notifier<DesktopLoader> {
    Notifier::new(DesktopLoader)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopLoader;

impl LoadBackend for DesktopLoader {
    type Backend = DesktopBackend;

    fn load(&self) -> Result<DesktopBackend, NotifyError> {
        Ok(DesktopBackend::default())
    }
}

#[derive(Debug)]
pub struct DesktopBackend {
    initialized: AtomicBool,
    app_name: Mutex<String>,
}

impl Default for DesktopBackend {
    fn default() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            app_name: Mutex::new(DEFAULT_APP_NAME.to_string()),
        }
    }
}

/// Shared handle to a notification built by [`DesktopBackend`].
#[derive(Clone, Default)]
pub struct DesktopNotification {
    state: Arc<Mutex<State>>,
}

struct State {
    builder: Notification,
    actions: Vec<ActionCallback>,
    on_closed: Option<Box<dyn FnOnce(i32) + Send>>,
    closed_reason: i32,
    server_id: Option<u32>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            builder: Notification::new(),
            actions: Vec::new(),
            on_closed: None,
            closed_reason: REASON_UNSET,
            server_id: None,
        }
    }
}

impl DesktopNotification {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store the close code, then run the close subscription. Only the first
    /// close counts.
    fn finish(&self, code: i32) {
        let on_closed = {
            let mut state = self.lock();
            if state.closed_reason != REASON_UNSET {
                return;
            }
            state.closed_reason = code;
            state.on_closed.take()
        };
        if let Some(on_closed) = on_closed {
            on_closed(code);
        }
    }

    /// Id assigned by the daemon once shown.
    #[must_use]
    pub fn server_id(&self) -> Option<u32> {
        self.lock().server_id
    }
}

impl std::fmt::Debug for DesktopNotification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("DesktopNotification")
            .field("summary", &state.builder.summary)
            .field("actions", &state.actions.len())
            .field("server_id", &state.server_id)
            .finish_non_exhaustive()
    }
}

impl NotificationBackend for DesktopBackend {
    type Notification = DesktopNotification;
    type Error = NotifyError;

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn initialize(&self, app_name: Option<&str>) -> Result<(), NotifyError> {
        let info = notify_rust::get_server_information()
            .map_err(|err| NotifyError::unavailable(err.to_string()))?;
        debug!(
            server = %info.name,
            vendor = %info.vendor,
            version = %info.version,
            "notification daemon found"
        );
        if let Some(name) = app_name {
            *self.app_name.lock().unwrap_or_else(PoisonError::into_inner) = name.to_string();
        }
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    fn app_name(&self) -> String {
        self.app_name
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn construct(&self, fields: NotificationFields<'_>) -> Result<DesktopNotification, NotifyError> {
        let notification = DesktopNotification::default();
        {
            let mut state = notification.lock();
            state
                .builder
                .summary(fields.summary)
                .body(fields.body)
                .icon(fields.icon_name)
                .appname(fields.app_name);
            if fields.id != 0 {
                state.builder.id(fields.id);
            }
        }
        Ok(notification)
    }

    fn set_urgency(&self, notification: &DesktopNotification, level: u8) -> Result<(), NotifyError> {
        let urgency = match level {
            0 => Urgency::Low,
            2 => Urgency::Critical,
            _ => Urgency::Normal,
        };
        notification.lock().builder.urgency(urgency);
        Ok(())
    }

    fn set_timeout(
        &self,
        notification: &DesktopNotification,
        timeout_ms: i32,
    ) -> Result<(), NotifyError> {
        notification.lock().builder.timeout(map_timeout(timeout_ms));
        Ok(())
    }

    fn set_hint(
        &self,
        notification: &DesktopNotification,
        key: &str,
        value: HintValue,
    ) -> Result<(), NotifyError> {
        notification.lock().builder.hint(map_hint(key, value));
        Ok(())
    }

    fn add_action(
        &self,
        notification: &DesktopNotification,
        id: &str,
        label: &str,
        callback: ActionCallback,
    ) -> Result<(), NotifyError> {
        let mut state = notification.lock();
        state.builder.action(id, label);
        state.actions.push(callback);
        Ok(())
    }

    fn subscribe_closed(
        &self,
        notification: &DesktopNotification,
        callback: Box<dyn FnOnce(i32) + Send>,
    ) -> Result<(), NotifyError> {
        notification.lock().on_closed = Some(callback);
        Ok(())
    }

    /// Shows the notification from a dedicated thread that then waits for the
    /// first response from the daemon. The D-Bus handle never leaves that
    /// thread.
    ///
    /// The wait ends at the first response: an invoked action or the close
    /// signal. A close that follows an invoked action is not observed.
    fn show(&self, notification: &DesktopNotification) -> Result<(), NotifyError> {
        let (builder, actions) = {
            let state = notification.lock();
            (state.builder.clone(), state.actions.clone())
        };
        let shared = notification.clone();
        let (shown_tx, shown_rx) = mpsc::channel();

        thread::Builder::new()
            .name("notify-dispatch".to_string())
            .spawn(move || {
                let handle = match builder.show() {
                    Ok(handle) => handle,
                    Err(err) => {
                        let _ = shown_tx.send(Err(NotifyError::backend(err)));
                        return;
                    }
                };
                let server_id = handle.id();
                let _ = shown_tx.send(Ok(server_id));

                let waited = handle.wait_for_response(|response: &NotificationResponse| {
                    if let Some(code) = route_response(response, &actions) {
                        shared.finish(code);
                    }
                });
                if let Err(err) = waited {
                    warn!(server_id, error = %err, "lost track of notification");
                }
            })
            .map_err(NotifyError::backend)?;

        let server_id = shown_rx.recv().map_err(NotifyError::backend)??;
        debug!(server_id, "notification shown");
        notification.lock().server_id = Some(server_id);
        Ok(())
    }

    fn closed_reason(&self, notification: &DesktopNotification) -> i32 {
        notification.lock().closed_reason
    }
}

/// Runs the action callback a response selects. Returns the raw close code
/// when the response is the close signal.
fn route_response(response: &NotificationResponse, actions: &[ActionCallback]) -> Option<i32> {
    match response {
        NotificationResponse::Action(action) => {
            trace!(action, "notification action");
            match action.parse::<usize>().ok().and_then(|index| actions.get(index)) {
                Some(callback) => callback(),
                None => warn!(action, "unknown notification action"),
            }
            None
        }
        NotificationResponse::Default => {
            trace!("notification body activated");
            None
        }
        NotificationResponse::Reply(_) => None,
        NotificationResponse::Closed(reason) => Some(close_code(*reason)),
    }
}

fn close_code(reason: CloseReason) -> i32 {
    match reason {
        CloseReason::Expired => 1,
        CloseReason::Dismissed => 2,
        CloseReason::CloseAction => 3,
        // Out-of-range codes land on 0, which reads back as undefined.
        CloseReason::Other(code) => i32::try_from(code).unwrap_or(0),
    }
}

/// `0` keeps the daemon's default, negative values never expire.
fn map_timeout(timeout_ms: i32) -> Timeout {
    match u32::try_from(timeout_ms) {
        Ok(0) => Timeout::Default,
        Ok(ms) => Timeout::Milliseconds(ms),
        Err(_) => Timeout::Never,
    }
}

fn map_hint(key: &str, value: HintValue) -> Hint {
    match (key, value) {
        ("action-icons", HintValue::Bool(flag)) => Hint::ActionIcons(flag),
        ("category", HintValue::Str(text)) => Hint::Category(text),
        ("desktop-entry", HintValue::Str(text)) => Hint::DesktopEntry(text),
        ("image-path", HintValue::Str(text)) => Hint::ImagePath(text),
        ("resident", HintValue::Bool(flag)) => Hint::Resident(flag),
        ("sound-file", HintValue::Str(text)) => Hint::SoundFile(text),
        ("sound-name", HintValue::Str(text)) => Hint::SoundName(text),
        ("suppress-sound", HintValue::Bool(flag)) => Hint::SuppressSound(flag),
        ("transient", HintValue::Bool(flag)) => Hint::Transient(flag),
        ("x", HintValue::Int(pos)) => Hint::X(pos),
        ("y", HintValue::Int(pos)) => Hint::Y(pos),
        (key, HintValue::Int(number)) => Hint::CustomInt(key.to_string(), number),
        (key, HintValue::Str(text)) => Hint::Custom(key.to_string(), text),
        (key, HintValue::Bool(flag)) => Hint::Custom(key.to_string(), flag.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{DesktopBackend, DesktopNotification, map_hint, map_timeout, route_response};
    use crate::notify::{ActionCallback, HintValue, NotificationBackend};
    use crate::types::ClosedReason;
    use notify_rust::{CloseReason, Hint, NotificationResponse, Timeout};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counting_actions(count: usize) -> (Vec<ActionCallback>, Vec<Arc<AtomicUsize>>) {
        let counters: Vec<_> = (0..count).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let actions = counters
            .iter()
            .map(|counter| {
                let counter = Arc::clone(counter);
                Arc::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                }) as ActionCallback
            })
            .collect();
        (actions, counters)
    }

    #[test]
    fn timeout_zero_keeps_daemon_default() {
        assert_eq!(map_timeout(0), Timeout::Default);
        assert_eq!(map_timeout(-1), Timeout::Never);
        assert_eq!(map_timeout(2_500), Timeout::Milliseconds(2_500));
    }

    #[test]
    fn known_hints_map_to_typed_variants() {
        assert_eq!(map_hint("transient", HintValue::Bool(true)), Hint::Transient(true));
        assert_eq!(map_hint("x", HintValue::Int(12)), Hint::X(12));
        assert_eq!(
            map_hint("x-panel-slot", HintValue::Int(3)),
            Hint::CustomInt("x-panel-slot".to_string(), 3)
        );
    }

    #[test]
    fn action_response_runs_its_callback_without_closing() {
        let (actions, counters) = counting_actions(2);

        let code = route_response(&NotificationResponse::Action("1".into()), &actions);

        assert_eq!(code, None);
        assert_eq!(counters[0].load(Ordering::SeqCst), 0);
        assert_eq!(counters[1].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn default_and_unknown_actions_run_nothing() {
        let (actions, counters) = counting_actions(1);

        assert_eq!(route_response(&NotificationResponse::Default, &actions), None);
        assert_eq!(
            route_response(&NotificationResponse::Action("7".into()), &actions),
            None
        );
        assert_eq!(counters[0].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn close_responses_carry_the_daemon_reason() {
        let (actions, counters) = counting_actions(1);
        let closed = |reason| route_response(&NotificationResponse::Closed(reason), &actions);

        assert_eq!(closed(CloseReason::Expired), Some(1));
        assert_eq!(closed(CloseReason::Dismissed), Some(2));
        assert_eq!(closed(CloseReason::CloseAction), Some(3));
        assert_eq!(closed(CloseReason::Other(9)), Some(9));
        assert_eq!(closed(CloseReason::Other(u32::MAX)), Some(0));
        assert_eq!(counters[0].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn finish_records_the_reason_and_notifies_once() {
        let backend = DesktopBackend::default();
        let notification = DesktopNotification::default();
        let seen: Arc<Mutex<Vec<i32>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let subscribed = backend.subscribe_closed(
            &notification,
            Box::new(move |code| sink.lock().unwrap_or_else(|err| err.into_inner()).push(code)),
        );
        assert!(subscribed.is_ok());
        assert_eq!(backend.closed_reason(&notification), -1);

        notification.finish(2);
        notification.finish(3);

        assert_eq!(backend.closed_reason(&notification), 2);
        assert_eq!(
            ClosedReason::from_code(backend.closed_reason(&notification)),
            ClosedReason::Dismissed
        );
        assert_eq!(*seen.lock().unwrap_or_else(|err| err.into_inner()), vec![2]);
    }
}
