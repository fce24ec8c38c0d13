use super::request::{ActionCallback, HintValue};
use crate::error::NotifyError;

/// Fields a backend notification is created from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotificationFields<'a> {
    pub summary: &'a str,
    pub body: &'a str,
    pub id: u32,
    pub icon_name: &'a str,
    pub app_name: &'a str,
}

/// Client side of a desktop notification service.
///
/// `Notification` is a shared handle: clones refer to the same notification,
/// and configuration calls take `&` like the toolkit objects they wrap. Any
/// call may fail with the backend's own error type.
pub trait NotificationBackend: Send + Sync + 'static {
    type Notification: Clone + Send + Sync + 'static;
    type Error: std::error::Error + Send + Sync + 'static;

    fn is_initialized(&self) -> bool;

    /// Register with the service. `None` keeps the backend's own app name.
    ///
    /// # Errors
    ///
    /// Fails when the service cannot be reached.
    fn initialize(&self, app_name: Option<&str>) -> Result<(), Self::Error>;

    fn app_name(&self) -> String;

    fn construct(&self, fields: NotificationFields<'_>) -> Result<Self::Notification, Self::Error>;

    fn set_urgency(&self, notification: &Self::Notification, level: u8) -> Result<(), Self::Error>;

    fn set_timeout(
        &self,
        notification: &Self::Notification,
        timeout_ms: i32,
    ) -> Result<(), Self::Error>;

    fn set_hint(
        &self,
        notification: &Self::Notification,
        key: &str,
        value: HintValue,
    ) -> Result<(), Self::Error>;

    fn add_action(
        &self,
        notification: &Self::Notification,
        id: &str,
        label: &str,
        callback: ActionCallback,
    ) -> Result<(), Self::Error>;

    /// Run `callback` with the raw close code once the notification closes.
    fn subscribe_closed(
        &self,
        notification: &Self::Notification,
        callback: Box<dyn FnOnce(i32) + Send>,
    ) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Fails when the service rejects the notification.
    fn show(&self, notification: &Self::Notification) -> Result<(), Self::Error>;

    /// Raw close code, `-1` while no reason is known.
    fn closed_reason(&self, notification: &Self::Notification) -> i32;
}

/// Resolves a [`NotificationBackend`], typically by probing the session for
/// a running notification service.
pub trait LoadBackend: Send + Sync + 'static {
    type Backend: NotificationBackend;

    /// May block; the facade calls it from the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns an error, usually [`NotifyError::Unavailable`], when no
    /// backend can be provided.
    fn load(&self) -> Result<Self::Backend, NotifyError>;
}

impl<F, B> LoadBackend for F
where
    F: Fn() -> Result<B, NotifyError> + Send + Sync + 'static,
    B: NotificationBackend,
{
    type Backend = B;

    fn load(&self) -> Result<B, NotifyError> {
        self()
    }
}
