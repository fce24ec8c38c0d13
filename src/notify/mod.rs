//! Desktop notification facade.
//!
//! [`Notifier::notify`] turns a [`NotificationRequest`] into a shown
//! notification. When no notification service can be resolved the call logs
//! one error and yields `Ok(None)`, so callers never have to treat a missing
//! daemon as a failure.

mod backend;
#[cfg(target_os = "linux")]
pub mod desktop;
mod request;

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, error, trace};

use crate::error::NotifyError;
use crate::types::ClosedReason;

pub use backend::{LoadBackend, NotificationBackend, NotificationFields};
pub use request::{ActionCallback, CloseCallback, HintValue, NotificationRequest};

type BackendError<L> = <<L as LoadBackend>::Backend as NotificationBackend>::Error;

pub struct Notifier<L: LoadBackend> {
    loader: Arc<L>,
    app_name: Option<String>,
    backend: OnceCell<Arc<L::Backend>>,
}

impl<L: LoadBackend> Notifier<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader: Arc::new(loader),
            app_name: None,
            backend: OnceCell::new(),
        }
    }

    /// Application name used when the backend still needs initializing.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Show a notification.
    ///
    /// Building and showing run on the blocking pool. Returns once the
    /// notification has been handed to the service; the action and close
    /// callbacks run later, from the backend.
    ///
    /// # Errors
    ///
    /// Only errors raised by a resolved backend while building or showing
    /// the notification. A backend that cannot be resolved yields `Ok(None)`.
    pub async fn notify(
        &self,
        request: impl Into<NotificationRequest>,
    ) -> Result<Option<LiveNotification<L::Backend>>, BackendError<L>> {
        let request = request.into();
        let backend = match self.resolve().await {
            Ok(backend) => backend,
            Err(err) => {
                error!(
                    error = %err,
                    summary = request.summary.as_deref().unwrap_or_default(),
                    "missing dependency: notification backend"
                );
                return Ok(None);
            }
        };

        // Backends may block while talking to the service.
        let worker = Arc::clone(&backend);
        let joined =
            tokio::task::spawn_blocking(move || dispatch(worker.as_ref(), request)).await;
        let handle = match joined {
            Ok(dispatched) => dispatched?,
            Err(err) => match err.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(err) => {
                    error!(error = %err, "notification dispatch did not complete");
                    return Ok(None);
                }
            },
        };
        Ok(Some(LiveNotification { backend, handle }))
    }

    /// Shorthand for a notification with only summary, body and icon.
    ///
    /// # Errors
    ///
    /// Same as [`Notifier::notify`].
    pub async fn notify_summary(
        &self,
        summary: &str,
        body: Option<&str>,
        icon_name: Option<&str>,
    ) -> Result<Option<LiveNotification<L::Backend>>, BackendError<L>> {
        self.notify(NotificationRequest::simple(summary, body, icon_name))
            .await
    }

    /// Resolve the backend, memoizing it once it loaded and initialized.
    /// Failures are not cached, the next call tries again.
    async fn resolve(&self) -> Result<Arc<L::Backend>, NotifyError> {
        let backend = self
            .backend
            .get_or_try_init(|| async move {
                let loader = Arc::clone(&self.loader);
                let app_name = self.app_name.clone();
                let joined = tokio::task::spawn_blocking(move || -> Result<_, NotifyError> {
                    let backend = loader.load()?;
                    if !backend.is_initialized() {
                        backend.initialize(app_name.as_deref()).map_err(|err| {
                            NotifyError::unavailable(format!("initialization failed: {err}"))
                        })?;
                    }
                    debug!(app_name = %backend.app_name(), "notification backend ready");
                    Ok(Arc::new(backend))
                })
                .await;
                match joined {
                    Ok(result) => result,
                    Err(err) => Err(NotifyError::unavailable(format!(
                        "backend loader did not complete: {err}"
                    ))),
                }
            })
            .await?;
        Ok(Arc::clone(backend))
    }
}

fn dispatch<B: NotificationBackend>(
    backend: &B,
    request: NotificationRequest,
) -> Result<B::Notification, B::Error> {
    let app_name = request
        .app_name
        .clone()
        .unwrap_or_else(|| backend.app_name());
    let notification = backend.construct(NotificationFields {
        summary: request.summary.as_deref().unwrap_or_default(),
        body: request.body.as_deref().unwrap_or_default(),
        id: request.id.unwrap_or(0),
        icon_name: request.icon_name.as_deref().unwrap_or_default(),
        app_name: &app_name,
    })?;

    backend.set_urgency(&notification, request.urgency.unwrap_or_default().level())?;
    backend.set_timeout(&notification, request.timeout.unwrap_or(0))?;
    for (key, value) in request.hints() {
        trace!(key, %value, "setting hint");
        backend.set_hint(&notification, key, value)?;
    }

    let NotificationRequest {
        actions, on_closed, ..
    } = request;
    for (index, (label, callback)) in actions.into_iter().enumerate() {
        backend.add_action(&notification, &index.to_string(), &label, callback)?;
    }

    backend.subscribe_closed(
        &notification,
        Box::new(move |code| {
            let reason = ClosedReason::from_code(code);
            debug!(code, %reason, "notification closed");
            if let Some(on_closed) = on_closed {
                on_closed(reason);
            }
        }),
    )?;

    backend.show(&notification)?;
    Ok(notification)
}

/// A notification handed to the service by [`Notifier::notify`].
pub struct LiveNotification<B: NotificationBackend> {
    backend: Arc<B>,
    handle: B::Notification,
}

impl<B: NotificationBackend> LiveNotification<B> {
    pub const fn handle(&self) -> &B::Notification {
        &self.handle
    }

    /// Why the notification closed, [`ClosedReason::Unset`] while it is
    /// still open.
    pub fn closed_reason(&self) -> ClosedReason {
        ClosedReason::from_code(self.backend.closed_reason(&self.handle))
    }
}

impl<B: NotificationBackend> Clone for LiveNotification<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            handle: self.handle.clone(),
        }
    }
}

impl<B> fmt::Debug for LiveNotification<B>
where
    B: NotificationBackend,
    B::Notification: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveNotification")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
