use std::fmt;
use std::sync::Arc;

use crate::types::{ClosedReason, Urgency};

/// Callback run when the user invokes a notification action.
pub type ActionCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback run once when a shown notification closes.
pub type CloseCallback = Box<dyn FnOnce(ClosedReason) + Send>;

/// Typed value of a notification hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HintValue {
    Bool(bool),
    Str(String),
    Int(i32),
}

impl HintValue {
    /// `false`, `0` and the empty string all count as unset.
    #[must_use]
    pub fn is_set(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Str(value) => !value.is_empty(),
            Self::Int(value) => *value != 0,
        }
    }
}

impl fmt::Display for HintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "b:{value}"),
            Self::Str(value) => write!(f, "s:{value:?}"),
            Self::Int(value) => write!(f, "i:{value}"),
        }
    }
}

/// Everything needed to show one notification.
///
/// Actions keep their insertion order: the backend addresses them by
/// position, so the first action is `"0"`, the second `"1"` and so on.
#[derive(Default)]
pub struct NotificationRequest {
    pub summary: Option<String>,
    pub body: Option<String>,
    pub icon_name: Option<String>,
    pub app_name: Option<String>,
    pub id: Option<u32>,
    pub urgency: Option<Urgency>,
    pub timeout: Option<i32>,
    pub actions: Vec<(String, ActionCallback)>,
    pub on_closed: Option<CloseCallback>,

    pub action_icons: Option<bool>,
    pub category: Option<String>,
    pub desktop_entry: Option<String>,
    pub image: Option<String>,
    pub resident: Option<bool>,
    pub sound_file: Option<String>,
    pub sound_name: Option<String>,
    pub suppress_sound: Option<bool>,
    pub transient: Option<bool>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl NotificationRequest {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            ..Self::default()
        }
    }

    /// Summary, body and icon only.
    pub fn simple(summary: impl Into<String>, body: Option<&str>, icon_name: Option<&str>) -> Self {
        Self {
            summary: Some(summary.into()),
            body: body.map(str::to_string),
            icon_name: icon_name.map(str::to_string),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn icon_name(mut self, icon_name: impl Into<String>) -> Self {
        self.icon_name = Some(icon_name.into());
        self
    }

    #[must_use]
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    #[must_use]
    pub const fn id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub const fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout_ms: i32) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    /// Append an action. Labels are not deduplicated.
    #[must_use]
    pub fn action<F>(mut self, label: impl Into<String>, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.actions.push((label.into(), Arc::new(callback)));
        self
    }

    #[must_use]
    pub fn on_closed<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(ClosedReason) + Send + 'static,
    {
        self.on_closed = Some(Box::new(callback));
        self
    }

    /// Hints worth sending, in transmission order. Unset and falsy values
    /// are left out entirely.
    #[must_use]
    pub fn hints(&self) -> Vec<(&'static str, HintValue)> {
        let candidates = [
            ("action-icons", self.action_icons.map(HintValue::Bool)),
            ("desktop-entry", self.desktop_entry.clone().map(HintValue::Str)),
            ("image-path", self.image.clone().map(HintValue::Str)),
            ("resident", self.resident.map(HintValue::Bool)),
            ("sound-file", self.sound_file.clone().map(HintValue::Str)),
            ("sound-name", self.sound_name.clone().map(HintValue::Str)),
            ("suppress-sound", self.suppress_sound.map(HintValue::Bool)),
            ("transient", self.transient.map(HintValue::Bool)),
            ("x", self.x.map(HintValue::Int)),
            ("y", self.y.map(HintValue::Int)),
            ("category", self.category.clone().map(HintValue::Str)),
        ];
        candidates
            .into_iter()
            .filter_map(|(key, value)| value.filter(HintValue::is_set).map(|value| (key, value)))
            .collect()
    }
}

impl From<&str> for NotificationRequest {
    fn from(summary: &str) -> Self {
        Self::new(summary)
    }
}

impl From<String> for NotificationRequest {
    fn from(summary: String) -> Self {
        Self::new(summary)
    }
}

impl fmt::Debug for NotificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.actions.iter().map(|(label, _)| label.as_str()).collect();
        f.debug_struct("NotificationRequest")
            .field("summary", &self.summary)
            .field("body", &self.body)
            .field("icon_name", &self.icon_name)
            .field("app_name", &self.app_name)
            .field("id", &self.id)
            .field("urgency", &self.urgency)
            .field("timeout", &self.timeout)
            .field("actions", &labels)
            .field("on_closed", &self.on_closed.is_some())
            .field("hints", &self.hints())
            .finish()
    }
}
