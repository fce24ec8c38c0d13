use crate::types::Urgency;

pub(super) fn default_notify_appname() -> String {
    "panelkit".to_string()
}

pub(super) const fn default_urgency() -> Urgency {
    Urgency::Normal
}
