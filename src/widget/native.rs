use std::fmt;

/// One of the three named child positions of a [`CenterBox`](super::CenterBox).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Slot {
    Start,
    Center,
    End,
}

impl Slot {
    pub const ALL: [Self; 3] = [Self::Start, Self::Center, Self::End];

    /// Name of the observable property backing this slot.
    #[must_use]
    pub const fn property_name(self) -> &'static str {
        match self {
            Self::Start => "start-widget",
            Self::Center => "center-widget",
            Self::End => "end-widget",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.property_name())
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Toolkit box widget that hosts the container's children.
///
/// Implementations wrap a real toolkit object. Calls are made from the
/// toolkit's thread only, and every failure is the toolkit's own error type,
/// passed through to the caller untouched.
pub trait NativeBox {
    /// Handle to a child widget. Equality is handle identity.
    type Child: Clone + PartialEq + fmt::Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert `child` at the leading edge.
    fn pack_start(
        &self,
        child: &Self::Child,
        expand: bool,
        fill: bool,
        padding: u32,
    ) -> Result<(), Self::Error>;

    /// Insert `child` at the trailing edge.
    fn pack_end(
        &self,
        child: &Self::Child,
        expand: bool,
        fill: bool,
        padding: u32,
    ) -> Result<(), Self::Error>;

    /// Place `child` in the dedicated center position, releasing the
    /// previous center widget.
    fn set_center_widget(&self, child: Option<&Self::Child>) -> Result<(), Self::Error>;

    fn center_widget(&self) -> Option<Self::Child>;

    fn destroy(&self, child: &Self::Child) -> Result<(), Self::Error>;

    /// Recursively show the box and all of its descendants.
    fn show_all(&self) -> Result<(), Self::Error>;

    fn set_orientation(&self, orientation: Orientation) -> Result<(), Self::Error>;

    /// Emit the change notification for the property backing `slot`.
    fn notify(&self, slot: Slot);
}
