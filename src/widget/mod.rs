mod center_box;
mod native;

pub use center_box::{CenterBox, CenterBoxProps};
pub use native::{NativeBox, Orientation, Slot};
