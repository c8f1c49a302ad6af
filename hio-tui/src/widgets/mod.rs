//! UI Widgets for the meter tile

mod analog_meter;
pub mod status_bar;

pub use analog_meter::{needle_char, AnalogMeterWidget};
pub use status_bar::{HelpWidget, StatusBarWidget};
