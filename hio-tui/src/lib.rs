//! Terminal UI for the Home-IO analog meter - widgets, themes, and layout

mod app;
mod theme;
pub mod widgets;

pub use app::{App, AppState, MessageType};
pub use theme::{Theme, ThemeError, ThemeKind, CRT_AMBER, CRT_GREEN, CYBERPUNK};
pub use widgets::{AnalogMeterWidget, HelpWidget, StatusBarWidget};
