//! Command definitions for the meter tile

/// Volume change per keypress (fraction of full scale)
pub const VOLUME_STEP: f32 = 0.05;

/// Commands that can be dispatched from input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Zone volume (drives the synthetic level source)
    SetVolume(f32), // 0.0-1.0
    AdjustVolume(f32),

    // Meter
    ToggleFreeze,
    ResetMeter,

    // UI
    ToggleHelp,
    SetTheme(String),
    CycleTheme,

    // Mode changes
    EnterCommandMode,
    EnterNormalMode,

    // Application
    Quit,
    Cancel,

    // Command mode (unparsed input)
    ExecuteCommand(String),
}
