//! Home-IO analog meter
//!
//! Terminal tile showing a stereo analog VU meter for one audio zone.

mod config;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use config::Config;
use hio_input::{Command, InputHandler};
use hio_meter::{Channel, MeterCommand, MeterConfig, MeterDriver, MeterError, SyntheticLevelSource};
use hio_tui::{AnalogMeterWidget, App, HelpWidget, StatusBarWidget};

/// Frame rate for UI redraws (the meter animates on its own clock)
const FPS: u64 = 30;

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = Config::load();
    let driver = MeterDriver::spawn(
        config.meter_config(),
        SyntheticLevelSource::new(config.volume),
    )?;
    let (_watcher, config_rx) = config::watch(Config::config_path(), config::WATCH_INTERVAL)?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, driver, config, config_rx);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref err) = result {
        tracing::error!(%err, "meter tile exited with error");
    }
    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() -> anyhow::Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hio");
    fs::create_dir_all(&log_dir)?;
    let file = File::create(log_dir.join("hio.log"))?;

    let filter = EnvFilter::try_from_env("HIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install logger: {}", err))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut driver: MeterDriver,
    config: Config,
    config_rx: Receiver<Config>,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let mut input_handler = InputHandler::new();

    app.state.apply_theme(config.theme);
    app.state.volume = config.volume;
    app.state
        .set_message("Home-IO meter | Press ? for help, : for commands");
    let mut tuning = config.meter_config();

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    loop {
        if app.should_quit {
            break;
        }

        app.state.update_frame(driver.latest_frame());

        while let Ok(updated) = config_rx.try_recv() {
            apply_config(&mut app, &mut driver, &mut tuning, &updated)?;
        }

        terminal.draw(|frame| render_ui(frame, &app))?;

        // Handle input
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                handle_key(&mut app, &mut input_handler, &driver, key);
            }
        }

        // Maintain frame rate
        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
        last_frame = Instant::now();
    }

    driver.stop();
    Ok(())
}

/// Apply an edited config file.
///
/// Theme and volume change in place. Any change to the meter tuning restarts
/// the driver with the new clocks, keeping the hold state.
fn apply_config(
    app: &mut App,
    driver: &mut MeterDriver,
    tuning: &mut MeterConfig,
    updated: &Config,
) -> Result<(), MeterError> {
    app.state.apply_theme(updated.theme);
    let volume = app.state.set_volume(updated.volume);

    let retuned = updated.meter_config();
    if retuned == *tuning {
        driver.set_volume(volume);
        app.state
            .set_success(format!("Configuration reloaded ({})", updated.theme));
        return Ok(());
    }

    driver.stop();
    *driver = MeterDriver::spawn(retuned, SyntheticLevelSource::new(volume))?;
    if app.state.frozen {
        driver.send(MeterCommand::Freeze(true));
    }
    *tuning = retuned;
    tracing::info!(
        spring_factor = retuned.spring_factor,
        peak_decay_db = retuned.peak_decay_db,
        "meter retuned from configuration"
    );
    app.state.set_success(format!(
        "Configuration reloaded ({}), meter retuned",
        updated.theme
    ));
    Ok(())
}

fn handle_key(
    app: &mut App,
    input_handler: &mut InputHandler,
    driver: &MeterDriver,
    key: KeyEvent,
) {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if let Some(cmd) = input_handler.handle_key(key) {
        handle_command(app, driver, cmd);
    }

    app.state.set_mode(input_handler.mode());
    app.state.command_buffer = input_handler.command_buffer().to_string();
}

fn handle_command(app: &mut App, driver: &MeterDriver, cmd: Command) {
    match cmd {
        Command::SetVolume(volume) => {
            let volume = app.state.set_volume(volume);
            driver.set_volume(volume);
        }
        Command::AdjustVolume(delta) => {
            let volume = app.state.adjust_volume(delta);
            driver.set_volume(volume);
        }
        Command::ToggleFreeze => {
            let frozen = app.state.toggle_freeze();
            driver.send(MeterCommand::Freeze(frozen));
        }
        Command::ResetMeter => {
            driver.send(MeterCommand::Reset);
            app.state.set_message("Meter reset");
        }
        Command::SetTheme(name) => app.state.set_theme(&name),
        Command::CycleTheme => app.state.cycle_theme(),
        Command::Quit => app.quit(),
        Command::Cancel => app.state.clear_message(),
        Command::ExecuteCommand(input) => {
            app.state.set_error(format!("Unknown command: {}", input));
        }
        // Mode changes, help included, are read back from the input handler
        Command::ToggleHelp | Command::EnterCommandMode | Command::EnterNormalMode => {}
    }
}

fn render_ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let theme = &state.theme;
    let area = frame.area();

    let [meters_area, status_area] =
        Layout::vertical([Constraint::Min(8), Constraint::Length(1)]).areas(area);
    let [left_area, right_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(meters_area);

    frame.render_widget(
        AnalogMeterWidget::new(theme, Channel::Left)
            .frame(state.frame.left)
            .frozen(state.frozen),
        left_area,
    );
    frame.render_widget(
        AnalogMeterWidget::new(theme, Channel::Right)
            .frame(state.frame.right)
            .frozen(state.frozen),
        right_area,
    );

    frame.render_widget(
        StatusBarWidget::new(state.mode, &state.command_buffer, theme)
            .message(state.message.as_deref(), state.message_type)
            .volume(state.volume),
        status_area,
    );

    if state.help_visible() {
        frame.render_widget(HelpWidget::new(theme), centered(area, 50, 24));
    }
}

/// Rect of at most `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hio_input::Mode;
    use hio_meter::{ConstantLevelSource, StereoFrame};
    use hio_tui::{MessageType, ThemeKind};
    use ratatui::backend::TestBackend;

    fn fast_tuning() -> MeterConfig {
        MeterConfig::default()
            .with_fps(500)
            .with_decay_interval(Duration::from_millis(5))
    }

    fn silent_driver() -> MeterDriver {
        MeterDriver::spawn(fast_tuning(), ConstantLevelSource::silence()).unwrap()
    }

    fn press(app: &mut App, input: &mut InputHandler, driver: &MeterDriver, code: KeyCode) {
        handle_key(app, input, driver, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn run_command(app: &mut App, input: &mut InputHandler, driver: &MeterDriver, text: &str) {
        press(app, input, driver, KeyCode::Char(':'));
        for c in text.chars() {
            press(app, input, driver, KeyCode::Char(c));
        }
        press(app, input, driver, KeyCode::Enter);
    }

    fn wait_for(driver: &mut MeterDriver, pred: impl Fn(&StereoFrame) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if pred(&driver.latest_frame()) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render_ui(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_help_closed_by_question_mark_after_help_command() {
        let (mut app, mut input, driver) = (App::new(), InputHandler::new(), silent_driver());

        run_command(&mut app, &mut input, &driver, "help");
        assert_eq!(app.state.mode, Mode::Help);
        assert!(app.state.help_visible());
        assert!(screen_text(&app).contains("HOME-IO ANALOG METER"));

        press(&mut app, &mut input, &driver, KeyCode::Char('?'));
        press(&mut app, &mut input, &driver, KeyCode::Esc);
        assert_eq!(app.state.mode, Mode::Normal);
        assert!(!app.state.help_visible());
        assert!(!screen_text(&app).contains("HOME-IO ANALOG METER"));
    }

    #[test]
    fn test_help_key_round_trip() {
        let (mut app, mut input, driver) = (App::new(), InputHandler::new(), silent_driver());

        press(&mut app, &mut input, &driver, KeyCode::Char('?'));
        assert!(app.state.help_visible());
        press(&mut app, &mut input, &driver, KeyCode::Esc);
        assert!(!app.state.help_visible());
    }

    #[test]
    fn test_volume_commands_clamp() {
        let (mut app, mut input, driver) = (App::new(), InputHandler::new(), silent_driver());

        run_command(&mut app, &mut input, &driver, "vol 250%");
        assert_eq!(app.state.volume, 1.0);
        press(&mut app, &mut input, &driver, KeyCode::Char('+'));
        assert_eq!(app.state.volume, 1.0);
        press(&mut app, &mut input, &driver, KeyCode::Char('0'));
        press(&mut app, &mut input, &driver, KeyCode::Down);
        assert_eq!(app.state.volume, 0.0);
        assert_eq!(app.state.message.as_deref(), Some("Volume 0%"));
    }

    #[test]
    fn test_volume_reaches_the_source() {
        let mut app = App::new();
        let mut input = InputHandler::new();
        let mut driver =
            MeterDriver::spawn(fast_tuning(), SyntheticLevelSource::with_seed(0.0, 9)).unwrap();

        run_command(&mut app, &mut input, &driver, "volume 100");
        assert!(wait_for(&mut driver, |f| f.left.needle_db > -30.0));
    }

    #[test]
    fn test_freeze_and_reset() {
        let (mut app, mut input, driver) = (App::new(), InputHandler::new(), silent_driver());

        press(&mut app, &mut input, &driver, KeyCode::Char('f'));
        assert!(app.state.frozen);
        assert_eq!(app.state.message_type, MessageType::Warning);
        press(&mut app, &mut input, &driver, KeyCode::Char(' '));
        assert!(!app.state.frozen);

        press(&mut app, &mut input, &driver, KeyCode::Char('r'));
        assert_eq!(app.state.message.as_deref(), Some("Meter reset"));
    }

    #[test]
    fn test_cancel_clears_message() {
        let (mut app, mut input, driver) = (App::new(), InputHandler::new(), silent_driver());

        press(&mut app, &mut input, &driver, KeyCode::Char('t'));
        assert_eq!(app.state.theme_kind, ThemeKind::Amber);
        assert!(app.state.message.is_some());
        press(&mut app, &mut input, &driver, KeyCode::Esc);
        assert!(app.state.message.is_none());
    }

    #[test]
    fn test_unknown_command_reported() {
        let (mut app, mut input, driver) = (App::new(), InputHandler::new(), silent_driver());

        run_command(&mut app, &mut input, &driver, "bogus");
        assert_eq!(app.state.message_type, MessageType::Error);
        assert_eq!(app.state.message.as_deref(), Some("Unknown command: bogus"));
        assert!(!app.should_quit);

        run_command(&mut app, &mut input, &driver, "q");
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_q_quits() {
        let (mut app, mut input, driver) = (App::new(), InputHandler::new(), silent_driver());
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        handle_key(&mut app, &mut input, &driver, ctrl_q);
        assert!(app.should_quit);
    }

    #[test]
    fn test_config_edit_keeps_tuning() {
        let mut app = App::new();
        let mut driver = silent_driver();
        let mut tuning = fast_tuning();
        let updated = Config {
            theme: ThemeKind::Cyberpunk,
            volume: 0.3,
            fps: 500,
            decay_interval_ms: 5,
            ..Config::default()
        };

        apply_config(&mut app, &mut driver, &mut tuning, &updated).unwrap();
        assert_eq!(tuning, fast_tuning());
        assert_eq!(app.state.theme_kind, ThemeKind::Cyberpunk);
        assert_eq!(app.state.volume, 0.3);
        assert_eq!(app.state.message.as_deref(), Some("Configuration reloaded (cyberpunk)"));
    }

    #[test]
    fn test_config_edit_retunes_meter() {
        let mut app = App::new();
        let mut driver = silent_driver();
        let mut tuning = fast_tuning();
        let updated = Config {
            spring_factor: 0.5,
            fps: 200,
            ..Config::default()
        };

        apply_config(&mut app, &mut driver, &mut tuning, &updated).unwrap();
        assert_eq!(tuning, updated.meter_config());
        assert_eq!(tuning.spring_factor, 0.5);
        assert!(driver.is_running());
        assert!(app
            .state
            .message
            .as_deref()
            .unwrap_or("")
            .ends_with("meter retuned"));
    }
}
