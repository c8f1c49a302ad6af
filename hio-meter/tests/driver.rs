use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;
use hio_meter::{
    ConstantLevelSource, MeterCommand, MeterConfig, MeterDriver, MeterError, StereoLevels,
    SyntheticLevelSource,
};

fn fast_config() -> MeterConfig {
    MeterConfig::default()
        .with_fps(500)
        .with_decay_interval(Duration::from_millis(5))
}

/// Wait until a frame satisfies `pred` or the deadline passes
fn wait_for_frame(
    driver: &MeterDriver,
    pred: impl Fn(&hio_meter::StereoFrame) -> bool,
) -> Option<hio_meter::StereoFrame> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if let Ok(frame) = driver.frames().recv_timeout(Duration::from_millis(50)) {
            if pred(&frame) {
                return Some(frame);
            }
        }
    }
    None
}

#[test]
fn test_needle_climbs_toward_input() {
    let source = ConstantLevelSource::new(StereoLevels::mono(0.0));
    let driver = MeterDriver::spawn(fast_config(), source).unwrap();

    let frame = wait_for_frame(&driver, |f| f.left.needle_db > -1.0)
        .expect("needle should approach 0 dB");
    assert!(frame.left.needle_db <= 0.0);
    assert!(frame.right.needle_angle_deg > 0.0);
    assert_eq!(frame.left.peak_db, 0.0);
}

#[test]
fn test_peak_decays_after_burst() {
    // Loud source first, then silence through the volume command
    let driver = MeterDriver::spawn(fast_config(), SyntheticLevelSource::with_seed(1.0, 3)).unwrap();
    let loud = wait_for_frame(&driver, |f| f.left.peak_db > -10.0).expect("loud peak");

    driver.set_volume(0.0);
    let released = wait_for_frame(&driver, |f| f.left.peak_db < loud.left.peak_db - 1.0)
        .expect("peak should release on decay ticks");
    assert!(released.left.peak_db >= -60.0);
}

#[test]
fn test_freeze_holds_needle() {
    let source = ConstantLevelSource::new(StereoLevels::mono(0.0));
    let mut driver = MeterDriver::spawn(fast_config(), source).unwrap();
    wait_for_frame(&driver, |f| f.left.needle_db > -30.0).expect("needle moving");

    driver.send(MeterCommand::Freeze(true));
    // Let the freeze land, flush frames queued before it, then sample
    thread::sleep(Duration::from_millis(20));
    driver.latest_frame();
    thread::sleep(Duration::from_millis(20));
    let held = driver.latest_frame();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(driver.latest_frame(), held);

    driver.send(MeterCommand::Freeze(false));
    let moved = wait_for_frame(&driver, |f| f.left.needle_db > held.left.needle_db);
    assert!(moved.is_some());
}

#[test]
fn test_reset_drops_needle() {
    // Slow spring so several frames after the reset still read near the floor
    let source = ConstantLevelSource::new(StereoLevels::mono(6.0));
    let driver = MeterDriver::spawn(fast_config().with_spring_factor(0.01), source).unwrap();
    wait_for_frame(&driver, |f| f.left.needle_db > 0.0).expect("needle in red zone");

    driver.send(MeterCommand::Reset);
    let after = wait_for_frame(&driver, |f| f.left.needle_db < -50.0);
    assert!(after.is_some());
}

#[test]
fn test_stop_joins_and_disconnects() {
    let mut driver = MeterDriver::spawn(fast_config(), ConstantLevelSource::silence()).unwrap();
    let frames = driver.frames().clone();
    assert!(driver.is_running());

    driver.stop();
    assert!(!driver.is_running());
    driver.stop();

    loop {
        match frames.recv_timeout(Duration::from_secs(1)) {
            Ok(_) => continue,
            Err(err) => {
                assert_eq!(err, RecvTimeoutError::Disconnected);
                break;
            }
        }
    }
}

#[test]
fn test_drop_releases_clocks() {
    let driver = MeterDriver::spawn(fast_config(), ConstantLevelSource::silence()).unwrap();
    let frames = driver.frames().clone();
    drop(driver);

    while frames.recv_timeout(Duration::from_secs(1)).is_ok() {}
    assert!(frames.is_empty());
}

#[test]
fn test_invalid_config_never_starts() {
    let config = MeterConfig::default().with_spring_factor(0.0);
    let result = MeterDriver::spawn(config, ConstantLevelSource::silence());
    assert!(matches!(result, Err(MeterError::InvalidSpringFactor(_))));
}
