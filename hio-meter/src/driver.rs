//! Meter driver - runs the frame clock and the peak decay clock
//!
//! One worker thread owns the [`StereoMeter`] and the level source. It waits
//! on two independent tickers (animation frames and peak decay) plus a command
//! channel, so the meter state has a single writer and needs no lock.
//! Rendered frames are published on a bounded channel; when the consumer
//! falls behind, frames are dropped rather than queued.
//!
//! Starting a driver pairs with exactly one teardown: [`MeterDriver::stop`] or
//! dropping the handle stops both clocks and joins the thread.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, tick, Receiver, Sender};

use crate::config::MeterConfig;
use crate::error::MeterError;
use crate::source::LevelSource;
use crate::stereo::{StereoFrame, StereoMeter};

/// Frames buffered before new ones are dropped
const FRAME_QUEUE: usize = 8;

/// Commands sent to the driver thread
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeterCommand {
    /// Forward a zone volume (0.0-1.0) to the level source
    SetVolume(f32),
    /// Return both channels to the resting level
    Reset,
    /// Hold the needles and peaks where they are
    Freeze(bool),
    /// Stop both clocks and exit
    Shutdown,
}

/// Handle to a running meter
pub struct MeterDriver {
    command_tx: Sender<MeterCommand>,
    frame_rx: Receiver<StereoFrame>,
    handle: Option<JoinHandle<()>>,
    last_frame: StereoFrame,
}

impl MeterDriver {
    /// Validate `config` and start the meter thread
    pub fn spawn<S>(config: MeterConfig, source: S) -> Result<Self, MeterError>
    where
        S: LevelSource + Send + 'static,
    {
        config.validate()?;

        let (command_tx, command_rx) = bounded(64);
        let (frame_tx, frame_rx) = bounded(FRAME_QUEUE);
        let meter = StereoMeter::new(&config);
        let last_frame = meter.render_frame();

        let handle = thread::Builder::new()
            .name("hio-meter".into())
            .spawn(move || run_meter(config, meter, source, command_rx, frame_tx))?;

        tracing::info!(
            frame_ms = config.frame_interval.as_secs_f32() * 1000.0,
            decay_ms = config.decay_interval.as_secs_f32() * 1000.0,
            spring_factor = config.spring_factor,
            "meter driver started"
        );

        Ok(Self {
            command_tx,
            frame_rx,
            handle: Some(handle),
            last_frame,
        })
    }

    /// Send a command (dropped if the queue is full or the thread has exited)
    pub fn send(&self, cmd: MeterCommand) {
        let _ = self.command_tx.try_send(cmd);
    }

    pub fn set_volume(&self, volume: f32) {
        self.send(MeterCommand::SetVolume(volume));
    }

    /// Receiver of rendered frames
    pub fn frames(&self) -> &Receiver<StereoFrame> {
        &self.frame_rx
    }

    /// Drain pending frames and return the newest one seen so far
    pub fn latest_frame(&mut self) -> StereoFrame {
        if let Some(frame) = self.frame_rx.try_iter().last() {
            self.last_frame = frame;
        }
        self.last_frame
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop both clocks and join the thread. Calling it twice is a no-op.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        // A full queue still ends the thread: it exits when the sender drops
        let _ = self.command_tx.send(MeterCommand::Shutdown);
        if handle.join().is_err() {
            tracing::error!("meter thread panicked");
        }
        tracing::debug!("meter driver stopped");
    }
}

impl Drop for MeterDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_meter<S: LevelSource>(
    config: MeterConfig,
    mut meter: StereoMeter,
    mut source: S,
    command_rx: Receiver<MeterCommand>,
    frame_tx: Sender<StereoFrame>,
) {
    let frame_clock = tick(config.frame_interval);
    let decay_clock = tick(config.decay_interval);
    let mut frozen = false;

    loop {
        select! {
            recv(command_rx) -> cmd => match cmd {
                Ok(MeterCommand::SetVolume(volume)) => source.set_volume(volume),
                Ok(MeterCommand::Reset) => meter.reset(),
                Ok(MeterCommand::Freeze(hold)) => {
                    tracing::debug!(hold, "meter freeze");
                    frozen = hold;
                }
                Ok(MeterCommand::Shutdown) | Err(_) => break,
            },
            recv(frame_clock) -> _ => {
                let frame = if frozen {
                    meter.render_frame()
                } else {
                    meter.set_levels(source.next_levels());
                    meter.tick_frame()
                };
                let _ = frame_tx.try_send(frame);
            },
            recv(decay_clock) -> _ => {
                if !frozen {
                    meter.decay_peaks();
                }
            },
        }
    }
}
