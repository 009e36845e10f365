use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::motion::{
    Attitude, MagneticAccuracy, MagneticField, MotionError, MotionReading, SensorLocation,
};

/// Outcome of one delivery: a reading, or an error in place of data.
pub type Delivery = Result<MotionReading, MotionError>;
pub type DeliveryHandler = Box<dyn FnMut(Delivery) + Send>;

/// Push-style provider of motion readings.
pub trait MotionSource: Send {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    /// Begins delivering readings to `handler` until [`MotionSource::stop`].
    fn start(&mut self, handler: DeliveryHandler) -> Result<(), MotionError>;
    /// Ends the subscription. Calling it while stopped is a no-op.
    fn stop(&mut self);
}

/// Background delivery thread that can be told to stop.
struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(name: &str, body: impl FnOnce(Receiver<()>) + Send + 'static) -> Result<Self, MotionError> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || body(stop_rx))?;
        Ok(Self { stop_tx, handle })
    }

    fn stop(self) {
        drop(self.stop_tx);
        if self.handle.join().is_err() {
            log::warn!("motion delivery thread panicked");
        }
    }
}

/// Sleeps for `dur` unless asked to stop; returns `false` when stopping.
fn wait(stop_rx: &Receiver<()>, dur: Duration) -> bool {
    matches!(stop_rx.recv_timeout(dur), Err(RecvTimeoutError::Timeout))
}

/// In-memory source useful for tests and deterministic playback.
///
/// Everything queued is delivered synchronously from `start`.
pub struct ManualSource {
    queue: VecDeque<Delivery>,
    available: bool,
}

impl ManualSource {
    pub fn new(deliveries: impl IntoIterator<Item = Delivery>) -> Self {
        Self {
            queue: deliveries.into_iter().collect(),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            queue: VecDeque::new(),
            available: false,
        }
    }
}

impl MotionSource for ManualSource {
    fn name(&self) -> &str {
        "manual"
    }
    fn is_available(&self) -> bool {
        self.available
    }
    fn start(&mut self, mut handler: DeliveryHandler) -> Result<(), MotionError> {
        if !self.available {
            return Err(MotionError::Unavailable("manual source disabled".into()));
        }
        while let Some(delivery) = self.queue.pop_front() {
            handler(delivery);
        }
        Ok(())
    }
    fn stop(&mut self) {}
}

#[derive(Clone, Debug)]
pub struct SimulatedConfig {
    pub rate_hz: f64,
    pub seed: Option<u64>,
    pub location: SensorLocation,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            rate_hz: 25.0,
            seed: None,
            location: SensorLocation::Left,
        }
    }
}

/// Synthetic head movement: slow nodding, turning and tilting with sensor noise.
pub struct SimulatedSource {
    config: SimulatedConfig,
    worker: Option<Worker>,
}

/// Fastest rate the simulated source will run at.
pub const MAX_SIMULATED_RATE_HZ: f64 = 1000.0;

impl SimulatedSource {
    pub fn new(config: SimulatedConfig) -> Self {
        Self {
            config,
            worker: None,
        }
    }

    /// Delivery period, or `None` when the rate is out of range.
    fn period(&self) -> Option<Duration> {
        let rate = self.config.rate_hz;
        if !(rate > 0.0 && rate <= MAX_SIMULATED_RATE_HZ) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / rate).ok()
    }
}

/// Deterministic part of the simulated motion at time `t`.
pub fn simulated_reading(t: f64, location: SensorLocation) -> MotionReading {
    let (fr, fp, fy) = (0.09, 0.13, 0.07);
    let roll = 0.25 * (TAU * fr * t + 2.0).sin();
    let pitch = 0.35 * (TAU * fp * t + 1.0).sin();
    let yaw = 0.8 * (TAU * fy * t).sin();
    let rotation_rate = [
        0.35 * TAU * fp * (TAU * fp * t + 1.0).cos(),
        0.8 * TAU * fy * (TAU * fy * t).cos(),
        0.25 * TAU * fr * (TAU * fr * t + 2.0).cos(),
    ];
    let attitude = Attitude::from_euler(roll, pitch, yaw);
    let gravity = [
        -pitch.sin(),
        roll.sin() * pitch.cos(),
        -roll.cos() * pitch.cos(),
    ];
    MotionReading {
        timestamp: t,
        attitude,
        gravity,
        rotation_rate,
        user_acceleration: [0.0; 3],
        magnetic_field: MagneticField {
            field: [0.0; 3],
            accuracy: MagneticAccuracy::Uncalibrated,
        },
        heading: 0.0,
        sensor_location: location,
    }
}

impl MotionSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }
    fn is_available(&self) -> bool {
        self.period().is_some()
    }
    fn start(&mut self, mut handler: DeliveryHandler) -> Result<(), MotionError> {
        if self.worker.is_some() {
            return Ok(());
        }
        let period = self.period().ok_or_else(|| {
            MotionError::Unavailable(format!("invalid simulated rate {} Hz", self.config.rate_hz))
        })?;
        let location = self.config.location;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let worker = Worker::spawn("motion-sim", move |stop_rx| {
            let started = Instant::now();
            loop {
                let t = started.elapsed().as_secs_f64();
                let mut reading = simulated_reading(t, location);
                for axis in reading.user_acceleration.iter_mut() {
                    *axis = rng.gen_range(-0.02..0.02);
                }
                for axis in reading.rotation_rate.iter_mut() {
                    *axis += rng.gen_range(-0.01..0.01);
                }
                handler(Ok(reading));
                if !wait(&stop_rx, period) {
                    break;
                }
            }
        })?;
        log::info!("simulated motion started at {} Hz", self.config.rate_hz);
        self.worker = Some(worker);
        Ok(())
    }
    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop();
            log::info!("simulated motion stopped");
        }
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Plays back a JSON-lines capture written by the recorder.
pub struct ReplaySource {
    path: PathBuf,
    speed: f64,
    worker: Option<Worker>,
}

impl ReplaySource {
    pub fn new(path: impl AsRef<Path>, speed: f64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            speed: if speed.is_finite() && speed > 0.0 {
                speed
            } else {
                1.0
            },
            worker: None,
        }
    }
}

/// Longest pause honoured between two captured readings.
const MAX_REPLAY_GAP: Duration = Duration::from_secs(1);

/// Pause before a reading captured `delta` seconds after the previous one.
fn replay_gap(delta: f64, speed: f64) -> Duration {
    let secs = (delta / speed).max(0.0).min(MAX_REPLAY_GAP.as_secs_f64());
    Duration::try_from_secs_f64(secs).unwrap_or(MAX_REPLAY_GAP)
}

impl MotionSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }
    fn is_available(&self) -> bool {
        self.path.is_file()
    }
    fn start(&mut self, mut handler: DeliveryHandler) -> Result<(), MotionError> {
        if self.worker.is_some() {
            return Ok(());
        }
        let file = File::open(&self.path)?;
        let speed = self.speed;
        let path = self.path.display().to_string();
        let worker = Worker::spawn("motion-replay", move |stop_rx| {
            let mut previous: Option<f64> = None;
            for (idx, line) in BufReader::new(file).lines().enumerate() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        handler(Err(MotionError::Io(e)));
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let reading: MotionReading = match serde_json::from_str(&line) {
                    Ok(reading) => reading,
                    Err(source) => {
                        handler(Err(MotionError::Replay {
                            line: idx + 1,
                            source,
                        }));
                        continue;
                    }
                };
                if let Some(prev) = previous {
                    if !wait(&stop_rx, replay_gap(reading.timestamp - prev, speed)) {
                        return;
                    }
                }
                previous = Some(reading.timestamp);
                handler(Ok(reading));
            }
            log::info!("replay of {path} finished");
        })?;
        self.worker = Some(worker);
        Ok(())
    }
    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.stop();
        }
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        self.stop();
    }
}
