// src/engine.rs
use std::sync::mpsc::{Receiver, Sender};

use crate::motion::{ChannelBufferSet, MotionError, MotionReading, MotionSource};
use crate::types::MotionMessage;

/// Owns one motion source subscription for the lifetime of a view.
///
/// Dropping the session stops the source.
pub struct MotionSession {
    source: Box<dyn MotionSource>,
    running: bool,
}

impl MotionSession {
    pub fn new(source: Box<dyn MotionSource>) -> Self {
        Self {
            source,
            running: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.source.is_available()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Forwards readings to `tx`; failed deliveries are dropped.
    pub fn start(&mut self, tx: Sender<MotionMessage>) -> Result<(), MotionError> {
        if self.running {
            return Ok(());
        }
        if !self.source.is_available() {
            return Err(MotionError::Unavailable(format!(
                "{} source reports no device",
                self.source.name()
            )));
        }
        tx.send(MotionMessage::Log(format!(
            "✅ {} source connected",
            self.source.name()
        )))
        .ok();
        self.source.start(Box::new(move |delivery| match delivery {
            Ok(reading) => {
                tx.send(MotionMessage::Reading(reading)).ok();
            }
            Err(e) => log::debug!("skipping motion delivery: {e}"),
        }))?;
        self.running = true;
        log::info!("motion session started ({})", self.source.name());
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.running {
            self.source.stop();
            self.running = false;
            log::info!("motion session stopped ({})", self.source.name());
        }
    }
}

impl Drop for MotionSession {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Appends every queued reading to `buffers` and hands log lines to `on_log`.
///
/// Returns the newest reading seen, if any.
pub fn drain(
    rx: &Receiver<MotionMessage>,
    buffers: &mut ChannelBufferSet,
    mut on_reading: impl FnMut(&MotionReading),
    mut on_log: impl FnMut(String),
) -> Option<MotionReading> {
    let mut latest = None;
    while let Ok(msg) = rx.try_recv() {
        match msg {
            MotionMessage::Reading(reading) => {
                buffers.append(&reading);
                on_reading(&reading);
                latest = Some(reading);
            }
            MotionMessage::Log(s) => on_log(s),
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Attitude, ManualSource};
    use std::sync::mpsc::channel;

    fn tick(i: usize) -> MotionReading {
        MotionReading::at_rest(i as f64 * 0.04, Attitude::from_euler(i as f64, 0.0, 0.0))
    }

    #[test]
    fn failed_delivery_skips_one_tick() {
        let deliveries = (0..5).map(|i| {
            if i == 2 {
                Err(MotionError::Delivery("no payload".into()))
            } else {
                Ok(tick(i))
            }
        });
        let mut session = MotionSession::new(Box::new(ManualSource::new(deliveries)));
        let (tx, rx) = channel();
        session.start(tx).unwrap();
        let mut buffers = ChannelBufferSet::with_capacity(200).unwrap();
        let mut recorded = 0;
        let latest = drain(&rx, &mut buffers, |_| recorded += 1, |_| {});
        assert_eq!(buffers.len(), 4);
        assert_eq!(recorded, 4);
        assert_eq!(latest.map(|r| r.attitude.roll), Some(4.0));
        assert_eq!(buffers.latest().map(|r| r.sequence), Some(3));
    }

    #[test]
    fn unavailable_source_is_reported() {
        let mut session = MotionSession::new(Box::new(ManualSource::unavailable()));
        assert!(!session.is_available());
        let (tx, _rx) = channel();
        assert!(matches!(session.start(tx), Err(MotionError::Unavailable(_))));
        assert!(!session.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut session = MotionSession::new(Box::new(ManualSource::new(Vec::new())));
        session.stop();
        let (tx, _rx) = channel();
        session.start(tx).unwrap();
        assert!(session.is_running());
        session.stop();
        session.stop();
        assert!(!session.is_running());
    }

    #[test]
    fn log_messages_are_passed_through() {
        let (tx, rx) = channel();
        tx.send(MotionMessage::Log("hello".into())).unwrap();
        let mut buffers = ChannelBufferSet::with_capacity(4).unwrap();
        let mut logs = Vec::new();
        assert!(drain(&rx, &mut buffers, |_| {}, |s| logs.push(s)).is_none());
        assert_eq!(logs, vec!["hello".to_owned()]);
    }
}
