use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::motion::{MotionError, MotionReading};

/// Writes readings to a JSON-lines capture that `ReplaySource` can play back.
pub struct MotionRecorder {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    written: usize,
}

impl MotionRecorder {
    pub fn new() -> Self {
        Self {
            writer: None,
            path: None,
            written: 0,
        }
    }

    pub fn start(&mut self, dir: &Path, label: &str) -> Result<PathBuf, MotionError> {
        self.stop();
        // 文件名带时间戳和标签
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let label: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        let path = dir.join(format!("motion_{label}_{timestamp}.jsonl"));
        let file = File::create(&path)?;
        self.writer = Some(BufWriter::new(file));
        self.path = Some(path.clone());
        self.written = 0;
        log::info!("recording started: {}", path.display());
        Ok(path)
    }

    pub fn stop(&mut self) {
        if let Some(mut w) = self.writer.take() {
            if let Err(e) = w.flush() {
                log::warn!("failed to flush capture: {e}");
            }
            log::info!("recording saved ({} readings)", self.written);
        }
        self.path = None;
    }

    pub fn write(&mut self, reading: &MotionReading) {
        if let Some(w) = &mut self.writer {
            let result = serde_json::to_writer(&mut *w, reading)
                .map_err(std::io::Error::from)
                .and_then(|_| writeln!(w));
            match result {
                Ok(()) => self.written += 1,
                Err(e) => log::warn!("dropping reading from capture: {e}"),
            }
        }
    }

    pub fn is_recording(&self) -> bool {
        self.writer.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl Default for MotionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MotionRecorder {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Attitude, MotionSource, ReplaySource};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn capture_plays_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder = MotionRecorder::new();
        let path = recorder.start(dir.path(), "nod test").unwrap();
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("motion_nod_test_")));
        let readings: Vec<MotionReading> = (0..3)
            .map(|i| MotionReading::at_rest(i as f64 * 0.001, Attitude::from_euler(0.1 * i as f64, 0.0, 0.0)))
            .collect();
        for r in &readings {
            recorder.write(r);
        }
        assert_eq!(recorder.written(), 3);
        recorder.stop();
        assert!(!recorder.is_recording());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut replay = ReplaySource::new(&path, 1.0);
        replay
            .start(Box::new(move |d| sink.lock().unwrap().push(d.unwrap())))
            .unwrap();
        for _ in 0..50 {
            if seen.lock().unwrap().len() == 3 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        replay.stop();
        assert_eq!(*seen.lock().unwrap(), readings);
    }

    #[test]
    fn writes_are_ignored_when_idle() {
        let mut recorder = MotionRecorder::new();
        recorder.write(&MotionReading::default());
        assert_eq!(recorder.written(), 0);
        assert!(recorder.path().is_none());
    }
}
