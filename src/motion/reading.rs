use serde::{Deserialize, Serialize};

/// Orientation quaternion reported by the headphone sensor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// Orientation angles in radians plus the matching quaternion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub quaternion: Quaternion,
}

impl Attitude {
    /// Builds an attitude from euler angles, deriving the quaternion (ZYX order).
    pub fn from_euler(roll: f64, pitch: f64, yaw: f64) -> Self {
        let (sr, cr) = (roll * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sy, cy) = (yaw * 0.5).sin_cos();
        let quaternion = Quaternion {
            w: cr * cp * cy + sr * sp * sy,
            x: sr * cp * cy - cr * sp * sy,
            y: cr * sp * cy + sr * cp * sy,
            z: cr * cp * sy - sr * sp * cy,
        };
        Self {
            roll,
            pitch,
            yaw,
            quaternion,
        }
    }

    /// `[roll, pitch, yaw]` in degrees.
    pub fn degrees(&self) -> [f64; 3] {
        [
            self.roll.to_degrees(),
            self.pitch.to_degrees(),
            self.yaw.to_degrees(),
        ]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagneticAccuracy {
    #[default]
    Uncalibrated,
    Low,
    Medium,
    High,
}

impl MagneticAccuracy {
    /// Numeric calibration code as shown in the readout (-1 = uncalibrated).
    pub fn code(self) -> i32 {
        match self {
            MagneticAccuracy::Uncalibrated => -1,
            MagneticAccuracy::Low => 0,
            MagneticAccuracy::Medium => 1,
            MagneticAccuracy::High => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MagneticField {
    /// Field vector in microtesla: `[x, y, z]`.
    pub field: [f64; 3],
    pub accuracy: MagneticAccuracy,
}

/// Which earbud produced the reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorLocation {
    #[default]
    Default,
    Left,
    Right,
    /// Unrecognised location code passed through from the device.
    Unknown(i32),
}

impl SensorLocation {
    pub fn label(self) -> String {
        match self {
            SensorLocation::Default => "Default".to_owned(),
            SensorLocation::Left => "Left".to_owned(),
            SensorLocation::Right => "Right".to_owned(),
            SensorLocation::Unknown(raw) => format!("Unknown ({raw})"),
        }
    }
}

/// One multi-channel motion event from the accessory.
///
/// # Units
///
/// - Angles: radians
/// - Accelerations: g
/// - Rotation rate: radians per second
/// - Heading: degrees
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionReading {
    /// Seconds since an arbitrary, monotonic origin.
    pub timestamp: f64,
    pub attitude: Attitude,
    pub gravity: [f64; 3],
    pub rotation_rate: [f64; 3],
    pub user_acceleration: [f64; 3],
    pub magnetic_field: MagneticField,
    pub heading: f64,
    pub sensor_location: SensorLocation,
}

impl MotionReading {
    /// A resting reading at the given time with the given orientation.
    pub fn at_rest(timestamp: f64, attitude: Attitude) -> Self {
        Self {
            timestamp,
            attitude,
            gravity: [0.0, 0.0, -1.0],
            ..Default::default()
        }
    }
}
