use std::fmt;

use crate::motion::MotionReading;

pub const SEARCHING_TEXT: &str = "Looking for AirPods Pro";
pub const UNSUPPORTED_TEXT: &str = "Sorry, Your device is not supported.";

/// Text block shown above the chart for the latest reading.
pub fn format_reading(data: &MotionReading) -> String {
    Readout(data).to_string()
}

struct Readout<'a>(&'a MotionReading);

impl fmt::Display for Readout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0;
        let att = &data.attitude;
        let q = &att.quaternion;
        writeln!(f, "Source: {}", data.sensor_location.label())?;
        section(f, "Quaternion", &[("x", q.x), ("y", q.y), ("z", q.z), ("w", q.w)])?;
        section(
            f,
            "Attitude",
            &[("pitch", att.pitch), ("roll", att.roll), ("yaw", att.yaw)],
        )?;
        section(f, "Gravitational Acceleration", &xyz(data.gravity))?;
        section(f, "Rotation Rate", &xyz(data.rotation_rate))?;
        section(f, "Acceleration", &xyz(data.user_acceleration))?;
        let [fx, fy, fz] = data.magnetic_field.field;
        writeln!(f, "Magnetic Field:")?;
        writeln!(f, "    field: ({fx:.4}, {fy:.4}, {fz:.4})")?;
        writeln!(f, "    accuracy: {}", data.magnetic_field.accuracy.code())?;
        write!(f, "Heading: {}", data.heading)
    }
}

fn xyz(v: [f64; 3]) -> [(&'static str, f64); 3] {
    [("x", v[0]), ("y", v[1]), ("z", v[2])]
}

fn section(f: &mut fmt::Formatter<'_>, title: &str, rows: &[(&str, f64)]) -> fmt::Result {
    writeln!(f, "{title}:")?;
    for (label, value) in rows {
        writeln!(f, "    {label}: {}", round4(*value))?;
    }
    Ok(())
}

/// Rounds to 4 decimals without trailing zeros, and never prints "-0".
fn round4(value: f64) -> String {
    let s = format!("{:.4}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_owned(),
        other => other.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Attitude, MagneticAccuracy, SensorLocation};

    #[test]
    fn rounding_drops_noise() {
        assert_eq!(round4(0.123456), "0.1235");
        assert_eq!(round4(1.5), "1.5");
        assert_eq!(round4(-0.00001), "0");
        assert_eq!(round4(2.0), "2");
    }

    #[test]
    fn readout_lists_every_section() {
        let mut reading = MotionReading::at_rest(0.0, Attitude::from_euler(0.0, 0.25, 0.0));
        reading.sensor_location = SensorLocation::Unknown(4);
        reading.magnetic_field.accuracy = MagneticAccuracy::High;
        reading.heading = 12.5;
        let text = format_reading(&reading);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Source: Unknown (4)");
        assert_eq!(lines[1], "Quaternion:");
        assert!(text.contains("Attitude:\n    pitch: 0.25\n    roll: 0\n    yaw: 0\n"));
        assert!(text.contains("Gravitational Acceleration:\n    x: 0\n    y: 0\n    z: -1\n"));
        assert!(text.contains("Rotation Rate:"));
        assert!(text.contains("    accuracy: 2"));
        assert!(text.ends_with("Heading: 12.5"));
    }
}
