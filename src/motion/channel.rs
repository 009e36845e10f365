use crate::motion::MotionReading;

pub const CHANNEL_COUNT: usize = 13;

/// A single named scalar time series derived from a motion reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    Roll,
    Pitch,
    Yaw,
    AccX,
    AccY,
    AccZ,
    RotX,
    RotY,
    RotZ,
    Qw,
    Qx,
    Qy,
    Qz,
}

impl Channel {
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Roll,
        Channel::Pitch,
        Channel::Yaw,
        Channel::AccX,
        Channel::AccY,
        Channel::AccZ,
        Channel::RotX,
        Channel::RotY,
        Channel::RotZ,
        Channel::Qw,
        Channel::Qx,
        Channel::Qy,
        Channel::Qz,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Roll => "Roll",
            Channel::Pitch => "Pitch",
            Channel::Yaw => "Yaw",
            Channel::AccX => "AccX",
            Channel::AccY => "AccY",
            Channel::AccZ => "AccZ",
            Channel::RotX => "RotX",
            Channel::RotY => "RotY",
            Channel::RotZ => "RotZ",
            Channel::Qw => "Qw",
            Channel::Qx => "Qx",
            Channel::Qy => "Qy",
            Channel::Qz => "Qz",
        }
    }

    pub fn extract(self, reading: &MotionReading) -> f64 {
        let att = &reading.attitude;
        match self {
            Channel::Roll => att.roll,
            Channel::Pitch => att.pitch,
            Channel::Yaw => att.yaw,
            Channel::AccX => reading.user_acceleration[0],
            Channel::AccY => reading.user_acceleration[1],
            Channel::AccZ => reading.user_acceleration[2],
            Channel::RotX => reading.rotation_rate[0],
            Channel::RotY => reading.rotation_rate[1],
            Channel::RotZ => reading.rotation_rate[2],
            Channel::Qw => att.quaternion.w,
            Channel::Qx => att.quaternion.x,
            Channel::Qy => att.quaternion.y,
            Channel::Qz => att.quaternion.z,
        }
    }

    /// Every channel's value for one reading, in channel order.
    pub fn decompose(reading: &MotionReading) -> [f64; CHANNEL_COUNT] {
        Channel::ALL.map(|c| c.extract(reading))
    }
}

/// RGB display color, independent of the drawing backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl SeriesColor {
    pub const TEAL: SeriesColor = SeriesColor(48, 176, 199);
    pub const ORANGE: SeriesColor = SeriesColor(255, 149, 0);
    pub const GREEN: SeriesColor = SeriesColor(52, 199, 89);
    pub const PURPLE: SeriesColor = SeriesColor(175, 82, 222);
}

/// Colors assigned by position within a group.
pub const GROUP_PALETTE: [SeriesColor; 4] = [
    SeriesColor::TEAL,
    SeriesColor::ORANGE,
    SeriesColor::GREEN,
    SeriesColor::PURPLE,
];

/// Named subset of channels displayed together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelGroup {
    pub name: String,
    pub channels: Vec<Channel>,
}

impl ChannelGroup {
    pub fn new(name: impl Into<String>, channels: impl IntoIterator<Item = Channel>) -> Self {
        Self {
            name: name.into(),
            channels: channels.into_iter().collect(),
        }
    }

    /// `(channel, color)` pairs in display order.
    pub fn members(&self) -> impl Iterator<Item = (Channel, SeriesColor)> + '_ {
        self.channels
            .iter()
            .zip(GROUP_PALETTE.iter())
            .map(|(c, color)| (*c, *color))
    }

    /// Attitude, acceleration, rotation rate and quaternion groups.
    pub fn defaults() -> Vec<ChannelGroup> {
        use Channel::*;
        vec![
            ChannelGroup::new("Attitude", [Roll, Pitch, Yaw]),
            ChannelGroup::new("Acceleration", [AccX, AccY, AccZ]),
            ChannelGroup::new("Rotation Rate", [RotX, RotY, RotZ]),
            ChannelGroup::new("Quaternion", [Qw, Qx, Qy, Qz]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Attitude, MotionReading};

    #[test]
    fn channel_order_matches_index() {
        for (i, c) in Channel::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn decompose_routes_fields() {
        let reading = MotionReading {
            attitude: Attitude::from_euler(0.1, 0.2, 0.3),
            user_acceleration: [1.0, 2.0, 3.0],
            rotation_rate: [4.0, 5.0, 6.0],
            ..Default::default()
        };
        let values = Channel::decompose(&reading);
        assert_eq!(values[Channel::Roll.index()], 0.1);
        assert_eq!(values[Channel::Yaw.index()], 0.3);
        assert_eq!(values[Channel::AccY.index()], 2.0);
        assert_eq!(values[Channel::RotZ.index()], 6.0);
        assert_eq!(values[Channel::Qw.index()], reading.attitude.quaternion.w);
    }

    #[test]
    fn default_groups_partition_all_channels() {
        let mut seen: Vec<Channel> = ChannelGroup::defaults()
            .into_iter()
            .flat_map(|g| g.channels)
            .collect();
        seen.sort();
        assert_eq!(seen, Channel::ALL.to_vec());
    }
}
