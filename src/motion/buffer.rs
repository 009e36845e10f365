use crate::motion::channel::{Channel, ChannelGroup, SeriesColor, CHANNEL_COUNT};
use crate::motion::{MotionError, MotionReading};

/// One timestamped scalar within a channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplePoint {
    sequence: u64,
    timestamp: f64,
    value: f64,
}

impl SamplePoint {
    pub fn new(sequence: u64, timestamp: f64, value: f64) -> Self {
        Self {
            sequence,
            timestamp,
            value,
        }
    }
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// All channel values that share one sequence number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleRow {
    pub sequence: u64,
    pub timestamp: f64,
    pub values: [f64; CHANNEL_COUNT],
}

impl SampleRow {
    pub fn point(&self, channel: Channel) -> SamplePoint {
        SamplePoint::new(self.sequence, self.timestamp, self.values[channel.index()])
    }
}

/// Copied series handed to a renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSnapshot {
    pub channel: Channel,
    pub name: &'static str,
    pub color: SeriesColor,
    pub points: Vec<SamplePoint>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBounds {
    /// Sequence-number domain, always `capacity` wide.
    pub x: (u64, u64),
    pub y: (f64, f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupSnapshot {
    pub group_name: String,
    pub series: Vec<SeriesSnapshot>,
    pub bounds: AxisBounds,
}

impl GroupSnapshot {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }
}

/// Rolling buffer holding the most recent `capacity` readings for every channel.
///
/// Rows live in a fixed-capacity ring: `head` is the oldest slot once the
/// storage is full, so eviction is a single index bump. Because a row carries
/// all channels, every channel always has the same length and sequence window.
pub struct ChannelBufferSet {
    rows: Vec<SampleRow>,
    head: usize,
    capacity: usize,
}

impl ChannelBufferSet {
    pub fn with_capacity(capacity: usize) -> Result<Self, MotionError> {
        if capacity == 0 {
            return Err(MotionError::InvalidCapacity);
        }
        Ok(Self {
            rows: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends one sample per channel, evicting the oldest row when full.
    pub fn append(&mut self, reading: &MotionReading) {
        let sequence = self.latest().map_or(0, |row| row.sequence + 1);
        let row = SampleRow {
            sequence,
            timestamp: reading.timestamp,
            values: Channel::decompose(reading),
        };
        if self.rows.len() < self.capacity {
            self.rows.push(row);
        } else {
            self.rows[self.head] = row;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.head = 0;
    }

    /// Rows from oldest to newest.
    pub fn rows(&self) -> impl Iterator<Item = &SampleRow> + '_ {
        let (newer, older) = self.rows.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn latest(&self) -> Option<&SampleRow> {
        if self.rows.is_empty() {
            return None;
        }
        let idx = (self.head + self.rows.len() - 1) % self.rows.len();
        self.rows.get(idx)
    }

    pub fn oldest(&self) -> Option<&SampleRow> {
        self.rows.get(self.head)
    }

    /// Ordered samples of a single channel.
    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = SamplePoint> + '_ {
        self.rows().map(move |row| row.point(channel))
    }

    pub fn lower_limit(&self) -> u64 {
        self.oldest().map_or(0, |row| row.sequence)
    }

    pub fn upper_limit(&self) -> u64 {
        self.lower_limit() + self.capacity as u64 - 1
    }

    /// Copies a group's series out of the buffer together with axis bounds.
    pub fn snapshot(&self, group: &ChannelGroup) -> GroupSnapshot {
        let series: Vec<SeriesSnapshot> = group
            .members()
            .map(|(channel, color)| SeriesSnapshot {
                channel,
                name: channel.name(),
                color,
                points: self.channel(channel).collect(),
            })
            .collect();
        let y = value_range(&series);
        GroupSnapshot {
            group_name: group.name.clone(),
            series,
            bounds: AxisBounds {
                x: (self.lower_limit(), self.upper_limit()),
                y,
            },
        }
    }
}

fn value_range(series: &[SeriesSnapshot]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for p in series.iter().flat_map(|s| s.points.iter()) {
        min = min.min(p.value());
        max = max.max(p.value());
    }
    if min > max {
        return (-1.0, 1.0);
    }
    // Avoid a zero-height axis.
    let pad = ((max - min) * 0.1).max(0.05);
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Attitude;

    fn reading_with_roll(t: f64, roll: f64) -> MotionReading {
        MotionReading {
            timestamp: t,
            attitude: Attitude {
                roll,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            ChannelBufferSet::with_capacity(0),
            Err(MotionError::InvalidCapacity)
        ));
    }

    #[test]
    fn keeps_most_recent_window() {
        let mut buf = ChannelBufferSet::with_capacity(3).unwrap();
        for (i, v) in [1.0, 2.0, 3.0, 4.0, 5.0].iter().enumerate() {
            buf.append(&reading_with_roll(i as f64 * 0.04, *v));
        }
        let roll: Vec<SamplePoint> = buf.channel(Channel::Roll).collect();
        let seqs: Vec<u64> = roll.iter().map(|p| p.sequence()).collect();
        let values: Vec<f64> = roll.iter().map(|p| p.value()).collect();
        assert_eq!(seqs, vec![2, 3, 4]);
        assert_eq!(values, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn long_runs_stay_at_capacity_with_contiguous_sequences() {
        let capacity = 200;
        let mut buf = ChannelBufferSet::with_capacity(capacity).unwrap();
        let total = 1234u64;
        for i in 0..total {
            buf.append(&reading_with_roll(i as f64, i as f64));
            assert!(buf.len() <= capacity);
        }
        assert_eq!(buf.len(), capacity);
        let seqs: Vec<u64> = buf.rows().map(|r| r.sequence).collect();
        let expected: Vec<u64> = (total - capacity as u64..total).collect();
        assert_eq!(seqs, expected);
    }

    #[test]
    fn every_channel_has_the_same_window() {
        let mut buf = ChannelBufferSet::with_capacity(5).unwrap();
        for i in 0..8 {
            buf.append(&reading_with_roll(i as f64, 0.0));
            let lens: Vec<usize> = Channel::ALL.iter().map(|c| buf.channel(*c).count()).collect();
            assert!(lens.iter().all(|l| *l == lens[0]));
            let firsts: Vec<u64> = Channel::ALL
                .iter()
                .filter_map(|c| buf.channel(*c).next().map(|p| p.sequence()))
                .collect();
            assert!(firsts.iter().all(|s| *s == firsts[0]));
        }
    }

    #[test]
    fn clear_restarts_sequence_at_zero() {
        let mut buf = ChannelBufferSet::with_capacity(4).unwrap();
        for i in 0..6 {
            buf.append(&reading_with_roll(i as f64, 1.0));
        }
        buf.clear();
        assert!(buf.is_empty());
        assert!(Channel::ALL.iter().all(|c| buf.channel(*c).next().is_none()));
        buf.append(&reading_with_roll(9.0, 1.0));
        assert_eq!(buf.latest().map(|r| r.sequence), Some(0));
    }

    #[test]
    fn snapshot_bounds_follow_window() {
        let mut buf = ChannelBufferSet::with_capacity(3).unwrap();
        let empty = buf.snapshot(&ChannelGroup::defaults()[0]);
        assert!(empty.is_empty());
        assert_eq!(empty.bounds.x, (0, 2));
        for i in 0..5 {
            buf.append(&reading_with_roll(i as f64, i as f64));
        }
        let snap = buf.snapshot(&ChannelGroup::defaults()[0]);
        assert_eq!(snap.group_name, "Attitude");
        assert_eq!(snap.series.len(), 3);
        assert_eq!(snap.series[0].name, "Roll");
        assert_eq!(snap.bounds.x, (2, 4));
        assert!(snap.bounds.y.0 < 0.0 && snap.bounds.y.1 > 4.0);
    }
}
