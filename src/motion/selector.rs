use std::collections::HashSet;

use crate::motion::buffer::{ChannelBufferSet, GroupSnapshot, SeriesSnapshot};
use crate::motion::channel::{ChannelGroup, GROUP_PALETTE};
use crate::motion::MotionError;

/// Minimum horizontal travel (in points) for a drag to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 24.0;

/// Cycles through a fixed list of disjoint channel groups.
pub struct GroupSelector {
    groups: Vec<ChannelGroup>,
    active: usize,
}

impl GroupSelector {
    pub fn new(groups: Vec<ChannelGroup>) -> Result<Self, MotionError> {
        if groups.is_empty() {
            return Err(MotionError::InvalidGroups("no groups defined".into()));
        }
        let mut seen = HashSet::new();
        for group in &groups {
            if group.channels.is_empty() {
                return Err(MotionError::InvalidGroups(format!(
                    "group '{}' has no channels",
                    group.name
                )));
            }
            if group.channels.len() > GROUP_PALETTE.len() {
                return Err(MotionError::InvalidGroups(format!(
                    "group '{}' has {} channels, at most {} can be colored",
                    group.name,
                    group.channels.len(),
                    GROUP_PALETTE.len()
                )));
            }
            for channel in &group.channels {
                if !seen.insert(*channel) {
                    return Err(MotionError::InvalidGroups(format!(
                        "channel {} appears in more than one group",
                        channel.name()
                    )));
                }
            }
        }
        Ok(Self { groups, active: 0 })
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &ChannelGroup {
        &self.groups[self.active]
    }

    /// Moves `direction` groups forward (negative values move backwards), wrapping.
    pub fn rotate(&mut self, direction: i32) {
        let count = self.groups.len() as i64;
        self.active = (self.active as i64 + direction as i64).rem_euclid(count) as usize;
    }

    /// Series of the current group, in display order.
    pub fn active_group(&self, buffers: &ChannelBufferSet) -> Vec<SeriesSnapshot> {
        self.snapshot(buffers).series
    }

    pub fn snapshot(&self, buffers: &ChannelBufferSet) -> GroupSnapshot {
        buffers.snapshot(self.active())
    }
}

impl Default for GroupSelector {
    fn default() -> Self {
        Self {
            groups: ChannelGroup::defaults(),
            active: 0,
        }
    }
}

/// Maps a finished horizontal drag to a group rotation.
///
/// Dragging left advances to the next group, dragging right goes back.
pub fn swipe_direction(start_x: f32, end_x: f32, threshold: f32) -> Option<i32> {
    if start_x > end_x + threshold {
        Some(1)
    } else if start_x < end_x - threshold {
        Some(-1)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::channel::Channel;
    use crate::motion::{Attitude, MotionReading};

    #[test]
    fn full_cycle_returns_to_start() {
        let mut sel = GroupSelector::default();
        sel.rotate(1);
        let start = sel.active_index();
        for _ in 0..sel.group_count() {
            sel.rotate(1);
        }
        assert_eq!(sel.active_index(), start);
    }

    #[test]
    fn backward_undoes_forward() {
        let mut sel = GroupSelector::default();
        for start in 0..sel.group_count() {
            while sel.active_index() != start {
                sel.rotate(1);
            }
            sel.rotate(1);
            sel.rotate(-1);
            assert_eq!(sel.active_index(), start);
        }
    }

    #[test]
    fn backward_from_first_wraps_to_last() {
        let mut sel = GroupSelector::default();
        assert_eq!(sel.group_count(), 4);
        sel.rotate(-1);
        assert_eq!(sel.active_index(), 3);
        assert_eq!(sel.active().name, "Quaternion");
    }

    #[test]
    fn overlapping_groups_are_rejected() {
        let groups = vec![
            ChannelGroup::new("a", [Channel::Roll, Channel::Pitch]),
            ChannelGroup::new("b", [Channel::Pitch]),
        ];
        assert!(matches!(
            GroupSelector::new(groups),
            Err(MotionError::InvalidGroups(_))
        ));
        assert!(GroupSelector::new(Vec::new()).is_err());
    }

    #[test]
    fn active_group_lists_buffers_with_names_and_colors() {
        let mut buffers = ChannelBufferSet::with_capacity(10).unwrap();
        buffers.append(&MotionReading::at_rest(0.0, Attitude::from_euler(0.0, 0.0, 0.0)));
        let mut sel = GroupSelector::default();
        sel.rotate(-1);
        let series = sel.active_group(&buffers);
        let names: Vec<&str> = series.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Qw", "Qx", "Qy", "Qz"]);
        assert_eq!(series[3].color, GROUP_PALETTE[3]);
        assert_eq!(series[0].points[0].value(), 1.0);
    }

    #[test]
    fn swipe_needs_to_clear_threshold() {
        assert_eq!(swipe_direction(200.0, 100.0, DEFAULT_SWIPE_THRESHOLD), Some(1));
        assert_eq!(swipe_direction(100.0, 200.0, DEFAULT_SWIPE_THRESHOLD), Some(-1));
        assert_eq!(swipe_direction(100.0, 120.0, DEFAULT_SWIPE_THRESHOLD), None);
        assert_eq!(swipe_direction(100.0, 76.0, DEFAULT_SWIPE_THRESHOLD), None);
    }
}
