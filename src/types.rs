// src/types.rs
use crate::motion::MotionReading;

// 后台发给 GUI 的消息
#[derive(Clone, Debug)]
pub enum MotionMessage {
    Reading(MotionReading),
    Log(String),
}

// 页面
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ViewTab {
    Information,
    Cube,
}

impl ViewTab {
    pub fn title(self) -> &'static str {
        match self {
            ViewTab::Information => "Information View",
            ViewTab::Cube => "Simple 3D View",
        }
    }
}
