// src/motion/mod.rs
pub mod buffer;
pub mod channel;
pub mod cube;
pub mod error;
pub mod plot;
pub mod readout;
pub mod reading;
pub mod refresh;
pub mod selector;
pub mod source;
pub use buffer::{AxisBounds, ChannelBufferSet, GroupSnapshot, SamplePoint, SeriesSnapshot};
pub use channel::{Channel, ChannelGroup, SeriesColor};
pub use cube::{CubeFrame, CubePose, CubeScene, ProjectedFeature};
pub use error::MotionError;
pub use plot::{render_group_png, PlotStyle};
pub use readout::format_reading;
pub use reading::{
    Attitude, MagneticAccuracy, MagneticField, MotionReading, Quaternion, SensorLocation,
};
pub use refresh::{RedrawChannel, RefreshLoop};
pub use selector::{swipe_direction, GroupSelector};
pub use source::{
    Delivery, DeliveryHandler, ManualSource, MotionSource, ReplaySource, SimulatedConfig,
    SimulatedSource,
};
