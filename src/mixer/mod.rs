//! Device side of the mixer protocol.
//!
//! The host writes the names of its audio streams (sinks) into OUT
//! reports and reads one volume byte per sink from IN reports. Slider
//! `i` on the device controls sink `i` in the host's list.

pub mod frame;
pub mod volume;

pub use frame::{FrameDecoder, SinkList, SinkName};
pub use volume::{percent_from_raw, SliderTracker, VolumeReport};
