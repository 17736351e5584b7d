//! Unified error type for volume-mixer.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Mixer protocol
    /// A name byte arrived before the first SOH of a frame.
    UnexpectedByte(u8),

    // Report descriptor
    /// The report descriptor ended in the middle of an item, used a long
    /// item, or left a collection open.
    MalformedReportDescriptor,
}
