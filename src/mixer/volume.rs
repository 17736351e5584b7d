//! Volume IN reports and slider tracking.
//!
//! Layout (`REPORT_SIZE` bytes):
//! ```text
//! Byte i: volume of sink i in percent (0..=100)
//! ```
//!
//! The host reads one byte per sink it knows about and ignores the rest.

use crate::config::{REPORT_SIZE, VOLUME_HYSTERESIS};

pub const MAX_VOLUME: u8 = 100;

/// One volume byte per channel.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeReport {
    pub volumes: [u8; REPORT_SIZE],
}

impl VolumeReport {
    /// All channels muted.
    pub const fn empty() -> Self {
        Self {
            volumes: [0; REPORT_SIZE],
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (0 if `buf` is too small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < REPORT_SIZE {
            return 0;
        }
        buf[..REPORT_SIZE].copy_from_slice(&self.volumes);
        REPORT_SIZE
    }
}

/// Scale a slider reading to percent, rounding to nearest.
///
/// Readings below zero (SAADC offset) clamp to 0, readings above
/// `full_scale` clamp to 100.
pub fn percent_from_raw(raw: i16, full_scale: i16) -> u8 {
    if full_scale <= 0 {
        return 0;
    }
    let raw = raw.clamp(0, full_scale) as u32;
    let full_scale = full_scale as u32;
    ((raw * MAX_VOLUME as u32 + full_scale / 2) / full_scale) as u8
}

/// Turns slider readings into reports, suppressing jitter.
///
/// A channel only changes once it moves by at least `VOLUME_HYSTERESIS`
/// percent, or when it reaches an end stop so 0 and 100 stay reachable.
#[derive(Debug, Default)]
pub struct SliderTracker {
    last: Option<VolumeReport>,
}

impl SliderTracker {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// The most recently reported volumes.
    pub fn current(&self) -> Option<&VolumeReport> {
        self.last.as_ref()
    }

    /// Force the next `update` to produce a report (e.g. after the host
    /// sent a new sink list).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Feed one reading per slider. Channels past `raw.len()` read 0.
    /// Returns a report when something changed.
    pub fn update(&mut self, raw: &[i16], full_scale: i16) -> Option<VolumeReport> {
        let mut next = VolumeReport::empty();
        for (volume, &reading) in next.volumes.iter_mut().zip(raw) {
            *volume = percent_from_raw(reading, full_scale);
        }

        if self.last.is_none() {
            self.last = Some(next);
            return Some(next);
        }
        let last = self.last.as_mut()?;

        let mut changed = false;
        for (old, &new) in last.volumes.iter_mut().zip(next.volumes.iter()) {
            let moved = old.abs_diff(new) >= VOLUME_HYSTERESIS;
            let end_stop = new != *old && (new == 0 || new == MAX_VOLUME);
            if moved || end_stop {
                *old = new;
                changed = true;
            }
        }

        changed.then_some(*last)
    }
}
