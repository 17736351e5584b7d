//! Sink name frames sent by the host in OUT reports.
//!
//! Frame layout (may span several reports, trailing zero padding):
//! ```text
//! STX (0x02)
//!   SOH (0x01) name bytes…   ← repeated once per sink, oldest last
//! ETX (0x03)
//! ```
//!
//! Names carry one byte per character (Latin-1) with no terminator; SOH
//! and ETX can't appear inside them. Names past `MAX_SINKS` are ignored,
//! since a report only has volume slots for that many.

use crate::config::{MAX_SINKS, MAX_SINK_NAME_LEN};
use crate::Error;
use heapless::{String, Vec};

pub const START_OF_HEADING: u8 = 0x01;
pub const START_OF_TEXT: u8 = 0x02;
pub const END_OF_TEXT: u8 = 0x03;

/// UTF-8 capacity of a name: each Latin-1 character needs at most two bytes.
pub const SINK_NAME_CAPACITY: usize = MAX_SINK_NAME_LEN * 2;

pub type SinkName = String<SINK_NAME_CAPACITY>;

/// Sink names in the order the host listed them. Slider `i` controls
/// the volume of sink `i`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SinkList {
    names: Vec<SinkName, MAX_SINKS>,
}

impl SinkList {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|n| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SinkList {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SinkList({=usize} sinks)", self.names.len());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Waiting for STX.
    Idle,
    /// Inside a frame, before the first SOH.
    AwaitName,
    /// Collecting the bytes of a name.
    InName,
    /// Past the last sink a report has a slot for; bytes are dropped.
    Skipping,
}

/// Byte-driven decoder for sink name frames.
#[derive(Debug)]
pub struct FrameDecoder {
    state: State,
    names: Vec<SinkName, MAX_SINKS>,
    current: SinkName,
    /// Host bytes kept for `current`.
    current_len: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            names: Vec::new(),
            current: String::new(),
            current_len: 0,
        }
    }

    /// Drop any partial frame.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.names.clear();
        self.current.clear();
        self.current_len = 0;
    }

    /// True while a frame has been started but not finished.
    pub fn in_frame(&self) -> bool {
        self.state != State::Idle
    }

    /// Feed one byte. Returns the sink list when `byte` completes a frame.
    ///
    /// On error the partial frame is dropped and the decoder waits for
    /// the next STX.
    pub fn push(&mut self, byte: u8) -> Result<Option<SinkList>, Error> {
        let result = self.step(byte);
        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Feed a whole OUT report. Returns the last frame completed inside
    /// it. Bytes after an error are discarded with the rest of the report.
    pub fn push_report(&mut self, report: &[u8]) -> Result<Option<SinkList>, Error> {
        let mut completed = None;
        for &byte in report {
            if let Some(list) = self.push(byte)? {
                completed = Some(list);
            }
        }
        Ok(completed)
    }

    fn step(&mut self, byte: u8) -> Result<Option<SinkList>, Error> {
        if byte == START_OF_TEXT {
            self.reset();
            self.state = State::AwaitName;
            return Ok(None);
        }

        match (self.state, byte) {
            (State::Idle, _) => Ok(None),
            (_, 0x00) => Ok(None),
            (_, START_OF_HEADING) => {
                self.finish_name();
                self.state = if self.names.is_full() {
                    State::Skipping
                } else {
                    State::InName
                };
                Ok(None)
            }
            (_, END_OF_TEXT) => {
                self.finish_name();
                let list = SinkList {
                    names: core::mem::take(&mut self.names),
                };
                self.reset();
                Ok(Some(list))
            }
            (State::AwaitName, other) => Err(Error::UnexpectedByte(other)),
            (State::Skipping, _) => Ok(None),
            (State::InName, other) => {
                if self.current_len < MAX_SINK_NAME_LEN {
                    // Never full: every Latin-1 character fits in two bytes.
                    let _ = self.current.push(char::from(other));
                    self.current_len += 1;
                }
                Ok(None)
            }
        }
    }

    fn finish_name(&mut self) {
        if self.state != State::InName {
            return;
        }
        // Room is checked when the SOH arrives.
        let _ = self.names.push(core::mem::take(&mut self.current));
        self.current_len = 0;
    }
}
