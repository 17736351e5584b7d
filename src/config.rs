//! Application-wide constants and compile-time configuration.
//!
//! Device identity, endpoint layout, and mixer protocol limits live here
//! so the descriptor tables and the firmware can't drift apart.

// USB identity

/// VID/PID the host mixer opens (Arduino Micro IDs, kept for compatibility
/// with the existing host tool).
pub const USB_VID: u16 = 0x2341;
pub const USB_PID: u16 = 0x8037;

/// USB specification release (BCD). 1.1 is enough for a full-speed HID.
pub const USB_SPEC_BCD: u16 = 0x0110;

/// Device release number (BCD).
pub const USB_DEVICE_RELEASE_BCD: u16 = 0x0001;

/// USB device strings. The manufacturer string is intentionally empty.
pub const USB_MANUFACTURER: &str = "";
pub const USB_PRODUCT: &str = "Volume Mixer";

/// Language ID for all string descriptors (English, United States).
pub const USB_LANGUAGE_ID: u16 = 0x0409;

/// Control endpoint (EP0) max packet size.
pub const USB_CONTROL_ENDPOINT_SIZE: u8 = 8;

/// Requested bus current (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

// HID interface

/// Interface number of the mixer HID interface.
pub const HID_INTERFACE: u8 = 0;

/// Interrupt IN endpoint (device → host volume reports).
pub const HID_IN_ENDPOINT: u8 = 0x81;

/// Interrupt OUT endpoint (host → device sink names).
pub const HID_OUT_ENDPOINT: u8 = 0x01;

/// Max packet size for both interrupt endpoints.
pub const HID_ENDPOINT_SIZE: u16 = 8;

/// Interrupt endpoint polling interval (ms).
pub const HID_POLL_MS: u8 = 16;

/// Number of 8-bit fields in each input and output report.
pub const REPORT_SIZE: usize = 8;

// Mixer protocol

/// Longest sink name kept; the rest of a longer name is dropped.
pub const MAX_SINK_NAME_LEN: usize = 32;

/// One volume byte per sink, so a report bounds the sink count.
pub const MAX_SINKS: usize = REPORT_SIZE;

/// Smallest volume step (percent) forwarded to the host.
pub const VOLUME_HYSTERESIS: u8 = 2;

// Sliders
//
// One linear potentiometer per channel on AIN0..AIN7 (P0.02..P0.05,
// P0.28..P0.31 on the nRF52840-DK).

/// Number of physical sliders.
pub const SLIDER_COUNT: usize = 8;

/// Full-scale SAADC reading at 12-bit resolution.
pub const SLIDER_FULL_SCALE: i16 = 4095;

/// Slider sampling period (ms).
pub const SLIDER_SAMPLE_MS: u64 = 20;

// Display

/// Sink rows that fit on the 128×64 OLED below the title.
pub const DISPLAY_ROWS: usize = 5;
