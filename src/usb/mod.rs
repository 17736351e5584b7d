//! USB Device subsystem - presents the mixer HID interface to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`. The device exposes a single vendor-page HID interface:
//!
//! - Interrupt OUT: sink name frames from the host
//! - Interrupt IN:  one volume byte per sink
//!
//! Descriptor content comes from `volume_mixer::descriptors`.

pub mod hid_device;
