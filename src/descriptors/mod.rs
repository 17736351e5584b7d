//! USB descriptor tables and the GET_DESCRIPTOR resolver.
//!
//! Every table is a `static` byte array assembled at compile time from
//! the record builders in [`standard`], [`hid`] and [`string`]. The
//! resolver hands out `&'static [u8]` slices of them; it keeps no state
//! and can run from any context, including the USB interrupt.
//!
//! ```text
//! CONFIGURATION_DESCRIPTOR (41 bytes)
//!   0  configuration header   9
//!   9  interface              9
//!  18  HID class              9   <- also served alone for type 0x21
//!  27  endpoint IN            7
//!  34  endpoint OUT           7
//! ```

pub mod hid;
pub mod standard;
pub mod string;

use crate::config;
use hid::{
    HidClassDescriptor, HID_CLASS, HID_PROTOCOL_NONE, HID_REPORT_DESCRIPTOR, HID_SPEC_BCD,
    HID_SUBCLASS_NONE, REPORT_DESCRIPTOR_LEN,
};
use standard::{
    max_power, splice, ConfigurationHeader, DeviceDescriptor, EndpointDescriptor,
    InterfaceDescriptor, CLASS_PER_INTERFACE, CONFIG_ATTR_RESERVED, CONFIG_ATTR_SELF_POWERED,
    ENDPOINT_TYPE_INTERRUPT,
};
use string::{language_descriptor, string_descriptor, string_descriptor_len};

/// Descriptor type byte (high byte of `wValue`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorType {
    Device,
    Configuration,
    String,
    Interface,
    Endpoint,
    /// HID class descriptor.
    Hid,
    /// HID report descriptor.
    HidReport,
    /// Anything this device does not describe.
    Unknown(u8),
}

impl DescriptorType {
    pub const DEVICE: u8 = 0x01;
    pub const CONFIGURATION: u8 = 0x02;
    pub const STRING: u8 = 0x03;
    pub const INTERFACE: u8 = 0x04;
    pub const ENDPOINT: u8 = 0x05;
    pub const HID: u8 = 0x21;
    pub const HID_REPORT: u8 = 0x22;
}

impl From<u8> for DescriptorType {
    fn from(code: u8) -> Self {
        match code {
            Self::DEVICE => DescriptorType::Device,
            Self::CONFIGURATION => DescriptorType::Configuration,
            Self::STRING => DescriptorType::String,
            Self::INTERFACE => DescriptorType::Interface,
            Self::ENDPOINT => DescriptorType::Endpoint,
            Self::HID => DescriptorType::Hid,
            Self::HID_REPORT => DescriptorType::HidReport,
            other => DescriptorType::Unknown(other),
        }
    }
}

impl From<DescriptorType> for u8 {
    fn from(ty: DescriptorType) -> Self {
        match ty {
            DescriptorType::Device => DescriptorType::DEVICE,
            DescriptorType::Configuration => DescriptorType::CONFIGURATION,
            DescriptorType::String => DescriptorType::STRING,
            DescriptorType::Interface => DescriptorType::INTERFACE,
            DescriptorType::Endpoint => DescriptorType::ENDPOINT,
            DescriptorType::Hid => DescriptorType::HID,
            DescriptorType::HidReport => DescriptorType::HID_REPORT,
            DescriptorType::Unknown(code) => code,
        }
    }
}

/// `wValue` of a GET_DESCRIPTOR request, split into type and index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DescriptorRequest {
    pub descriptor_type: DescriptorType,
    pub index: u8,
}

impl DescriptorRequest {
    pub fn from_w_value(w_value: u16) -> Self {
        let [index, ty] = w_value.to_le_bytes();
        Self {
            descriptor_type: DescriptorType::from(ty),
            index,
        }
    }

    pub fn w_value(&self) -> u16 {
        u16::from_be_bytes([self.descriptor_type.into(), self.index])
    }
}

/// String index meaning "no string", and the length reported for a
/// descriptor that doesn't exist.
pub const NO_DESCRIPTOR: u8 = 0;

// String table indices.
pub const STRING_ID_LANGUAGE: u8 = 0;
pub const STRING_ID_MANUFACTURER: u8 = 1;
pub const STRING_ID_PRODUCT: u8 = 2;

// Device

pub const DEVICE: DeviceDescriptor = DeviceDescriptor {
    usb_bcd: config::USB_SPEC_BCD,
    class: CLASS_PER_INTERFACE,
    subclass: CLASS_PER_INTERFACE,
    protocol: CLASS_PER_INTERFACE,
    max_packet_size_0: config::USB_CONTROL_ENDPOINT_SIZE,
    vendor_id: config::USB_VID,
    product_id: config::USB_PID,
    device_bcd: config::USB_DEVICE_RELEASE_BCD,
    manufacturer_index: STRING_ID_MANUFACTURER,
    product_index: STRING_ID_PRODUCT,
    serial_number_index: NO_DESCRIPTOR,
    num_configurations: 1,
};

pub static DEVICE_DESCRIPTOR: [u8; DeviceDescriptor::LEN] = DEVICE.bytes();

// Configuration

pub const CONFIGURATION_DESCRIPTOR_LEN: usize = ConfigurationHeader::LEN
    + InterfaceDescriptor::LEN
    + HidClassDescriptor::LEN
    + 2 * EndpointDescriptor::LEN;

/// Offset of the HID class descriptor inside the configuration blob.
pub const HID_DESCRIPTOR_OFFSET: usize = ConfigurationHeader::LEN + InterfaceDescriptor::LEN;

pub const CONFIGURATION: ConfigurationHeader = ConfigurationHeader {
    total_length: CONFIGURATION_DESCRIPTOR_LEN as u16,
    num_interfaces: 1,
    configuration_value: 1,
    configuration_index: NO_DESCRIPTOR,
    attributes: CONFIG_ATTR_RESERVED | CONFIG_ATTR_SELF_POWERED,
    max_power: max_power(config::USB_MAX_POWER_MA),
};

pub const INTERFACE: InterfaceDescriptor = InterfaceDescriptor {
    interface_number: config::HID_INTERFACE,
    alternate_setting: 0,
    num_endpoints: 2,
    class: HID_CLASS,
    subclass: HID_SUBCLASS_NONE,
    protocol: HID_PROTOCOL_NONE,
    interface_index: NO_DESCRIPTOR,
};

pub const HID: HidClassDescriptor = HidClassDescriptor {
    hid_bcd: HID_SPEC_BCD,
    country_code: 0,
    report_descriptor_len: REPORT_DESCRIPTOR_LEN as u16,
};

pub const REPORT_IN_ENDPOINT: EndpointDescriptor = EndpointDescriptor {
    address: config::HID_IN_ENDPOINT,
    attributes: ENDPOINT_TYPE_INTERRUPT,
    max_packet_size: config::HID_ENDPOINT_SIZE,
    interval: config::HID_POLL_MS,
};

pub const REPORT_OUT_ENDPOINT: EndpointDescriptor = EndpointDescriptor {
    address: config::HID_OUT_ENDPOINT,
    attributes: ENDPOINT_TYPE_INTERRUPT,
    max_packet_size: config::HID_ENDPOINT_SIZE,
    interval: config::HID_POLL_MS,
};

const fn configuration_descriptor() -> [u8; CONFIGURATION_DESCRIPTOR_LEN] {
    let buf = [0u8; CONFIGURATION_DESCRIPTOR_LEN];
    let (buf, at) = splice(buf, 0, &CONFIGURATION.bytes());
    let (buf, at) = splice(buf, at, &INTERFACE.bytes());
    assert!(at == HID_DESCRIPTOR_OFFSET);
    let (buf, at) = splice(buf, at, &HID.bytes());
    let (buf, at) = splice(buf, at, &REPORT_IN_ENDPOINT.bytes());
    let (buf, at) = splice(buf, at, &REPORT_OUT_ENDPOINT.bytes());
    assert!(at == CONFIGURATION_DESCRIPTOR_LEN);
    buf
}

pub static CONFIGURATION_DESCRIPTOR: [u8; CONFIGURATION_DESCRIPTOR_LEN] =
    configuration_descriptor();

// Strings

const MANUFACTURER_STRING_LEN: usize = string_descriptor_len(config::USB_MANUFACTURER);
const PRODUCT_STRING_LEN: usize = string_descriptor_len(config::USB_PRODUCT);

pub static LANGUAGE_STRING: [u8; 4] = language_descriptor(config::USB_LANGUAGE_ID);
pub static MANUFACTURER_STRING: [u8; MANUFACTURER_STRING_LEN] =
    string_descriptor(config::USB_MANUFACTURER);
pub static PRODUCT_STRING: [u8; PRODUCT_STRING_LEN] = string_descriptor(config::USB_PRODUCT);

/// The HID class descriptor, as stored inside the configuration.
pub fn hid_descriptor() -> &'static [u8] {
    &CONFIGURATION_DESCRIPTOR[HID_DESCRIPTOR_OFFSET..HID_DESCRIPTOR_OFFSET + HidClassDescriptor::LEN]
}

/// A string descriptor sized by its own `bLength`.
fn string(desc: &'static [u8]) -> &'static [u8] {
    &desc[..desc[0] as usize]
}

/// Resolve a GET_DESCRIPTOR request.
///
/// `w_value` carries the descriptor type in its high byte and the index
/// in its low byte. `w_index` (the language ID for strings, the
/// interface for class descriptors) does not affect the result. Returns
/// `None` for anything this device doesn't describe; the USB stack
/// answers that with a STALL.
pub fn get_descriptor(w_value: u16, _w_index: u16) -> Option<&'static [u8]> {
    let request = DescriptorRequest::from_w_value(w_value);

    match request.descriptor_type {
        DescriptorType::Device => Some(&DEVICE_DESCRIPTOR),
        DescriptorType::Configuration => Some(&CONFIGURATION_DESCRIPTOR),
        DescriptorType::String => match request.index {
            STRING_ID_LANGUAGE => Some(string(&LANGUAGE_STRING)),
            STRING_ID_MANUFACTURER => Some(string(&MANUFACTURER_STRING)),
            STRING_ID_PRODUCT => Some(string(&PRODUCT_STRING)),
            _ => None,
        },
        DescriptorType::Hid => Some(hid_descriptor()),
        DescriptorType::HidReport => Some(&HID_REPORT_DESCRIPTOR),
        DescriptorType::Interface | DescriptorType::Endpoint | DescriptorType::Unknown(_) => None,
    }
}

/// Length of the resolved descriptor, or [`NO_DESCRIPTOR`] when there is
/// none.
pub fn descriptor_len(w_value: u16, w_index: u16) -> u16 {
    get_descriptor(w_value, w_index)
        .map(|desc| desc.len() as u16)
        .unwrap_or(NO_DESCRIPTOR as u16)
}

#[cfg(test)]
mod tests;
