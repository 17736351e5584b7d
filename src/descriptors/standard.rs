//! Standard USB 2.0 descriptor records (chapter 9.6).
//!
//! Each record is built from named fields by a `const fn`, so the tables
//! in [`super`] are plain `static` byte arrays computed at compile time.
//! Multi-byte fields are little-endian.

use super::DescriptorType;

/// Device class/subclass/protocol code meaning "defined per interface".
pub const CLASS_PER_INTERFACE: u8 = 0x00;

/// `bmAttributes` bit 7, which USB 1.0 called "bus powered" and later
/// versions require to be set.
pub const CONFIG_ATTR_RESERVED: u8 = 0x80;
/// `bmAttributes` self-powered bit.
pub const CONFIG_ATTR_SELF_POWERED: u8 = 0x40;

/// `bmAttributes` transfer type for interrupt endpoints (no sync, data).
pub const ENDPOINT_TYPE_INTERRUPT: u8 = 0x03;

/// `bMaxPower` is expressed in 2 mA units.
pub const fn max_power(milliamps: u16) -> u8 {
    (milliamps / 2) as u8
}

/// Device descriptor (USB 2.0, table 9-8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub usb_bcd: u16,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
    pub max_packet_size_0: u8,
    pub vendor_id: u16,
    pub product_id: u16,
    pub device_bcd: u16,
    pub manufacturer_index: u8,
    pub product_index: u8,
    pub serial_number_index: u8,
    pub num_configurations: u8,
}

impl DeviceDescriptor {
    pub const LEN: usize = 18;

    pub const fn bytes(&self) -> [u8; Self::LEN] {
        let usb = self.usb_bcd.to_le_bytes();
        let vid = self.vendor_id.to_le_bytes();
        let pid = self.product_id.to_le_bytes();
        let release = self.device_bcd.to_le_bytes();
        [
            Self::LEN as u8,
            DescriptorType::DEVICE,
            usb[0],
            usb[1],
            self.class,
            self.subclass,
            self.protocol,
            self.max_packet_size_0,
            vid[0],
            vid[1],
            pid[0],
            pid[1],
            release[0],
            release[1],
            self.manufacturer_index,
            self.product_index,
            self.serial_number_index,
            self.num_configurations,
        ]
    }
}

/// Configuration descriptor header (USB 2.0, table 9-10).
///
/// `total_length` covers the header plus every interface, class and
/// endpoint descriptor that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigurationHeader {
    pub total_length: u16,
    pub num_interfaces: u8,
    pub configuration_value: u8,
    pub configuration_index: u8,
    pub attributes: u8,
    pub max_power: u8,
}

impl ConfigurationHeader {
    pub const LEN: usize = 9;

    pub const fn bytes(&self) -> [u8; Self::LEN] {
        let total = self.total_length.to_le_bytes();
        [
            Self::LEN as u8,
            DescriptorType::CONFIGURATION,
            total[0],
            total[1],
            self.num_interfaces,
            self.configuration_value,
            self.configuration_index,
            self.attributes,
            self.max_power,
        ]
    }
}

/// Interface descriptor (USB 2.0, table 9-12).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub class: u8,
    pub subclass: u8,
    pub protocol: u8,
    pub interface_index: u8,
}

impl InterfaceDescriptor {
    pub const LEN: usize = 9;

    pub const fn bytes(&self) -> [u8; Self::LEN] {
        [
            Self::LEN as u8,
            DescriptorType::INTERFACE,
            self.interface_number,
            self.alternate_setting,
            self.num_endpoints,
            self.class,
            self.subclass,
            self.protocol,
            self.interface_index,
        ]
    }
}

/// Endpoint descriptor (USB 2.0, table 9-13).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub address: u8,
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl EndpointDescriptor {
    pub const LEN: usize = 7;

    pub const fn bytes(&self) -> [u8; Self::LEN] {
        let size = self.max_packet_size.to_le_bytes();
        [
            Self::LEN as u8,
            DescriptorType::ENDPOINT,
            self.address,
            self.attributes,
            size[0],
            size[1],
            self.interval,
        ]
    }

    /// Endpoint direction bit: set for IN (device → host).
    pub const fn is_in(&self) -> bool {
        self.address & 0x80 != 0
    }
}

/// Copy `src` into `dst` at `offset` and return the next free offset.
/// Usable in const context, where the configuration blob is assembled.
pub(crate) const fn splice<const N: usize>(mut dst: [u8; N], offset: usize, src: &[u8]) -> ([u8; N], usize) {
    let mut i = 0;
    while i < src.len() {
        dst[offset + i] = src[i];
        i += 1;
    }
    (dst, offset + src.len())
}
