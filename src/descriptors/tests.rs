//! Unit tests for the descriptor tables and the resolver.
//!
//! These tests run on the host (not embedded) and check the tables byte
//! for byte against USB 2.0 / HID 1.11 layouts.

use super::hid::{ReportLayout, HID_REPORT_DESCRIPTOR};
use super::*;
use crate::config::{HID_ENDPOINT_SIZE, HID_IN_ENDPOINT, HID_OUT_ENDPOINT, REPORT_SIZE};

fn w_value(ty: u8, index: u8) -> u16 {
    u16::from_be_bytes([ty, index])
}

// ═══════════════════════════════════════════════════════════════════════════
// Resolver
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn device_request_returns_device_descriptor() {
    let desc = get_descriptor(0x0100, 0).unwrap();
    assert_eq!(desc.len(), DeviceDescriptor::LEN);
    assert_eq!(desc.as_ptr(), DEVICE_DESCRIPTOR.as_ptr());
}

#[test]
fn configuration_request_returns_whole_configuration() {
    let desc = get_descriptor(0x0200, 0).unwrap();
    assert_eq!(desc.len(), CONFIGURATION_DESCRIPTOR_LEN);
    assert_eq!(desc.len(), 41);
    assert_eq!(desc.as_ptr(), CONFIGURATION_DESCRIPTOR.as_ptr());
}

#[test]
fn string_requests_resolve_by_index() {
    assert_eq!(get_descriptor(0x0300, 0).unwrap(), &[4, 0x03, 0x09, 0x04]);
    assert_eq!(get_descriptor(0x0301, 0x0409).unwrap(), &[2, 0x03]);

    let product = get_descriptor(0x0302, 0x0409).unwrap();
    assert_eq!(product.len(), product[0] as usize);
    assert_eq!(product.len(), 2 + 2 * "Volume Mixer".len());
}

#[test]
fn product_string_holds_utf16_name() {
    let product = get_descriptor(w_value(DescriptorType::STRING, STRING_ID_PRODUCT), 0).unwrap();
    let units: heapless::Vec<u16, 32> = product[2..]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    let mut name: heapless::String<32> = heapless::String::new();
    for c in char::decode_utf16(units.iter().copied()) {
        name.push(c.unwrap()).unwrap();
    }
    assert_eq!(name.as_str(), "Volume Mixer");
}

#[test]
fn unknown_string_index_is_not_found() {
    for index in [3u8, 4, 0x10, 0xEE, 0xFF] {
        assert_eq!(get_descriptor(w_value(DescriptorType::STRING, index), 0), None);
        assert_eq!(descriptor_len(w_value(DescriptorType::STRING, index), 0), 0);
    }
}

#[test]
fn hid_request_returns_embedded_class_descriptor() {
    let desc = get_descriptor(0x2100, 0).unwrap();
    assert_eq!(desc.len(), 9);
    assert_eq!(
        desc.as_ptr(),
        CONFIGURATION_DESCRIPTOR[HID_DESCRIPTOR_OFFSET..].as_ptr()
    );
    assert_eq!(desc[1], DescriptorType::HID);
}

#[test]
fn hid_report_request_returns_report_descriptor() {
    let desc = get_descriptor(0x2200, 0).unwrap();
    assert_eq!(desc, &HID_REPORT_DESCRIPTOR[..]);
    assert_eq!(desc.len(), hid::REPORT_DESCRIPTOR_LEN);
}

#[test]
fn unsupported_types_are_not_found() {
    for ty in [0x00u8, 0x04, 0x05, 0x06, 0x0F, 0x23, 0xFF] {
        assert_eq!(get_descriptor(w_value(ty, 0), 0), None, "type {:#04x}", ty);
        assert_eq!(descriptor_len(w_value(ty, 0), 0), NO_DESCRIPTOR as u16);
    }
}

#[test]
fn index_is_ignored_for_non_string_types() {
    assert_eq!(get_descriptor(0x0105, 0), get_descriptor(0x0100, 0));
    assert_eq!(get_descriptor(0x02FF, 7), get_descriptor(0x0200, 0));
    assert_eq!(get_descriptor(0x2201, 1), get_descriptor(0x2200, 0));
}

#[test]
fn descriptor_len_matches_resolved_slices() {
    assert_eq!(descriptor_len(0x0100, 0), 18);
    assert_eq!(descriptor_len(0x0200, 0), 41);
    assert_eq!(descriptor_len(0x0300, 0), 4);
    assert_eq!(descriptor_len(0x0301, 0), 2);
    assert_eq!(descriptor_len(0x0302, 0), 26);
    assert_eq!(descriptor_len(0x2100, 0), 9);
    assert_eq!(descriptor_len(0x2200, 0), 32);
}

// ═══════════════════════════════════════════════════════════════════════════
// Declared sizes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn declared_lengths_match_serialized_lengths() {
    assert_eq!(DEVICE_DESCRIPTOR[0] as usize, DEVICE_DESCRIPTOR.len());
    assert_eq!(LANGUAGE_STRING[0] as usize, LANGUAGE_STRING.len());
    assert_eq!(MANUFACTURER_STRING[0] as usize, MANUFACTURER_STRING.len());
    assert_eq!(PRODUCT_STRING[0] as usize, PRODUCT_STRING.len());

    // Walk the configuration record by record.
    let mut at = 0;
    let mut records: heapless::Vec<(u8, u8), 8> = heapless::Vec::new();
    while at < CONFIGURATION_DESCRIPTOR.len() {
        let len = CONFIGURATION_DESCRIPTOR[at];
        let ty = CONFIGURATION_DESCRIPTOR[at + 1];
        records.push((len, ty)).unwrap();
        at += len as usize;
    }
    assert_eq!(at, CONFIGURATION_DESCRIPTOR.len());
    assert_eq!(
        records.as_slice(),
        &[
            (9, DescriptorType::CONFIGURATION),
            (9, DescriptorType::INTERFACE),
            (9, DescriptorType::HID),
            (7, DescriptorType::ENDPOINT),
            (7, DescriptorType::ENDPOINT),
        ]
    );
}

#[test]
fn total_length_is_sum_of_parts() {
    let total = u16::from_le_bytes([CONFIGURATION_DESCRIPTOR[2], CONFIGURATION_DESCRIPTOR[3]]);
    assert_eq!(total as usize, 9 + 9 + 9 + 7 + 7);
    assert_eq!(total as usize, CONFIGURATION_DESCRIPTOR.len());
}

#[test]
fn hid_descriptor_reports_report_descriptor_length() {
    let hid = hid_descriptor();
    assert_eq!(hid[6], DescriptorType::HID_REPORT);
    let report_len = u16::from_le_bytes([hid[7], hid[8]]);
    assert_eq!(report_len as usize, HID_REPORT_DESCRIPTOR.len());
}

// ═══════════════════════════════════════════════════════════════════════════
// Table contents
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn device_descriptor_bytes() {
    assert_eq!(
        DEVICE_DESCRIPTOR,
        [
            0x12, 0x01, // bLength, DEVICE
            0x10, 0x01, // USB 1.1
            0x00, 0x00, 0x00, // per-interface class
            0x08, // EP0 size
            0x41, 0x23, // VID 0x2341
            0x37, 0x80, // PID 0x8037
            0x01, 0x00, // release 0.0.1
            0x01, 0x02, 0x00, // manufacturer, product, no serial
            0x01, // one configuration
        ]
    );
}

#[test]
fn configuration_header_and_interface_bytes() {
    assert_eq!(
        &CONFIGURATION_DESCRIPTOR[..18],
        &[
            0x09, 0x02, 41, 0x00, 0x01, 0x01, 0x00, 0xC0, 50, // header
            0x09, 0x04, 0x00, 0x00, 0x02, 0x03, 0x00, 0x00, 0x00, // interface
        ]
    );
}

#[test]
fn string_indices_in_device_descriptor_exist() {
    for index in [DEVICE_DESCRIPTOR[14], DEVICE_DESCRIPTOR[15], DEVICE_DESCRIPTOR[16]] {
        if index != NO_DESCRIPTOR {
            assert!(get_descriptor(w_value(DescriptorType::STRING, index), 0x0409).is_some());
        }
    }
    // iConfiguration and iInterface are "none".
    assert_eq!(CONFIGURATION_DESCRIPTOR[6], NO_DESCRIPTOR);
    assert_eq!(CONFIGURATION_DESCRIPTOR[17], NO_DESCRIPTOR);
}

#[test]
fn endpoints_match_firmware_configuration() {
    let in_ep = &CONFIGURATION_DESCRIPTOR[27..34];
    let out_ep = &CONFIGURATION_DESCRIPTOR[34..41];

    assert_eq!(in_ep[2], HID_IN_ENDPOINT);
    assert_eq!(out_ep[2], HID_OUT_ENDPOINT);
    assert!(REPORT_IN_ENDPOINT.is_in());
    assert!(!REPORT_OUT_ENDPOINT.is_in());

    for ep in [in_ep, out_ep] {
        assert_eq!(ep[3], 0x03); // interrupt
        assert_eq!(u16::from_le_bytes([ep[4], ep[5]]), HID_ENDPOINT_SIZE);
        assert_eq!(ep[6], 16);
    }
}

#[test]
fn reports_fit_in_one_packet() {
    let layout = ReportLayout::parse(&HID_REPORT_DESCRIPTOR).unwrap();
    assert!(layout.input_bytes <= HID_ENDPOINT_SIZE as usize);
    assert!(layout.output_bytes <= HID_ENDPOINT_SIZE as usize);
    assert_eq!(layout.input_bytes, REPORT_SIZE);
}

// ═══════════════════════════════════════════════════════════════════════════
// Request decoding
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn request_splits_w_value() {
    let req = DescriptorRequest::from_w_value(0x0302);
    assert_eq!(req.descriptor_type, DescriptorType::String);
    assert_eq!(req.index, 2);
    assert_eq!(req.w_value(), 0x0302);

    let req = DescriptorRequest::from_w_value(0xFF00);
    assert_eq!(req.descriptor_type, DescriptorType::Unknown(0xFF));
    assert_eq!(req.w_value(), 0xFF00);
}

#[test]
fn descriptor_type_codes_roundtrip() {
    for code in [0x01u8, 0x02, 0x03, 0x04, 0x05, 0x21, 0x22, 0x7F] {
        assert_eq!(u8::from(DescriptorType::from(code)), code);
    }
    assert_eq!(DescriptorType::from(0x21), DescriptorType::Hid);
    assert_eq!(DescriptorType::from(0x22), DescriptorType::HidReport);
}
