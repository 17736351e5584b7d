//! Integration tests for volume-mixer host-testable logic.

use volume_mixer::mixer::{FrameDecoder, SliderTracker};
use volume_mixer::{config, descriptor_len, get_descriptor, DescriptorRequest, DescriptorType};

#[test]
fn device_descriptor_lookup() {
    // type=Device, index=0
    let desc = get_descriptor(0x0100, 0).expect("device descriptor");
    assert_eq!(desc.len(), 18);
    assert_eq!(desc[0], 18);
    assert_eq!(u16::from_le_bytes([desc[8], desc[9]]), config::USB_VID);
    assert_eq!(u16::from_le_bytes([desc[10], desc[11]]), config::USB_PID);
}

#[test]
fn product_string_lookup() {
    // type=String, index=2
    let req = DescriptorRequest {
        descriptor_type: DescriptorType::String,
        index: 2,
    };
    let desc = get_descriptor(req.w_value(), 0x0409).expect("product string");
    assert_eq!(desc.len(), desc[0] as usize);

    let text: Vec<u16> = desc[2..]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    assert_eq!(String::from_utf16(&text).unwrap(), "Volume Mixer");
}

#[test]
fn unused_type_is_not_found() {
    // type=0xFF, index=0
    assert!(get_descriptor(0xFF00, 0).is_none());
    assert_eq!(descriptor_len(0xFF00, 0), 0);
}

#[test]
fn every_descriptor_declares_its_own_length() {
    for w_value in [0x0100u16, 0x0300, 0x0301, 0x0302, 0x2100] {
        let desc = get_descriptor(w_value, 0).unwrap();
        assert_eq!(desc[0] as usize, desc.len(), "wValue {:#06x}", w_value);
    }

    // The configuration's bLength covers the header; wTotalLength the rest.
    let config_desc = get_descriptor(0x0200, 0).unwrap();
    assert_eq!(config_desc[0], 9);
    assert_eq!(
        u16::from_le_bytes([config_desc[2], config_desc[3]]) as usize,
        config_desc.len()
    );
}

#[test]
fn mixer_session() {
    // Host announces two sinks, then reads volumes.
    let mut decoder = FrameDecoder::new();
    let out_report = [0x02, 0x01, b'm', b'p', b'v', 0x01, b'v', b'c'];
    assert!(decoder.push_report(&out_report).unwrap().is_none());
    let sinks = decoder.push_report(&[0x03, 0, 0, 0, 0, 0, 0, 0]).unwrap().unwrap();
    assert_eq!(sinks.len(), 2);

    let mut tracker = SliderTracker::new();
    let raw = [config::SLIDER_FULL_SCALE, 0, 0, 0, 0, 0, 0, 0];
    let report = tracker.update(&raw, config::SLIDER_FULL_SCALE).unwrap();

    let mut in_report = [0u8; config::REPORT_SIZE];
    assert_eq!(report.serialize(&mut in_report), config::REPORT_SIZE);
    assert_eq!(&in_report[..sinks.len()], &[100, 0]);
}
