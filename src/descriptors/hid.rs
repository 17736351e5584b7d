//! HID class descriptor and the mixer's report descriptor.
//!
//! ## Report descriptor structure
//!
//! A report descriptor is a sequence of short items. Each item starts
//! with a prefix byte:
//!
//! ```text
//! bit 7..4  bTag
//! bit 3..2  bType  (0 = Main, 1 = Global, 2 = Local)
//! bit 1..0  bSize  (0, 1, 2 or 4 data bytes)
//! ```
//!
//! followed by `bSize` little-endian data bytes. The prefix 0xFE
//! introduces a long item, which no HID 1.11 item actually uses.

use super::DescriptorType;
use crate::config::REPORT_SIZE;
use crate::Error;

/// Interface class code for HID.
pub const HID_CLASS: u8 = 0x03;
/// Interface subclass: no boot interface.
pub const HID_SUBCLASS_NONE: u8 = 0x00;
/// Interface protocol: none (only meaningful for boot devices).
pub const HID_PROTOCOL_NONE: u8 = 0x00;

/// HID class release implemented by the descriptors (BCD).
pub const HID_SPEC_BCD: u16 = 0x0111;

// Main item data bits (HID 1.11, 6.2.2.5).
pub const IOF_DATA: u8 = 0x00;
pub const IOF_VARIABLE: u8 = 0x02;
pub const IOF_ABSOLUTE: u8 = 0x00;
pub const IOF_NON_VOLATILE: u8 = 0x80;

pub const REPORT_DESCRIPTOR_LEN: usize = 32;

/// Vendor page: one input array (volumes) and one output array (sink
/// name bytes), `REPORT_SIZE` bytes each, no report IDs.
pub static HID_REPORT_DESCRIPTOR: [u8; REPORT_DESCRIPTOR_LEN] = [
    0x06, 0x00, 0xFF,        // UsagePage(Vendor Defined 0xFF00)
    0x09, 0x01,              // Usage(Vendor 1)
    0xA1, 0x01,              // Collection(Application)
    0x09, 0x02,              //     Usage(Vendor 2)
    0x15, 0x00,              //     LogicalMinimum(0)
    0x25, 0xFF,              //     LogicalMaximum(0xFF)
    0x75, 0x08,              //     ReportSize(8)
    0x95, REPORT_SIZE as u8, //     ReportCount(REPORT_SIZE)
    0x81, IOF_DATA | IOF_VARIABLE | IOF_ABSOLUTE,
                             //     Input(Data, Variable, Absolute)
    0x09, 0x03,              //     Usage(Vendor 3)
    0x15, 0x00,              //     LogicalMinimum(0)
    0x25, 0xFF,              //     LogicalMaximum(0xFF)
    0x75, 0x08,              //     ReportSize(8)
    0x95, REPORT_SIZE as u8, //     ReportCount(REPORT_SIZE)
    0x91, IOF_DATA | IOF_VARIABLE | IOF_ABSOLUTE | IOF_NON_VOLATILE,
                             //     Output(Data, Variable, Absolute, NonVolatile)
    0xC0,                    // EndCollection()
];

/// HID class descriptor (HID 1.11, 6.2.1) with a single report
/// descriptor entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HidClassDescriptor {
    pub hid_bcd: u16,
    pub country_code: u8,
    pub report_descriptor_len: u16,
}

impl HidClassDescriptor {
    pub const LEN: usize = 9;

    pub const fn bytes(&self) -> [u8; Self::LEN] {
        let hid = self.hid_bcd.to_le_bytes();
        let report_len = self.report_descriptor_len.to_le_bytes();
        [
            Self::LEN as u8,
            DescriptorType::HID,
            hid[0],
            hid[1],
            self.country_code,
            1,
            DescriptorType::HID_REPORT,
            report_len[0],
            report_len[1],
        ]
    }
}

/// Item type from the prefix byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ItemType {
    Main,
    Global,
    Local,
    Reserved,
}

impl From<u8> for ItemType {
    fn from(bits: u8) -> Self {
        match bits & 0x03 {
            0 => ItemType::Main,
            1 => ItemType::Global,
            2 => ItemType::Local,
            _ => ItemType::Reserved,
        }
    }
}

/// One short item of a report descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportItem {
    pub item_type: ItemType,
    pub tag: u8,
    /// Data bytes, zero-extended.
    pub value: u32,
    /// Encoded length including the prefix.
    pub len: usize,
}

/// Iterator over the items of a report descriptor.
///
/// Stops after yielding the first error.
pub struct ReportItems<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> ReportItems<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for ReportItems<'a> {
    type Item = Result<ReportItem, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }

        let prefix = self.data[self.pos];
        if prefix == 0xFE {
            self.failed = true;
            return Some(Err(Error::MalformedReportDescriptor));
        }

        let size = match prefix & 0x03 {
            0 => 0,
            1 => 1,
            2 => 2,
            _ => 4,
        };
        let start = self.pos + 1;
        let Some(payload) = self.data.get(start..start + size) else {
            self.failed = true;
            return Some(Err(Error::MalformedReportDescriptor));
        };

        let value = payload
            .iter()
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);

        self.pos = start + size;
        Some(Ok(ReportItem {
            item_type: ItemType::from(prefix >> 2),
            tag: prefix >> 4,
            value,
            len: 1 + size,
        }))
    }
}

// Main item tags.
const TAG_INPUT: u8 = 0x08;
const TAG_OUTPUT: u8 = 0x09;
const TAG_COLLECTION: u8 = 0x0A;
const TAG_FEATURE: u8 = 0x0B;
const TAG_END_COLLECTION: u8 = 0x0C;

// Global item tags.
const TAG_USAGE_PAGE: u8 = 0x00;
const TAG_REPORT_SIZE: u8 = 0x07;
const TAG_REPORT_ID: u8 = 0x08;
const TAG_REPORT_COUNT: u8 = 0x09;

/// Report sizes a descriptor declares.
///
/// Nested collections are flattened and Push/Pop is not supported; the
/// mixer's descriptor needs neither.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportLayout {
    /// Usage page in effect when the first top-level collection opened.
    pub usage_page: u16,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub feature_bytes: usize,
    pub uses_report_ids: bool,
}

impl ReportLayout {
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        let mut layout = ReportLayout {
            usage_page: 0,
            input_bytes: 0,
            output_bytes: 0,
            feature_bytes: 0,
            uses_report_ids: false,
        };

        let mut usage_page: u16 = 0;
        let mut report_size: usize = 0;
        let mut report_count: usize = 0;
        let mut input_bits = 0usize;
        let mut output_bits = 0usize;
        let mut feature_bits = 0usize;
        let mut depth = 0usize;
        let mut saw_collection = false;

        for item in ReportItems::new(data) {
            let item = item?;
            match item.item_type {
                ItemType::Main => match item.tag {
                    TAG_INPUT => input_bits += report_size * report_count,
                    TAG_OUTPUT => output_bits += report_size * report_count,
                    TAG_FEATURE => feature_bits += report_size * report_count,
                    TAG_COLLECTION => {
                        if depth == 0 && !saw_collection {
                            layout.usage_page = usage_page;
                            saw_collection = true;
                        }
                        depth += 1;
                    }
                    TAG_END_COLLECTION => {
                        depth = depth
                            .checked_sub(1)
                            .ok_or(Error::MalformedReportDescriptor)?;
                    }
                    _ => {}
                },
                ItemType::Global => match item.tag {
                    TAG_USAGE_PAGE => usage_page = item.value as u16,
                    TAG_REPORT_SIZE => report_size = item.value as usize,
                    TAG_REPORT_COUNT => report_count = item.value as usize,
                    TAG_REPORT_ID => layout.uses_report_ids = true,
                    _ => {}
                },
                ItemType::Local | ItemType::Reserved => {}
            }
        }

        if depth != 0 {
            return Err(Error::MalformedReportDescriptor);
        }

        layout.input_bytes = input_bits.div_ceil(8);
        layout.output_bytes = output_bits.div_ceil(8);
        layout.feature_bytes = feature_bits.div_ceil(8);
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_descriptor_layout() {
        let desc = HidClassDescriptor {
            hid_bcd: 0x0111,
            country_code: 0,
            report_descriptor_len: 0x0120,
        };
        assert_eq!(
            desc.bytes(),
            [9, 0x21, 0x11, 0x01, 0x00, 0x01, 0x22, 0x20, 0x01]
        );
    }

    #[test]
    fn items_decode_sizes_and_values() {
        let data = [0x06, 0x00, 0xFF, 0xA1, 0x01, 0xC0];
        let items: heapless::Vec<ReportItem, 4> =
            ReportItems::new(&data).map(|i| i.unwrap()).collect();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].item_type, ItemType::Global);
        assert_eq!(items[0].tag, TAG_USAGE_PAGE);
        assert_eq!(items[0].value, 0xFF00);
        assert_eq!(items[0].len, 3);
        assert_eq!(items[1].item_type, ItemType::Main);
        assert_eq!(items[1].tag, TAG_COLLECTION);
        assert_eq!(items[2].tag, TAG_END_COLLECTION);
        assert_eq!(items[2].len, 1);
    }

    #[test]
    fn four_byte_item() {
        let data = [0x27, 0x78, 0x56, 0x34, 0x12];
        let item = ReportItems::new(&data).next().unwrap().unwrap();
        assert_eq!(item.value, 0x1234_5678);
        assert_eq!(item.len, 5);
    }

    #[test]
    fn truncated_item_is_an_error_and_stops() {
        let data = [0x09, 0x01, 0x06, 0x00];
        let mut items = ReportItems::new(&data);
        assert!(items.next().unwrap().is_ok());
        assert_eq!(
            items.next().unwrap(),
            Err(Error::MalformedReportDescriptor)
        );
        assert!(items.next().is_none());
    }

    #[test]
    fn long_item_is_rejected() {
        let data = [0xFE, 0x00, 0x00];
        assert_eq!(
            ReportLayout::parse(&data),
            Err(Error::MalformedReportDescriptor)
        );
    }

    #[test]
    fn mixer_layout_matches_report_size() {
        let layout = ReportLayout::parse(&HID_REPORT_DESCRIPTOR).unwrap();
        assert_eq!(layout.usage_page, 0xFF00);
        assert_eq!(layout.input_bytes, REPORT_SIZE);
        assert_eq!(layout.output_bytes, REPORT_SIZE);
        assert_eq!(layout.feature_bytes, 0);
        assert!(!layout.uses_report_ids);
    }

    #[test]
    fn unbalanced_collections_are_rejected() {
        let open = [0xA1, 0x01, 0x09, 0x01];
        assert_eq!(
            ReportLayout::parse(&open),
            Err(Error::MalformedReportDescriptor)
        );

        let extra_end = [0xA1, 0x01, 0xC0, 0xC0];
        assert_eq!(
            ReportLayout::parse(&extra_end),
            Err(Error::MalformedReportDescriptor)
        );
    }

    #[test]
    fn partial_bits_round_up() {
        // 7 one-bit inputs, no padding field.
        let data = [0x05, 0x0C, 0xA1, 0x01, 0x75, 0x01, 0x95, 0x07, 0x81, 0x02, 0xC0];
        let layout = ReportLayout::parse(&data).unwrap();
        assert_eq!(layout.usage_page, 0x000C);
        assert_eq!(layout.input_bytes, 1);
    }

    #[test]
    fn report_id_is_detected() {
        let data = [0xA1, 0x01, 0x85, 0x01, 0xC0];
        assert!(ReportLayout::parse(&data).unwrap().uses_report_ids);
    }
}
