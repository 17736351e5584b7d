//! USB HID mixer device - one vendor interface, interrupt IN + OUT.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral. The stack composes the device and configuration
//! descriptors from the same constants as the static tables; HID class
//! requests on our interface are answered by [`MixerHandler`], which
//! serves the HID and report descriptors through the library resolver.

use defmt::{debug, info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::control::{InResponse, OutResponse, Recipient, Request, RequestType};
use embassy_usb::driver::{Endpoint, EndpointError, EndpointIn, EndpointOut};
use embassy_usb::types::InterfaceNumber;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;
use volume_mixer::config;
use volume_mixer::descriptors::hid::{HID_CLASS, HID_PROTOCOL_NONE, HID_SUBCLASS_NONE};
use volume_mixer::descriptors::{hid_descriptor, DescriptorRequest};
use volume_mixer::mixer::{FrameDecoder, SinkList, SliderTracker, VolumeReport};
use volume_mixer::{get_descriptor, DescriptorType};

use crate::sliders::Sliders;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;
pub type ReportIn = <UsbDriver as embassy_usb::driver::Driver<'static>>::EndpointIn;
pub type ReportOut = <UsbDriver as embassy_usb::driver::Driver<'static>>::EndpointOut;

// HID class requests (HID 1.11, 7.2).
const HID_REQ_GET_IDLE: u8 = 0x02;
const HID_REQ_SET_IDLE: u8 = 0x0A;

static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 64]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static MIXER_HANDLER: StaticCell<MixerHandler> = StaticCell::new();

/// Answers the HID class requests addressed to the mixer interface.
struct MixerHandler {
    interface: InterfaceNumber,
    idle: u8,
}

impl MixerHandler {
    fn is_ours(&self, req: &Request) -> bool {
        req.recipient == Recipient::Interface && req.index == self.interface.0 as u16
    }
}

impl Handler for MixerHandler {
    fn reset(&mut self) {
        self.idle = 0;
    }

    fn control_out(&mut self, req: Request, _data: &[u8]) -> Option<OutResponse> {
        if !self.is_ours(&req) || req.request_type != RequestType::Class {
            return None;
        }
        match req.request {
            HID_REQ_SET_IDLE => {
                self.idle = (req.value >> 8) as u8;
                Some(OutResponse::Accepted)
            }
            _ => Some(OutResponse::Rejected),
        }
    }

    fn control_in<'a>(&'a mut self, req: Request, buf: &'a mut [u8]) -> Option<InResponse<'a>> {
        if !self.is_ours(&req) {
            return None;
        }
        match (req.request_type, req.request) {
            (RequestType::Standard, Request::GET_DESCRIPTOR) => {
                let request = DescriptorRequest::from_w_value(req.value);
                let desc = match request.descriptor_type {
                    DescriptorType::Hid | DescriptorType::HidReport => {
                        get_descriptor(req.value, req.index)
                    }
                    _ => None,
                };
                match desc {
                    Some(desc) => {
                        let len = desc.len().min(req.length as usize);
                        debug!("GET_DESCRIPTOR {:?}: {} bytes", request.descriptor_type, len);
                        Some(InResponse::Accepted(&desc[..len]))
                    }
                    None => {
                        warn!("GET_DESCRIPTOR {:?} not supported", request.descriptor_type);
                        Some(InResponse::Rejected)
                    }
                }
            }
            (RequestType::Class, HID_REQ_GET_IDLE) => {
                buf[0] = self.idle;
                Some(InResponse::Accepted(&buf[..1]))
            }
            _ => Some(InResponse::Rejected),
        }
    }
}

/// Build result containing the USB device runner and both report endpoints.
pub struct MixerHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub report_in: ReportIn,
    pub report_out: ReportOut,
}

/// Initialise the USB stack and create the mixer HID interface.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> MixerHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = None;
    usb_config.device_release = config::USB_DEVICE_RELEASE_BCD;
    usb_config.device_class = 0x00;
    usb_config.device_sub_class = 0x00;
    usb_config.device_protocol = 0x00;
    usb_config.composite_with_iads = false;
    usb_config.self_powered = true;
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = config::USB_CONTROL_ENDPOINT_SIZE;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 64]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    let mut function = builder.function(HID_CLASS, HID_SUBCLASS_NONE, HID_PROTOCOL_NONE);
    let mut interface = function.interface();
    let interface_number = interface.interface_number();
    let mut alt = interface.alt_setting(HID_CLASS, HID_SUBCLASS_NONE, HID_PROTOCOL_NONE, None);

    // The builder writes bLength/bDescriptorType itself.
    alt.descriptor(DescriptorType::HID, &hid_descriptor()[2..]);
    let report_in = alt.endpoint_interrupt_in(config::HID_ENDPOINT_SIZE, config::HID_POLL_MS);
    let report_out = alt.endpoint_interrupt_out(config::HID_ENDPOINT_SIZE, config::HID_POLL_MS);
    drop(function);

    let handler = MIXER_HANDLER.init(MixerHandler {
        interface: interface_number,
        idle: 0,
    });
    builder.handler(handler);

    let in_addr = u8::from(report_in.info().addr);
    let out_addr = u8::from(report_out.info().addr);
    if in_addr != config::HID_IN_ENDPOINT || out_addr != config::HID_OUT_ENDPOINT {
        warn!(
            "endpoint addresses {=u8:#x}/{=u8:#x} differ from descriptor tables",
            in_addr, out_addr
        );
    }

    let device = builder.build();

    info!("USB mixer device initialised (interface {=u8})", interface_number.0);

    MixerHidDevice {
        device,
        report_in,
        report_out,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and endpoint servicing.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// OUT report task - decodes sink name frames from the host.
///
/// Each completed list is published on `sinks` (display) and `resend`
/// (volume writer, so the host gets volumes for the new list).
pub async fn sink_reader_task(
    mut report_out: ReportOut,
    sinks: &'static Signal<CriticalSectionRawMutex, SinkList>,
    resend: &'static Signal<CriticalSectionRawMutex, ()>,
) -> ! {
    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; config::HID_ENDPOINT_SIZE as usize];

    loop {
        report_out.wait_enabled().await;
        info!("OUT endpoint enabled - waiting for sink names");

        loop {
            match report_out.read(&mut buf).await {
                Ok(n) => match decoder.push_report(&buf[..n]) {
                    Ok(Some(list)) => {
                        info!("host sent {=usize} sinks", list.len());
                        sinks.signal(list);
                        resend.signal(());
                    }
                    Ok(None) => {}
                    Err(e) => warn!("dropped sink frame: {:?}", e),
                },
                Err(EndpointError::BufferOverflow) => {
                    warn!("OUT report larger than endpoint buffer");
                }
                Err(EndpointError::Disabled) => {
                    decoder.reset();
                    break;
                }
            }
        }
    }
}

/// IN report task - samples the sliders and writes a volume report
/// whenever one moved.
pub async fn volume_writer_task(
    mut report_in: ReportIn,
    mut sliders: Sliders,
    volumes: &'static Signal<CriticalSectionRawMutex, VolumeReport>,
    resend: &'static Signal<CriticalSectionRawMutex, ()>,
) -> ! {
    let mut tracker = SliderTracker::new();
    let mut ticker = Ticker::every(Duration::from_millis(config::SLIDER_SAMPLE_MS));
    let mut buf = [0u8; config::REPORT_SIZE];

    info!("volume writer task started");

    loop {
        report_in.wait_enabled().await;
        tracker.invalidate();

        loop {
            ticker.next().await;

            if resend.try_take().is_some() {
                tracker.invalidate();
            }

            let raw = sliders.read().await;
            let Some(report) = tracker.update(&raw, config::SLIDER_FULL_SCALE) else {
                continue;
            };
            volumes.signal(report);

            let n = report.serialize(&mut buf);
            debug!("volume report {=[u8]}", &buf[..n]);
            match report_in.write(&buf[..n]).await {
                Ok(()) => {}
                Err(EndpointError::Disabled) => break,
                Err(EndpointError::BufferOverflow) => warn!("USB volume write failed"),
            }
        }
    }
}
