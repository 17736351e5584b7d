//! volume-mixer firmware entry point (nRF52840).
//!
//! Tasks:
//! - USB device stack (enumeration, control requests)
//! - sink reader: OUT reports → sink name list
//! - volume writer: sliders → IN reports
//! - display: sink names and volumes on the OLED

#![no_std]
#![no_main]

mod sliders;
mod ui;
mod usb;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::config::{Config as NrfConfig, HfclkSource};
use embassy_nrf::peripherals::TWISPI0;
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::UsbDevice;
use sliders::{SliderPins, Sliders};
use ui::display::{self, Display};
use usb::hid_device::{self, ReportIn, ReportOut, UsbDriver};
use volume_mixer::mixer::{SinkList, VolumeReport};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<peripherals::TWISPI0>;
});

/// Sink list from the host, for the display.
static SINKS: Signal<CriticalSectionRawMutex, SinkList> = Signal::new();
/// Latest reported volumes, for the display.
static VOLUMES: Signal<CriticalSectionRawMutex, VolumeReport> = Signal::new();
/// Host sent a new sink list; report all volumes again.
static RESEND: Signal<CriticalSectionRawMutex, ()> = Signal::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut nrf_config = NrfConfig::default();
    // USB needs the external crystal.
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    info!("volume-mixer starting");

    let usb = hid_device::init(p.USBD);

    let sliders = Sliders::new(
        p.SAADC,
        SliderPins {
            ain0: p.P0_02,
            ain1: p.P0_03,
            ain2: p.P0_04,
            ain3: p.P0_05,
            ain4: p.P0_28,
            ain5: p.P0_29,
            ain6: p.P0_30,
            ain7: p.P0_31,
        },
    )
    .await;

    let mut i2c_config = twim::Config::default();
    i2c_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, i2c_config);
    let oled = display::init(i2c);

    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(sink_reader(usb.report_out)));
    unwrap!(spawner.spawn(volume_writer(usb.report_in, sliders)));
    unwrap!(spawner.spawn(display_task(oled)));

    info!("all tasks spawned");
}

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn sink_reader(report_out: ReportOut) -> ! {
    hid_device::sink_reader_task(report_out, &SINKS, &RESEND).await
}

#[embassy_executor::task]
async fn volume_writer(report_in: ReportIn, sliders: Sliders) -> ! {
    hid_device::volume_writer_task(report_in, sliders, &VOLUMES, &RESEND).await
}

#[embassy_executor::task]
async fn display_task(oled: Display<Twim<'static, TWISPI0>>) -> ! {
    ui::run(oled, &SINKS, &VOLUMES).await
}
