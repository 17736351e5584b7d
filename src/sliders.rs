//! Slider potentiometers on the nRF52840 SAADC.
//!
//! Each slider wiper goes to one analog input; the track sits between
//! VDD and GND. With gain 1/4 against the VDD/4 reference the full
//! scale is VDD, so a slider at its top end reads `SLIDER_FULL_SCALE`.

use defmt::info;
use embassy_nrf::peripherals::{P0_02, P0_03, P0_04, P0_05, P0_28, P0_29, P0_30, P0_31, SAADC};
use embassy_nrf::saadc::{self, ChannelConfig, Gain, Reference, Resolution, Saadc};
use embassy_nrf::{bind_interrupts, Peripheral};
use volume_mixer::config::SLIDER_COUNT;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
});

/// Analog inputs in channel order (AIN0..AIN7).
pub struct SliderPins {
    pub ain0: P0_02,
    pub ain1: P0_03,
    pub ain2: P0_04,
    pub ain3: P0_05,
    pub ain4: P0_28,
    pub ain5: P0_29,
    pub ain6: P0_30,
    pub ain7: P0_31,
}

pub struct Sliders {
    saadc: Saadc<'static, SLIDER_COUNT>,
}

fn channel(pin: impl Peripheral<P = impl saadc::Input> + 'static) -> ChannelConfig<'static> {
    let mut config = ChannelConfig::single_ended(pin);
    config.gain = Gain::GAIN1_4;
    config.reference = Reference::VDD1_4;
    config
}

impl Sliders {
    pub async fn new(saadc: SAADC, pins: SliderPins) -> Self {
        let mut config = saadc::Config::default();
        config.resolution = Resolution::_12BIT;

        let channels = [
            channel(pins.ain0),
            channel(pins.ain1),
            channel(pins.ain2),
            channel(pins.ain3),
            channel(pins.ain4),
            channel(pins.ain5),
            channel(pins.ain6),
            channel(pins.ain7),
        ];

        let saadc = Saadc::new(saadc, Irqs, config, channels);
        saadc.calibrate().await;
        info!("SAADC calibrated ({=usize} sliders)", SLIDER_COUNT);

        Self { saadc }
    }

    /// One raw reading per slider.
    pub async fn read(&mut self) -> [i16; SLIDER_COUNT] {
        let mut buf = [0i16; SLIDER_COUNT];
        self.saadc.sample(&mut buf).await;
        buf
    }
}
