//! User interface subsystem - SSD1306 OLED.
//!
//! Shows the sink names the host announced next to the volume each
//! slider currently sends. Redraws only when either changes.

pub mod display;

use display::Display;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use volume_mixer::mixer::{SinkList, VolumeReport};

/// Redraw loop. Never returns.
pub async fn run<I2C>(
    mut display: Display<I2C>,
    sinks: &'static Signal<CriticalSectionRawMutex, SinkList>,
    volumes: &'static Signal<CriticalSectionRawMutex, VolumeReport>,
) -> !
where
    I2C: embedded_hal::i2c::I2c,
{
    let mut current_sinks = SinkList::default();
    let mut current_volumes = VolumeReport::empty();

    display::draw_waiting(&mut display);

    loop {
        match select(sinks.wait(), volumes.wait()).await {
            Either::First(list) => current_sinks = list,
            Either::Second(report) => current_volumes = report,
        }

        if current_sinks.is_empty() {
            display::draw_waiting(&mut display);
        } else {
            display::draw_mixer(&mut display, &current_sinks, &current_volumes);
        }
    }
}
