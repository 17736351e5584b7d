//! SSD1306 OLED display wrapper.

use core::fmt::Write;

use embedded_graphics::mono_font::iso_8859_1::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;
use volume_mixer::config::{DISPLAY_ROWS, USB_PRODUCT};
use volume_mixer::mixer::{SinkList, VolumeReport};

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Characters per row with the 6×10 font.
const ROW_CHARS: usize = 21;
/// Row buffer size: Latin-1 characters take up to two UTF-8 bytes.
const ROW_BYTES: usize = ROW_CHARS * 2;

/// Initialise the SSD1306 display and clear the screen.
pub fn init<I2C>(i2c: I2C) -> Display<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    let _ = display.init();
    display.clear_buffer();
    let _ = display.flush();
    display
}

fn text_style() -> embedded_graphics::mono_font::MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

/// Render the idle screen shown until the host sends sink names.
pub fn draw_waiting<I2C>(display: &mut Display<I2C>)
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    let _ = Text::new(USB_PRODUCT, Point::new(0, 10), text_style()).draw(display);
    let _ = Text::new("Waiting for host...", Point::new(0, 30), text_style()).draw(display);

    let _ = display.flush();
}

/// Render one row per sink: volume then name, e.g. ` 75% Firefox`.
pub fn draw_mixer<I2C>(display: &mut Display<I2C>, sinks: &SinkList, volumes: &VolumeReport)
where
    I2C: embedded_hal::i2c::I2c,
{
    display.clear_buffer();

    let _ = Text::new(USB_PRODUCT, Point::new(0, 10), text_style()).draw(display);

    for (row, (name, volume)) in sinks
        .iter()
        .zip(volumes.volumes.iter())
        .take(DISPLAY_ROWS)
        .enumerate()
    {
        let mut line: heapless::String<ROW_BYTES> = heapless::String::new();
        let _ = write!(line, "{:>3}% ", volume);
        for c in name.chars().take(ROW_CHARS - line.len()) {
            let _ = line.push(c);
        }
        let y = 22 + (row as i32 * 10);
        let _ = Text::new(line.as_str(), Point::new(0, y), text_style()).draw(display);
    }

    let _ = display.flush();
}
