//! HD44780 character LCD driver (8-bit parallel bus, write-only).
//!
//! Generic over `embedded-hal` output pins and delay so the command sequence
//! can be checked on the host. The controller is never read back (R/W is tied
//! low), so every command waits its worst-case execution time instead of
//! polling the busy flag.
//!
//! # Sequence
//!
//! ```text
//! init:  0x38 (8-bit bus, 2 lines, 5x8 font), 0x0E (display on, cursor on)
//! show:  0x01 (clear), 0x80 (cursor to line 1, column 0), data bytes...
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use efi_common::config::LCD_COLUMNS;

// =============================================================================
// Commands
// =============================================================================

/// Function set: 8-bit interface, two lines, 5x8 dots.
pub const CMD_FUNCTION_SET: u8 = 0x38;

/// Display control: display on, cursor on, blink off.
pub const CMD_DISPLAY_ON: u8 = 0x0E;

/// Clear display and return home.
pub const CMD_CLEAR: u8 = 0x01;

/// Set DDRAM address 0 (first line, first column).
pub const CMD_LINE_1: u8 = 0x80;

/// Power-on settle time before the first command.
const POWER_ON_DELAY_MS: u32 = 40;

/// Execution time of a regular command or data write.
const WRITE_DELAY_US: u32 = 40;

/// Execution time of the clear command.
const CLEAR_DELAY_US: u32 = 1600;

/// Minimum enable pulse width.
const ENABLE_PULSE_NS: u32 = 450;

/// Byte written in place of characters the LCD ROM can't show.
const REPLACEMENT_CHAR: u8 = b'?';

// =============================================================================
// Driver
// =============================================================================

/// HD44780 on an 8-bit bus.
pub struct Hd44780<P, D> {
    data: [P; 8],
    rs: P,
    enable: P,
    delay: D,
}

impl<P, D> Hd44780<P, D>
where
    P: OutputPin,
    D: DelayNs,
{
    /// Create the driver. `data[0]` is D0. Call [`Self::init`] before writing.
    pub fn new(
        data: [P; 8],
        rs: P,
        enable: P,
        delay: D,
    ) -> Self {
        Self {
            data,
            rs,
            enable,
            delay,
        }
    }

    /// Configure the controller: 8-bit bus, two lines, display and cursor on.
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.enable.set_low()?;
        self.delay.delay_ms(POWER_ON_DELAY_MS);
        self.command(CMD_FUNCTION_SET)?;
        self.command(CMD_DISPLAY_ON)
    }

    /// Clear the display and move the cursor to the first position.
    pub fn clear(&mut self) -> Result<(), P::Error> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_DELAY_US);
        self.command(CMD_LINE_1)
    }

    /// Write `text` at the cursor, up to one line.
    ///
    /// Characters outside printable ASCII are replaced with `?`.
    pub fn write_str(
        &mut self,
        text: &str,
    ) -> Result<(), P::Error> {
        for ch in text.chars().take(LCD_COLUMNS) {
            let byte = if ch.is_ascii_graphic() || ch == ' ' { ch as u8 } else { REPLACEMENT_CHAR };
            self.write(true, byte)?;
        }
        Ok(())
    }

    /// Replace the display contents with `text`.
    pub fn show(
        &mut self,
        text: &str,
    ) -> Result<(), P::Error> {
        self.clear()?;
        self.write_str(text)
    }

    fn command(
        &mut self,
        byte: u8,
    ) -> Result<(), P::Error> {
        self.write(false, byte)
    }

    /// Put `byte` on the bus and latch it with an enable pulse.
    fn write(
        &mut self,
        data: bool,
        byte: u8,
    ) -> Result<(), P::Error> {
        self.rs.set_state(PinState::from(data))?;
        for (bit, pin) in self.data.iter_mut().enumerate() {
            pin.set_state(PinState::from((byte >> bit) & 1 != 0))?;
        }

        self.enable.set_high()?;
        self.delay.delay_ns(ENABLE_PULSE_NS);
        self.enable.set_low()?;
        self.delay.delay_us(WRITE_DELAY_US);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    use embedded_hal::digital::ErrorType;

    use super::*;

    const RS: usize = 8;
    const ENABLE: usize = 9;

    /// Pin levels of the whole bus, with every latched (rs, byte) pair.
    #[derive(Default)]
    struct Bus {
        levels: [bool; 10],
        latched: Vec<(bool, u8)>,
    }

    struct MockPin {
        index: usize,
        bus: Rc<RefCell<Bus>>,
    }

    impl MockPin {
        fn set(
            &mut self,
            level: bool,
        ) {
            let mut bus = self.bus.borrow_mut();
            let was = bus.levels[self.index];
            bus.levels[self.index] = level;

            // The controller latches on the falling edge of E
            if self.index == ENABLE && was && !level {
                let byte = (0..8).fold(0u8, |acc, bit| acc | (u8::from(bus.levels[bit]) << bit));
                let rs = bus.levels[RS];
                bus.latched.push((rs, byte));
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.set(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockDelay {
        total_ns: u64,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(
            &mut self,
            ns: u32,
        ) {
            self.total_ns += u64::from(ns);
        }
    }

    fn lcd() -> (Hd44780<MockPin, MockDelay>, Rc<RefCell<Bus>>) {
        let bus = Rc::new(RefCell::new(Bus::default()));
        let pin = |index| MockPin {
            index,
            bus: Rc::clone(&bus),
        };
        let data = [pin(0), pin(1), pin(2), pin(3), pin(4), pin(5), pin(6), pin(7)];
        let lcd = Hd44780::new(data, pin(RS), pin(ENABLE), MockDelay::default());
        (lcd, bus)
    }

    #[test]
    fn test_init_sequence() {
        let (mut lcd, bus) = lcd();
        lcd.init().unwrap();

        assert_eq!(bus.borrow().latched, [(false, 0x38), (false, 0x0E)]);
        // Power-on wait happens before the first command
        assert!(lcd.delay.total_ns >= 40_000_000);
    }

    #[test]
    fn test_show_clears_then_writes() {
        let (mut lcd, bus) = lcd();
        lcd.show("38.49").unwrap();

        let latched = bus.borrow().latched.clone();
        assert_eq!(latched[0], (false, CMD_CLEAR));
        assert_eq!(latched[1], (false, CMD_LINE_1));
        let text: Vec<u8> = latched[2..].iter().map(|&(rs, byte)| {
            assert!(rs);
            byte
        }).collect();
        assert_eq!(text, b"38.49");
    }

    #[test]
    fn test_clear_waits_for_execution() {
        let (mut lcd, _bus) = lcd();
        lcd.clear().unwrap();
        assert!(lcd.delay.total_ns >= u64::from(CLEAR_DELAY_US) * 1000);
    }

    #[test]
    fn test_write_truncates_to_line() {
        let (mut lcd, bus) = lcd();
        lcd.write_str("ENGINE_OFF ENGINE_OFF").unwrap();
        assert_eq!(bus.borrow().latched.len(), LCD_COLUMNS);
    }

    #[test]
    fn test_write_replaces_non_ascii() {
        let (mut lcd, bus) = lcd();
        lcd.write_str("5°C").unwrap();
        let bytes: Vec<u8> = bus.borrow().latched.iter().map(|&(_, byte)| byte).collect();
        assert_eq!(bytes, b"5?C");
    }

    #[test]
    fn test_data_bus_bit_order() {
        let (mut lcd, bus) = lcd();
        lcd.write_str("A").unwrap();
        // 'A' = 0x41: D0 and D6 high
        let levels = bus.borrow().levels;
        assert!(levels[0] && levels[6]);
        assert!(!levels[1] && !levels[7]);
    }
}
