//! HD44780 character LCD on an 8-bit parallel bus

use embedded_hal::digital::v2::OutputPin;

use crate::config::LCD_STROBE_TICKS;
use crate::drivers::display::{
    CountField, DisplaySink, DistanceField, COUNT_LABEL, DISTANCE_LABEL, TRIGGER_LABEL,
};
use crate::error::Error;
use crate::hal::TickWait;

const FUNCTION_SET_8BIT_2LINE: u8 = 0x38;
const DISPLAY_OFF: u8 = 0x08;
const CLEAR: u8 = 0x01;
const ENTRY_MODE_INCREMENT: u8 = 0x06;
const DISPLAY_ON: u8 = 0x0C;
const SET_DDRAM_ADDR: u8 = 0x80;

// DDRAM positions on the 20x4 panel
const COUNT_LABEL_POS: u8 = 0x04;
const COUNT_POS: u8 = 0x0B;
const DISTANCE_POS: u8 = 0x42;
const TRIGGER_POS: u8 = 0x16;

/// Eight data lines written at once
pub trait DataPort {
    type Error;
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy)]
enum Register {
    Instruction,
    Data,
}

pub struct Hd44780<PORT, RS, EN, T> {
    data: PORT,
    rs: RS,
    en: EN,
    ticks: T,
}

impl<PORT, RS, EN, T> Hd44780<PORT, RS, EN, T>
where
    PORT: DataPort,
    RS: OutputPin,
    EN: OutputPin,
    T: TickWait,
{
    pub fn new(data: PORT, rs: RS, en: EN, ticks: T) -> Self {
        Self { data, rs, en, ticks }
    }

    pub fn init(&mut self) -> Result<(), Error> {
        self.ticks.wait_ticks(LCD_STROBE_TICKS);
        for cmd in [
            FUNCTION_SET_8BIT_2LINE,
            DISPLAY_OFF,
            CLEAR,
            ENTRY_MODE_INCREMENT,
            DISPLAY_ON,
        ] {
            self.command(cmd)?;
        }
        Ok(())
    }

    fn strobe(&mut self, register: Register, byte: u8) -> Result<(), Error> {
        self.data.write(byte).map_err(|_| Error::Pin)?;
        let select = match register {
            Register::Instruction => self.rs.set_low(),
            Register::Data => self.rs.set_high(),
        };
        select.map_err(|_| Error::Pin)?;
        self.en.set_high().map_err(|_| Error::Pin)?;
        self.ticks.wait_ticks(LCD_STROBE_TICKS);
        self.en.set_low().map_err(|_| Error::Pin)
    }

    pub fn command(&mut self, cmd: u8) -> Result<(), Error> {
        self.strobe(Register::Instruction, cmd)
    }

    pub fn set_cursor(&mut self, addr: u8) -> Result<(), Error> {
        self.command(SET_DDRAM_ADDR | addr)
    }

    pub fn write_bytes(&mut self, text: &[u8]) -> Result<(), Error> {
        for &byte in text {
            self.strobe(Register::Data, byte)?;
        }
        Ok(())
    }

    pub fn release(self) -> (PORT, RS, EN, T) {
        (self.data, self.rs, self.en, self.ticks)
    }
}

impl<PORT, RS, EN, T> DisplaySink for Hd44780<PORT, RS, EN, T>
where
    PORT: DataPort,
    RS: OutputPin,
    EN: OutputPin,
    T: TickWait,
{
    fn show_labels(&mut self) -> Result<(), Error> {
        self.set_cursor(COUNT_LABEL_POS)?;
        self.write_bytes(COUNT_LABEL.as_bytes())
    }

    fn show_count(&mut self, count: u32) -> Result<(), Error> {
        self.set_cursor(COUNT_POS)?;
        self.write_bytes(&CountField(count).text())
    }

    fn show_distance(&mut self, cm: u16) -> Result<(), Error> {
        self.set_cursor(DISTANCE_POS)?;
        self.write_bytes(DISTANCE_LABEL.as_bytes())?;
        self.write_bytes(&DistanceField(cm).text())
    }

    fn show_trigger_distance(&mut self, cm: u16) -> Result<(), Error> {
        self.set_cursor(TRIGGER_POS)?;
        self.write_bytes(TRIGGER_LABEL.as_bytes())?;
        self.write_bytes(&DistanceField(cm).text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction as PinTransaction};

    #[derive(Default)]
    struct Bus(Vec<u8>);

    impl DataPort for &mut Bus {
        type Error = Infallible;

        fn write(&mut self, byte: u8) -> Result<(), Infallible> {
            self.0.push(byte);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingTicks(u32);

    impl TickWait for CountingTicks {
        fn wait_ticks(&mut self, ticks: u16) {
            self.0 += ticks as u32;
        }
    }

    fn strobes(data: bool, n: usize) -> (Vec<PinTransaction>, Vec<PinTransaction>) {
        let rs_tx = (0..n)
            .map(|_| PinTransaction::set(if data { State::High } else { State::Low }))
            .collect();
        let en_tx = (0..n)
            .flat_map(|_| [PinTransaction::set(State::High), PinTransaction::set(State::Low)])
            .collect();
        (rs_tx, en_tx)
    }

    #[test]
    fn init_sends_power_on_sequence() {
        let mut bus = Bus::default();
        let (rs_tx, en_tx) = strobes(false, 5);
        let mut lcd = Hd44780::new(&mut bus, PinMock::new(&rs_tx), PinMock::new(&en_tx), CountingTicks::default());

        lcd.init().unwrap();

        let (_, mut rs, mut en, ticks) = lcd.release();
        rs.done();
        en.done();
        assert_eq!(ticks.0, 6);
        assert_eq!(bus.0, [0x38, 0x08, 0x01, 0x06, 0x0C]);
    }

    #[test]
    fn count_is_written_at_its_field() {
        let mut bus = Bus::default();
        let (mut rs_tx, mut en_tx) = strobes(false, 1);
        let (data_rs, data_en) = strobes(true, 6);
        rs_tx.extend(data_rs);
        en_tx.extend(data_en);
        let mut lcd = Hd44780::new(&mut bus, PinMock::new(&rs_tx), PinMock::new(&en_tx), CountingTicks::default());

        lcd.show_count(12_345).unwrap();

        let (_, mut rs, mut en, _) = lcd.release();
        rs.done();
        en.done();
        assert_eq!(bus.0, b"\x8B12,345");
    }
}
