use avr_device::atmega128a::EEPROM;

use crate::drivers::counter_store::ByteStore;

const EERE: u8 = 1 << 0;
const EEWE: u8 = 1 << 1;
const EEMWE: u8 = 1 << 2;

/// On-chip EEPROM, one byte at a time
pub struct Eeprom {
    eeprom: EEPROM,
}

impl Eeprom {
    pub fn new(eeprom: EEPROM) -> Self {
        Self { eeprom }
    }

    fn wait_ready(&self) {
        while self.eeprom.eecr.read().bits() & EEWE != 0 {}
    }
}

impl ByteStore for Eeprom {
    fn read_byte(&mut self, addr: u16) -> u8 {
        self.wait_ready();
        self.eeprom.eear.write(|w| unsafe { w.bits(addr) });
        self.eeprom.eecr.write(|w| unsafe { w.bits(EERE) });
        self.eeprom.eedr.read().bits()
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.wait_ready();
        self.eeprom.eear.write(|w| unsafe { w.bits(addr) });
        self.eeprom.eedr.write(|w| unsafe { w.bits(value) });
        // EEWE must follow EEMWE within four cycles
        avr_device::interrupt::free(|_| {
            self.eeprom.eecr.write(|w| unsafe { w.bits(EEMWE) });
            self.eeprom.eecr.write(|w| unsafe { w.bits(EEMWE | EEWE) });
        });
    }
}
