//! Persistent count storage
//!
//! Two slots, written alternately. Each slot is
//! `[seq, count (u32 LE, 4 bytes), crc8]`, the CRC covering seq and count.
//! The CRC byte goes last, so a write cut short by power loss leaves that slot
//! invalid and the other slot still holds the previous count.
//!
//! `load` returns the count from the newest valid slot. A slot is valid when its
//! CRC matches and the count is within `0..=MAX_COUNT`. With no valid slot
//! (fresh, erased EEPROM) the count is 0.

use crate::config::{COUNT_EEPROM_ADDR, MAX_COUNT};

/// Byte-addressed non-volatile memory
pub trait ByteStore {
    fn read_byte(&mut self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, value: u8);
}

/// Durable home of the count
pub trait CounterStore {
    fn load(&mut self) -> u32;
    fn store(&mut self, value: u32);
}

const SLOT_LEN: u16 = 6;
const SLOTS: u16 = 2;
const SEQ: u16 = 0;
const COUNT: u16 = 1;
const CRC: u16 = 5;

/// CRC-8, polynomial 0x07, initial value 0
fn crc8(bytes: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in bytes {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// `a` was written after `b`, allowing for sequence wrap
fn is_newer(a: u8, b: u8) -> bool {
    (a.wrapping_sub(b) as i8) > 0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    index: u16,
    seq: u8,
    count: u32,
}

pub struct EepromCounter<B> {
    bytes: B,
    base: u16,
}

impl<B: ByteStore> EepromCounter<B> {
    pub fn new(bytes: B) -> Self {
        Self::at(bytes, COUNT_EEPROM_ADDR)
    }

    /// Occupies `2 * 6` bytes from `base`
    pub fn at(bytes: B, base: u16) -> Self {
        Self { bytes, base }
    }

    pub fn release(self) -> B {
        self.bytes
    }

    fn slot_addr(&self, index: u16) -> u16 {
        self.base + index * SLOT_LEN
    }

    fn read_slot(&mut self, index: u16) -> Option<Slot> {
        let addr = self.slot_addr(index);
        let mut raw = [0u8; SLOT_LEN as usize];
        for (offset, byte) in (0..SLOT_LEN).zip(raw.iter_mut()) {
            *byte = self.bytes.read_byte(addr + offset);
        }

        let body = &raw[..CRC as usize];
        if crc8(body) != raw[CRC as usize] {
            return None;
        }
        let count = u32::from_le_bytes([raw[1], raw[2], raw[3], raw[4]]);
        if count > MAX_COUNT {
            return None;
        }
        Some(Slot {
            index,
            seq: raw[SEQ as usize],
            count,
        })
    }

    fn newest(&mut self) -> Option<Slot> {
        let mut newest: Option<Slot> = None;
        for index in 0..SLOTS {
            if let Some(slot) = self.read_slot(index) {
                newest = match newest {
                    Some(current) if !is_newer(slot.seq, current.seq) => Some(current),
                    _ => Some(slot),
                };
            }
        }
        newest
    }

    fn write_if_changed(&mut self, addr: u16, value: u8) {
        // Skip unchanged cells to spare write cycles
        if self.bytes.read_byte(addr) != value {
            self.bytes.write_byte(addr, value);
        }
    }
}

impl<B: ByteStore> CounterStore for EepromCounter<B> {
    fn load(&mut self) -> u32 {
        self.newest().map(|slot| slot.count).unwrap_or(0)
    }

    fn store(&mut self, value: u32) {
        let value = value.min(MAX_COUNT);
        let (index, seq) = match self.newest() {
            Some(slot) if slot.count == value => return,
            Some(slot) => ((slot.index + 1) % SLOTS, slot.seq.wrapping_add(1)),
            None => (0, 0),
        };

        let count = value.to_le_bytes();
        let mut body = [0u8; CRC as usize];
        body[SEQ as usize] = seq;
        body[COUNT as usize..].copy_from_slice(&count);
        let crc = crc8(&body);

        let addr = self.slot_addr(index);
        for (offset, byte) in (COUNT..CRC).zip(count) {
            self.write_if_changed(addr + offset, byte);
        }
        self.write_if_changed(addr + SEQ, seq);
        self.write_if_changed(addr + CRC, crc);
    }
}
