use avr_device::atmega128a::EXINT;

const INT0: u8 = 1 << 0;
// ISC01:ISC00 = 0b11
const INT0_RISING: u8 = 0x03;

/// Arm INT0 on the rising edge of the manual override line
pub fn enable_int0_rising(exint: &EXINT) {
    exint
        .eicra
        .modify(|r, w| unsafe { w.bits((r.bits() & !0x03) | INT0_RISING) });
    exint.eifr.write(|w| unsafe { w.bits(INT0) });
    exint.eimsk.modify(|r, w| unsafe { w.bits(r.bits() | INT0) });
}
