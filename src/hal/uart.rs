use avr_device::atmega128a::USART0;
use core::convert::Infallible;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

const RXEN: u8 = 1 << 4;
const TXEN: u8 = 1 << 3;
const UDRE: u8 = 1 << 5;
// 8N1
const UCSZ_8BIT: u8 = 0x06;

/// Blocking transmit-only console on USART0
///
/// Polls UDRE instead of buffering so logging never depends on interrupts
/// being enabled.
pub struct Uart {
    usart: USART0,
}

impl Uart {
    pub fn new(usart: USART0) -> Self {
        usart.ubrr0h.write(|w| unsafe { w.bits((UBRR >> 8) as u8) });
        usart.ubrr0l.write(|w| unsafe { w.bits(UBRR as u8) });
        usart.ucsr0c.write(|w| unsafe { w.bits(UCSZ_8BIT) });
        usart.ucsr0b.write(|w| unsafe { w.bits(RXEN | TXEN) });
        Self { usart }
    }

    pub fn write_byte(&mut self, byte: u8) {
        while self.usart.ucsr0a.read().bits() & UDRE == 0 {}
        self.usart.udr0.write(|w| unsafe { w.bits(byte) });
    }
}

impl ufmt::uWrite for Uart {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}
