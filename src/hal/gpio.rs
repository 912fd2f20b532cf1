use avr_device::atmega128a::{PORTA, PORTB, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::drivers::lcd::DataPort;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

#[derive(Debug)]
pub struct Pin<PORT, const PIN: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8, MODE> Pin<PORT, P, MODE> {
    /// Caller guarantees no other handle to this pin exists.
    pub const unsafe fn steal() -> Self {
        Pin {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident, $pin:ident) => {
        impl<const P: u8, MODE: PinMode> Pin<$PORT, P, MODE> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }

            pub fn into_input(self) -> Pin<$PORT, P, Input> {
                // Clear DDRx bit and disable pull-up
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Pin {
                    _port: PhantomData,
                    _mode: PhantomData,
                }
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Ok(())
            }
        }

        impl<const P: u8> InputPin for Pin<$PORT, P, Input> {
            type Error = Infallible;

            #[inline]
            fn is_high(&self) -> Result<bool, Infallible> {
                Ok(unsafe { (*$PORT::ptr()).$pin.read().bits() & (1 << P) != 0 })
            }

            #[inline]
            fn is_low(&self) -> Result<bool, Infallible> {
                self.is_high().map(|high| !high)
            }
        }
    };
}

impl_port!(PORTA, porta, ddra, pina);
impl_port!(PORTB, portb, ddrb, pinb);
impl_port!(PORTC, portc, ddrc, pinc);
impl_port!(PORTD, portd, ddrd, pind);

/// PORTC driven as a whole byte for the LCD data bus
pub struct PortC {
    _private: (),
}

impl PortC {
    pub fn new(_portc: PORTC) -> Self {
        unsafe {
            (*PORTC::ptr()).ddrc.write(|w| w.bits(0xFF));
        }
        Self { _private: () }
    }
}

impl DataPort for PortC {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> Result<(), Infallible> {
        unsafe {
            (*PORTC::ptr()).portc.write(|w| w.bits(byte));
        }
        Ok(())
    }
}

// Counter board pin assignments
#[allow(non_camel_case_types)]
pub mod board {
    use super::*;

    // Manual override inputs (PORTA)
    pub type BTN_INC = Pin<PORTA, 0, Input>;
    pub type BTN_DEC = Pin<PORTA, 1, Input>;
    pub type BTN_RESET = Pin<PORTA, 2, Input>;

    // INT0 line shared by the three buttons through a diode OR
    pub type OVERRIDE_LINE = Pin<PORTD, 0, Input>;

    // Ultrasonic sensor (PORTB)
    pub type SONAR_TRIG = Pin<PORTB, 0, Output>;
    pub type SONAR_ECHO = Pin<PORTB, 1, Input>;

    // LCD control and buzzer (PORTB); LCD data is all of PORTC
    pub type LCD_RS = Pin<PORTB, 5, Output>;
    pub type BUZZER = Pin<PORTB, 6, Output>;
    pub type LCD_EN = Pin<PORTB, 7, Output>;
}
