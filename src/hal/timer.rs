//! Tick time base and the echo measurement timer

use crate::os::Signal;
use core::convert::Infallible;

/// Blocking wait counted in timer overflow ticks
pub trait TickWait {
    fn wait_ticks(&mut self, ticks: u16);
}

/// Free-running hardware counter used to time the echo pulse
pub trait MeasurementTimer {
    /// Zero the counter without changing whether it runs
    fn reset(&mut self);
    fn start(&mut self);
    fn stop(&mut self);
    fn ticks(&self) -> u16;
}

/// [`TickWait`] driven by the overflow interrupt raising a [`Signal`]
///
/// Interrupts stay enabled while waiting; each observed tick is cleared before
/// the next one is counted.
pub struct Ticker<'a> {
    tick: &'a Signal,
}

impl<'a> Ticker<'a> {
    pub fn new(tick: &'a Signal) -> Self {
        Self { tick }
    }

    /// Consume one pending tick
    pub fn poll(&mut self) -> nb::Result<(), Infallible> {
        if self.tick.take() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl TickWait for Ticker<'_> {
    fn wait_ticks(&mut self, ticks: u16) {
        for _ in 0..ticks {
            // Infallible
            let _ = nb::block!(self.poll());
        }
    }
}

#[cfg(target_arch = "avr")]
pub use avr::{CycleDelay, EchoTimer, TickTimer};

#[cfg(target_arch = "avr")]
mod avr {
    use super::MeasurementTimer;
    use crate::config::{CPU_FREQ_HZ, ECHO_PRESCALER_BITS, TICK_PRESCALER_BITS};
    use avr_device::atmega128a::{TC0, TC1};
    use embedded_hal::blocking::delay::DelayUs;

    const CS_MASK: u8 = 0x07;
    const TOIE0: u8 = 1 << 0;

    /// Timer0 in normal mode; the overflow interrupt drives [`crate::os::TICK`]
    pub struct TickTimer {
        tc0: TC0,
    }

    impl TickTimer {
        pub fn new(tc0: TC0) -> Self {
            tc0.tccr0.write(|w| unsafe { w.bits(0) });
            tc0.tcnt0.write(|w| unsafe { w.bits(0) });
            Self { tc0 }
        }

        pub fn start(&mut self) {
            self.tc0
                .tccr0
                .modify(|r, w| unsafe { w.bits((r.bits() & !CS_MASK) | TICK_PRESCALER_BITS) });
            self.tc0.timsk.modify(|r, w| unsafe { w.bits(r.bits() | TOIE0) });
        }
    }

    /// Timer1 as a plain 16-bit counter for echo timing
    pub struct EchoTimer {
        tc1: TC1,
    }

    impl EchoTimer {
        pub fn new(tc1: TC1) -> Self {
            tc1.tccr1a.write(|w| unsafe { w.bits(0) });
            tc1.tccr1b.write(|w| unsafe { w.bits(0) });
            Self { tc1 }
        }
    }

    impl MeasurementTimer for EchoTimer {
        fn reset(&mut self) {
            self.tc1.tcnt1.write(|w| unsafe { w.bits(0) });
        }

        fn start(&mut self) {
            self.tc1
                .tccr1b
                .modify(|r, w| unsafe { w.bits((r.bits() & !CS_MASK) | ECHO_PRESCALER_BITS) });
        }

        fn stop(&mut self) {
            self.tc1
                .tccr1b
                .modify(|r, w| unsafe { w.bits(r.bits() & !CS_MASK) });
        }

        fn ticks(&self) -> u16 {
            self.tc1.tcnt1.read().bits()
        }
    }

    /// Busy-loop microsecond delay for the trigger pulse
    pub struct CycleDelay;

    // nop + loop overhead is roughly 4 cycles
    const LOOPS_PER_US: u32 = CPU_FREQ_HZ / 1_000_000 / 4;

    impl DelayUs<u16> for CycleDelay {
        fn delay_us(&mut self, us: u16) {
            for _ in 0..(us as u32 * LOOPS_PER_US) {
                avr_device::asm::nop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    #[test]
    fn poll_consumes_one_tick() {
        let tick = Signal::new();
        let mut ticker = Ticker::new(&tick);

        assert_eq!(ticker.poll(), Err(nb::Error::WouldBlock));
        tick.raise();
        assert_eq!(ticker.poll(), Ok(()));
        assert!(!tick.is_raised());
    }

    #[test]
    fn zero_tick_wait_returns_immediately() {
        let tick = Signal::new();
        Ticker::new(&tick).wait_ticks(0);
    }

    #[test]
    fn wait_returns_once_ticks_arrive() {
        static TICK: Signal = Signal::new();
        static DONE: AtomicBool = AtomicBool::new(false);

        let isr = thread::spawn(|| {
            while !DONE.load(Ordering::Acquire) {
                TICK.raise();
                thread::yield_now();
            }
        });

        Ticker::new(&TICK).wait_ticks(5);
        DONE.store(true, Ordering::Release);
        isr.join().unwrap();
    }
}
