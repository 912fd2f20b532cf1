//! HC-SR04 style trigger/echo ultrasonic rangefinder

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::{
    ECHO_FALL_TIMEOUT_TICKS, ECHO_RISE_TIMEOUT_TICKS, ECHO_TICKS_PER_CM_X10, TRIGGER_PULSE_US,
    TRIGGER_SETTLE_US,
};
use crate::error::Error;
use crate::hal::MeasurementTimer;

/// Anything that produces one distance sample in centimeters per call
pub trait DistanceSensor {
    fn measure(&mut self) -> Result<u16, Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangefinderConfig {
    pub ticks_per_cm_x10: u32,
    pub rise_timeout_ticks: u16,
    pub fall_timeout_ticks: u16,
    pub settle_us: u16,
    pub pulse_us: u16,
}

impl Default for RangefinderConfig {
    fn default() -> Self {
        Self {
            ticks_per_cm_x10: ECHO_TICKS_PER_CM_X10,
            rise_timeout_ticks: ECHO_RISE_TIMEOUT_TICKS,
            fall_timeout_ticks: ECHO_FALL_TIMEOUT_TICKS,
            settle_us: TRIGGER_SETTLE_US,
            pulse_us: TRIGGER_PULSE_US,
        }
    }
}

impl RangefinderConfig {
    /// Echo width in timer counts to centimeters, rounded up by one.
    pub fn ticks_to_cm(&self, ticks: u16) -> u16 {
        let cm = ticks as u32 * 10 / self.ticks_per_cm_x10 + 1;
        cm.min(u16::MAX as u32) as u16
    }
}

pub struct Rangefinder<TRIG, ECHO, TIM, DELAY> {
    trigger: TRIG,
    echo: ECHO,
    timer: TIM,
    delay: DELAY,
    config: RangefinderConfig,
}

impl<TRIG, ECHO, TIM, DELAY> Rangefinder<TRIG, ECHO, TIM, DELAY>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    TIM: MeasurementTimer,
    DELAY: DelayUs<u16>,
{
    pub fn new(trigger: TRIG, echo: ECHO, timer: TIM, delay: DELAY, config: RangefinderConfig) -> Self {
        Self {
            trigger,
            echo,
            timer,
            delay,
            config,
        }
    }

    fn pulse(&mut self) -> Result<(), Error> {
        self.trigger.set_low().map_err(|_| Error::Pin)?;
        self.delay.delay_us(self.config.settle_us);
        self.trigger.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(self.config.pulse_us);
        self.trigger.set_low().map_err(|_| Error::Pin)
    }

    fn wait_for_rise(&mut self) -> Result<(), Error> {
        while self.echo.is_low().map_err(|_| Error::Pin)? {
            if self.timer.ticks() >= self.config.rise_timeout_ticks {
                // No echo: carry on and let the fall wait see a low line
                break;
            }
        }
        Ok(())
    }

    fn wait_for_fall(&mut self) -> Result<(), Error> {
        while self.echo.is_high().map_err(|_| Error::Pin)? {
            if self.timer.ticks() >= self.config.fall_timeout_ticks {
                return Err(Error::EchoStuck);
            }
        }
        Ok(())
    }

    /// One ranging cycle.
    ///
    /// A missing echo yields a near-zero reading rather than an error. An echo
    /// that never ends is reported as [`Error::EchoStuck`].
    pub fn measure(&mut self) -> Result<u16, Error> {
        self.timer.reset();
        self.pulse()?;
        self.timer.start();
        let width = self.wait_for_rise().and_then(|()| {
            self.timer.reset();
            self.wait_for_fall()
        });
        self.timer.stop();
        width?;

        Ok(self.config.ticks_to_cm(self.timer.ticks()))
    }

    pub fn release(self) -> (TRIG, ECHO, TIM, DELAY) {
        (self.trigger, self.echo, self.timer, self.delay)
    }
}

impl<TRIG, ECHO, TIM, DELAY> DistanceSensor for Rangefinder<TRIG, ECHO, TIM, DELAY>
where
    TRIG: OutputPin,
    ECHO: InputPin,
    TIM: MeasurementTimer,
    DELAY: DelayUs<u16>,
{
    fn measure(&mut self) -> Result<u16, Error> {
        Rangefinder::measure(self)
    }
}
