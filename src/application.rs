//! Counting logic and the main loop
//!
//! One iteration is: measure, update the crossing state, show the distance,
//! service the manual override, show the count. Interrupt handlers only raise
//! signals, so everything here runs on the main loop and owns its state outright.

use embedded_hal::digital::v2::OutputPin;
use ufmt::uWrite;

use crate::config::{BUZZER_TICKS, CALIBRATION_SETTLE_TICKS, MAX_COUNT, THRESHOLD_MARGIN_CM};
use crate::drivers::{CounterStore, DisplaySink, DistanceSensor, ManualEvent, ManualInputs};
use crate::error::Error;
use crate::hal::TickWait;
use crate::logger::{LogLevel, Logger};
use crate::os::Signal;

/// Objects counted so far, `0..=MAX_COUNT`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Count(u32);

impl Count {
    pub fn new(value: u32) -> Self {
        Self(value.min(MAX_COUNT))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Saturates at the display ceiling
    pub fn increment(&mut self) {
        self.0 = (self.0 + 1).min(MAX_COUNT);
    }

    /// Stays at zero
    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }

    pub fn apply(&mut self, event: ManualEvent) {
        match event {
            ManualEvent::Increment => self.increment(),
            ManualEvent::Decrement => self.decrement(),
            ManualEvent::Reset => self.reset(),
            ManualEvent::None => {}
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrossingState {
    Armed,
    Triggered,
}

/// Hysteresis on the trigger distance: one crossing per stay below it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossingDetector {
    threshold: u16,
    state: CrossingState,
}

impl CrossingDetector {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold,
            state: CrossingState::Armed,
        }
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn state(&self) -> CrossingState {
        self.state
    }

    /// Returns `true` only on the Armed to Triggered transition.
    pub fn update(&mut self, sample: u16) -> bool {
        let below = sample < self.threshold;
        match (self.state, below) {
            (CrossingState::Armed, true) => {
                self.state = CrossingState::Triggered;
                true
            }
            (CrossingState::Triggered, false) => {
                self.state = CrossingState::Armed;
                false
            }
            _ => false,
        }
    }
}

/// Trigger distance derived from the calibration sample
pub fn threshold_from_sample(sample: u16, margin_cm: u16) -> u16 {
    sample.saturating_sub(margin_cm)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterConfig {
    pub settle_ticks: u16,
    pub margin_cm: u16,
    pub buzzer_ticks: u16,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            settle_ticks: CALIBRATION_SETTLE_TICKS,
            margin_cm: THRESHOLD_MARGIN_CM,
            buzzer_ticks: BUZZER_TICKS,
        }
    }
}

/// Peripherals the main loop drives
pub struct Parts<S, M, A, D, P, T> {
    pub sensor: S,
    pub inputs: M,
    pub buzzer: A,
    pub display: D,
    pub store: P,
    pub ticks: T,
}

pub struct Application<'a, S, M, A, D, P, T, W> {
    sensor: S,
    inputs: M,
    buzzer: A,
    display: D,
    store: P,
    ticks: T,
    log: Logger<W>,
    manual: &'a Signal,
    config: CounterConfig,
    count: Count,
    detector: CrossingDetector,
}

impl<'a, S, M, A, D, P, T, W> Application<'a, S, M, A, D, P, T, W>
where
    S: DistanceSensor,
    M: ManualInputs,
    A: OutputPin,
    D: DisplaySink,
    P: CounterStore,
    T: TickWait,
    W: uWrite,
{
    /// Restores the count from the store. The detector stays inert (threshold 0)
    /// until [`Self::calibrate`] runs.
    pub fn new(parts: Parts<S, M, A, D, P, T>, manual: &'a Signal, log: Logger<W>, config: CounterConfig) -> Self {
        let Parts {
            sensor,
            inputs,
            buzzer,
            display,
            mut store,
            ticks,
        } = parts;
        let count = Count::new(store.load());

        Self {
            sensor,
            inputs,
            buzzer,
            display,
            store,
            ticks,
            log,
            manual,
            config,
            count,
            detector: CrossingDetector::new(0),
        }
    }

    pub fn count(&self) -> Count {
        self.count
    }

    pub fn detector(&self) -> &CrossingDetector {
        &self.detector
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn buzzer(&self) -> &A {
        &self.buzzer
    }

    pub fn logger(&self) -> &Logger<W> {
        &self.log
    }

    /// Two samples a settle period apart; the second, less the margin, becomes
    /// the trigger distance.
    pub fn calibrate(&mut self) -> Result<u16, Error> {
        self.sensor.measure()?;
        self.ticks.wait_ticks(self.config.settle_ticks);
        let sample = self.sensor.measure()?;

        let threshold = threshold_from_sample(sample, self.config.margin_cm);
        self.detector = CrossingDetector::new(threshold);
        self.display.show_trigger_distance(threshold)?;
        self.log.log_value(LogLevel::Info, "trigger distance", &threshold);
        Ok(threshold)
    }

    /// Boot sequence: static text, restored count, calibration.
    ///
    /// Calibration is retried while the sensor reports a stuck echo.
    pub fn start(&mut self) -> Result<(), Error> {
        self.log.log_value(LogLevel::Info, "restored count", &self.count.value());
        self.display.show_labels()?;
        self.display.show_count(self.count.value())?;

        loop {
            match self.calibrate() {
                Ok(_) => return Ok(()),
                Err(Error::EchoStuck) => {
                    self.log.warn("calibration failed, echo stuck high");
                    self.ticks.wait_ticks(self.config.settle_ticks);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One pass of the main loop
    ///
    /// A fault in one stage does not cut the pass short: every stage runs and the
    /// first error is returned at the end.
    pub fn step(&mut self) -> Result<(), Error> {
        let measured = match self.sensor.measure() {
            Ok(cm) => {
                self.log.log_value(LogLevel::Debug, "distance", &cm);
                let crossing = if self.detector.update(cm) {
                    self.on_crossing(cm)
                } else {
                    Ok(())
                };
                let shown = self.display.show_distance(cm);
                crossing.and(shown)
            }
            // Leave the crossing state alone; a bad sample says nothing about the object
            Err(Error::EchoStuck) => {
                self.log.warn("sensor fault, echo stuck high");
                Ok(())
            }
            Err(e) => Err(e),
        };

        let serviced = self.service_manual_override();
        measured.and(serviced)
    }

    /// Count is persisted before any output is touched
    fn on_crossing(&mut self, cm: u16) -> Result<(), Error> {
        self.count.increment();
        self.store.store(self.count.value());
        self.log.log_value(LogLevel::Info, "count", &self.count.value());

        self.buzzer.set_high().map_err(|_| Error::Pin)?;
        let shown = self
            .display
            .show_count(self.count.value())
            .and_then(|()| self.display.show_distance(cm));
        self.ticks.wait_ticks(self.config.buzzer_ticks);
        self.buzzer.set_low().map_err(|_| Error::Pin)?;
        shown
    }

    fn service_manual_override(&mut self) -> Result<(), Error> {
        if !self.manual.is_raised() {
            return Ok(());
        }

        let event = self.inputs.sample()?;
        self.count.apply(event);
        self.store.store(self.count.value());
        self.manual.clear();

        nb::block!(self.inputs.poll_release())?;
        // Contact bounce while held re-fires the edge interrupt
        self.manual.clear();

        self.display.show_count(self.count.value())?;
        self.log.log_value(LogLevel::Info, "manual", &event);
        Ok(())
    }

    pub fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.step() {
                self.log.log_value(LogLevel::Error, "loop", &e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_clamps_at_both_ends() {
        let mut count = Count::new(0);
        count.decrement();
        assert_eq!(count.value(), 0);

        let mut count = Count::new(MAX_COUNT);
        count.increment();
        assert_eq!(count.value(), MAX_COUNT);

        assert_eq!(Count::new(250_000).value(), MAX_COUNT);
    }

    #[test]
    fn reset_always_zeroes() {
        for start in [0, 1, 255, 99_999] {
            let mut count = Count::new(start);
            count.apply(ManualEvent::Reset);
            assert_eq!(count.value(), 0);
        }
    }

    #[test]
    fn none_event_changes_nothing() {
        let mut count = Count::new(7);
        count.apply(ManualEvent::None);
        assert_eq!(count.value(), 7);
    }

    #[test]
    fn detector_latches_until_sample_returns_to_threshold() {
        let mut detector = CrossingDetector::new(50);
        assert!(!detector.update(80));
        assert!(detector.update(49));
        assert_eq!(detector.state(), CrossingState::Triggered);
        assert!(!detector.update(10));
        assert!(!detector.update(49));
        assert!(!detector.update(50));
        assert_eq!(detector.state(), CrossingState::Armed);
        assert!(detector.update(20));
    }

    #[test]
    fn zero_threshold_never_triggers() {
        let mut detector = CrossingDetector::new(0);
        assert!(!detector.update(0));
        assert_eq!(detector.state(), CrossingState::Armed);
    }

    #[test]
    fn threshold_margin_saturates() {
        assert_eq!(threshold_from_sample(120, 1), 119);
        assert_eq!(threshold_from_sample(0, 1), 0);
    }
}
