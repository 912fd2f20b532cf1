//! Leveled line logger over any `ufmt` sink
//!
//! The firmware points this at USART0. Write errors are dropped: a missing console
//! must never stall counting.

use ufmt::{uDisplay, uWrite, uwrite};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Error => "[ERR] ",
            LogLevel::Warn => "[WRN] ",
            LogLevel::Info => "[INF] ",
            LogLevel::Debug => "[DBG] ",
        }
    }
}

pub struct Logger<W> {
    out: W,
    max_level: LogLevel,
}

impl<W: uWrite> Logger<W> {
    pub fn new(out: W, max_level: LogLevel) -> Self {
        Self { out, max_level }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level
    }

    pub fn log(&mut self, level: LogLevel, msg: &str) {
        if !self.enabled(level) {
            return;
        }
        uwrite!(self.out, "{}{}\r\n", level.tag(), msg).ok();
    }

    /// `[INF] msg: value`
    pub fn log_value<V: uDisplay + ?Sized>(&mut self, level: LogLevel, msg: &str, value: &V) {
        if !self.enabled(level) {
            return;
        }
        uwrite!(self.out, "{}{}: {}\r\n", level.tag(), msg, value).ok();
    }

    pub fn info(&mut self, msg: &str) {
        self.log(LogLevel::Info, msg);
    }

    pub fn warn(&mut self, msg: &str) {
        self.log(LogLevel::Warn, msg);
    }

    pub fn inner(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    struct Sink(String);

    impl uWrite for Sink {
        type Error = Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn writes_tagged_lines() {
        let mut log = Logger::new(Sink(String::new()), LogLevel::Info);
        log.info("boot");
        log.log_value(LogLevel::Warn, "count", &42u32);
        assert_eq!(log.inner().0, "[INF] boot\r\n[WRN] count: 42\r\n");
    }

    #[test]
    fn filters_above_max_level() {
        let mut log = Logger::new(Sink(String::new()), LogLevel::Warn);
        log.info("hidden");
        log.log_value(LogLevel::Debug, "distance", &12u16);
        log.log(LogLevel::Error, "shown");
        assert_eq!(log.inner().0, "[ERR] shown\r\n");
    }
}
