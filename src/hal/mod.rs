pub mod timer;

#[cfg(target_arch = "avr")]
pub mod eeprom;
#[cfg(target_arch = "avr")]
pub mod exint;
#[cfg(target_arch = "avr")]
pub mod gpio;
#[cfg(target_arch = "avr")]
pub mod uart;

// Re-export commonly used types
pub use timer::{MeasurementTimer, TickWait, Ticker};

#[cfg(target_arch = "avr")]
pub use eeprom::Eeprom;
#[cfg(target_arch = "avr")]
pub use gpio::{board, Input, Output, Pin, PortC};
#[cfg(target_arch = "avr")]
pub use timer::{CycleDelay, EchoTimer, TickTimer};
#[cfg(target_arch = "avr")]
pub use uart::Uart;
