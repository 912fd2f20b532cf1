//! Configuration constants for the sonar counter firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Timer0 prescaler select (CS0 = 0b110, clk/256). One overflow every 4.096 ms.
pub const TICK_PRESCALER_BITS: u8 = 0x06;

/// Timer1 prescaler select (CS1 = 0b011, clk/64). One count every 4 us.
pub const ECHO_PRESCALER_BITS: u8 = 0x03;

/// Echo timer counts per centimeter of range, times ten (58 us/cm round trip at 4 us/count)
pub const ECHO_TICKS_PER_CM_X10: u32 = 145;

/// Give up waiting for the echo to rise after this many echo timer counts
pub const ECHO_RISE_TIMEOUT_TICKS: u16 = 23_000;

/// Echo longer than this is a sensor fault. HC-SR04 reports no-object as ~38 ms.
pub const ECHO_FALL_TIMEOUT_TICKS: u16 = 10_000;

/// Trigger line is held low this long before the pulse
pub const TRIGGER_SETTLE_US: u16 = 2;

/// Width of the trigger pulse
pub const TRIGGER_PULSE_US: u16 = 10;

/// Ticks between the two calibration samples at boot
pub const CALIBRATION_SETTLE_TICKS: u16 = 40;

/// Subtracted from the calibration sample to get the trigger distance
pub const THRESHOLD_MARGIN_CM: u16 = 1;

/// How long the buzzer sounds for each counted object
pub const BUZZER_TICKS: u16 = 60;

/// LCD enable strobe width
pub const LCD_STROBE_TICKS: u16 = 1;

/// EEPROM address of the first byte of the stored count
pub const COUNT_EEPROM_ADDR: u16 = 0x0000;

/// Largest count the 5-digit display field can show
pub const MAX_COUNT: u32 = 99_999;

/// Largest distance the 3-digit display fields can show
pub const MAX_DISPLAY_CM: u16 = 999;
