#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use panic_halt as _;

    use avr_device::atmega128a::Peripherals;
    use embedded_hal::digital::v2::OutputPin;

    use sonar_counter::drivers::{EepromCounter, Hd44780, OverrideButtons, Rangefinder, RangefinderConfig};
    use sonar_counter::hal::{board, exint, CycleDelay, EchoTimer, Eeprom, PortC, TickTimer, Ticker, Uart};
    use sonar_counter::logger::{LogLevel, Logger};
    use sonar_counter::os::{MANUAL_OVERRIDE, TICK};
    use sonar_counter::{Application, CounterConfig, Parts};

    #[cfg(feature = "debug")]
    const LOG_LEVEL: LogLevel = LogLevel::Debug;
    #[cfg(not(feature = "debug"))]
    const LOG_LEVEL: LogLevel = LogLevel::Info;

    #[avr_device::interrupt(atmega128a)]
    fn INT0() {
        MANUAL_OVERRIDE.raise();
    }

    #[avr_device::interrupt(atmega128a)]
    fn TIMER0_OVF() {
        TICK.raise();
    }

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let mut log = Logger::new(Uart::new(dp.USART0), LOG_LEVEL);
        log.info("sonar counter v0.1.0");

        // SAFETY: each pin is taken exactly once, here
        let (trig, echo, inc, dec, rst, line, rs, en, mut buzzer) = unsafe {
            (
                board::SONAR_TRIG::steal().into_output(),
                board::SONAR_ECHO::steal().into_input(),
                board::BTN_INC::steal().into_input(),
                board::BTN_DEC::steal().into_input(),
                board::BTN_RESET::steal().into_input(),
                board::OVERRIDE_LINE::steal().into_input(),
                board::LCD_RS::steal().into_output(),
                board::LCD_EN::steal().into_output(),
                board::BUZZER::steal().into_output(),
            )
        };
        // Infallible
        let _ = buzzer.set_low();

        let mut tick_timer = TickTimer::new(dp.TC0);
        tick_timer.start();
        exint::enable_int0_rising(&dp.EXINT);
        unsafe { avr_device::interrupt::enable() };

        let sensor = Rangefinder::new(
            trig,
            echo,
            EchoTimer::new(dp.TC1),
            CycleDelay,
            RangefinderConfig::default(),
        );
        let mut lcd = Hd44780::new(PortC::new(dp.PORTC), rs, en, Ticker::new(&TICK));
        if lcd.init().is_err() {
            log.warn("lcd init failed");
        }

        let parts = Parts {
            sensor,
            inputs: OverrideButtons::new(inc, dec, rst, line),
            buzzer,
            display: lcd,
            store: EepromCounter::new(Eeprom::new(dp.EEPROM)),
            ticks: Ticker::new(&TICK),
        };
        let mut app = Application::new(parts, &MANUAL_OVERRIDE, log, CounterConfig::default());

        // Only pin faults reach here and the board pins cannot fail
        let _ = app.start();
        app.run()
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
