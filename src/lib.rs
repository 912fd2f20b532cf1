//! Ultrasonic object counter for the ATmega128
//!
//! Board-independent logic builds on any target so it can be tested on the host;
//! register-level code under [`hal`] only exists on AVR.
#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod drivers;
pub mod error;
pub mod hal;
pub mod logger;
pub mod os;

pub use application::{Application, Count, CounterConfig, CrossingDetector, CrossingState, Parts};
pub use error::Error;
