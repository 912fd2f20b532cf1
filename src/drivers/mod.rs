pub mod counter_store;
pub mod display;
pub mod lcd;
pub mod manual_override;
pub mod rangefinder;

pub use counter_store::{ByteStore, CounterStore, EepromCounter};
pub use display::{CountField, DisplaySink, DistanceField};
pub use lcd::{DataPort, Hd44780};
pub use manual_override::{ManualEvent, ManualInputs, OverrideButtons};
pub use rangefinder::{DistanceSensor, Rangefinder, RangefinderConfig};
