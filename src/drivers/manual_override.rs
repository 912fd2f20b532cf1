use embedded_hal::digital::v2::InputPin;

use crate::error::Error;

/// Operator adjustment decoded from the three override buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ManualEvent {
    Increment,
    Decrement,
    Reset,
    None,
}

impl ManualEvent {
    /// Increment beats decrement beats reset.
    pub fn decode(increment: bool, decrement: bool, reset: bool) -> Self {
        match (increment, decrement, reset) {
            (true, _, _) => ManualEvent::Increment,
            (false, true, _) => ManualEvent::Decrement,
            (false, false, true) => ManualEvent::Reset,
            (false, false, false) => ManualEvent::None,
        }
    }
}

impl ufmt::uDisplay for ManualEvent {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        f.write_str(match self {
            ManualEvent::Increment => "increment",
            ManualEvent::Decrement => "decrement",
            ManualEvent::Reset => "reset",
            ManualEvent::None => "none",
        })
    }
}

/// Inputs consulted once the override interrupt has fired
pub trait ManualInputs {
    fn sample(&mut self) -> Result<ManualEvent, Error>;

    /// `WouldBlock` while the interrupt line is still held
    fn poll_release(&mut self) -> nb::Result<(), Error>;
}

/// Three active-high buttons plus the edge line that fires INT0
pub struct OverrideButtons<INC, DEC, RST, LINE> {
    increment: INC,
    decrement: DEC,
    reset: RST,
    line: LINE,
}

impl<INC, DEC, RST, LINE> OverrideButtons<INC, DEC, RST, LINE>
where
    INC: InputPin,
    DEC: InputPin,
    RST: InputPin,
    LINE: InputPin,
{
    pub fn new(increment: INC, decrement: DEC, reset: RST, line: LINE) -> Self {
        Self {
            increment,
            decrement,
            reset,
            line,
        }
    }

    pub fn release(self) -> (INC, DEC, RST, LINE) {
        (self.increment, self.decrement, self.reset, self.line)
    }
}

impl<INC, DEC, RST, LINE> ManualInputs for OverrideButtons<INC, DEC, RST, LINE>
where
    INC: InputPin,
    DEC: InputPin,
    RST: InputPin,
    LINE: InputPin,
{
    fn sample(&mut self) -> Result<ManualEvent, Error> {
        let increment = self.increment.is_high().map_err(|_| Error::Pin)?;
        let decrement = self.decrement.is_high().map_err(|_| Error::Pin)?;
        let reset = self.reset.is_high().map_err(|_| Error::Pin)?;
        Ok(ManualEvent::decode(increment, decrement, reset))
    }

    fn poll_release(&mut self) -> nb::Result<(), Error> {
        if self.line.is_high().map_err(|_| nb::Error::Other(Error::Pin))? {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction as PinTransaction};

    fn level(state: State) -> PinMock {
        PinMock::new(&[PinTransaction::get(state)])
    }

    #[test]
    fn decode_follows_priority() {
        assert_eq!(ManualEvent::decode(true, true, true), ManualEvent::Increment);
        assert_eq!(ManualEvent::decode(true, true, false), ManualEvent::Increment);
        assert_eq!(ManualEvent::decode(false, true, true), ManualEvent::Decrement);
        assert_eq!(ManualEvent::decode(false, false, true), ManualEvent::Reset);
        assert_eq!(ManualEvent::decode(false, false, false), ManualEvent::None);
    }

    #[test]
    fn samples_all_three_buttons() {
        let mut buttons = OverrideButtons::new(
            level(State::Low),
            level(State::High),
            level(State::High),
            PinMock::new(&[]),
        );
        assert_eq!(buttons.sample(), Ok(ManualEvent::Decrement));

        let (mut inc, mut dec, mut rst, mut line) = buttons.release();
        inc.done();
        dec.done();
        rst.done();
        line.done();
    }

    #[test]
    fn release_blocks_while_line_is_held() {
        let line = PinMock::new(&[
            PinTransaction::get(State::High),
            PinTransaction::get(State::High),
            PinTransaction::get(State::Low),
        ]);
        let mut buttons =
            OverrideButtons::new(PinMock::new(&[]), PinMock::new(&[]), PinMock::new(&[]), line);

        assert_eq!(buttons.poll_release(), Err(nb::Error::WouldBlock));
        assert_eq!(nb::block!(buttons.poll_release()), Ok(()));

        let (_, _, _, mut line) = buttons.release();
        line.done();
    }
}
