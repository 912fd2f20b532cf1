/// Faults surfaced by the drivers and the main loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A GPIO read or write failed
    Pin,
    /// The echo line stayed high past the fall timeout
    EchoStuck,
}

impl ufmt::uDisplay for Error {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match self {
            Error::Pin => f.write_str("pin fault"),
            Error::EchoStuck => f.write_str("echo stuck high"),
        }
    }
}
