use core::fmt::{Debug, Formatter, Result};
use ufmt::{uDebug, uWrite};

/// Outcome of a protocol exchange with the card.
///
/// Absence of a card is an expected outcome, never an error value of a
/// `Result`: callers branch on the status explicitly.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// No card answered within the transaction window.
    NoTag,
    /// Hardware error bits, bad checksum, unexpected length or poll timeout.
    Error,
}

impl Status {
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }
}

impl Debug for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Status::Ok => write!(f, "Ok"),
            Status::NoTag => write!(f, "NoTag"),
            Status::Error => write!(f, "Error"),
        }
    }
}

impl uDebug for Status {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Status::Ok => f.write_str("Ok"),
            Status::NoTag => f.write_str("NoTag"),
            Status::Error => f.write_str("Error"),
        }
    }
}

/// Transport failure on the bus or the chip-select line.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiE, PinE> {
    Spi(SpiE),
    ChipSelect(PinE),
}

impl<SpiE: Debug, PinE: Debug> Debug for Error<SpiE, PinE> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Error::Spi(e) => write!(f, "Spi({:?})", e),
            Error::ChipSelect(e) => write!(f, "ChipSelect({:?})", e),
        }
    }
}

impl<SpiE, PinE> uDebug for Error<SpiE, PinE> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Error::Spi(_) => f.write_str("Spi"),
            Error::ChipSelect(_) => f.write_str("ChipSelect"),
        }
    }
}
