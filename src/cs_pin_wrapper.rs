// src/cs_pin_wrapper.rs

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::errors::Error;

/// Active-low chip-select line framing one register exchange.
///
/// The MFRC522 drops an exchange if NSS rises before its last byte, so every
/// transfer runs inside [`CsPinWrapper::frame`].
pub struct CsPinWrapper<CS> {
    cs: CS,
}

impl<CS> CsPinWrapper<CS>
where
    CS: OutputPin,
{
    pub fn new(cs: CS) -> Self {
        CsPinWrapper { cs }
    }

    pub fn release(self) -> CS {
        self.cs
    }

    /// Drives the line to its idle (deasserted) level.
    pub fn deassert<SpiE>(&mut self) -> Result<(), Error<SpiE, CS::Error>> {
        self.cs.set_high().map_err(Error::ChipSelect)
    }

    /// Asserts chip-select, runs `exchange` on the bus, waits for the bus to
    /// flush and deasserts again.
    ///
    /// The line is released even when the exchange itself failed.
    pub fn frame<SPI, T>(
        &mut self,
        spi: &mut SPI,
        exchange: impl FnOnce(&mut SPI) -> Result<T, SPI::Error>,
    ) -> Result<T, Error<SPI::Error, CS::Error>>
    where
        SPI: SpiBus<u8>,
    {
        self.cs
            .set_low()
            .map_err(Error::<SPI::Error, CS::Error>::ChipSelect)?;
        let result = exchange(&mut *spi)
            .and_then(|value| spi.flush().map(|()| value))
            .map_err(Error::Spi);
        self.cs
            .set_high()
            .map_err(Error::<SPI::Error, CS::Error>::ChipSelect)?;
        result
    }
}
