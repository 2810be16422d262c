use core::fmt::{Debug, Display, Formatter, Result};
use ufmt::{uDebug, uDisplay, uWrite};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CardType {
    NotComplete,
    MifareMini,
    Mifare1K,
    Mifare4K,
    MifareUltralight,
    MifarePlus,
    Tnp3xxx,
    Iso14443_4,
    Iso18092,
    Unknown,
}

// SAK bits tested outside the direct-value table
const SAK_CASCADE: u8 = 0x04;
const SAK_ISO14443_4: u8 = 0x20;
const SAK_ISO18092: u8 = 0x40;

/// Maps a Select Acknowledge byte to the card type.
///
/// The ISO 14443-4 and ISO 18092 bits are applied last and win over both the
/// cascade bit and the value table.
pub fn classify(sak: u8) -> CardType {
    let mut card_type = CardType::Unknown;

    if sak & SAK_CASCADE != 0 {
        card_type = CardType::NotComplete;
    }

    card_type = match sak {
        0x09 => CardType::MifareMini,
        0x08 => CardType::Mifare1K,
        0x18 => CardType::Mifare4K,
        0x00 => CardType::MifareUltralight,
        0x10 | 0x11 => CardType::MifarePlus,
        0x01 => CardType::Tnp3xxx,
        _ => card_type,
    };

    if sak & SAK_ISO14443_4 != 0 {
        card_type = CardType::Iso14443_4;
    }
    if sak & SAK_ISO18092 != 0 {
        card_type = CardType::Iso18092;
    }

    card_type
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            CardType::NotComplete => "NotComplete",
            CardType::MifareMini => "MifareMini",
            CardType::Mifare1K => "Mifare1K",
            CardType::Mifare4K => "Mifare4K",
            CardType::MifareUltralight => "MifareUltralight",
            CardType::MifarePlus => "MifarePlus",
            CardType::Tnp3xxx => "Tnp3xxx",
            CardType::Iso14443_4 => "Iso14443_4",
            CardType::Iso18092 => "Iso18092",
            CardType::Unknown => "Unknown",
        }
    }
}

impl From<u8> for CardType {
    fn from(sak: u8) -> Self {
        classify(sak)
    }
}

impl Debug for CardType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

impl Display for CardType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

impl uDebug for CardType {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}

impl uDisplay for CardType {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}
