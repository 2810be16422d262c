// src/commands.rs

use crate::registers::{IDLE_IRQ, RX_IRQ};

/// Commands executed by the MFRC522 (PCD) when written to CommandReg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Idle = 0x00,
    Mem = 0x01,
    GenerateRandomId = 0x02,
    CalcCrc = 0x03,
    Transmit = 0x04,
    NoCmdChange = 0x07,
    Receive = 0x08,
    Transceive = 0x0C,
    Authent = 0x0E,
    SoftReset = 0x0F,
}

impl Command {
    /// IRQ-enable mask and completion bits polled by the command executor.
    ///
    /// Commands other than `Authent` and `Transceive` enable nothing and
    /// complete only through the timer bit.
    pub fn irq_profile(self) -> (u8, u8) {
        match self {
            Command::Authent => (0x12, IDLE_IRQ),
            Command::Transceive => (0x77, RX_IRQ | IDLE_IRQ),
            _ => (0x00, 0x00),
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

// Commands sent to the card (PICC)
pub const PICC_REQIDL: u8 = 0x26;     // REQA: cards in IDLE go to READY. 7 bit frame.
pub const PICC_REQALL: u8 = 0x52;     // WUPA: cards in IDLE or HALT go to READY. 7 bit frame.
pub const PICC_ANTICOLL: u8 = 0x93;   // Anticollision, cascade level 1
pub const PICC_SELECT_TAG: u8 = 0x93; // Select, cascade level 1
pub const PICC_HALT: u8 = 0x50;       // HLTA: ACTIVE card goes to HALT

/// NVB for an anticollision frame: SEL and NVB only, no UID bits.
pub const NVB_ANTICOLL: u8 = 0x20;
/// NVB for a select frame: seven whole bytes.
pub const NVB_SELECT: u8 = 0x70;
