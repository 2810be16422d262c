use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, Mode, Phase, Polarity, SpiBus};
use heapless::Vec;
use log::{debug, trace, warn};

use crate::commands::*;
use crate::cs_pin_wrapper::CsPinWrapper;
use crate::errors::{Error, Status};
use crate::registers::*;
use crate::uid::Uid;

/// SPI mode expected by the MFRC522: clock idles low, data captured on the
/// rising edge. Bytes go out MSB first.
pub const MODE: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnFirstTransition,
};

pub const FIFO_CAPACITY: usize = 64;
/// Most bytes drained from the FIFO after a transceive, whatever its level says.
pub const MAX_RESPONSE_LEN: usize = 16;

pub const TO_CARD_POLL_MS: u32 = 10;
pub const TO_CARD_MAX_POLLS: u16 = 2000;
pub const CRC_MAX_POLLS: u8 = 255;
pub const WAIT_PRESENT_POLL_MS: u32 = 5;
pub const WAIT_REMOVED_POLL_MS: u32 = 1;
pub const RESET_SETTLE_MS: u32 = 200;

// Written to TPrescalerReg and read back to detect a missing reader
const PRESCALER_PROBE: u8 = 0x3E;

pub type RfidError<SPI, CS> =
    Error<<SPI as spi::ErrorType>::Error, <CS as digital::ErrorType>::Error>;

/// ISO/IEC 14443 card family the analog front end is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFamily {
    A,
    B,
}

/// Result of one command executor cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiccResponse {
    pub status: Status,
    /// Valid bits received; only counted for `Transceive`.
    pub bits: u16,
    pub data: Vec<u8, MAX_RESPONSE_LEN>,
}

impl PiccResponse {
    fn new(status: Status) -> Self {
        PiccResponse {
            status,
            bits: 0,
            data: Vec::new(),
        }
    }
}

/// MFRC522 driver owning the bus, the chip-select line and the delay source.
///
/// Every operation takes `&mut self`, so at most one command is in flight on
/// the reader at a time. Share it between tasks behind a mutex.
pub struct RfidRc522<SPI, CS, D> {
    spi: SPI,
    cs: CsPinWrapper<CS>,
    delay: D,
}

fn read_address(reg: u8) -> u8 {
    ((reg << 1) & 0xFE) | 0x80
}

fn write_address(reg: u8) -> u8 {
    (reg << 1) & 0x7E
}

impl<SPI, CS, D> RfidRc522<SPI, CS, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, cs: CS, delay: D) -> Self {
        RfidRc522 {
            spi,
            cs: CsPinWrapper::new(cs),
            delay,
        }
    }

    pub fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs.release(), self.delay)
    }

    /// Resets and configures the reader, then switches the antenna on.
    ///
    /// Returns `Status::Error` when the prescaler probe does not read back,
    /// which means no reader is answering on the bus. The configuration is
    /// written regardless.
    pub fn init(&mut self, family: CardFamily) -> Result<Status, RfidError<SPI, CS>> {
        self.cs.deassert::<SPI::Error>()?;

        self.soft_reset()?;
        self.delay.delay_ms(RESET_SETTLE_MS);

        self.write_register(T_PRESCALER_REG, PRESCALER_PROBE)?;
        let probe = self.read_register(T_PRESCALER_REG)?;
        let status = if probe == PRESCALER_PROBE {
            Status::Ok
        } else {
            warn!("rc522: prescaler probe read back {:#04x}, reader not responding", probe);
            Status::Error
        };

        // Timer: TAuto=1, f_timer = 13.56 MHz / (2 * 0xD3E + 1), reload 30
        self.write_register(T_MODE_REG, 0x8D)?;
        self.write_register(T_PRESCALER_REG, PRESCALER_PROBE)?;
        self.write_register(T_RELOAD_REG_L, 30)?;
        self.write_register(T_RELOAD_REG_H, 0)?;
        self.write_register(TX_ASK_REG, 0x40)?; // 100% ASK
        self.write_register(MODE_REG, 0x3D)?;   // CRC preset to 0x6363

        if family == CardFamily::A {
            self.clear_bits(STATUS2_REG, MF_CRYPTO1_ON)?;
            self.write_register(MODE_REG, 0x3D)?;
            self.write_register(RX_SEL_REG, 0x86)?;
            self.write_register(RF_CFG_REG, 0x7F)?; // 48 dB receiver gain
            self.write_register(T_RELOAD_REG_L, 30)?;
            self.write_register(T_RELOAD_REG_H, 0)?;
            self.write_register(T_MODE_REG, 0x8D)?;
            self.write_register(T_PRESCALER_REG, PRESCALER_PROBE)?;
        }

        self.antenna_on()?;

        if log::log_enabled!(log::Level::Debug) {
            let version = self.firmware_version()?;
            debug!("rc522: initialized, firmware version {:#04x}", version);
        }

        Ok(status)
    }

    pub fn soft_reset(&mut self) -> Result<(), RfidError<SPI, CS>> {
        self.write_register(COMMAND_REG, Command::SoftReset.into())
    }

    pub fn firmware_version(&mut self) -> Result<u8, RfidError<SPI, CS>> {
        self.read_register(VERSION_REG)
    }

    /// Enables the TX1/TX2 carrier unless one of the drivers is already on.
    pub fn antenna_on(&mut self) -> Result<(), RfidError<SPI, CS>> {
        let current = self.read_register(TX_CONTROL_REG)?;
        if current & TX_RF_EN == 0 {
            self.set_bits(TX_CONTROL_REG, TX_RF_EN)?;
        }
        Ok(())
    }

    pub fn antenna_off(&mut self) -> Result<(), RfidError<SPI, CS>> {
        self.clear_bits(TX_CONTROL_REG, TX_RF_EN)
    }

    pub fn read_register(&mut self, reg: u8) -> Result<u8, RfidError<SPI, CS>> {
        let buffer = [read_address(reg), 0x00];
        let mut read_buffer = [0u8; 2];
        self.cs
            .frame(&mut self.spi, |spi| spi.transfer(&mut read_buffer, &buffer))?;
        Ok(read_buffer[1])
    }

    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), RfidError<SPI, CS>> {
        let buffer = [write_address(reg), value];
        let mut read_buffer = [0u8; 2];
        self.cs
            .frame(&mut self.spi, |spi| spi.transfer(&mut read_buffer, &buffer))
    }

    /// Read-modify-write; not atomic with respect to the reader's own updates.
    pub fn set_bits(&mut self, reg: u8, mask: u8) -> Result<(), RfidError<SPI, CS>> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value | mask)
    }

    pub fn clear_bits(&mut self, reg: u8, mask: u8) -> Result<(), RfidError<SPI, CS>> {
        let value = self.read_register(reg)?;
        self.write_register(reg, value & !mask)
    }

    /// Runs the CRC coprocessor over `data` and returns `[low, high]`, the
    /// order the bytes are appended to a frame.
    ///
    /// If the coprocessor does not report completion within
    /// [`CRC_MAX_POLLS`] reads, whatever the result registers hold is
    /// returned.
    pub fn calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2], RfidError<SPI, CS>> {
        self.write_register(DIV_IRQ_REG, CRC_IRQ)?; // Clear CRC interrupt
        self.set_bits(FIFO_LEVEL_REG, FLUSH_BUFFER)?;

        for &byte in data {
            self.write_register(FIFO_DATA_REG, byte)?;
        }
        self.write_register(COMMAND_REG, Command::CalcCrc.into())?;

        let mut remaining = CRC_MAX_POLLS;
        let done = loop {
            let irq = self.read_register(DIV_IRQ_REG)?;
            remaining -= 1;
            if irq & CRC_IRQ != 0 {
                break true;
            }
            if remaining == 0 {
                break false;
            }
        };
        if !done {
            warn!("rc522: CRC not done after {} polls, using stale result", CRC_MAX_POLLS);
        }

        let low = self.read_register(CRC_RESULT_REG_L)?;
        let high = self.read_register(CRC_RESULT_REG_M)?;
        Ok([low, high])
    }

    /// Loads `data` into the FIFO, executes `command` and waits for it to
    /// complete, draining the card's answer for `Transceive`.
    ///
    /// Completion is polled every [`TO_CARD_POLL_MS`] for at most
    /// [`TO_CARD_MAX_POLLS`] reads; running out reports `Status::Error`.
    pub fn to_card(
        &mut self,
        command: Command,
        data: &[u8],
    ) -> Result<PiccResponse, RfidError<SPI, CS>> {
        let mut response = PiccResponse::new(Status::Error);

        if data.len() > FIFO_CAPACITY {
            warn!("rc522: {} byte frame does not fit the FIFO", data.len());
            return Ok(response);
        }

        let (irq_en, wait_irq) = command.irq_profile();

        self.write_register(COM_IEN_REG, irq_en | IRQ_INV)?;
        self.clear_bits(COM_IRQ_REG, SET1)?;
        self.set_bits(FIFO_LEVEL_REG, FLUSH_BUFFER)?;
        self.write_register(COMMAND_REG, Command::Idle.into())?;

        for &byte in data {
            self.write_register(FIFO_DATA_REG, byte)?;
        }

        self.write_register(COMMAND_REG, command.into())?;
        if command == Command::Transceive {
            self.set_bits(BIT_FRAMING_REG, START_SEND)?;
        }

        let mut remaining = TO_CARD_MAX_POLLS;
        let irq = loop {
            self.delay.delay_ms(TO_CARD_POLL_MS);
            let irq = self.read_register(COM_IRQ_REG)?;
            remaining -= 1;
            if remaining == 0 || irq & TIMER_IRQ != 0 || irq & wait_irq != 0 {
                break irq;
            }
        };

        self.clear_bits(BIT_FRAMING_REG, START_SEND)?;

        if remaining == 0 {
            warn!("rc522: {:?} did not complete after {} polls", command, TO_CARD_MAX_POLLS);
            return Ok(response);
        }

        let error = self.read_register(ERROR_REG)?;
        if error & ERROR_MASK != 0 {
            debug!("rc522: {:?} failed, ErrorReg {:#04x}", command, error);
            return Ok(response);
        }

        response.status = if irq & irq_en & TIMER_IRQ != 0 {
            Status::NoTag
        } else {
            Status::Ok
        };

        if command == Command::Transceive {
            let fifo_level = self.read_register(FIFO_LEVEL_REG)? & !FLUSH_BUFFER;
            let last_bits = self.read_register(CONTROL_REG)? & RX_LAST_BITS;

            response.bits = if last_bits != 0 {
                u16::from(fifo_level.saturating_sub(1)) * 8 + u16::from(last_bits)
            } else {
                u16::from(fifo_level) * 8
            };

            let to_read = usize::from(fifo_level).clamp(1, MAX_RESPONSE_LEN);
            for _ in 0..to_read {
                let byte = self.read_register(FIFO_DATA_REG)?;
                if response.data.push(byte).is_err() {
                    break;
                }
            }
            trace!("rc522: received {} bits {:02x?}", response.bits, response.data.as_slice());
        }

        Ok(response)
    }

    /// Sends a short-frame request (`PICC_REQIDL` or `PICC_REQALL`).
    ///
    /// `Status::Ok` additionally requires the 16-bit ATQA; any other length
    /// is reported as `Status::Error`.
    pub fn is_card_present(
        &mut self,
        request_mode: u8,
    ) -> Result<PiccResponse, RfidError<SPI, CS>> {
        self.write_register(BIT_FRAMING_REG, SHORT_FRAME_BITS)?;

        let mut response = self.to_card(Command::Transceive, &[request_mode])?;
        if response.status == Status::Ok && response.bits != 16 {
            debug!("rc522: ATQA was {} bits", response.bits);
            response.status = Status::Error;
        }
        Ok(response)
    }

    /// Polls for a card every [`WAIT_PRESENT_POLL_MS`], up to `timeout` times.
    pub fn wait_for_present(&mut self, timeout: u16) -> Result<bool, RfidError<SPI, CS>> {
        let mut remaining = timeout;
        while remaining > 0 {
            self.write_register(BIT_FRAMING_REG, START_SEND | SHORT_FRAME_BITS)?;
            let irq = self.read_register(COM_IRQ_REG)?;
            if irq & IDLE_IRQ != 0 {
                self.write_register(COM_IRQ_REG, !SET1)?; // Clear all IRQ bits
                return Ok(true);
            }
            self.delay.delay_ms(WAIT_PRESENT_POLL_MS);
            remaining -= 1;
        }
        Ok(false)
    }

    /// Polls for card departure every [`WAIT_REMOVED_POLL_MS`], up to
    /// `timeout` times.
    pub fn wait_for_removed(&mut self, timeout: u16) -> Result<bool, RfidError<SPI, CS>> {
        self.write_register(BIT_FRAMING_REG, 0x00)?;

        let mut remaining = timeout;
        while remaining > 0 {
            let irq = self.read_register(COM_IRQ_REG)?;
            if irq & IDLE_IRQ != 0 && irq & ERR_IRQ != 0 {
                return Ok(true);
            }
            self.delay.delay_ms(WAIT_REMOVED_POLL_MS);
            remaining -= 1;
        }
        Ok(false)
    }

    /// Cascade level 1 anticollision: reads the 4 UID bytes and their BCC.
    ///
    /// A UID is only returned with `Status::Ok`. A BCC mismatch or short
    /// answer is `Status::Error`; start again from presence detection.
    pub fn read_uid(&mut self) -> Result<(Status, Option<Uid>), RfidError<SPI, CS>> {
        self.write_register(BIT_FRAMING_REG, 0x00)?;

        let response = self.to_card(Command::Transceive, &[PICC_ANTICOLL, NVB_ANTICOLL])?;
        if response.status != Status::Ok {
            return Ok((response.status, None));
        }

        let uid = match response.data.get(..5) {
            Some(&[b0, b1, b2, b3, bcc]) => Uid::new([b0, b1, b2, b3], bcc),
            _ => {
                debug!("rc522: anticollision answer too short ({} bytes)", response.data.len());
                return Ok((Status::Error, None));
            }
        };

        if !uid.is_valid() {
            warn!("rc522: UID {:?} failed BCC check ({:#04x})", uid, uid.bcc());
            return Ok((Status::Error, None));
        }

        Ok((Status::Ok, Some(uid)))
    }

    /// Selects the card with `uid` and returns its SAK, or 0 when the
    /// select did not get a 24-bit answer.
    pub fn select_card(&mut self, uid: &Uid) -> Result<u8, RfidError<SPI, CS>> {
        let mut buffer = [0u8; 9];
        buffer[0] = PICC_SELECT_TAG;
        buffer[1] = NVB_SELECT;
        buffer[2..7].copy_from_slice(&uid.to_frame());
        let crc = self.calculate_crc(&buffer[..7])?;
        buffer[7..].copy_from_slice(&crc);

        let response = self.to_card(Command::Transceive, &buffer)?;
        if response.status == Status::Ok && response.bits == 24 {
            if let Some(&sak) = response.data.first() {
                return Ok(sak);
            }
        }

        debug!("rc522: select got {:?} with {} bits", response.status, response.bits);
        Ok(0)
    }

    /// Sends HLTA. The card does not answer a successful halt, so the
    /// exchange outcome is ignored.
    pub fn halt(&mut self) -> Result<(), RfidError<SPI, CS>> {
        let mut buffer = [PICC_HALT, 0x00, 0x00, 0x00];
        let crc = self.calculate_crc(&buffer[..2])?;
        buffer[2..].copy_from_slice(&crc);

        let _ = self.to_card(Command::Transceive, &buffer)?;
        Ok(())
    }
}
