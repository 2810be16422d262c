//! Register-level MFRC522 model with one simulated card in its field.
//!
//! Only the behaviour the driver relies on is modelled: FIFO, IRQ
//! set/clear semantics, CalcCRC, and Transceive started by StartSend.
//! Delays are accumulated rather than slept.

use core::cell::{Cell, RefCell, RefMut};
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::commands::*;
use crate::registers::*;
use crate::rfid_rc522::{RfidRc522, FIFO_CAPACITY};
use crate::uid::checksum;

/// ISO/IEC 14443-3 CRC_A, returned low byte first.
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0x6363;
    for &byte in data {
        let mut ch = byte ^ (crc as u8);
        ch ^= ch << 4;
        let ch = u16::from(ch);
        crc = (crc >> 8) ^ (ch << 8) ^ (ch << 3) ^ (ch >> 4);
    }
    crc.to_le_bytes()
}

/// What the card does with one frame.
#[derive(Clone, Debug)]
pub enum Reply {
    Silent,
    /// Answer bytes and the number of valid bits in the last one (0 = all).
    Bits(Vec<u8>, u8),
    /// Answer garbled; the value lands in ErrorReg.
    Fault(u8),
}

pub struct Card {
    pub atqa: Reply,
    pub uid: [u8; 4],
    pub bcc: u8,
    pub sak: u8,
    pub select_reply: Option<Reply>,
}

impl Card {
    pub fn new(uid: [u8; 4], sak: u8) -> Self {
        Card {
            atqa: Reply::Bits(vec![0x04, 0x00], 0),
            uid,
            bcc: checksum(&uid),
            sak,
            select_reply: None,
        }
    }

    fn respond(&self, frame: &[u8], tx_last_bits: u8) -> Reply {
        match frame {
            [PICC_REQIDL] | [PICC_REQALL] if tx_last_bits == SHORT_FRAME_BITS => self.atqa.clone(),
            [PICC_ANTICOLL, NVB_ANTICOLL] => {
                let [b0, b1, b2, b3] = self.uid;
                Reply::Bits(vec![b0, b1, b2, b3, self.bcc], 0)
            }
            [PICC_SELECT_TAG, NVB_SELECT, rest @ ..] if rest.len() == 7 => {
                if crc_a(&frame[..7]) != [frame[7], frame[8]] || rest[..4] != self.uid {
                    return Reply::Silent;
                }
                if let Some(reply) = &self.select_reply {
                    return reply.clone();
                }
                let [lo, hi] = crc_a(&[self.sak]);
                Reply::Bits(vec![self.sak, lo, hi], 0)
            }
            _ => Reply::Silent,
        }
    }
}

pub struct Chip {
    pub regs: [u8; 64],
    pub fifo: VecDeque<u8>,
    pub card: Option<Card>,
    /// When false no command ever completes.
    pub responsive: bool,
    /// When true CalcCRC never finishes.
    pub crc_stuck: bool,
    /// When true the chip does not answer the bus at all.
    pub dead: bool,
    /// ComIrqReg values served ahead of the live register.
    pub irq_script: VecDeque<u8>,
    pub cs_low: bool,
    pub framing_violations: usize,
    pub writes: Vec<(u8, u8)>,
    pub reads: Vec<u8>,
    /// Frames transmitted to the card, with their TxLastBits.
    pub frames: Vec<Vec<u8>>,
    pub tx_last_bits: Vec<u8>,
}

impl Chip {
    fn new(card: Option<Card>) -> Self {
        let mut chip = Chip {
            regs: [0; 64],
            fifo: VecDeque::new(),
            card,
            responsive: true,
            crc_stuck: false,
            dead: false,
            irq_script: VecDeque::new(),
            cs_low: false,
            framing_violations: 0,
            writes: Vec::new(),
            reads: Vec::new(),
            frames: Vec::new(),
            tx_last_bits: Vec::new(),
        };
        chip.reset();
        chip
    }

    fn reset(&mut self) {
        self.regs = [0; 64];
        self.regs[TX_CONTROL_REG as usize] = 0x80;
        self.regs[VERSION_REG as usize] = 0x92;
        self.fifo.clear();
    }

    pub fn reads_of(&self, reg: u8) -> usize {
        self.reads.iter().filter(|&&r| r == reg).count()
    }

    fn read(&mut self, reg: u8) -> u8 {
        if self.dead {
            return 0x00;
        }
        self.reads.push(reg);
        match reg {
            COM_IRQ_REG => self.irq_script.pop_front().unwrap_or(self.regs[reg as usize]),
            FIFO_DATA_REG => self.fifo.pop_front().unwrap_or(0),
            FIFO_LEVEL_REG => self.fifo.len() as u8,
            _ => self.regs[reg as usize],
        }
    }

    fn write(&mut self, reg: u8, value: u8) {
        if self.dead {
            return;
        }
        self.writes.push((reg, value));
        match reg {
            COMMAND_REG => self.command(value & 0x0F),
            COM_IRQ_REG | DIV_IRQ_REG => {
                // Bit 7 selects set (1) or clear (0) of the marked bits
                if value & 0x80 != 0 {
                    self.regs[reg as usize] |= value & 0x7F;
                } else {
                    self.regs[reg as usize] &= !(value & 0x7F);
                }
            }
            FIFO_LEVEL_REG => {
                if value & FLUSH_BUFFER != 0 {
                    self.fifo.clear();
                }
            }
            FIFO_DATA_REG => {
                if self.fifo.len() < FIFO_CAPACITY {
                    self.fifo.push_back(value);
                }
            }
            BIT_FRAMING_REG => {
                self.regs[reg as usize] = value;
                if value & START_SEND != 0 && self.regs[COMMAND_REG as usize] == Command::Transceive as u8 {
                    self.transceive(value & 0x07);
                }
            }
            _ => self.regs[reg as usize] = value,
        }
    }

    fn command(&mut self, opcode: u8) {
        self.regs[COMMAND_REG as usize] = opcode;
        if opcode == Command::SoftReset as u8 {
            self.reset();
        } else if opcode == Command::CalcCrc as u8 && !self.crc_stuck {
            let data: Vec<u8> = self.fifo.drain(..).collect();
            let [lo, hi] = crc_a(&data);
            self.regs[CRC_RESULT_REG_L as usize] = lo;
            self.regs[CRC_RESULT_REG_M as usize] = hi;
            self.regs[DIV_IRQ_REG as usize] |= CRC_IRQ;
        }
    }

    fn transceive(&mut self, tx_last_bits: u8) {
        let frame: Vec<u8> = self.fifo.drain(..).collect();
        self.frames.push(frame.clone());
        self.tx_last_bits.push(tx_last_bits);
        self.regs[ERROR_REG as usize] = 0;

        if !self.responsive {
            return;
        }

        let reply = match &self.card {
            Some(card) => card.respond(&frame, tx_last_bits),
            None => Reply::Silent,
        };

        let irq = &mut self.regs[COM_IRQ_REG as usize];
        match reply {
            Reply::Silent => *irq |= TX_IRQ | TIMER_IRQ,
            Reply::Bits(data, last_bits) => {
                *irq |= TX_IRQ | RX_IRQ | IDLE_IRQ;
                self.fifo.extend(data.into_iter().take(FIFO_CAPACITY));
                let control = &mut self.regs[CONTROL_REG as usize];
                *control = (*control & !RX_LAST_BITS) | (last_bits & RX_LAST_BITS);
            }
            Reply::Fault(error) => {
                *irq |= TX_IRQ | RX_IRQ | IDLE_IRQ | ERR_IRQ;
                self.regs[ERROR_REG as usize] = error;
            }
        }
    }

    fn exchange(&mut self, read: &mut [u8], write: &[u8]) {
        if !self.cs_low {
            self.framing_violations += 1;
        }
        let Some((&address, payload)) = write.split_first() else {
            return;
        };
        let reg = (address >> 1) & MAX_REGISTER;
        if address & 0x80 != 0 {
            for slot in read.iter_mut().skip(1) {
                *slot = self.read(reg);
            }
        } else {
            for &value in payload {
                self.write(reg, value);
            }
        }
    }
}

pub struct SimSpi {
    chip: Rc<RefCell<Chip>>,
}

impl spi::ErrorType for SimSpi {
    type Error = Infallible;
}

impl SpiBus<u8> for SimSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut sink = vec![0u8; words.len()];
        self.chip.borrow_mut().exchange(&mut sink, words);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.chip.borrow_mut().exchange(read, write);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let write = words.to_vec();
        self.chip.borrow_mut().exchange(words, &write);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct SimCs {
    chip: Rc<RefCell<Chip>>,
}

impl digital::ErrorType for SimCs {
    type Error = Infallible;
}

impl OutputPin for SimCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.chip.borrow_mut().cs_low = true;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.chip.borrow_mut().cs_low = false;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct SimDelay {
    elapsed_ns: Rc<Cell<u64>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ms) * 1_000_000);
    }
}

pub struct Sim {
    chip: Rc<RefCell<Chip>>,
    delay: SimDelay,
}

impl Sim {
    /// A reader with no card in range.
    pub fn new() -> Self {
        Sim {
            chip: Rc::new(RefCell::new(Chip::new(None))),
            delay: SimDelay::default(),
        }
    }

    pub fn with_card(card: Card) -> Self {
        let sim = Sim::new();
        sim.chip().card = Some(card);
        sim
    }

    pub fn chip(&self) -> RefMut<'_, Chip> {
        self.chip.borrow_mut()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.delay.elapsed_ns.get() / 1_000_000
    }

    pub fn driver(&self) -> RfidRc522<SimSpi, SimCs, SimDelay> {
        RfidRc522::new(
            SimSpi { chip: Rc::clone(&self.chip) },
            SimCs { chip: Rc::clone(&self.chip) },
            self.delay.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_a_reference_values() {
        assert_eq!(crc_a(&[0x00, 0x00]), [0xA0, 0x1E]);
        assert_eq!(crc_a(&[0x12, 0x34]), [0x26, 0xCF]);
        assert_eq!(crc_a(&[PICC_HALT, 0x00]), [0x57, 0xCD]);
    }
}
