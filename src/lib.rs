#![cfg_attr(not(test), no_std)]
// src/lib.rs
pub mod registers;
pub mod commands;
pub mod errors;
pub mod uid;
pub mod card_types;
pub mod rfid_rc522;
pub mod cs_pin_wrapper;

#[cfg(test)]
mod sim;

pub use card_types::{classify, CardType};
pub use errors::{Error, Status};
pub use rfid_rc522::{CardFamily, PiccResponse, RfidRc522};
pub use uid::Uid;
