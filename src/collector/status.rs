// src/collector/status.rs
//! Acceptance checks for a smartctl reading.
//!
//! smartctl reports its exit status as a bitmask. Bits 0 and 1 mean the
//! reading itself is unusable; bits 2 through 7 describe the health of the
//! disk and only warrant a warning. Independently, any embedded message with
//! severity `error` rejects the reading.

use crate::collector::json::{Message, Reading};
use crate::error::Rejection;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Advisory,
}

/// Meaning of one exit status bit.
#[derive(Debug, Clone, Copy)]
pub struct StatusBit {
    pub bit: u8,
    pub severity: Severity,
    pub message: &'static str,
}

pub const STATUS_BITS: [StatusBit; 8] = [
    StatusBit {
        bit: 0,
        severity: Severity::Fatal,
        message: "Command line did not parse.",
    },
    StatusBit {
        bit: 1,
        severity: Severity::Fatal,
        message: "Device open failed, device did not return an IDENTIFY DEVICE structure, or device is in a low-power mode",
    },
    StatusBit {
        bit: 2,
        severity: Severity::Advisory,
        message: "Some SMART or other ATA command to the disk failed, or there was a checksum error in a SMART data structure",
    },
    StatusBit {
        bit: 3,
        severity: Severity::Advisory,
        message: "SMART status check returned 'DISK FAILING'.",
    },
    StatusBit {
        bit: 4,
        severity: Severity::Advisory,
        message: "We found prefail Attributes <= threshold.",
    },
    StatusBit {
        bit: 5,
        severity: Severity::Advisory,
        message: "SMART status check returned 'DISK OK' but we found that some (usage or prefail) Attributes have been <= threshold at some time in the past.",
    },
    StatusBit {
        bit: 6,
        severity: Severity::Advisory,
        message: "The device error log contains records of errors.",
    },
    StatusBit {
        bit: 7,
        severity: Severity::Advisory,
        message: "The device self-test log contains records of errors. [ATA only] Failed self-tests outdated by a newer successful extended self-test are ignored.",
    },
];

impl StatusBit {
    pub fn is_set(&self, status: i64) -> bool {
        status & (1 << self.bit) != 0
    }
}

/// Function to judge the exit status bitmask, logging every set bit.
pub fn check_exit_status(device: &str, status: i64) -> Result<(), Rejection> {
    if status <= 0 {
        return Ok(());
    }

    let mut fatal = Vec::new();
    for entry in STATUS_BITS.iter().filter(|b| b.is_set(status)) {
        match entry.severity {
            Severity::Fatal => {
                error!(device, bit = entry.bit, "{}", entry.message);
                fatal.push(entry.bit);
            }
            Severity::Advisory => warn!(device, bit = entry.bit, "{}", entry.message),
        }
    }

    if fatal.is_empty() {
        Ok(())
    } else {
        Err(Rejection::FatalExitStatus { status, bits: fatal })
    }
}

/// Function to reject a reading carrying an `error` severity message.
///
/// Stops at the first such message.
pub fn check_messages(device: &str, reading: &Reading) -> Result<(), Rejection> {
    match reading.messages().find(|m: &Message<'_>| m.severity == "error") {
        Some(message) => {
            error!(device, "{}", message.text);
            Err(Rejection::ErrorMessage(message.text.to_string()))
        }
        None => Ok(()),
    }
}

/// Function to run both checks; the bitmask verdict wins when both fail.
pub fn validate(device: &str, reading: &Reading) -> Result<(), Rejection> {
    let exit_status = check_exit_status(device, reading.exit_status());
    let messages = check_messages(device, reading);
    exit_status.and(messages)
}
