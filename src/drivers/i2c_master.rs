// faultchain/src/drivers/i2c_master.rs

//! # Two-Wire Bus Master
//!
//! Driver for the board's two-wire (I2C) master core: an 8-bit
//! register file with a clock prescaler, a transmit/receive register,
//! and a command/status pair. Transfers are polled; every acknowledge
//! and arbitration check funnels through one status chokepoint that
//! raises [`Condition::BusTransmission`] on failure.

use crate::fault::{Condition, FaultResult};
use crate::platform;
use crate::raise;
use core::ptr;
use spin::Mutex;

const CTR_ENABLE: u8 = 1 << 7;
const CR_START: u8 = 1 << 7;
const CR_STOP: u8 = 1 << 6;
const CR_READ: u8 = 1 << 5;
const CR_WRITE: u8 = 1 << 4;
const CR_SEND_NACK: u8 = 1 << 3;
const SR_RX_NACK: u8 = 1 << 7;
const SR_ARB_LOST: u8 = 1 << 5;
const SR_TRANSFER_IN_PROGRESS: u8 = 1 << 1;

/// Bus master driver object.
pub static I2C0: Mutex<I2cMaster> = Mutex::new(I2cMaster::new(platform::I2C0_BASE));

/// Direction of an addressed frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// Acknowledge behavior after a byte is read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AckMode {
    /// Acknowledge; the slave keeps sending.
    Ack,
    /// Do not acknowledge; the slave stops after this byte.
    Nack,
}

enum Register {
    PrescaleLo,
    PrescaleHi,
    Control,
    Transmit,
    Receive,
    Command,
    Status,
}

impl Register {
    fn addr(self, base_address: usize) -> *mut u8 {
        match self {
            Self::PrescaleLo => base_address as *mut u8,
            Self::PrescaleHi => (base_address + 1) as *mut u8,
            Self::Control => (base_address + 2) as *mut u8,
            Self::Transmit | Self::Receive => (base_address + 3) as *mut u8,
            Self::Command | Self::Status => (base_address + 4) as *mut u8,
        }
    }
}

pub struct I2cMaster {
    base_address: usize,
}

impl I2cMaster {
    pub const fn new(base_address: usize) -> Self {
        Self { base_address }
    }

    /// Programs the clock prescaler for the requested bus bitrate.
    pub fn set_bitrate(&mut self, bitrate: u32) -> FaultResult<()> {
        let prescale = prescale_for(platform::CLOCK_HZ, bitrate)?;
        self.write(Register::PrescaleLo, (prescale & 0xFF) as u8);
        self.write(Register::PrescaleHi, (prescale >> 8) as u8);
        Ok(())
    }

    /// Enables the master core.
    pub fn enable(&mut self) {
        self.write(Register::Control, CTR_ENABLE);
    }

    /// Disables the master core.
    pub fn disable(&mut self) {
        self.write(Register::Control, 0x00);
    }

    /// Generates a START condition and sends the address byte with the
    /// transfer direction.
    pub fn start_frame(&mut self, address: u8, direction: Direction) -> FaultResult<()> {
        self.write(Register::Transmit, (address << 1) | direction as u8);
        self.write(Register::Command, CR_START | CR_WRITE);
        self.wait_transfer();

        let status = self.check_status()?;
        if status & SR_RX_NACK != 0 {
            raise!(
                Condition::BusTransmission,
                "i2c: address byte not acknowledged"
            );
        }
        Ok(())
    }

    /// Sends one data byte inside an open frame.
    pub fn send_byte(&mut self, data: u8) -> FaultResult<()> {
        self.write(Register::Transmit, data);
        self.write(Register::Command, CR_WRITE);
        self.wait_transfer();

        let status = self.check_status()?;
        if status & SR_RX_NACK != 0 {
            raise!(
                Condition::BusTransmission,
                "i2c: data byte not acknowledged"
            );
        }
        Ok(())
    }

    /// Receives one data byte inside an open frame, acknowledging per
    /// `ack`.
    pub fn read_byte(&mut self, ack: AckMode) -> FaultResult<u8> {
        let mut command = CR_READ;
        if let AckMode::Nack = ack {
            command |= CR_SEND_NACK;
        }
        self.write(Register::Command, command);
        self.wait_transfer();

        self.check_status()?;
        Ok(self.read(Register::Receive))
    }

    /// Generates a STOP condition, releasing the bus.
    pub fn end_frame(&mut self) {
        self.write(Register::Command, CR_STOP);
    }

    fn wait_transfer(&self) {
        while self.read(Register::Status) & SR_TRANSFER_IN_PROGRESS != 0 {}
    }

    /// Status chokepoint: raises on bus-level failure, otherwise hands
    /// the raw status back for acknowledge checks.
    fn check_status(&self) -> FaultResult<u8> {
        let status = self.read(Register::Status);
        if status & SR_ARB_LOST != 0 {
            raise!(Condition::BusTransmission, "i2c: arbitration lost");
        }
        Ok(status)
    }

    fn read(&self, reg: Register) -> u8 {
        unsafe { ptr::read_volatile(reg.addr(self.base_address)) }
    }

    fn write(&mut self, reg: Register, val: u8) {
        unsafe { ptr::write_volatile(reg.addr(self.base_address), val) }
    }
}

/// Prescale value for the requested bus bitrate.
///
/// The core divides the system clock by `5 * bitrate`; a bitrate whose
/// prescale value does not fit the 16-bit register cannot be reached.
fn prescale_for(clock: u32, bitrate: u32) -> FaultResult<u16> {
    if bitrate == 0 {
        raise!(
            Condition::BitrateTooLow,
            "i2c: bitrate below the prescaler range"
        );
    }
    let prescale = clock as u64 / (5 * bitrate as u64);
    let prescale = prescale.saturating_sub(1);
    if prescale > u16::MAX as u64 {
        raise!(
            Condition::BitrateTooLow,
            "i2c: bitrate below the prescaler range"
        );
    }
    Ok(prescale as u16)
}

#[cfg(test)]
mod tests {
    use super::prescale_for;
    use crate::fault::Condition;

    #[test]
    fn prescale_matches_the_standard_rates() {
        // 50 MHz / (5 * 100 kHz) - 1 = 99
        assert_eq!(prescale_for(50_000_000, 100_000).unwrap(), 99);
        // 50 MHz / (5 * 10 kHz) - 1 = 999
        assert_eq!(prescale_for(50_000_000, 10_000).unwrap(), 999);
    }

    #[test]
    fn bitrate_below_prescaler_range_raises() {
        let record = prescale_for(50_000_000, 100).unwrap_err().into_record();
        assert_eq!(record.condition, Condition::BitrateTooLow);
        assert_eq!(record.message, Some("i2c: bitrate below the prescaler range"));
    }

    #[test]
    fn zero_bitrate_raises() {
        let record = prescale_for(50_000_000, 0).unwrap_err().into_record();
        assert_eq!(record.condition, Condition::BitrateTooLow);
    }
}
