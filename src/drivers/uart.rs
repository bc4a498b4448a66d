// faultchain/src/drivers/uart.rs

//! # Serial Transport
//!
//! Driver for the board's NS16550A-compatible UART. Transmission
//! busy-waits on the holding register; reception is interrupt-driven
//! into a fixed-capacity queue.
//!
//! The receive hook runs in interrupt context and therefore never
//! raises: when the queue is full the byte is dropped and counted.
//! Every main-path access to the driver object masks interrupts first,
//! so the hook can never preempt a holder of the lock.

use crate::collections::Fifo;
use crate::fault::{Condition, FaultResult};
use crate::platform;
use crate::raise;
use core::ptr;
use spin::Mutex;

/// Receive queue depth.
const RX_BUFFER_SIZE: usize = 64;

const LCR_EIGHT_BITS: u8 = 3 << 0;
const LCR_STOP_TWO: u8 = 1 << 2;
const LCR_PARITY_ENABLE: u8 = 1 << 3;
const LCR_PARITY_EVEN: u8 = 1 << 4;
const LCR_BAUD_LATCH: u8 = 1 << 7;
const IER_RX_ENABLE: u8 = 1 << 0;
const FCR_FIFO_ENABLE: u8 = 1 << 0;
const FCR_FIFO_CLEAR: u8 = 3 << 1;
const LSR_RX_READY: u8 = 1 << 0;
const LSR_TX_IDLE: u8 = 1 << 5;

/// UART driver object.
pub static UART0: Mutex<Uart> = Mutex::new(Uart::new(platform::UART0_BASE));

/// Parity setting for the serial frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits in the serial frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

enum Register {
    Rbr,
    Thr,
    Dll,
    Ier,
    Dlm,
    Fcr,
    Lcr,
    Lsr,
}

impl Register {
    fn addr(self, base_address: usize) -> *mut u8 {
        match self {
            Self::Rbr | Self::Thr | Self::Dll => base_address as *mut u8,
            Self::Ier | Self::Dlm => (base_address + 1) as *mut u8,
            Self::Fcr => (base_address + 2) as *mut u8,
            Self::Lcr => (base_address + 3) as *mut u8,
            Self::Lsr => (base_address + 5) as *mut u8,
        }
    }
}

pub struct Uart {
    base_address: usize,
    rx_buf: Fifo<u8, RX_BUFFER_SIZE>,
    rx_overruns: u32,
}

impl Uart {
    pub const fn new(base_address: usize) -> Self {
        Self {
            base_address,
            rx_buf: Fifo::new(),
            rx_overruns: 0,
        }
    }

    /// Programs the divisor latch, framing, and FIFOs, and enables the
    /// receive interrupt.
    pub fn init(&mut self, baud: u32, parity: Parity, stop_bits: StopBits) -> FaultResult<()> {
        let divisor = divisor_for(platform::CLOCK_HZ, baud)?;

        // Quiesce interrupts while reprogramming.
        self.write(Register::Ier, 0x00);

        // Special mode to set the baud rate.
        self.write(Register::Lcr, LCR_BAUD_LATCH);
        self.write(Register::Dll, (divisor & 0xFF) as u8);
        self.write(Register::Dlm, (divisor >> 8) as u8);

        // Leave set-baud mode and configure the frame.
        let mut lcr = LCR_EIGHT_BITS;
        if let StopBits::Two = stop_bits {
            lcr |= LCR_STOP_TWO;
        }
        match parity {
            Parity::None => {}
            Parity::Odd => lcr |= LCR_PARITY_ENABLE,
            Parity::Even => lcr |= LCR_PARITY_ENABLE | LCR_PARITY_EVEN,
        }
        self.write(Register::Lcr, lcr);

        // Reset and enable FIFOs.
        self.write(Register::Fcr, FCR_FIFO_ENABLE | FCR_FIFO_CLEAR);

        // Enable the receive interrupt.
        self.write(Register::Ier, IER_RX_ENABLE);
        Ok(())
    }

    /// Sends one byte, busy-waiting until the holding register is free.
    pub fn send_byte(&mut self, data: u8) {
        while self.read(Register::Lsr) & LSR_TX_IDLE == 0 {}
        self.write(Register::Thr, data);
    }

    pub fn send_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.send_byte(byte);
        }
    }

    pub fn available(&self) -> bool {
        !self.rx_buf.is_empty()
    }

    /// Bytes dropped because the receive queue was full.
    pub fn rx_overruns(&self) -> u32 {
        self.rx_overruns
    }

    /// Drains the receiver into the queue. Interrupt context only; a
    /// full queue drops the byte, it never raises.
    pub fn handle_rx_interrupt(&mut self) {
        while self.read(Register::Lsr) & LSR_RX_READY != 0 {
            let data = self.read(Register::Rbr);
            if self.rx_buf.try_push(data).is_err() {
                self.rx_overruns = self.rx_overruns.wrapping_add(1);
            }
        }
    }

    fn read(&self, reg: Register) -> u8 {
        unsafe { ptr::read_volatile(reg.addr(self.base_address)) }
    }

    fn write(&mut self, reg: Register, val: u8) {
        unsafe { ptr::write_volatile(reg.addr(self.base_address), val) }
    }
}

/// Divisor latch value for the requested baud rate, rounded to the
/// nearest achievable rate.
fn divisor_for(clock: u32, baud: u32) -> FaultResult<u16> {
    if baud == 0 {
        raise!(
            Condition::BitrateTooLow,
            "uart: baud rate below the divisor range"
        );
    }
    let divisor = (clock as u64 + 8 * baud as u64) / (16 * baud as u64);
    if divisor > u16::MAX as u64 {
        raise!(
            Condition::BitrateTooLow,
            "uart: baud rate below the divisor range"
        );
    }
    if divisor == 0 {
        raise!(
            Condition::OutOfRange,
            "uart: baud rate above the clock range"
        );
    }
    Ok(divisor as u16)
}

fn with_uart<R>(f: impl FnOnce(&mut Uart) -> R) -> R {
    platform::with_interrupts_masked(|| f(&mut UART0.lock()))
}

/// Initializes the board UART.
pub fn init(baud: u32, parity: Parity, stop_bits: StopBits) -> FaultResult<()> {
    with_uart(|uart| uart.init(baud, parity, stop_bits))
}

/// Sends one byte over the board UART.
pub fn send_byte(data: u8) {
    with_uart(|uart| uart.send_byte(data));
}

/// Sends a string over the board UART.
pub fn send_str(s: &str) {
    with_uart(|uart| uart.send_str(s));
}

/// Whether a received byte is waiting.
pub fn available() -> bool {
    with_uart(|uart| uart.available())
}

/// Blocks until a byte arrives and returns it.
pub fn read_byte() -> u8 {
    loop {
        if let Some(data) = with_uart(|uart| uart.rx_buf.pop()) {
            return data;
        }
        core::hint::spin_loop();
    }
}

/// Receive-interrupt entry point; the platform's interrupt dispatcher
/// calls this for the UART interrupt. Must not raise (and does not).
pub fn handle_rx_interrupt() {
    UART0.lock().handle_rx_interrupt();
}
