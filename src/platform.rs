// faultchain/src/platform.rs

//! # Board Support
//!
//! Memory map and low-level machine control for the lab board. The
//! hardware-touching pieces only exist on RISC-V targets; on the host
//! they degrade to no-ops so the rest of the library stays testable.

use crate::fault::{FaultIndicator, InterruptGate};

/// Core clock frequency feeding the peripheral dividers.
pub const CLOCK_HZ: u32 = 50_000_000;

/// NS16550A-compatible UART register file.
pub const UART0_BASE: usize = 0x1000_0000;

/// Two-wire bus master register file.
pub const I2C0_BASE: usize = 0x1001_0000;

/// Status LED latch; bit 0 drives the red channel.
pub const LED_BASE: usize = 0x1002_0000;

const LED_RED: u32 = 1 << 0;

/// Runs `f` with machine interrupts masked.
///
/// Used around every main-path access to state that an interrupt
/// handler also touches (the UART receive queue), so the handler can
/// never spin on a lock the interrupted code is holding.
#[inline]
pub fn with_interrupts_masked<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
    {
        riscv::interrupt::free(f)
    }
    #[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
    {
        f()
    }
}

/// Stops making progress forever. Only an external reset ends this.
#[inline]
pub fn halt() -> ! {
    loop {
        #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
        riscv::asm::wfi();
        #[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
        core::hint::spin_loop();
    }
}

/// Machine-level interrupt gate for the fault runtime.
pub struct MachineInterrupts;

impl InterruptGate for MachineInterrupts {
    fn disable(&self) {
        #[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
        riscv::interrupt::disable();
    }
}

/// The board's interrupt gate instance.
pub static MACHINE_INTERRUPTS: MachineInterrupts = MachineInterrupts;

/// The board's status LED as a fault indicator. Tripping the terminal
/// handler latches the red channel; nothing ever clears it.
pub struct StatusLed;

impl FaultIndicator for StatusLed {
    fn set_fault(&self) {
        // Red on, green and blue off.
        unsafe { core::ptr::write_volatile(LED_BASE as *mut u32, LED_RED) }
    }
}

/// The board's status LED instance.
pub static STATUS_LED: StatusLed = StatusLed;
