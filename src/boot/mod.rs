//! Boot decision and the final transfer into the application.
//!
//! Two states and one transition: the device starts in bootloader state, and
//! if (and only if) an installed image passes the validity gate it moves to
//! application state. That transition is terminal. Control never comes back
//! to the bootloader in-process.

#[cfg(feature = "cortex_m")]
pub mod cortex_m;

use embedded_hal::digital::OutputPin;

use crate::MemoryMap;

/// Volatile word reads at absolute device addresses.
///
/// The words under the memory map can change through effects outside the
/// compiler's aliasing model (a just-finished flash program, a debugger), so
/// implementations must perform every read fresh, never from a cached value.
pub trait Memory {
    fn read_word(&self, address: u32) -> u32;
}

/// Reads device memory through raw pointers.
///
/// The one place in the crate where an address becomes a data pointer;
/// everything above it operates on plain values.
pub struct DirectMemory {
    _private: (),
}

impl DirectMemory {
    /// # Safety
    ///
    /// Every address this instance will be asked to read must be mapped,
    /// readable and 4-byte aligned on this device. In practice that means
    /// the words under the injected [`MemoryMap`].
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Memory for DirectMemory {
    fn read_word(&self, address: u32) -> u32 {
        // SAFETY: validity of the address is the constructor's contract.
        unsafe { core::ptr::read_volatile(address as *const u32) }
    }
}

/// Jump mechanism that at the least transfers control to an application
/// image, given the address of its vector table.
///
/// Implementations may additionally drop privileges or reconfigure memory
/// protection before the jump.
pub trait Boot {
    /// Hand the processor to the image whose vector table starts at `addr`.
    ///
    /// Never returns; there is no defined recovery if the application's
    /// reset handler misbehaves, short of an external reset.
    ///
    /// # Safety
    ///
    /// `addr` must point at a valid vector table: word 0 a usable initial
    /// stack pointer, word 1 the entry point of code that is actually
    /// present. Jumping anywhere else bricks the device until it is
    /// reflashed externally.
    unsafe fn boot(addr: *const u32) -> !;
}

/// Decides on every boot whether to hand the processor to the application.
pub struct BootControl<M: Memory> {
    map: MemoryMap,
    memory: M,
}

impl<M: Memory> BootControl<M> {
    pub const fn new(map: MemoryMap, memory: M) -> Self {
        Self { map, memory }
    }

    /// Whether a complete, verified application is installed.
    ///
    /// True iff the stack-pointer word at the image base lies inside the
    /// device's SRAM bounds and the flag word holds the valid sentinel. Both
    /// must hold; either alone proves nothing. No side effects.
    pub fn is_application_valid(&self) -> bool {
        let stack_pointer = self.memory.read_word(self.map.app_start);
        let flag = self.memory.read_word(self.map.app_flag);

        stack_pointer >= self.map.sram_start
            && stack_pointer <= self.map.sram_end
            && flag == self.map.app_valid_flag
    }

    /// Hand the processor to the application. Never returns.
    ///
    /// Clears the bootloader-active indicator pin so external observers see
    /// the handoff, then jumps through the application's vector table. Does
    /// not re-validate.
    ///
    /// # Safety
    ///
    /// The caller must have seen [`is_application_valid`](Self::is_application_valid)
    /// return true for the current flash contents.
    pub unsafe fn transfer_to_application<B: Boot>(self, indicator: &mut impl OutputPin) -> ! {
        // The indicator is observability, not a gate: a failing pin driver
        // must not veto the jump.
        indicator.set_low().ok();

        unsafe { B::boot(self.map.app_start as *const u32) }
    }

    /// Boot the application if one is installed and verified.
    ///
    /// Diverges into the application when the validity gate passes.
    /// Otherwise hands the unit back: the device stays in bootloader state
    /// and the caller runs its update flow.
    pub fn launch<B: Boot>(self, indicator: &mut impl OutputPin) -> Self {
        if self.is_application_valid() {
            // SAFETY: validity was checked on this very unit, and nothing
            // between the check and the jump writes flash.
            unsafe { self.transfer_to_application::<B>(indicator) }
        } else {
            self
        }
    }
}
