use crate::boot::Boot;

/// Simple bootload mechanism for Cortex-M without support for TrustZone.
///
/// Repoints VTOR at the application's vector table before the jump, so that
/// any exception taken once the application enables interrupts dispatches
/// through the application's own handlers, then lets `bootload` reload the
/// main stack pointer from word 0 and jump to the reset handler in word 1.
pub struct SimpleCortexM;

impl Boot for SimpleCortexM {
    unsafe fn boot(addr: *const u32) -> ! {
        unsafe {
            (*cortex_m::peripheral::SCB::PTR).vtor.write(addr as u32);
            cortex_m::asm::dsb();
            cortex_m::asm::isb();

            cortex_m::asm::bootload(addr)
        }
    }
}
