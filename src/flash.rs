//! Erase of the application's flash region, as one lock-guarded operation.

use crate::{Error, SectorRange};

/// Voltage/timing profile the flash controller must use for an erase.
///
/// Matches the parallelism classes of STM32-style controllers; which one is
/// correct depends on the board's supply voltage and is the integrator's
/// call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageProfile {
    /// 1.8 V to 2.1 V.
    Range1,
    /// 2.1 V to 2.7 V.
    Range2,
    /// 2.7 V to 3.6 V.
    Range3,
    /// 2.7 V to 3.6 V with external Vpp.
    Range4,
}

/// The vendor flash controller, bound to the real driver only at the
/// outermost edge of the system.
///
/// The controller powers up write-protected. [`unlock`](Self::unlock) lifts
/// the protection, [`lock`](Self::lock) restores it; the single controller
/// is a mutual-exclusion region, so nothing else may touch flash between the
/// two. In single-threaded boot code program order enforces that on its own.
pub trait FlashController {
    /// Lift the controller's write protection.
    fn unlock(&mut self);

    /// Erase a run of sectors at the given profile.
    ///
    /// Must stop at the first failing sector and report it; must not hang
    /// past the hardware's own timeout.
    fn erase(&mut self, sectors: SectorRange, profile: VoltageProfile) -> Result<(), Error>;

    /// Restore the controller's write protection.
    fn lock(&mut self);
}

/// Scoped unlock of a flash controller. Locks again on drop, so the pairing
/// holds on every exit path, early failure included.
struct Unlocked<'a, F: FlashController> {
    controller: &'a mut F,
}

impl<'a, F: FlashController> Unlocked<'a, F> {
    fn new(controller: &'a mut F) -> Self {
        controller.unlock();
        Self { controller }
    }

    fn erase(&mut self, sectors: SectorRange, profile: VoltageProfile) -> Result<(), Error> {
        self.controller.erase(sectors, profile)
    }
}

impl<F: FlashController> Drop for Unlocked<'_, F> {
    fn drop(&mut self) {
        self.controller.lock();
    }
}

/// Erases the application-owned sector range ahead of (re)installation.
///
/// Constructed with the fixed range from the memory map, so this path can
/// never reach the bootloader's own sectors. Erasing destroys the current
/// image and, if colocated, the validity flag, which is exactly what makes
/// the region writable again for the update flow.
pub struct RegionEraser<'a, F: FlashController> {
    controller: &'a mut F,
    sectors: SectorRange,
    profile: VoltageProfile,
}

impl<'a, F: FlashController> RegionEraser<'a, F> {
    pub fn new(controller: &'a mut F, sectors: SectorRange, profile: VoltageProfile) -> Self {
        Self {
            controller,
            sectors,
            profile,
        }
    }

    /// Unlock, erase the application's sectors, lock.
    ///
    /// A per-sector error from the controller aborts the sequence and is
    /// handed to the caller, who must treat it as fatal to the update
    /// attempt: programming or flag-setting on top of an incomplete erase
    /// would defeat the validity gate. The controller is locked again
    /// regardless of the outcome.
    pub fn erase_application_region(&mut self) -> Result<(), Error> {
        Unlocked::new(self.controller).erase(self.sectors, self.profile)
    }
}
