//! Trust and handoff core of a microcontroller boot stage.
//!
//! Three tightly coupled pieces: a CRC-32 engine to attest image integrity,
//! an erase of the application's flash region prior to (re)installation, and
//! the validity check plus final jump that hands the processor to the
//! application and never returns.
//!
//! Hardware is reached only through the narrow traits defined here
//! ([`flash::FlashController`], [`boot::Memory`], [`boot::Boot`] and
//! `embedded_hal::digital::OutputPin`), so the decision logic runs against
//! test doubles on the host and against vendor bindings on the device.
#![no_std]

use core::num::NonZeroU8;

pub mod boot;
pub mod checksum;
pub mod flash;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod mock;

/// Failure reported by a hardware-facing operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The flash controller failed while erasing this sector.
    ///
    /// Sectors before it are erased, the rest were not attempted. The update
    /// flow must not program the region or mark it valid after this.
    Erase(Sector),
}

/// Erase-granularity unit of the flash storage.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sector(pub u8);

/// Contiguous run of sectors, fixed when the memory map is built.
///
/// The application owns a fixed, named set of sectors; nothing in this crate
/// ever computes a sector range from an image size.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SectorRange {
    first: Sector,
    count: NonZeroU8,
}

impl SectorRange {
    pub const fn new(first: Sector, count: NonZeroU8) -> Self {
        assert!(first.0 as u16 + count.get() as u16 <= 256);
        Self { first, count }
    }

    pub fn iter(self) -> impl Iterator<Item = Sector> {
        let first = u16::from(self.first.0);
        (first..first + u16::from(self.count.get())).map(|sector| Sector(sector as u8))
    }
}

/// The fixed addresses the boot stage trusts, decided at build time by the
/// integrator and injected into the components that need them.
///
/// Keeping the map a plain value (instead of ambient constants) is what lets
/// the validity check and the eraser run against synthetic address ranges in
/// tests.
///
/// ```
/// use core::num::NonZeroU8;
/// use bootgate::{MemoryMap, Sector, SectorRange};
///
/// // An STM32F4 layout: bootloader in sectors 0..=3, application from
/// // sector 4 onwards.
/// const MAP: MemoryMap = MemoryMap {
///     app_start: 0x0801_0000,
///     app_flag: 0x0800_FFFC,
///     app_valid_flag: 0xA5A5_5A5A,
///     sram_start: 0x2000_0000,
///     sram_end: 0x2002_0000,
///     app_sectors: SectorRange::new(Sector(4), NonZeroU8::new(4).unwrap()),
/// };
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MemoryMap {
    /// Base of the application image. The first word there is the
    /// application's initial stack-pointer value, the second its reset
    /// handler (standard vector-table layout).
    pub app_start: u32,

    /// Address of the single validity-flag word, distinct from the image
    /// body. Written by the update flow only after image and checksum have
    /// both been confirmed, so power loss mid-update never yields a falsely
    /// valid image.
    pub app_flag: u32,

    /// Sentinel that, when found at [`app_flag`](Self::app_flag), asserts
    /// the image is complete and verified.
    pub app_valid_flag: u32,

    /// Lowest legal stack-pointer value on this device.
    pub sram_start: u32,

    /// Highest legal stack-pointer value on this device.
    ///
    /// Together with [`sram_start`](Self::sram_start) this is a sanity bound
    /// on the image's first word, not a guarantee of image correctness.
    pub sram_end: u32,

    /// Flash sectors owned by the application. Erasing this range destroys
    /// the image and, if colocated, the flag word; the bootloader's own
    /// sectors are never part of it.
    pub app_sectors: SectorRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_range_iterates_exactly_its_sectors() {
        let range = SectorRange::new(Sector(4), NonZeroU8::new(4).unwrap());
        let sectors: std::vec::Vec<_> = range.iter().collect();
        assert_eq!(sectors, [Sector(4), Sector(5), Sector(6), Sector(7)]);
    }

    #[test]
    fn sector_range_reaches_the_last_sector() {
        let range = SectorRange::new(Sector(255), NonZeroU8::new(1).unwrap());
        let sectors: std::vec::Vec<_> = range.iter().collect();
        assert_eq!(sectors, [Sector(255)]);
    }
}
