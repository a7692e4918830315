use std::collections::BTreeMap;
use std::vec::Vec;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::boot::Memory;
use crate::flash::{FlashController, VoltageProfile};
use crate::{Error, Sector, SectorRange};

/// Flash controller double that records the call sequence and can be told to
/// fail at a specific sector.
pub struct MockFlash {
    pub unlocks: usize,
    pub locks: usize,
    pub erased: Vec<Sector>,
    pub fail_at: Option<Sector>,
    pub locked: bool,
}

impl MockFlash {
    pub const fn new() -> Self {
        MockFlash {
            unlocks: 0,
            locks: 0,
            erased: Vec::new(),
            fail_at: None,
            locked: true,
        }
    }
}

impl FlashController for MockFlash {
    fn unlock(&mut self) {
        self.unlocks += 1;
        self.locked = false;
    }

    fn erase(&mut self, sectors: SectorRange, _profile: VoltageProfile) -> Result<(), Error> {
        assert!(!self.locked, "erase issued while the controller is locked");

        for sector in sectors.iter() {
            if self.fail_at == Some(sector) {
                return Err(Error::Erase(sector));
            }
            self.erased.push(sector);
        }

        Ok(())
    }

    fn lock(&mut self) {
        self.locks += 1;
        self.locked = true;
    }
}

/// Word-addressable memory double. Absent words read back as `0xFFFFFFFF`,
/// like erased flash.
pub struct MockMemory(BTreeMap<u32, u32>);

impl MockMemory {
    pub const fn new() -> Self {
        MockMemory(BTreeMap::new())
    }

    pub fn write_word(&mut self, address: u32, value: u32) {
        self.0.insert(address, value);
    }
}

impl Memory for MockMemory {
    fn read_word(&self, address: u32) -> u32 {
        self.0.get(&address).copied().unwrap_or(0xFFFF_FFFF)
    }
}

/// Indicator pin double that records every level written to it,
/// `true` for high.
pub struct MockPin {
    pub levels: Vec<bool>,
}

impl MockPin {
    pub const fn new() -> Self {
        MockPin { levels: Vec::new() }
    }
}

impl ErrorType for MockPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}
