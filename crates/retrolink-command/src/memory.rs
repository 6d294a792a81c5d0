//! A simple region-based memory map for frontends exposing core memory.
//!
//! Accesses never span regions: a read or write starting inside a region is
//! truncated at that region's end.

use retrolink_types::error::MemoryError;

/// A contiguous block of core memory at a fixed system address.
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    start: u32,
    data: Vec<u8>,
    writable: bool,
}

impl MemoryRegion {
    pub fn new(start: u32, data: Vec<u8>, writable: bool) -> Self {
        Self {
            start,
            data,
            writable,
        }
    }

    fn contains(&self, address: u32) -> bool {
        let end = u64::from(self.start) + self.data.len() as u64;
        address >= self.start && u64::from(address) < end
    }

    fn offset(&self, address: u32) -> usize {
        (address - self.start) as usize
    }
}

/// The set of regions a core exposes.
#[derive(Debug, Clone, Default)]
pub struct MemoryMap {
    regions: Vec<MemoryRegion>,
}

impl MemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region. Earlier regions win where they overlap.
    pub fn with_region(mut self, region: MemoryRegion) -> Self {
        self.regions.push(region);
        self
    }

    fn region_for(&self, address: u32) -> Result<&MemoryRegion, MemoryError> {
        if self.regions.is_empty() {
            return Err(MemoryError::NoMemoryMap);
        }
        self.regions
            .iter()
            .find(|r| r.contains(address))
            .ok_or(MemoryError::Unmapped)
    }

    /// Read up to `len` bytes starting at `address`.
    pub fn read(&self, address: u32, len: usize) -> Result<Vec<u8>, MemoryError> {
        let region = self.region_for(address)?;
        let start = region.offset(address);
        let end = start.saturating_add(len).min(region.data.len());
        Ok(region.data[start..end].to_vec())
    }

    /// Write `bytes` starting at `address`; returns the count written.
    pub fn write(&mut self, address: u32, bytes: &[u8]) -> Result<usize, MemoryError> {
        if self.regions.is_empty() {
            return Err(MemoryError::NoMemoryMap);
        }
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.contains(address))
            .ok_or(MemoryError::Unmapped)?;
        if !region.writable {
            return Err(MemoryError::ReadOnly);
        }
        let start = region.offset(address);
        let count = bytes.len().min(region.data.len() - start);
        region.data[start..start + count].copy_from_slice(&bytes[..count]);
        Ok(count)
    }
}
