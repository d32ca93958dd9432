//! Search filter and rating aggregate for the laptop catalog

use crate::grpc::proto::{Filter, Laptop, Memory, MemoryUnit};

/// Search criteria; a laptop matches when it satisfies every bound
///
/// A zero `max_price_usd` on the wire means "no ceiling", so an all-default filter
/// matches everything, same as a missing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaptopFilter {
    pub max_price_usd: Option<f64>,
    pub min_cpu_cores: u32,
    pub min_cpu_ghz: f64,
    pub min_ram_bits: u64,
}

impl From<Option<Filter>> for LaptopFilter {
    fn from(filter: Option<Filter>) -> Self {
        let Some(filter) = filter else {
            return Self::default();
        };

        Self {
            max_price_usd: (filter.max_price_usd > 0.0).then_some(filter.max_price_usd),
            min_cpu_cores: filter.min_cpu_cores,
            min_cpu_ghz: filter.min_cpu_ghz,
            min_ram_bits: filter.min_ram.as_ref().map(memory_bits).unwrap_or(0),
        }
    }
}

impl LaptopFilter {
    pub fn matches(&self, laptop: &Laptop) -> bool {
        if let Some(max_price) = self.max_price_usd {
            if laptop.price_usd > max_price {
                return false;
            }
        }

        let (cores, ghz) = laptop
            .cpu
            .as_ref()
            .map(|cpu| (cpu.number_cores, cpu.min_ghz))
            .unwrap_or((0, 0.0));

        if cores < self.min_cpu_cores || ghz < self.min_cpu_ghz {
            return false;
        }

        laptop.ram.as_ref().map(memory_bits).unwrap_or(0) >= self.min_ram_bits
    }
}

/// Size of `memory` in bits, saturating on overflow
pub fn memory_bits(memory: &Memory) -> u64 {
    let shift = match memory.unit() {
        MemoryUnit::Unknown | MemoryUnit::Bit => return memory.value,
        MemoryUnit::Byte => return memory.value.saturating_mul(8),
        MemoryUnit::Kilobyte => 13,
        MemoryUnit::Megabyte => 23,
        MemoryUnit::Gigabyte => 33,
        MemoryUnit::Terabyte => 43,
    };

    memory
        .value
        .checked_shl(shift)
        .filter(|bits| bits >> shift == memory.value)
        .unwrap_or(u64::MAX)
}

/// Running score total for one laptop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rating {
    pub count: u32,
    pub sum: f64,
}

impl Rating {
    pub fn add(&mut self, score: f64) {
        self.count = self.count.saturating_add(1);
        self.sum += score;
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}
