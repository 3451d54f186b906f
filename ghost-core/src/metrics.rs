//! # Derived Gas & Memory Figures
//!
//! Pure functions behind the efficiency panel. Every figure is a
//! deterministic function of the gas amount and a small seed taken from
//! the trailing hex characters of the target address, so the panel stays
//! stable per target without any stored state. The constants are
//! illustrative heuristics; they are part of the product's behavior and
//! must not be retuned.

use serde::Serialize;

/// Gas split across logical execution layers, in gas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GasBreakdown {
    pub execution: u64,
    pub calldata: u64,
    pub storage: u64,
}

/// One entry of the simulated memory heap panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemorySlot {
    pub offset: &'static str,
    pub usage_percent: u64,
}

/// Fixed-size heap sample, one slot per page offset.
pub type MemoryHeap = [MemorySlot; 4];

/// Modeled cheaper execution route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimizedPath {
    pub gas: u64,
    pub rate: f64,
}

/// Integer seed from the trailing `take` hex characters of `address`.
/// Unparsable input and a parsed zero both fall back to `default`.
fn addr_seed(address: &str, take: usize, default: u64) -> u64 {
    if !address.is_ascii() {
        return default;
    }
    let tail = &address[address.len().saturating_sub(take)..];
    match u64::from_str_radix(tail, 16) {
        Ok(0) | Err(_) => default,
        Ok(seed) => seed,
    }
}

/// Split `gas_used` into execution, calldata, and storage shares.
///
/// The seed is a single hex digit, which keeps every weight below 1.0;
/// each share is floored, so the three components may undershoot
/// `gas_used` by up to 3 units.
pub fn gas_breakdown(gas_used: u64, address: &str) -> GasBreakdown {
    let seed = addr_seed(address, 1, 5) as f64;
    let storage_weight = 0.2 + seed / 100.0;
    let execution_weight = 0.05 + seed / 200.0;
    let calldata_weight = 1.0 - storage_weight - execution_weight;

    let gas = gas_used as f64;
    GasBreakdown {
        execution: (gas * execution_weight).floor() as u64,
        calldata: (gas * calldata_weight).floor() as u64,
        storage: (gas * storage_weight).floor() as u64,
    }
}

/// Simulated memory heap occupancy at four fixed page offsets.
///
/// Purely decorative; values are not clamped.
pub fn memory_heap(address: &str) -> MemoryHeap {
    let seed = addr_seed(address, 3, 123);
    [
        MemorySlot { offset: "0x00", usage_percent: 15 + seed % 25 },
        MemorySlot { offset: "0x40", usage_percent: 10 + (seed * 3) % 80 },
        MemorySlot { offset: "0x80", usage_percent: 5 + (seed * 7) % 90 },
        MemorySlot { offset: "0xC0", usage_percent: 20 + seed % 30 },
    ]
}

/// Discounted gas figure for the optimized route.
///
/// The discount rate lands in the 7.5-12% range depending on the
/// two-digit address seed.
pub fn optimized_path(gas_used: u64, address: &str) -> OptimizedPath {
    let seed = addr_seed(address, 2, 10);
    let rate = 0.12 - (seed % 10) as f64 / 200.0;
    OptimizedPath {
        gas: (gas_used as f64 * rate).floor() as u64,
        rate,
    }
}

/// Baseline-to-optimized gas ratio. Returns `0.0` for a zero divisor.
pub fn efficiency_multiplier(baseline_gas: u64, optimized_gas: u64) -> f64 {
    if optimized_gas == 0 {
        return 0.0;
    }
    baseline_gas as f64 / optimized_gas as f64
}
