//! Utility functions.

use std::time::Instant;

/// Aligns an address or size up to the next multiple of `align`.
/// `align` must be a power of two.
pub fn align_up(addr: u64, align: u64) -> u64 {
    assert!(align.is_power_of_two());
    (addr + align - 1) & !(align - 1)
}

/// Runs `f` inside a tracing span named after `label` and logs how long it took.
///
/// Errors returned by `f` pass through untouched; the timing is reported
/// either way so a slow or failing step is attributed to its own label.
pub fn profile<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let span = tracing::debug_span!("profile", label);
    let _enter = span.enter();
    let start = Instant::now();
    let result = f();
    tracing::debug!(elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "{}", label);
    result
}
