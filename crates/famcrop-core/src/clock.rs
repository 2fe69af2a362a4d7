//! Millisecond wall clock, injectable for tests and for `wasm32` hosts.

use std::rc::Rc;

/// Returns milliseconds since the Unix epoch.
pub type Clock = Rc<dyn Fn() -> u64>;

/// Clock backed by `SystemTime`. Not available on `wasm32`, where the host
/// passes `Date.now` instead.
#[cfg(not(target_arch = "wasm32"))]
pub fn system_clock() -> Clock {
    Rc::new(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    })
}

/// Clock that always returns `now`.
pub fn fixed_clock(now: u64) -> Clock {
    Rc::new(move || now)
}
