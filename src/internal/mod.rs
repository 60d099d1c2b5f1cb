//! Internal implementation details.

pub(crate) mod circular;
pub(crate) mod inflight;

pub(crate) use circular::StackGuard;
pub(crate) use inflight::InFlight;
