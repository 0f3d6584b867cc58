//! Budget policies and the manager that combines them.
//!
//! - [`HardCapPolicy`] - block at a lifetime spend ceiling
//! - [`SoftWarningPolicy`] - warn past a lifetime spend threshold
//! - [`SlidingWindowPolicy`] - limit spend within a rolling window
//! - [`BudgetManager`] - strictness-ordered combination and enforcement

mod manager;
mod policy;

pub use manager::{BudgetManager, WarnHook};
pub use policy::{HardCapPolicy, SlidingWindowPolicy, SoftWarningPolicy, DEFAULT_WINDOW_SECS};
