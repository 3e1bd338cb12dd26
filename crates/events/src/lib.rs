//! Change notification primitives.
//!
//! Stores publish what changed; consumers (UI refreshers, audit views) subscribe. The
//! ledger itself never subscribes to anything.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
