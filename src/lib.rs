//! Tickflow
//!
//! A frame-driven cooperative coroutine scheduler. Application code expresses
//! multi-frame sequences ("do X, wait N seconds, do Y, wait until condition,
//! do Z") as a single suspendable procedure, and the host loop resumes it
//! incrementally once per tick.
//!
//! # Example
//!
//! ```
//! use tickflow::{CoroutineManager, Sequence, SuspensionPredicate, Yield};
//!
//! let mut manager = CoroutineManager::new();
//! manager.start(
//!     Sequence::new()
//!         .yielding(|| {
//!             println!("show title");
//!             SuspensionPredicate::seconds(1.0).into()
//!         })
//!         .yielding(|| {
//!             println!("show menu");
//!             Yield::Tick
//!         })
//!         .finish(|| println!("ready")),
//! );
//!
//! for _ in 0..120 {
//!     manager.update(1.0 / 60.0)?;
//! }
//! assert_eq!(manager.active_count(), 0);
//! # Ok::<(), tickflow::SchedulerError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/tickflow")]
#![warn(rust_2018_idioms)]

// Public modules
pub mod runtime;

// Utility modules
pub mod util;

// Re-exports
pub use runtime::coroutine::{
    from_fn, Coroutine, CoroutineError, CoroutineId, Fault, Sequence, Step, StepProcedure,
    SuspensionPredicate, Yield,
};
pub use runtime::scheduler::{CoroutineManager, ManagerHandle, SchedulerError, SchedulerStats};
pub use util::config::{ConfigError, SchedulerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "tickflow";
