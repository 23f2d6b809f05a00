mod safe_wrapper;
pub mod types;

pub use safe_wrapper::SystemInterface;
pub use types::{Gid, Identity, Result, SleepOutcome, SleepStrategy, SystemError, Uid};
