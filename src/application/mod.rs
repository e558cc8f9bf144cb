//! Console application layer.
//!
//! - [`session`] - Token lifecycle gating everything else
//! - [`scheduler`] - Independent polling loops
//! - [`store`] - Sequence-admitted status, trade and news state
//! - [`validator`] - Manual trade pre-flight checks
//! - [`dispatcher`] - Operator commands
//! - [`error_log`] - Server-reported operational errors
//! - [`console`] - The container wiring the above together

pub mod console;
pub mod dispatcher;
pub mod error_log;
pub mod generation;
pub mod scheduler;
pub mod session;
pub mod slot;
pub mod store;
pub mod sync;
pub mod validator;

pub use console::{Console, ConsoleSettings};
pub use dispatcher::CommandDispatcher;
pub use error_log::{ErrorLog, ResolveOutcome};
pub use generation::Generation;
pub use scheduler::{PollJob, PollSpec, PollingScheduler};
pub use session::{Session, SessionManager};
pub use slot::{Admission, SequencedSlot, Ticket};
pub use store::StatusStore;
pub use sync::StoreSync;
pub use validator::validate_manual_trade;
