//! Entity model subsystem.
//!
//! # Data Flow
//! ```text
//! inbound JSON document
//!     → schema.rs (field presence and kind checks)
//!     → account.rs (AccountData, then Account once persisted)
//!     → store (insert / get / update / delete / list_all)
//! ```
//!
//! # Design Decisions
//! - No I/O of its own; every persistence call goes through `&dyn AccountStore`
//! - Validation failures are a typed error, absence is `Option::None`

pub mod account;
pub mod error;
pub mod schema;

pub use account::{today, Account, AccountData};
pub use error::{AccountError, DataValidationError};
