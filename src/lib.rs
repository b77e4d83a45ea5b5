//! Per-server moderation ledger for chat bots.
//!
//! Tracks warnings (immutable, sequentially numbered infractions), temporary
//! restrictions such as mutes (at most one active per user, with optional
//! expiry), and per-server configuration (command prefix, log channel).
//! The surrounding bot owns command routing and platform calls; this crate
//! owns the records and their invariants.
//!
//! ```no_run
//! use modledger::{db, Ledger};
//!
//! # async fn run() -> Result<(), modledger::Error> {
//! let pool = db::pool::create_pool("sqlite://moderation.db").await?;
//! db::pool::run_migrations(&pool).await?;
//! let ledger = Ledger::new(pool);
//!
//! let infraction = ledger
//!     .record_warning("server-1", "user-1", "mod-1", Some("spam"))
//!     .await?;
//! assert_eq!(infraction.id, 1);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod db;
pub mod error;
pub mod ledger;

pub use clock::{Clock, SystemClock};
pub use db::models::{Infraction, Restriction, ServerConfig, DEFAULT_COMMAND_PREFIX};
pub use error::Error;
pub use ledger::Ledger;
