//! # Minibank Persistence
//!
//! Whole-state storage for the account table.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            PersistenceGateway                │
//! │  ┌──────────────────┐   ┌─────────────────┐  │
//! │  │ JsonFileGateway  │   │  MemoryGateway  │  │
//! │  │ (accounts.json)  │   │    (tests)      │  │
//! │  └──────────────────┘   └─────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minibank_persistence::{JsonFileGateway, PersistenceGateway};
//!
//! let gateway = JsonFileGateway::new("data/accounts.json");
//! let mut accounts = gateway.load_all()?;
//! // ... mutate ...
//! gateway.save_all(&accounts)?;
//! ```

pub mod error;
pub mod gateway;
pub mod json;

pub use error::{PersistenceError, PersistenceResult};
pub use gateway::{AccountMap, MemoryGateway, PersistenceGateway};
pub use json::JsonFileGateway;
