//! Card configuration persistence service.
//!
//! One document per form id, upsert semantics, served over HTTP+JSON and
//! backed by SQLite.
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────┐
//! │  Client  │ ───────> │  server.rs  (axum Router, ServerConfig)      │
//! │          │ <─────── │    └─ api.rs  (route handlers, AppState)     │
//! └──────────┘          │         │                                    │
//!                       │         │ DbHandle::call()                   │
//!                       │         v                                    │
//!                       │  db.rs  (CardDb over rusqlite)               │
//!                       └──────────────────────────────────────────────┘
//! ```
//!
//! | Module   | Responsibility                                          |
//! |----------|---------------------------------------------------------|
//! | `models` | Wire types: `Configuration`, `SaveReceipt`, health body |
//! | `db`     | SQLite access via `DbHandle` (thin `Arc<Mutex<_>>`)     |
//! | `api`    | Route handlers + `ApiError`                             |
//! | `server` | Router assembly, bind, graceful shutdown                |
//! | `client` | `CardStore` trait + reqwest `StoreClient`               |

pub mod api;
pub mod client;
pub mod db;
pub mod models;
pub mod server;

pub use client::{CardStore, StoreClient};
pub use db::{CardDb, DbHandle};
pub use models::{Configuration, HealthStatus, SaveCardRequest, SaveReceipt};
