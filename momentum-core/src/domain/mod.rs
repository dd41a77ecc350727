//! Domain types: bars in, portfolio snapshots read, order intents out.

pub mod bar;
pub mod intent;
pub mod portfolio;

pub use bar::Bar;
pub use intent::{IntentReason, OrderIntent};
pub use portfolio::PortfolioSnapshot;

/// Symbol type alias
pub type Symbol = String;
