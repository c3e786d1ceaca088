//! Order resolution.
//!
//! Applies one turn of simultaneous per-player orders to a [`WorldState`],
//! finalizing the status of every order.
//!
//! [`WorldState`]: crate::board::WorldState

pub mod effects;
pub mod ledger;
pub mod resolver;

pub use ledger::{Ledger, UnitHandle};
pub use resolver::{Resolution, Resolver};
