//! Trellis
//!
//! Trellis is the state-and-transformation core of an e-commerce / MLM web
//! storefront: an in-memory shopping cart with derived totals, a durable
//! cart snapshot bridge, and view-side transformations over a
//! server-supplied referral tree.

pub mod api;
pub mod cart;
pub mod fixtures;
pub mod items;
pub mod notify;
pub mod persistence;
pub mod prelude;
pub mod team;
