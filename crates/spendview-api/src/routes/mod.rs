//! Route modules for the API server
//!
//! - feed: unified snapshot and feed commands
//! - employees: roster for the selector
//! - transactions: approval updates

pub mod employees;
pub mod feed;
pub mod transactions;
