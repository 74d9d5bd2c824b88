//! Leave and training day accounting for a partner roster.
//!
//! This crate classifies calendar days against each partner's weekly
//! schedule and the public holiday calendar, computes vacation balances
//! (including days recovered through training on days off), and applies
//! calendar toggles while keeping the vacation and training day-sets
//! disjoint and the training allocations respected.
//!
//! The pure engine lives in [`calculation`]. Around it sit the holiday and
//! persistence collaborators ([`holidays`], [`store`]), the client-side
//! [`session`] flow and the HTTP [`api`].

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod holidays;
pub mod models;
pub mod session;
pub mod store;
