//! HTTP API module for the leave engine.
//!
//! This module exposes the roster document over REST: whole-document read
//! and replace, shallow partner and settings patches, the displayed year,
//! and the engine operations (day toggles, balances, holiday tables).

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BalanceQuery, PartnerPatch, SettingsPatch, ToggleRequest, YearBody};
pub use response::{ApiError, ApiErrorResponse, SuccessResponse, ToggleResponse};
pub use state::AppState;
