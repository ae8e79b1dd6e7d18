//! Partner Portal: onboarding wizard and REST client for the loan-referral
//! partner portal.

pub mod api;
pub mod cli;
pub mod config;
pub mod draft;
pub mod error;
pub mod store;
pub mod support;
pub mod validation;
pub mod wizard;
