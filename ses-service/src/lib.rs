//! SES Service - Service entry sheet validation, totals and submission for
//! supplier and customer approval flows.

pub mod config;
pub mod models;
pub mod services;
