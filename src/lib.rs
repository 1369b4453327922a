//! Technician Pay Distribution Engine
//!
//! This crate computes how a field-service job's revenue is shared among the
//! technicians who worked it: reimbursements first, then a weighted split of
//! the technicians' pool with a guaranteed minimum hourly rate for each.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
