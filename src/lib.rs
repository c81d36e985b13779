// src/lib.rs

//! Asset Hunter Library
//!
//! Batch-enumerates internet-exposed assets of a list of companies through the
//! Hunter search API, then screens them for admin/login surfaces.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
