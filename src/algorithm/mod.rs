//! Algorithm implementations for birth-record studies
//!
//! This module contains the statistical routines applied to loaded records.

pub mod odds;
