//! Feature preprocessing module.
//!
//! This module turns session records into the numeric matrix the regression
//! model is fitted on: one-hot subject indicators followed by z-score
//! scaling of every column.

mod encoder;
mod matrix;

pub use encoder::{ColumnScaling, FeatureEncoder, NUMERIC_COLUMNS};
pub use matrix::FeatureMatrix;
