//! Regression model module.
//!
//! A small random-forest regressor over encoded session features. It is
//! deliberately narrow: fit once, predict, refit from scratch.

mod forest;
mod tree;

pub use forest::{ForestParams, RandomForestRegressor};
pub use tree::{RegressionTree, TreeParams};
