pub mod config;
pub mod feedback;
pub mod recommend;
pub mod train;
