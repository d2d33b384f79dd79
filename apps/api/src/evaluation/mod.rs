//! Resume evaluation: the three views and the pipeline that produces them.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod views;
