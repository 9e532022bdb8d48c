pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Board, Daemon, Health, Init, Version};
