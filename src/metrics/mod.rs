//! Diagnostics kept alongside the agent. None of these affect learning.

pub mod window;

pub use window::RunningWindow;
