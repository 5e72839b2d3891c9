pub mod network;
pub mod replay_buffer;

pub use network::{LayerSpec, NetworkBuilder};
pub use replay_buffer::ReplayBufferBuilder;
