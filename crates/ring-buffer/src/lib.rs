//! Bounded Ring Buffer
//!
//! Provides the fixed-capacity FIFO used for every classification history.

mod buffer;

pub use buffer::RingBuffer;
