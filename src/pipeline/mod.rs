pub mod channel;
pub mod inflight;
pub mod writer;

pub use channel::{Consumer, Producer, delivery_channel};
pub use inflight::InFlight;
