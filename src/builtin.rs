
/// increment-by-step sequence producer
pub mod counter;

/// identity processor
pub mod relay;


pub use counter::Counter;
pub use relay::Relay;
