mod collector;

pub use collector::SignalCollector;
