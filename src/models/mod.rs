pub mod direction;
pub mod goal;
pub mod instrument;

pub use direction::TradeType;
pub use goal::PerformanceGoal;
pub use instrument::InstrumentSpec;
