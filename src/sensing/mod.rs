pub mod clock;
pub mod config;
pub mod controller;
pub mod loop_worker;
pub mod replay;
pub mod source;

pub use clock::SessionClock;
pub use config::SamplingConfig;
pub use controller::SensingController;
pub use replay::{ReplayGazeSource, ReplayHandSource, Trace, TraceEntry};
pub use source::{GazeSource, HandSource, SensorKind};
