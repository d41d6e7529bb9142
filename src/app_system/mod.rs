//! System wiring, configuration, startup and shutdown.

pub mod delivery_system;
pub mod error;
pub mod seed;
pub mod settings;
pub mod telemetry;

pub use delivery_system::*;
pub use error::*;
pub use seed::*;
pub use settings::*;
pub use telemetry::*;
