pub mod logging;
pub mod plane;

pub use logging::{init_file_logger, init_stdout_logger, FileLogger, StdoutLogger};
pub use plane::{Plane, PlaneError};

// Re-export log crate so downstream crates can use glint_base::log::*
pub use log;
