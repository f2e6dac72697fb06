pub mod app;
pub mod capture;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod pipeline;

pub use app::{AppController, UiCommand};
pub use config::Settings;
pub use coordinator::{Coordinator, CoordinatorBuilder};
pub use error::{AppError, CaptureError, ClientError, ConfigurationError};
pub use pipeline::{PipelineController, PipelineState};
