pub mod backend;
pub mod capture;
pub mod scripted;
pub mod wav;

pub use backend::{CaptureBackend, CaptureConfig};
pub use capture::MicBackend;
pub use scripted::ScriptedBackend;
