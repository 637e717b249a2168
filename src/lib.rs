pub mod config;
pub mod debug_log;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod scheduler;
pub mod screens;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use config::ManagerConfig;
pub use error::{NavResult, NavigationError};
pub use window::{
    BackRecord, HideCompletion, Navigator, ShowData, ShowMode, Window, WindowData, WindowKey,
    WindowKind, WindowManager,
};
