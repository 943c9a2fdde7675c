pub mod errors;
pub mod events;
pub mod registry;
pub mod sync;
pub mod tasks;
pub mod types;

pub use errors::{CasementError, ConfigError, TaskError, TreeError};
pub use events::{Event, EventKind, EventQueue};
pub use registry::{Handle, HandleRegistry, Registered, RegistryCursor};
pub use sync::Semaphore;
pub use tasks::{TaskChannel, TaskLoop};
pub use types::{keycode, Rect, UnitSize, WindowKind};

/// Capability version reported to the embedded program.
pub const CAPABILITY_VERSION: u32 = 0x0007_0600;

pub type Result<T> = std::result::Result<T, CasementError>;
