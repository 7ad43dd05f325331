mod equation_sync;
mod frame_loop;
mod notifications;
mod resource_manager;
mod session;
mod session_config;
mod session_snapshot;
mod viewport_manager;

pub use equation_sync::{EquationPayload, EquationSyncBridge};
pub use frame_loop::{
    FrameBudget, FrameLoopScheduler, FrameSource, LoopState, PacedFrameSource, TickOutcome,
};
pub use notifications::{Notification, NotificationLevel, NotificationQueue};
pub use resource_manager::{EngineHandle, EngineLease, EngineResourceManager};
pub use session::{EngineStatus, GrapherSession, HostEvent};
pub use session_config::GrapherConfig;
pub use session_snapshot::{
    SESSION_SNAPSHOT_JSON_SCHEMA_V1, SessionSnapshot, SessionSnapshotJsonContractV1,
};
pub use viewport_manager::ViewportManager;
