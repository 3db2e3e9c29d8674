pub mod directory;
pub mod resolve;
pub mod surfaces;

pub use directory::{CapabilityTag, DirectoryService, StaticDirectory};
pub use resolve::{resolve_recovery_surface, resolve_relaunch_target};
pub use surfaces::{
    LaunchRequest, LogRecoverySurface, RecoverySurface, RegistryError, SurfaceId,
    SurfaceRegistry, DEFAULT_RECOVERY_SURFACE,
};
