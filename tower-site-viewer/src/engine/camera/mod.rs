/// Free-fly viewport camera with terrain ray casting and scripted flights.
pub mod viewport_camera;

/// Acquire/release lock over the shared camera navigation flags.
pub mod nav_lock;

pub use nav_lock::CameraNavLock;
pub use viewport_camera::{ViewportCamera, camera_controller};
