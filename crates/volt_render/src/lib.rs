pub mod camera;
pub mod framebuffer;
pub mod surface;

pub use camera::{clamp_scroll, Camera2D};
pub use framebuffer::{FrameBuffer, Rgba};
pub use surface::PixelSurface;
