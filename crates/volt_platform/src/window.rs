use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Volt Wizard".to_string(),
            width: 800,
            height: 640,
        }
    }
}

/// The playfield has a fixed logical size, so the window is not resizable.
pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, OsError> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(false)
        .with_inner_size(LogicalSize::new(config.width, config.height));

    let window = event_loop.create_window(attrs)?;
    log::info!(
        "Window created: {}x{} (scale factor {:.2})",
        config.width,
        config.height,
        window.scale_factor()
    );
    Ok(Arc::new(window))
}
