use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::framebuffer::FrameBuffer;

/// Presents a fixed-size [`FrameBuffer`] to the window, letting `pixels`
/// scale it to the physical surface.
pub struct PixelSurface {
    pixels: Pixels<'static>,
    buffer_size: (u32, u32),
}

impl PixelSurface {
    pub fn new(window: Arc<Window>, buffer_width: u32, buffer_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width.max(1), size.height.max(1), window);
        let pixels = Pixels::new(buffer_width, buffer_height, surface)?;
        log::info!(
            "Pixel surface ready: buffer {}x{}, surface {}x{}",
            buffer_width,
            buffer_height,
            size.width,
            size.height
        );
        Ok(Self {
            pixels,
            buffer_size: (buffer_width, buffer_height),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    pub fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        if (frame.width(), frame.height()) != self.buffer_size {
            log::warn!(
                "Frame {}x{} does not match surface buffer {}x{}; skipping present",
                frame.width(),
                frame.height(),
                self.buffer_size.0,
                self.buffer_size.1
            );
            return Ok(());
        }
        self.pixels.frame_mut().copy_from_slice(frame.as_bytes());
        self.pixels.render()
    }
}
