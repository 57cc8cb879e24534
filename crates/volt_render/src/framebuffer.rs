//! CPU-side RGBA8 frame buffers.
//!
//! The game draws flat-colored rectangles into a world-sized buffer, then
//! blits that buffer onto the screen-sized one at the camera's origin. Both
//! operations clip against the destination, so callers can pass rectangles
//! that hang off any edge.

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate only when the dimensions change; contents are undefined
    /// afterwards until the next `fill`.
    pub fn ensure_size(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            *self = Self::new(width, height);
        }
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(self.width as i32);
        let y1 = y.saturating_add(height).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let stride = self.width as usize;
        for row in y0..y1 {
            let start = row as usize * stride;
            self.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    /// Copy `src` so that its top-left corner lands at `(dx, dy)`.
    pub fn blit(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = dx.saturating_add(src.width as i32).min(self.width as i32);
        let y1 = dy.saturating_add(src.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        let dst_stride = self.width as usize;
        let src_stride = src.width as usize;
        let span = (x1 - x0) as usize;
        for row in y0..y1 {
            let dst_start = row as usize * dst_stride + x0 as usize;
            let src_start = (row - dy) as usize * src_stride + (x0 - dx) as usize;
            self.pixels[dst_start..dst_start + span]
                .copy_from_slice(&src.pixels[src_start..src_start + span]);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const WHITE: Rgba = [255, 255, 255, 255];

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut fb = FrameBuffer::new(8, 4);
        fb.fill(WHITE);
        fb.fill_rect(-2, 2, 4, 10, RED);
        assert_eq!(fb.pixel(0, 2), Some(RED));
        assert_eq!(fb.pixel(1, 3), Some(RED));
        assert_eq!(fb.pixel(2, 2), Some(WHITE));
        assert_eq!(fb.pixel(0, 1), Some(WHITE));
    }

    #[test]
    fn fully_offscreen_rect_is_ignored() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.fill(WHITE);
        fb.fill_rect(10, 10, 3, 3, RED);
        fb.fill_rect(0, 0, 0, 3, RED);
        assert!(fb.as_bytes().chunks(4).all(|px| px == WHITE));
    }

    #[test]
    fn blit_applies_negative_offset() {
        let mut world = FrameBuffer::new(10, 2);
        world.fill(WHITE);
        world.fill_rect(6, 0, 1, 1, RED);

        let mut screen = FrameBuffer::new(4, 2);
        screen.fill([0, 0, 0, 255]);
        screen.blit(&world, -5, 0);
        assert_eq!(screen.pixel(1, 0), Some(RED));
        assert_eq!(screen.pixel(0, 0), Some(WHITE));
        assert_eq!(screen.pixel(1, 1), Some(WHITE));
    }

    #[test]
    fn blit_leaves_uncovered_pixels() {
        let world = FrameBuffer::new(2, 2);
        let mut screen = FrameBuffer::new(4, 4);
        screen.fill(WHITE);
        screen.blit(&world, 3, 3);
        assert_eq!(screen.pixel(3, 3), Some([0, 0, 0, 255]));
        assert_eq!(screen.pixel(2, 2), Some(WHITE));
    }

    #[test]
    fn ensure_size_reallocates_on_change_only() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.fill(RED);
        fb.ensure_size(2, 2);
        assert_eq!(fb.pixel(1, 1), Some(RED));
        fb.ensure_size(3, 1);
        assert_eq!((fb.width(), fb.height()), (3, 1));
        assert_eq!(fb.as_bytes().len(), 12);
    }
}
