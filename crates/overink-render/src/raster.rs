//! RGBA8 raster buffer with the blend modes the annotation layer needs.

use overink_core::Rgb;

/// How a source color combines with what is already in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    /// Standard source-over alpha compositing.
    #[default]
    SourceOver,
    /// Per-channel minimum, weighted by destination coverage, then
    /// composited source-over. Highlighter ink darkens what it covers and
    /// stays legible over dark content.
    Darken,
}

/// A CPU-side RGBA8 pixel buffer, straight (non-premultiplied) alpha.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; Self::byte_len(width, height)],
        }
    }

    // Widened before multiplying: a full-document buffer on a tall page
    // overflows u32 pixel counts.
    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Resize to the new dimensions, dropping all contents. The caller
    /// repaints afterwards.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(Self::byte_len(width, height), 0);
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// The RGBA components at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.index(x, y);
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Blend `color` at coverage `alpha` (in [0, 1]) into the pixel at
    /// `(x, y)`. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgb, alpha: f64, blend: Blend) {
        if x >= self.width || y >= self.height || alpha <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        let da = self.data[i + 3] as f64 / 255.0;
        let sa = alpha.min(1.0);
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }

        let src = [color.r, color.g, color.b];
        for channel in 0..3 {
            let d = self.data[i + channel] as f64 / 255.0;
            let s = src[channel] as f64 / 255.0;
            let s = match blend {
                Blend::SourceOver => s,
                // Blend against the backdrop only where the backdrop has
                // coverage; uncovered regions take the source color as-is.
                Blend::Darken => (1.0 - da) * s + da * s.min(d),
            };
            let out = (s * sa + d * da * (1.0 - sa)) / out_a;
            self.data[i + channel] = (out * 255.0).round() as u8;
        }
        self.data[i + 3] = (out_a * 255.0).round() as u8;
    }

    /// Copy a `self`-sized window of `src` starting at `(src_x, src_y)`
    /// into this buffer, clipped to both buffers. Overwrites, no blending.
    pub fn copy_from(&mut self, src: &RasterBuffer, src_x: u32, src_y: u32) {
        for y in 0..self.height {
            let sy = src_y + y;
            if sy >= src.height {
                break;
            }
            let cols = self.width.min(src.width.saturating_sub(src_x));
            if cols == 0 {
                continue;
            }
            let dst_start = self.index(0, y);
            let src_start = src.index(src_x, sy);
            let len = cols as usize * 4;
            self.data[dst_start..dst_start + len]
                .copy_from_slice(&src.data[src_start..src_start + len]);
        }
    }
}
