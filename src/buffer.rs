//! Geometry types describing a source pixel buffer and the batch window
//! being converted.

use alloc::vec::Vec;

use crate::ConvertError;
use crate::widen;

/// Arrangement of components within the source byte buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceLayout {
    /// One contiguous block per channel (all R, then all G, ...).
    Planar,
    /// Interleaved per pixel (R,G,B[,A] repeated).
    Chunky,
}

/// Borrowed view over one batch call's raw pixel bytes, tagged with the
/// geometry needed to interpret them.
///
/// The byte slice always covers the document's full plane; a
/// [`BatchWindow`] selects the pixel range a single call actually touches.
/// Construction validates the geometry, so a `PixelBuffer` that exists is
/// safe to convert.
#[derive(Clone, Copy, Debug)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    components: u8,
    layout: SourceLayout,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw pixel bytes.
    ///
    /// `components` must be 3 or 4, and `data.len()` must divide evenly by
    /// it; anything else is rejected as a caller contract violation.
    pub fn new(data: &'a [u8], components: u8, layout: SourceLayout) -> Result<Self, ConvertError> {
        if !matches!(components, 3 | 4) {
            return Err(ConvertError::UnsupportedComponents(components));
        }
        if !data.len().is_multiple_of(components as usize) {
            return Err(ConvertError::NotPixelAligned);
        }
        Ok(Self {
            data,
            components,
            layout,
        })
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn components(&self) -> usize {
        self.components as usize
    }

    #[inline]
    pub fn layout(&self) -> SourceLayout {
        self.layout
    }

    /// Total pixels in the document plane this buffer describes.
    #[inline]
    pub fn plane_size(&self) -> usize {
        self.data.len() / self.components as usize
    }

    /// Convert the entire plane to wide RGBA in one uncached call.
    pub fn widen_to_rgba(&self) -> Result<Vec<u16>, ConvertError> {
        widen::convert_window_vec(self, BatchWindow::full(self.plane_size()))
    }
}

/// Contiguous pixel range of the full plane covered by one conversion call.
///
/// Always expressed in pixels, never bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchWindow {
    offset: usize,
    size: usize,
}

impl BatchWindow {
    #[inline]
    pub fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// Window spanning a whole plane.
    #[inline]
    pub fn full(plane_size: usize) -> Self {
        Self {
            offset: 0,
            size: plane_size,
        }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// One past the last pixel, or an error when the window does not fit
    /// inside a plane of `plane_size` pixels.
    pub(crate) fn end_within(&self, plane_size: usize) -> Result<usize, ConvertError> {
        match self.offset.checked_add(self.size) {
            Some(end) if end <= plane_size => Ok(end),
            _ => Err(ConvertError::WindowOutOfBounds),
        }
    }
}
