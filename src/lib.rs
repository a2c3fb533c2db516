//! # rechunk
//!
//! *Get your planes in a row.*
//!
//! Converts raw 8-bit pixel batches between planar (one contiguous block per
//! channel) and chunky (interleaved) layouts into a canonical 4-component
//! RGBA stream of 16-bit code units, ready for a consumer that expects
//! UTF-16-width values. Values widen losslessly, no scaling; a missing
//! alpha channel is synthesized at 255.
//!
//! ## Layers
//!
//! - **Conversion ops** in the crate root ([`widen_rgba`],
//!   [`widen_rgb_to_rgba`], [`widen_plane`], [`fill_alpha_wide`], and the
//!   window-level [`convert_window`]) are pure functions over `&[u8]` /
//!   `&mut [u16]` slices, SIMD-dispatched (x86-64 AVX2, ARM NEON, scalar
//!   fallback).
//! - **[`DocumentCache`]** (`std` feature, on by default) owns one canonical
//!   buffer per document id and merges each converted batch window into it,
//!   reporting [`ConversionResult::Unchanged`] when the batch carried no new
//!   data so callers can skip their downstream update entirely.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

use core::fmt;

mod buffer;
mod widen;

pub use buffer::{BatchWindow, PixelBuffer, SourceLayout};
pub use widen::{
    convert_window, convert_window_vec, fill_alpha_wide, widen_plane, widen_rgb_to_rgba, widen_rgba,
};

#[cfg(feature = "std")]
mod cache;

#[cfg(feature = "std")]
pub use cache::{ConversionResult, DocumentCache};

/// Why a conversion request was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvertError {
    /// Component count other than 3 or 4.
    UnsupportedComponents(u8),
    /// Buffer length does not divide evenly into whole pixels.
    NotPixelAligned,
    /// Destination too small for the converted window.
    PixelCountMismatch,
    /// Channel index outside 0..4.
    ChannelOutOfRange,
    /// Batch window extends past the end of the plane.
    WindowOutOfBounds,
    /// Canonical buffer length no longer covers the requested window even
    /// though the resize step has run. Fatal to the single request only.
    CanonicalSizeMismatch,
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedComponents(n) => {
                write!(f, "unsupported component count {n}, expected 3 or 4")
            }
            Self::NotPixelAligned => f.write_str("buffer length does not divide into whole pixels"),
            Self::PixelCountMismatch => {
                f.write_str("destination buffer too small for the converted window")
            }
            Self::ChannelOutOfRange => f.write_str("channel index must be below 4"),
            Self::WindowOutOfBounds => {
                f.write_str("batch window extends past the end of the plane")
            }
            Self::CanonicalSizeMismatch => {
                f.write_str("cached canonical buffer does not cover the requested window")
            }
        }
    }
}

impl core::error::Error for ConvertError {}
