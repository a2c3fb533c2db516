// ---------------------------------------------------------------------------
// Widening layout conversions with SIMD dispatch.
//
// Every op reads 0-255 source bytes and writes 16-bit units (pure widening,
// no scaling). #[rite] row functions contain the SIMD loops; #[arcane]
// wrappers are the incant! dispatch targets. Tiers: x86-64 AVX2 (v3),
// ARM NEON (arm_v2), scalar. The output is always 4 components wide.
// ---------------------------------------------------------------------------

use alloc::vec;
use alloc::vec::Vec;

use archmage::incant;

use crate::{BatchWindow, ConvertError, PixelBuffer, SourceLayout};

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon::*;


// ===========================================================================
// Validation helpers
// ===========================================================================

// Empty inputs are accepted everywhere: a zero-size batch window is a legal
// no-op, not a geometry error.

#[inline]
fn check_expand(src_len: usize, src_cpp: usize, dst_len: usize) -> Result<(), ConvertError> {
    if !src_len.is_multiple_of(src_cpp) {
        return Err(ConvertError::NotPixelAligned);
    }
    if dst_len < (src_len / src_cpp) * 4 {
        return Err(ConvertError::PixelCountMismatch);
    }
    Ok(())
}

// ===========================================================================
// Public API — row-level ops
// ===========================================================================

/// Widen chunky RGBA bytes into 16-bit units, verbatim.
///
/// `src.len()` must be a multiple of 4; `dst` must hold at least
/// `src.len()` units.
pub fn widen_rgba(src: &[u8], dst: &mut [u16]) -> Result<(), ConvertError> {
    check_expand(src.len(), 4, dst.len())?;
    incant!(widen_rgba_impl(src, dst), [v3, neon, scalar]);
    Ok(())
}

/// Widen chunky RGB bytes into 16-bit RGBA units, alpha = 255.
///
/// Every 3-wide source group expands to a 4-wide destination group.
/// `src.len()` must be a multiple of 3; `dst` must hold at least
/// `src.len() / 3 * 4` units.
pub fn widen_rgb_to_rgba(src: &[u8], dst: &mut [u16]) -> Result<(), ConvertError> {
    check_expand(src.len(), 3, dst.len())?;
    incant!(widen_rgb_impl(src, dst), [v3, neon, scalar]);
    Ok(())
}

/// Scatter one planar channel into 16-bit RGBA units:
/// `dst[i * 4 + channel] = src[i]`. Other channels are preserved.
///
/// `dst` must hold at least `src.len() * 4` units.
pub fn widen_plane(src: &[u8], dst: &mut [u16], channel: usize) -> Result<(), ConvertError> {
    if channel >= 4 {
        return Err(ConvertError::ChannelOutOfRange);
    }
    check_expand(src.len(), 1, dst.len())?;
    incant!(widen_plane_impl(src, dst, channel), [v3, neon, scalar]);
    Ok(())
}

/// Set the alpha unit (`dst[i * 4 + 3]`) to 255 for every pixel.
///
/// `dst.len()` must be a multiple of 4.
pub fn fill_alpha_wide(dst: &mut [u16]) -> Result<(), ConvertError> {
    if !dst.len().is_multiple_of(4) {
        return Err(ConvertError::NotPixelAligned);
    }
    incant!(fill_alpha_impl(dst), [v3, neon, scalar]);
    Ok(())
}

// ===========================================================================
// Public API — window-level conversion
// ===========================================================================

/// Convert one batch window of `buf` into canonical wide RGBA chunky order.
///
/// Exactly the first `window.size() * 4` units of `dst` are written. A
/// window that extends past the plane fails; it is never truncated.
pub fn convert_window(
    buf: &PixelBuffer<'_>,
    window: BatchWindow,
    dst: &mut [u16],
) -> Result<(), ConvertError> {
    let plane_size = buf.plane_size();
    window.end_within(plane_size)?;

    let units = window.size() * 4;
    if dst.len() < units {
        return Err(ConvertError::PixelCountMismatch);
    }
    let dst = &mut dst[..units];
    if window.size() == 0 {
        return Ok(());
    }

    let data = buf.data();
    match buf.layout() {
        SourceLayout::Chunky => {
            if buf.components() == 4 {
                widen_rgba(&data[window.offset() * 4..][..window.size() * 4], dst)
            } else {
                widen_rgb_to_rgba(&data[window.offset() * 3..][..window.size() * 3], dst)
            }
        }
        SourceLayout::Planar => {
            for channel in 0..4 {
                if channel >= buf.components() {
                    // Components are validated to 3 or 4, so only the alpha
                    // channel can be missing.
                    fill_alpha_wide(dst)?;
                } else {
                    let plane = &data[plane_size * channel + window.offset()..][..window.size()];
                    widen_plane(plane, dst, channel)?;
                }
            }
            Ok(())
        }
    }
}

/// Allocating form of [`convert_window`].
pub fn convert_window_vec(
    buf: &PixelBuffer<'_>,
    window: BatchWindow,
) -> Result<Vec<u16>, ConvertError> {
    // Bounds first, so a bogus window cannot trigger a huge allocation.
    window.end_within(buf.plane_size())?;
    let mut out = vec![0u16; window.size() * 4];
    convert_window(buf, window, &mut out)?;
    Ok(out)
}
