use archmage::prelude::*;

// ===========================================================================
// Scalar row implementations
// ===========================================================================

pub(super) fn widen_rgba_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u16]) {
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        *d = u16::from(*s);
    }
}

pub(super) fn widen_rgb_row_scalar(_token: ScalarToken, src: &[u8], dst: &mut [u16]) {
    for (s, d) in src.chunks_exact(3).zip(dst.chunks_exact_mut(4)) {
        d[0] = u16::from(s[0]);
        d[1] = u16::from(s[1]);
        d[2] = u16::from(s[2]);
        d[3] = 0xFF;
    }
}

pub(super) fn widen_plane_row_scalar(
    _token: ScalarToken,
    src: &[u8],
    dst: &mut [u16],
    channel: usize,
) {
    for (s, d) in src.iter().zip(dst.chunks_exact_mut(4)) {
        d[channel] = u16::from(*s);
    }
}

pub(super) fn fill_alpha_row_scalar(_token: ScalarToken, dst: &mut [u16]) {
    for px in dst.chunks_exact_mut(4) {
        px[3] = 0xFF;
    }
}

// ===========================================================================
// Scalar wrappers (dispatch targets for incant!)
// ===========================================================================

pub(super) fn widen_rgba_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u16]) {
    widen_rgba_row_scalar(t, s, d);
}
pub(super) fn widen_rgb_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u16]) {
    widen_rgb_row_scalar(t, s, d);
}
pub(super) fn widen_plane_impl_scalar(t: ScalarToken, s: &[u8], d: &mut [u16], channel: usize) {
    widen_plane_row_scalar(t, s, d, channel);
}
pub(super) fn fill_alpha_impl_scalar(t: ScalarToken, d: &mut [u16]) {
    fill_alpha_row_scalar(t, d);
}
