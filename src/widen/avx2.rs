use archmage::prelude::*;

// ===========================================================================
// SIMD constants
// ===========================================================================

// Chunky RGB bytes -> RGBA bytes with a zero alpha slot (4 pixels per shuffle;
// the zero slot is widened and then OR-ed to 255).
const RGB_TO_RGBA_SHUF_SSE: [i8; 16] = [0, 1, 2, -128, 3, 4, 5, -128, 6, 7, 8, -128, 9, 10, 11, -128];

// OR mask setting the alpha u16 lane (3, 7, 11, 15) of widened pixels to 255.
const ALPHA_FF_WIDE_AVX: [i8; 32] = [
    0, 0, 0, 0, 0, 0, -1, 0, 0, 0, 0, 0, 0, 0, -1, 0, 0, 0, 0, 0, 0, 0, -1, 0, 0, 0, 0, 0, 0, 0,
    -1, 0,
];

// AND mask clearing the alpha u16 lanes while preserving R, G, B.
const KEEP_RGB_WIDE_AVX: [i8; 32] = [
    -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1,
    -1, -1, -1, -1, -1, 0, 0,
];

// Per-channel scatter shuffles: 4 plane bytes broadcast to every dword
// (set1_epi32) land in the low byte of their channel's u16 lane, 4 pixels per
// 32-byte block. Lane 0 covers pixels 0-1, lane 1 pixels 2-3.
const PLANE_SCATTER_AVX: [[i8; 32]; 4] = [
    [
        0, -128, -128, -128, -128, -128, -128, -128, 1, -128, -128, -128, -128, -128, -128, -128,
        2, -128, -128, -128, -128, -128, -128, -128, 3, -128, -128, -128, -128, -128, -128, -128,
    ],
    [
        -128, -128, 0, -128, -128, -128, -128, -128, -128, -128, 1, -128, -128, -128, -128, -128,
        -128, -128, 2, -128, -128, -128, -128, -128, -128, -128, 3, -128, -128, -128, -128, -128,
    ],
    [
        -128, -128, -128, -128, 0, -128, -128, -128, -128, -128, -128, -128, 1, -128, -128, -128,
        -128, -128, -128, -128, 2, -128, -128, -128, -128, -128, -128, -128, 3, -128, -128, -128,
    ],
    [
        -128, -128, -128, -128, -128, -128, 0, -128, -128, -128, -128, -128, -128, -128, 1, -128,
        -128, -128, -128, -128, -128, -128, 2, -128, -128, -128, -128, -128, -128, -128, 3, -128,
    ],
];

// Per-channel AND masks zeroing the target channel's u16 lanes before the
// scattered bytes are OR-ed in, so other channels pass through untouched.
const PLANE_KEEP_AVX: [[i8; 32]; 4] = [
    [
        0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1,
        0, 0, -1, -1, -1, -1, -1, -1,
    ],
    [
        -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1,
        -1, -1, 0, 0, -1, -1, -1, -1,
    ],
    [
        -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1,
        -1, -1, -1, -1, 0, 0, -1, -1,
    ],
    [
        -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0, -1, -1, -1, -1, -1, -1, 0, 0,
        -1, -1, -1, -1, -1, -1, 0, 0,
    ],
];

// ===========================================================================
// x86-64 AVX2 — rite row implementations
// ===========================================================================

#[rite]
pub(super) fn widen_rgba_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u16]) {
    let slen = src.len();
    let mut is = 0;
    {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while is + 16 <= slen && id + 32 <= dlen {
            let s: &[u8; 16] = src[is..is + 16].try_into().unwrap();
            let v = safe_unaligned_simd::x86_64::_mm_loadu_si128(s);
            let wide = _mm256_cvtepu8_epi16(v);
            let d: &mut [u8; 32] = (&mut dst_b[id..id + 32]).try_into().unwrap();
            safe_unaligned_simd::x86_64::_mm256_storeu_si256(d, wide);
            is += 16;
            id += 32;
        }
    }
    for (s, d) in src[is..].iter().zip(dst[is..].iter_mut()) {
        *d = u16::from(*s);
    }
}

#[rite]
pub(super) fn widen_rgb_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u16]) {
    let shuf = safe_unaligned_simd::x86_64::_mm_loadu_si128(&RGB_TO_RGBA_SHUF_SSE);
    let alpha = safe_unaligned_simd::x86_64::_mm256_loadu_si256(&ALPHA_FF_WIDE_AVX);
    let slen = src.len();
    let mut is = 0;
    {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while is + 16 <= slen && id + 32 <= dlen {
            let s: &[u8; 16] = src[is..is + 16].try_into().unwrap();
            let v = safe_unaligned_simd::x86_64::_mm_loadu_si128(s);
            let rgba8 = _mm_shuffle_epi8(v, shuf);
            let wide = _mm256_cvtepu8_epi16(rgba8);
            let d: &mut [u8; 32] = (&mut dst_b[id..id + 32]).try_into().unwrap();
            safe_unaligned_simd::x86_64::_mm256_storeu_si256(d, _mm256_or_si256(wide, alpha));
            is += 12;
            id += 32;
        }
    }
    for (s, d) in src[is..]
        .chunks_exact(3)
        .zip(dst[is / 3 * 4..].chunks_exact_mut(4))
    {
        d[0] = u16::from(s[0]);
        d[1] = u16::from(s[1]);
        d[2] = u16::from(s[2]);
        d[3] = 0xFF;
    }
}

#[rite]
pub(super) fn widen_plane_row_v3(_token: X64V3Token, src: &[u8], dst: &mut [u16], channel: usize) {
    let scatter = safe_unaligned_simd::x86_64::_mm256_loadu_si256(&PLANE_SCATTER_AVX[channel]);
    let keep = safe_unaligned_simd::x86_64::_mm256_loadu_si256(&PLANE_KEEP_AVX[channel]);
    let slen = src.len();
    let mut is = 0;
    {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while is + 4 <= slen && id + 32 <= dlen {
            let group = u32::from_ne_bytes(src[is..is + 4].try_into().unwrap());
            let v = _mm256_set1_epi32(group as i32);
            let scat = _mm256_shuffle_epi8(v, scatter);
            let cur_ref: &[u8; 32] = dst_b[id..id + 32].try_into().unwrap();
            let cur = safe_unaligned_simd::x86_64::_mm256_loadu_si256(cur_ref);
            let merged = _mm256_or_si256(_mm256_and_si256(cur, keep), scat);
            let d: &mut [u8; 32] = (&mut dst_b[id..id + 32]).try_into().unwrap();
            safe_unaligned_simd::x86_64::_mm256_storeu_si256(d, merged);
            is += 4;
            id += 32;
        }
    }
    for (s, d) in src[is..].iter().zip(dst[is * 4..].chunks_exact_mut(4)) {
        d[channel] = u16::from(*s);
    }
}

#[rite]
pub(super) fn fill_alpha_row_v3(_token: X64V3Token, dst: &mut [u16]) {
    let alpha = safe_unaligned_simd::x86_64::_mm256_loadu_si256(&ALPHA_FF_WIDE_AVX);
    let keep = safe_unaligned_simd::x86_64::_mm256_loadu_si256(&KEEP_RGB_WIDE_AVX);
    let tail = {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while id + 32 <= dlen {
            let cur_ref: &[u8; 32] = dst_b[id..id + 32].try_into().unwrap();
            let cur = safe_unaligned_simd::x86_64::_mm256_loadu_si256(cur_ref);
            let merged = _mm256_or_si256(_mm256_and_si256(cur, keep), alpha);
            let d: &mut [u8; 32] = (&mut dst_b[id..id + 32]).try_into().unwrap();
            safe_unaligned_simd::x86_64::_mm256_storeu_si256(d, merged);
            id += 32;
        }
        id / 2
    };
    for px in dst[tail..].chunks_exact_mut(4) {
        px[3] = 0xFF;
    }
}

// ===========================================================================
// x86-64 arcane wrappers
// ===========================================================================

#[arcane]
pub(super) fn widen_rgba_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u16]) {
    widen_rgba_row_v3(t, s, d);
}
#[arcane]
pub(super) fn widen_rgb_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u16]) {
    widen_rgb_row_v3(t, s, d);
}
#[arcane]
pub(super) fn widen_plane_impl_v3(t: X64V3Token, s: &[u8], d: &mut [u16], channel: usize) {
    widen_plane_row_v3(t, s, d, channel);
}
#[arcane]
pub(super) fn fill_alpha_impl_v3(t: X64V3Token, d: &mut [u16]) {
    fill_alpha_row_v3(t, d);
}
