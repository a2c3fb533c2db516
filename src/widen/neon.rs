use archmage::prelude::*;

// ===========================================================================
// ARM NEON — rite row implementations
// ===========================================================================

// u16 output is produced with vqtbl1q byte tables: the low byte of each u16
// lane picks a source byte, the high byte stays zero (index 0x80).

#[rite]
pub(super) fn widen_rgba_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u16]) {
    use core::arch::aarch64::vqtbl1q_u8;
    let lo_mask: [u8; 16] = [
        0, 0x80, 1, 0x80, 2, 0x80, 3, 0x80, 4, 0x80, 5, 0x80, 6, 0x80, 7, 0x80,
    ];
    let hi_mask: [u8; 16] = [
        8, 0x80, 9, 0x80, 10, 0x80, 11, 0x80, 12, 0x80, 13, 0x80, 14, 0x80, 15, 0x80,
    ];
    let lo = safe_unaligned_simd::aarch64::vld1q_u8(&lo_mask);
    let hi = safe_unaligned_simd::aarch64::vld1q_u8(&hi_mask);
    let slen = src.len();
    let mut is = 0;
    {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while is + 16 <= slen && id + 32 <= dlen {
            let s: &[u8; 16] = src[is..is + 16].try_into().unwrap();
            let v = safe_unaligned_simd::aarch64::vld1q_u8(s);
            let d0: &mut [u8; 16] = (&mut dst_b[id..id + 16]).try_into().unwrap();
            safe_unaligned_simd::aarch64::vst1q_u8(d0, vqtbl1q_u8(v, lo));
            let d1: &mut [u8; 16] = (&mut dst_b[id + 16..id + 32]).try_into().unwrap();
            safe_unaligned_simd::aarch64::vst1q_u8(d1, vqtbl1q_u8(v, hi));
            is += 16;
            id += 32;
        }
    }
    for (s, d) in src[is..].iter().zip(dst[is..].iter_mut()) {
        *d = u16::from(*s);
    }
}

#[rite]
pub(super) fn widen_rgb_row_arm_v2(_token: Arm64V2Token, src: &[u8], dst: &mut [u16]) {
    use core::arch::aarch64::{vorrq_u8, vqtbl1q_u8};
    // Two pixels per store: RGB triples widen into u16 lanes, alpha OR-ed in.
    let m0b: [u8; 16] = [
        0, 0x80, 1, 0x80, 2, 0x80, 0x80, 0x80, 3, 0x80, 4, 0x80, 5, 0x80, 0x80, 0x80,
    ];
    let m1b: [u8; 16] = [
        6, 0x80, 7, 0x80, 8, 0x80, 0x80, 0x80, 9, 0x80, 10, 0x80, 11, 0x80, 0x80, 0x80,
    ];
    let ab: [u8; 16] = [0, 0, 0, 0, 0, 0, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0];
    let m0 = safe_unaligned_simd::aarch64::vld1q_u8(&m0b);
    let m1 = safe_unaligned_simd::aarch64::vld1q_u8(&m1b);
    let alpha = safe_unaligned_simd::aarch64::vld1q_u8(&ab);
    let slen = src.len();
    let mut is = 0;
    {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while is + 16 <= slen && id + 32 <= dlen {
            let s: &[u8; 16] = src[is..is + 16].try_into().unwrap();
            let v = safe_unaligned_simd::aarch64::vld1q_u8(s);
            let d0: &mut [u8; 16] = (&mut dst_b[id..id + 16]).try_into().unwrap();
            safe_unaligned_simd::aarch64::vst1q_u8(d0, vorrq_u8(vqtbl1q_u8(v, m0), alpha));
            let d1: &mut [u8; 16] = (&mut dst_b[id + 16..id + 32]).try_into().unwrap();
            safe_unaligned_simd::aarch64::vst1q_u8(d1, vorrq_u8(vqtbl1q_u8(v, m1), alpha));
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
pub(super) fn widen_plane_row_arm_v2(
    _token: Arm64V2Token,
    src: &[u8],
    dst: &mut [u16],
    channel: usize,
) {
    use core::arch::aarch64::{vandq_u8, vorrq_u8, vqtbl1q_u8};
    // Eight read-modify-write stores of two pixels each consume one 16-byte
    // plane load; the keep mask zeroes the target channel's u16 lanes first.
    let masks: [[u8; 16]; 8] = core::array::from_fn(|j| {
        core::array::from_fn(|k| {
            let lane = k / 2;
            if k % 2 == 0 && lane % 4 == channel {
                (j * 2 + lane / 4) as u8
            } else {
                0x80
            }
        })
    });
    let keep_b: [u8; 16] =
        core::array::from_fn(|k| if (k / 2) % 4 == channel { 0 } else { 0xFF });
    let m: [_; 8] = core::array::from_fn(|j| safe_unaligned_simd::aarch64::vld1q_u8(&masks[j]));
    let keep = safe_unaligned_simd::aarch64::vld1q_u8(&keep_b);
    let slen = src.len();
    let mut is = 0;
    {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while is + 16 <= slen && id + 128 <= dlen {
            let s: &[u8; 16] = src[is..is + 16].try_into().unwrap();
            let v = safe_unaligned_simd::aarch64::vld1q_u8(s);
            for (j, mask) in m.iter().enumerate() {
                let off = id + j * 16;
                let cur_ref: &[u8; 16] = dst_b[off..off + 16].try_into().unwrap();
                let cur = safe_unaligned_simd::aarch64::vld1q_u8(cur_ref);
                let merged = vorrq_u8(vandq_u8(cur, keep), vqtbl1q_u8(v, *mask));
                let d: &mut [u8; 16] = (&mut dst_b[off..off + 16]).try_into().unwrap();
                safe_unaligned_simd::aarch64::vst1q_u8(d, merged);
            }
            is += 16;
            id += 128;
        }
    }
    for (s, d) in src[is..].iter().zip(dst[is * 4..].chunks_exact_mut(4)) {
        d[channel] = u16::from(*s);
    }
}

#[rite]
pub(super) fn fill_alpha_row_arm_v2(_token: Arm64V2Token, dst: &mut [u16]) {
    use core::arch::aarch64::{vandq_u8, vorrq_u8};
    let ab: [u8; 16] = [0, 0, 0, 0, 0, 0, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0];
    let kb: [u8; 16] = [
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0,
    ];
    let alpha = safe_unaligned_simd::aarch64::vld1q_u8(&ab);
    let keep = safe_unaligned_simd::aarch64::vld1q_u8(&kb);
    let tail = {
        let dst_b = bytemuck::cast_slice_mut::<u16, u8>(dst);
        let dlen = dst_b.len();
        let mut id = 0;
        while id + 16 <= dlen {
            let cur_ref: &[u8; 16] = dst_b[id..id + 16].try_into().unwrap();
            let cur = safe_unaligned_simd::aarch64::vld1q_u8(cur_ref);
            let d: &mut [u8; 16] = (&mut dst_b[id..id + 16]).try_into().unwrap();
            safe_unaligned_simd::aarch64::vst1q_u8(d, vorrq_u8(vandq_u8(cur, keep), alpha));
            id += 16;
        }
        id / 2
    };
    for px in dst[tail..].chunks_exact_mut(4) {
        px[3] = 0xFF;
    }
}

// ===========================================================================
// ARM arcane wrappers
// ===========================================================================

#[arcane]
pub(super) fn widen_rgba_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u16]) {
    widen_rgba_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn widen_rgb_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u16]) {
    widen_rgb_row_arm_v2(t, s, d);
}
#[arcane]
pub(super) fn widen_plane_impl_arm_v2(t: Arm64V2Token, s: &[u8], d: &mut [u16], channel: usize) {
    widen_plane_row_arm_v2(t, s, d, channel);
}
#[arcane]
pub(super) fn fill_alpha_impl_arm_v2(t: Arm64V2Token, d: &mut [u16]) {
    fill_alpha_row_arm_v2(t, d);
}
