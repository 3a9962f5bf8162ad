pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Composite premultiplied RGBA8 pixels over a straight-alpha background color, in place.
pub(crate) fn composite_over_in_place(rgba_premul: &mut [u8], bg_rgba: [u8; 4]) {
    let bg_a = u16::from(bg_rgba[3]);
    let bg = [
        mul_div255_u16(u16::from(bg_rgba[0]), bg_a),
        mul_div255_u16(u16::from(bg_rgba[1]), bg_a),
        mul_div255_u16(u16::from(bg_rgba[2]), bg_a),
        bg_a,
    ];

    for px in rgba_premul.chunks_exact_mut(4) {
        let inv = 255 - u16::from(px[3]);
        if inv == 0 {
            continue;
        }
        for (c, b) in px.iter_mut().zip(bg) {
            *c = (u16::from(*c) + mul_div255_u16(b, inv)).min(255) as u8;
        }
    }
}

/// Convert premultiplied RGBA8 into straight alpha, in place.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
