use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u16(255, 128), 128);
    assert_eq!(mul_div255_u16(0, 200), 0);
}

#[test]
fn composite_over_opaque_background_flattens_alpha() {
    // Premultiplied red @ 50% over opaque blue.
    let mut px = vec![128u8, 0, 0, 128];
    composite_over_in_place(&mut px, [0, 0, 255, 255]);
    assert_eq!(px, vec![128, 0, 127, 255]);
}

#[test]
fn composite_over_leaves_opaque_pixels_alone() {
    let mut px = vec![10u8, 20, 30, 255];
    composite_over_in_place(&mut px, [200, 200, 200, 255]);
    assert_eq!(px, vec![10, 20, 30, 255]);
}

#[test]
fn composite_over_transparent_background_is_identity() {
    let mut px = vec![64u8, 32, 0, 128, 0, 0, 0, 0];
    composite_over_in_place(&mut px, [255, 255, 255, 0]);
    assert_eq!(px, vec![64, 32, 0, 128, 0, 0, 0, 0]);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let mut px = vec![128u8, 64, 0, 128, 9, 9, 9, 0, 1, 2, 3, 255];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![255, 128, 0, 128, 0, 0, 0, 0, 1, 2, 3, 255]);
}
