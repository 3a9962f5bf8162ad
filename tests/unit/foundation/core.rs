use super::*;

#[test]
fn delay_from_fps_rounds_denominator() {
    assert_eq!(Delay::from_fps(30.0).unwrap(), Delay::new(1, 30));
    assert_eq!(Delay::from_fps(29.97).unwrap(), Delay::new(1, 30));
    assert_eq!(Delay::from_fps(0.2).unwrap(), Delay::new(1, 1));
    assert_eq!(Delay::from_fps(1.0e9).unwrap(), Delay::new(1, u16::MAX));
}

#[test]
fn delay_from_fps_rejects_bad_values() {
    assert!(Delay::from_fps(0.0).is_err());
    assert!(Delay::from_fps(-5.0).is_err());
    assert!(Delay::from_fps(f64::NAN).is_err());
    assert!(Delay::from_fps(f64::INFINITY).is_err());
}

#[test]
fn delay_zero_denominator_reads_as_hundredths() {
    assert_eq!(Delay::new(5, 0).as_secs(), 0.05);
    assert_eq!(Delay::new(1, 4).as_secs(), 0.25);
    assert_eq!(Delay::default(), Delay::new(1, 100));
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 4).is_err());
    assert!(Canvas::new(4, 0).is_err());
    assert_eq!(Canvas::new(3, 4).unwrap().width, 3);
}
