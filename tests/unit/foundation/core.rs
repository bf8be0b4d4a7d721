use super::*;

#[test]
fn fps_rejects_out_of_range() {
    assert!(Fps::new(0).is_err());
    assert!(Fps::new(61).is_err());
    assert_eq!(Fps::new(1).unwrap().get(), 1);
    assert_eq!(Fps::new(60).unwrap().get(), 60);
}

#[test]
fn fps_frame_duration() {
    let fps = Fps::new(10).unwrap();
    assert!((fps.frame_duration_secs() - 0.1).abs() < 1e-12);
    assert!((fps.frames_to_secs(5) - 0.5).abs() < 1e-12);
}

#[test]
fn fps_serde_is_a_plain_integer() {
    let fps: Fps = serde_json::from_str("24").unwrap();
    assert_eq!(fps.get(), 24);
    assert_eq!(serde_json::to_string(&fps).unwrap(), "24");
    assert!(serde_json::from_str::<Fps>("0").is_err());
}

#[test]
fn geometry_pixel_count_and_aspect() {
    let g = TargetGeometry {
        width: 1920,
        height: 1080,
        was_clamped: false,
    };
    assert_eq!(g.pixel_count(), 2_073_600);
    assert!((g.aspect() - 16.0 / 9.0).abs() < 1e-9);
}
