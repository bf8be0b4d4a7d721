use super::*;
use crate::foundation::error::SlidecastError;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba(rgba))
}

fn assert_close(got: [u8; 4], want: [u8; 4]) {
    for (g, w) in got.iter().zip(want.iter()) {
        assert!(g.abs_diff(*w) <= 2, "got {got:?}, want {want:?}");
    }
}

#[test]
fn contain_scales_by_min_and_centers() {
    let p = placement(200, 100, 100, 100, AspectMode::Contain);
    assert_eq!(
        p,
        Placement {
            x: 0.0,
            y: 25.0,
            width: 100.0,
            height: 50.0
        }
    );
}

#[test]
fn cover_scales_by_max_and_overflows() {
    let p = placement(200, 100, 100, 100, AspectMode::Cover);
    assert_eq!(
        p,
        Placement {
            x: -50.0,
            y: 0.0,
            width: 200.0,
            height: 100.0
        }
    );
}

#[test]
fn stretch_fills_canvas_and_match_equals_contain() {
    let p = placement(7, 3, 64, 32, AspectMode::Stretch);
    assert_eq!((p.x, p.y, p.width, p.height), (0.0, 0.0, 64.0, 32.0));

    assert_eq!(
        placement(7, 3, 64, 32, AspectMode::Match),
        placement(7, 3, 64, 32, AspectMode::Contain)
    );
}

#[test]
fn contain_draw_leaves_transparent_letterbox() {
    let mut frame = FrameRGBA::try_new(10, 10).unwrap();
    frame.fill([0, 255, 0, 255]);

    draw_image(&mut frame, &solid(20, 10, RED), AspectMode::Contain).unwrap();

    assert_eq!(frame.pixel(5, 0).unwrap(), [0, 0, 0, 0]);
    assert_eq!(frame.pixel(5, 1).unwrap(), [0, 0, 0, 0]);
    assert_close(frame.pixel(5, 4).unwrap(), RED);
    assert_close(frame.pixel(0, 3).unwrap(), RED);
    assert_eq!(frame.pixel(5, 9).unwrap(), [0, 0, 0, 0]);
}

#[test]
fn cover_draw_clips_overflow_symmetrically() {
    let mut src = solid(20, 10, RED);
    for y in 0..10 {
        for x in 10..20 {
            src.put_pixel(x, y, image::Rgba(BLUE));
        }
    }

    let mut frame = FrameRGBA::try_new(10, 10).unwrap();
    draw_image(&mut frame, &src, AspectMode::Cover).unwrap();

    // Columns 5..15 of the source survive the crop.
    assert_eq!(frame.pixel(0, 5).unwrap(), RED);
    assert_eq!(frame.pixel(4, 5).unwrap(), RED);
    assert_eq!(frame.pixel(5, 5).unwrap(), BLUE);
    assert_eq!(frame.pixel(9, 9).unwrap(), BLUE);
}

#[test]
fn stretch_draw_covers_every_pixel() {
    let mut frame = FrameRGBA::try_new(10, 6).unwrap();
    draw_image(&mut frame, &solid(4, 2, RED), AspectMode::Stretch).unwrap();
    for y in 0..6 {
        for x in 0..10 {
            assert_close(frame.pixel(x, y).unwrap(), RED);
        }
    }
}

#[test]
fn same_size_contain_is_a_straight_copy() {
    let mut src = solid(4, 4, RED);
    src.put_pixel(1, 2, image::Rgba([1, 2, 3, 4]));
    let mut frame = FrameRGBA::try_new(4, 4).unwrap();
    draw_image(&mut frame, &src, AspectMode::Contain).unwrap();
    assert_eq!(frame.data, src.into_raw());
}

#[test]
fn black_fill_is_opaque() {
    let mut frame = FrameRGBA::try_new(4, 2).unwrap();
    draw_image(&mut frame, &solid(4, 2, RED), AspectMode::Stretch).unwrap();
    draw_black(&mut frame);
    assert!(frame.data.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
}

#[test]
fn impossible_frame_is_resource_exhausted() {
    let err = FrameRGBA::try_new(u32::MAX, u32::MAX).unwrap_err();
    assert!(matches!(err, SlidecastError::ResourceExhausted(_)));
}
