use super::*;
use crate::config::Preset;

const ALL_ASPECTS: [AspectMode; 4] = [
    AspectMode::Match,
    AspectMode::Contain,
    AspectMode::Cover,
    AspectMode::Stretch,
];

fn resolutions() -> Vec<Resolution> {
    let mut out = vec![Resolution::Source];
    out.extend(Preset::ALL.into_iter().map(Resolution::Preset));
    out
}

#[test]
fn source_keeps_natural_size_rounded_even() {
    let g = resolve_dimensions((641, 361), Resolution::Source, AspectMode::Contain).unwrap();
    assert_eq!((g.width, g.height), (640, 360));
    assert!(!g.was_clamped);
}

#[test]
fn preset_is_used_verbatim_outside_match() {
    for aspect in [AspectMode::Contain, AspectMode::Cover, AspectMode::Stretch] {
        let g = resolve_dimensions((100, 900), Resolution::Preset(Preset::P720), aspect).unwrap();
        assert_eq!((g.width, g.height), (1280, 720));
    }
}

#[test]
fn match_fits_wide_and_tall_sources_inside_box() {
    let wide = resolve_dimensions(
        (2000, 500),
        Resolution::Preset(Preset::P1080),
        AspectMode::Match,
    )
    .unwrap();
    assert_eq!((wide.width, wide.height), (1920, 480));

    let tall = resolve_dimensions(
        (1080, 1920),
        Resolution::Preset(Preset::P1080),
        AspectMode::Match,
    )
    .unwrap();
    // round(1080 * 0.5625) = 608
    assert_eq!((tall.width, tall.height), (608, 1080));
}

#[test]
fn oversized_source_is_clamped_with_aspect_preserved() {
    let g = resolve_dimensions((7000, 3000), Resolution::Source, AspectMode::Contain).unwrap();
    assert!(g.was_clamped);
    assert!(g.width <= MAX_WIDTH && g.height <= MAX_HEIGHT);
    assert_eq!(g.width % 2, 0);
    assert_eq!(g.height % 2, 0);
    assert!(g.width >= 4094);
    let src_aspect = 7000.0 / 3000.0;
    assert!((g.aspect() - src_aspect).abs() < 0.01);
}

#[test]
fn eight_k_preset_is_clamped_to_ceiling() {
    let g = resolve_dimensions((10, 10), Resolution::Preset(Preset::K8), AspectMode::Stretch)
        .unwrap();
    assert!(g.was_clamped);
    assert_eq!((g.width, g.height), (3840, 2160));
}

#[test]
fn zero_sized_source_is_invalid_input() {
    let err = resolve_dimensions((0, 10), Resolution::Source, AspectMode::Contain).unwrap_err();
    assert!(matches!(err, SlidecastError::InvalidInput(_)));
    assert!(resolve_dimensions((10, 0), Resolution::Source, AspectMode::Contain).is_err());
}

#[test]
fn tiny_sources_never_collapse_below_two() {
    let g = resolve_dimensions((1, 1), Resolution::Source, AspectMode::Contain).unwrap();
    assert_eq!((g.width, g.height), (2, 2));

    let g = resolve_dimensions((1, 5000), Resolution::Preset(Preset::P360), AspectMode::Match)
        .unwrap();
    assert_eq!(g.width, 2);
}

#[test]
fn outputs_are_even_and_within_ceiling_for_all_configs() {
    let sources = [
        (1, 1),
        (3, 7),
        (640, 480),
        (1919, 1081),
        (4097, 2161),
        (7000, 3000),
        (3000, 7000),
        (12000, 12000),
        (8191, 33),
    ];
    for src in sources {
        for res in resolutions() {
            for aspect in ALL_ASPECTS {
                let g = resolve_dimensions(src, res, aspect).unwrap();
                assert_eq!(g.width % 2, 0, "{src:?} {res} {aspect:?}");
                assert_eq!(g.height % 2, 0, "{src:?} {res} {aspect:?}");
                assert!(g.width >= 2 && g.height >= 2);
                assert!(g.width <= MAX_WIDTH, "{src:?} {res} {aspect:?} -> {g:?}");
                assert!(g.height <= MAX_HEIGHT, "{src:?} {res} {aspect:?} -> {g:?}");
            }
        }
    }
}

#[test]
fn match_preserves_source_aspect_within_rounding() {
    let sources = [
        (640, 480),
        (1920, 1080),
        (1080, 1920),
        (1000, 1000),
        (4000, 1000),
        (300, 1200),
        (2592, 1944),
    ];
    for src in sources {
        for preset in Preset::ALL {
            let g = resolve_dimensions(src, Resolution::Preset(preset), AspectMode::Match).unwrap();
            let src_aspect = f64::from(src.0) / f64::from(src.1);
            let tolerance = 4.0 / f64::from(g.width.min(g.height));
            let rel = (g.aspect() / src_aspect - 1.0).abs();
            assert!(
                rel <= tolerance,
                "{src:?} in {} -> {g:?} (rel {rel}, tol {tolerance})",
                preset.name()
            );
        }
    }
}
