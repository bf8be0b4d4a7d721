use super::*;

#[test]
fn defaults_match_documented_values() {
    let cfg = EncodeConfig::default();
    assert_eq!(cfg.fps.get(), 30);
    assert_eq!(cfg.quality, 50);
    assert_eq!(cfg.resolution, Resolution::Source);
    assert_eq!(cfg.aspect_mode, AspectMode::Contain);
    assert_eq!(cfg.sync_mode, SyncMode::Video);
    assert_eq!(cfg.video_extend_mode, VideoExtendMode::Last);
    assert_eq!(cfg.bitrate_policy, BitratePolicy::Banded);
}

#[test]
fn resolution_parses_names_case_insensitively() {
    assert_eq!("source".parse::<Resolution>().unwrap(), Resolution::Source);
    assert_eq!(
        "1080P".parse::<Resolution>().unwrap(),
        Resolution::Preset(Preset::P1080)
    );
    assert_eq!(
        "4k".parse::<Resolution>().unwrap(),
        Resolution::Preset(Preset::K4)
    );
    assert!("999p".parse::<Resolution>().is_err());
}

#[test]
fn json_uses_lowercase_names() {
    let cfg = EncodeConfig::from_json_str(
        r#"{ "fps": 10, "resolution": "720p", "aspect_mode": "cover",
             "sync_mode": "audio", "video_extend_mode": "black" }"#,
    )
    .unwrap();
    assert_eq!(cfg.fps.get(), 10);
    assert_eq!(cfg.quality, 50);
    assert_eq!(cfg.resolution, Resolution::Preset(Preset::P720));
    assert_eq!(cfg.aspect_mode, AspectMode::Cover);
    assert_eq!(cfg.sync_mode, SyncMode::Audio);
    assert_eq!(cfg.video_extend_mode, VideoExtendMode::Black);

    let back = serde_json::to_value(&cfg).unwrap();
    assert_eq!(back["resolution"], "720p");
    assert_eq!(back["aspect_mode"], "cover");
}

#[test]
fn json_rejects_bad_fps_and_unknown_fields() {
    assert!(EncodeConfig::from_json_str(r#"{ "fps": 0 }"#).is_err());
    assert!(EncodeConfig::from_json_str(r#"{ "fps": 90 }"#).is_err());
    assert!(EncodeConfig::from_json_str(r#"{ "speed": 1 }"#).is_err());
}

#[test]
fn preset_sizes_are_stable() {
    assert_eq!(Preset::P480.size(), (854, 480));
    assert_eq!(Preset::K8.size(), (7680, 4320));
    for p in Preset::ALL {
        assert_eq!(p.name().parse::<Resolution>().unwrap(), Resolution::Preset(p));
    }
}
