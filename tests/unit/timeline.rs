use super::*;

fn fps(v: u32) -> Fps {
    Fps::new(v).unwrap()
}

#[test]
fn video_sync_without_audio_keeps_every_image() {
    let t = reconcile(10, fps(30), None, SyncMode::Video, VideoExtendMode::Last).unwrap();
    assert_eq!(t.total_output_frames, 10);
    assert_eq!(t.frames_from_source, 10);
    assert_eq!(t.extension_frames, 0);
    assert_eq!(t.audio_trim_sec, None);
    assert!((t.output_duration_sec() - 10.0 / 30.0).abs() < 1e-9);
}

#[test]
fn video_sync_ignores_audio_length_and_trims_it() {
    for audio in [0.1, 1.0, 3.7, 120.0] {
        let t = reconcile(
            5,
            fps(10),
            Some(audio),
            SyncMode::Video,
            VideoExtendMode::Black,
        )
        .unwrap();
        assert_eq!(t.total_output_frames, 5);
        assert_eq!(t.extension_frames, 0);
        assert_eq!(t.extend_mode, None);
        let trim = t.audio_trim_sec.unwrap();
        assert!((trim - 0.5).abs() < 1e-9);
    }
}

#[test]
fn audio_sync_without_audio_behaves_like_video_sync() {
    let t = reconcile(4, fps(24), None, SyncMode::Audio, VideoExtendMode::Black).unwrap();
    assert_eq!(t.total_output_frames, 4);
    assert_eq!(t.extension_frames, 0);
    assert_eq!(t.audio_trim_sec, None);
}

#[test]
fn audio_longer_extends_with_black() {
    let t = reconcile(5, fps(10), Some(2.0), SyncMode::Audio, VideoExtendMode::Black).unwrap();
    assert_eq!(t.total_output_frames, 20);
    assert_eq!(t.frames_from_source, 5);
    assert_eq!(t.extension_frames, 15);
    assert_eq!(t.extend_mode, Some(VideoExtendMode::Black));
    assert_eq!(t.audio_trim_sec, None);
}

#[test]
fn audio_shorter_drops_trailing_images() {
    let t = reconcile(5, fps(10), Some(0.2), SyncMode::Audio, VideoExtendMode::Last).unwrap();
    assert_eq!(t.total_output_frames, 2);
    assert_eq!(t.frames_from_source, 2);
    assert_eq!(t.extension_frames, 0);
    assert_eq!(t.extend_mode, None);
}

#[test]
fn audio_equal_to_images_neither_trims_nor_extends() {
    let t = reconcile(5, fps(10), Some(0.5), SyncMode::Audio, VideoExtendMode::Black).unwrap();
    assert_eq!(t.total_output_frames, 5);
    assert_eq!(t.frames_from_source, 5);
    assert_eq!(t.extension_frames, 0);
    assert_eq!(t.extend_mode, None);
    assert_eq!(t.audio_trim_sec, None);
}

#[test]
fn audio_within_half_a_frame_rounds_to_equal() {
    // 0.54s at 10fps rounds to 5 frames even though the audio is slightly longer.
    let t = reconcile(5, fps(10), Some(0.54), SyncMode::Audio, VideoExtendMode::Last).unwrap();
    assert_eq!(t.total_output_frames, 5);
    assert_eq!(t.extension_frames, 0);

    let t = reconcile(5, fps(10), Some(0.46), SyncMode::Audio, VideoExtendMode::Last).unwrap();
    assert_eq!(t.total_output_frames, 5);
    assert_eq!(t.frames_from_source, 5);
}

#[test]
fn very_short_audio_still_yields_one_frame() {
    let t = reconcile(8, fps(30), Some(0.001), SyncMode::Audio, VideoExtendMode::Last).unwrap();
    assert_eq!(t.total_output_frames, 1);
    assert_eq!(t.frames_from_source, 1);
}

#[test]
fn audio_sync_total_is_rounded_duration_times_fps() {
    for f in [1u32, 7, 24, 25, 30, 60] {
        for d in [0.01, 0.33, 1.0, 2.5, 9.99, 61.3] {
            for n in [1u64, 3, 30, 500] {
                let t = reconcile(n, fps(f), Some(d), SyncMode::Audio, VideoExtendMode::Last)
                    .unwrap();
                let want = ((d * f64::from(f)).round() as u64).max(1);
                assert_eq!(t.total_output_frames, want, "n={n} f={f} d={d}");
                assert_eq!(
                    t.frames_from_source + t.extension_frames,
                    t.total_output_frames
                );
                assert!(t.frames_from_source <= n);
                if t.extension_frames > 0 {
                    assert_eq!(t.frames_from_source, n);
                    assert!(d > t.source_video_duration_sec());
                }
                if t.frames_from_source < n {
                    assert!(d < t.source_video_duration_sec());
                }
            }
        }
    }
}

#[test]
fn timestamps_advance_by_frame_duration() {
    let t = reconcile(3, fps(4), None, SyncMode::Video, VideoExtendMode::Last).unwrap();
    assert_eq!(t.timestamp_sec(FrameIndex(0)), 0.0);
    assert!((t.timestamp_sec(FrameIndex(3)) - 0.75).abs() < 1e-12);
}

#[test]
fn empty_sequence_is_rejected() {
    let err = reconcile(0, fps(30), None, SyncMode::Video, VideoExtendMode::Last).unwrap_err();
    assert!(matches!(err, SlidecastError::EmptyInput(_)));
}

#[test]
fn non_positive_audio_duration_is_rejected() {
    for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(reconcile(3, fps(30), Some(d), SyncMode::Audio, VideoExtendMode::Last).is_err());
    }
}
