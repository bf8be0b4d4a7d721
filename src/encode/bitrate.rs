use crate::config::BitratePolicy;
use crate::foundation::core::TargetGeometry;

/// AAC bitrate used whenever an audio track is muxed.
pub const AUDIO_BITRATE_BPS: u32 = 192_000;

const PROPORTIONAL_MIN_BPS: u64 = 5_000_000;
const PROPORTIONAL_MAX_BPS: u64 = 50_000_000;
const PROPORTIONAL_BPS_PER_PIXEL: u64 = 6;

/// Coarse quality tier selected from the 1..=100 quality scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityBand {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl QualityBand {
    /// Band for `quality`, clamped to `1..=100` first.
    pub fn from_quality(quality: u32) -> Self {
        match quality.clamp(1, 100) {
            ..=20 => QualityBand::VeryLow,
            21..=40 => QualityBand::Low,
            41..=60 => QualityBand::Medium,
            61..=80 => QualityBand::High,
            _ => QualityBand::VeryHigh,
        }
    }

    pub fn bitrate_bps(self) -> u32 {
        match self {
            QualityBand::VeryLow => 1_000_000,
            QualityBand::Low => 2_500_000,
            QualityBand::Medium => 5_000_000,
            QualityBand::High => 8_000_000,
            QualityBand::VeryHigh => 16_000_000,
        }
    }
}

/// Video bitrate for one run. Fixed at encoder initialization.
pub fn video_bitrate_bps(quality: u32, policy: BitratePolicy, geometry: TargetGeometry) -> u32 {
    match policy {
        BitratePolicy::Banded => QualityBand::from_quality(quality).bitrate_bps(),
        BitratePolicy::Proportional => (geometry.pixel_count() * PROPORTIONAL_BPS_PER_PIXEL)
            .clamp(PROPORTIONAL_MIN_BPS, PROPORTIONAL_MAX_BPS)
            as u32,
    }
}
