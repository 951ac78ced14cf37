use std::path::PathBuf;
use std::time::Duration;

/// Artist shown for files without an artist tag.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Metadata snapshot for one audio file.
///
/// Created once at scan/pick time and never mutated; rescanning produces new records.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    /// `Duration::ZERO` when unknown.
    pub duration: Duration,
    /// Uppercased extension without the dot, e.g. `"FLAC"`.
    pub extension: String,
    pub filename: String,
    /// 0 when absent or unparseable.
    pub track_number: u32,
    pub sample_rate: Option<u32>,
    pub bit_depth: Option<u8>,
}

impl Track {
    /// Format badge such as `FLAC | 24-BIT | 96 KHZ`.
    pub fn format_badge(&self) -> String {
        let mut parts = vec![self.extension.clone()];
        if let Some(bits) = self.bit_depth {
            parts.push(format!("{bits}-BIT"));
        }
        if let Some(rate) = self.sample_rate {
            let khz = rate as f64 / 1000.0;
            if khz.fract() == 0.0 {
                parts.push(format!("{khz:.0} KHZ"));
            } else {
                parts.push(format!("{khz:.1} KHZ"));
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" | ")
    }
}
