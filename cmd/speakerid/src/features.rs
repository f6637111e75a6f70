//! Feature file loading.

use std::path::Path;

use anyhow::Context as _;
use speakerid_dtw::FeatureSequence;

/// Loads a feature sequence from `path`.
///
/// `.json` files hold an array of frames (`[[f32, ...], ...]`). Anything
/// else is read as text, one frame per line.
pub fn load_features(path: &str) -> anyhow::Result<FeatureSequence> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading feature file {path}"))?;
    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content).with_context(|| format!("parsing feature file {path}"))
    } else {
        parse_text(&content).with_context(|| format!("parsing feature file {path}"))
    }
}

/// Parses one frame per line; components are separated by whitespace or
/// commas. Blank lines and `#` comments are ignored.
pub fn parse_text(content: &str) -> anyhow::Result<FeatureSequence> {
    let mut frames: Vec<Vec<f32>> = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = match line.find('#') {
            Some(i) => &line[..i],
            None => line,
        };
        let frame = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<f32>()
                    .with_context(|| format!("line {}: invalid number {s:?}", lineno + 1))
            })
            .collect::<anyhow::Result<Vec<f32>>>()?;
        if !frame.is_empty() {
            frames.push(frame);
        }
    }
    Ok(FeatureSequence::from_frames(frames)?)
}
