// src/media.rs - FFmpeg helpers for audio conversion and thumbnails
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

lazy_static::lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#?(?P<hex>[0-9a-fA-F]{6})$").unwrap();
    static ref NAMED_COLOR: Regex = Regex::new(r"^[a-zA-Z]{3,20}$").unwrap();
    static ref THUMBNAIL_NAME: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}\.jpg$").unwrap();
}

pub const DEFAULT_THUMBNAIL_WIDTH: u32 = 1280;
pub const DEFAULT_THUMBNAIL_HEIGHT: u32 = 720;
pub const DEFAULT_FRAME_TIMESTAMP: f64 = 1.0;
const MAX_THUMBNAIL_DIMENSION: u32 = 3840;

/// Execute FFmpeg command with error handling
pub fn execute_ffmpeg_command(mut command: Command) -> Result<String, String> {
    tracing::debug!("Executing FFmpeg: {:?}", command);

    let output = command
        .output()
        .map_err(|e| format!("Failed to execute FFmpeg: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("FFmpeg error: {}", stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Check if FFmpeg is available on PATH
pub fn check_ffmpeg_available() -> Result<(), String> {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map_err(|_| "FFmpeg not found. Please install FFmpeg.".to_string())?;
    Ok(())
}

/// Convert any audio (or video) file to 16 kHz mono 16-bit PCM WAV,
/// the format the speech recognizer expects.
pub fn convert_to_wav(input_file: &Path, output_file: &Path) -> Result<String, String> {
    let mut command = Command::new("ffmpeg");
    command
        .arg("-i")
        .arg(input_file)
        .arg("-vn")
        .arg("-ac")
        .arg("1")
        .arg("-ar")
        .arg("16000")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-y")
        .arg(output_file);

    execute_ffmpeg_command(command)
}

/// Extract a single frame at `timestamp` seconds, scaled to width x height.
pub fn create_thumbnail_scaled(
    input_file: &Path,
    output_file: &Path,
    timestamp: f64,
    width: u32,
    height: u32,
) -> Result<String, String> {
    let mut command = Command::new("ffmpeg");
    command
        .arg("-ss")
        .arg(timestamp.max(0.0).to_string())
        .arg("-i")
        .arg(input_file)
        .arg("-vframes")
        .arg("1")
        .arg("-vf")
        .arg(format!("scale={}:{}", width, height))
        .arg("-q:v")
        .arg("2")
        .arg("-y")
        .arg(output_file);

    execute_ffmpeg_command(command)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailStyle {
    pub text: String,
    pub background_color: String,
    pub text_color: String,
    pub font_size: u32,
    pub width: u32,
    pub height: u32,
    pub font_file: Option<String>,
}

impl Default for ThumbnailStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            background_color: "#1a1a2e".to_string(),
            text_color: "white".to_string(),
            font_size: 72,
            width: DEFAULT_THUMBNAIL_WIDTH,
            height: DEFAULT_THUMBNAIL_HEIGHT,
            font_file: None,
        }
    }
}

/// Normalize a user colour into FFmpeg syntax: `#ff0000` -> `0xff0000`,
/// named colours pass through lowercased.
pub fn ffmpeg_color(color: &str) -> Result<String, String> {
    let color = color.trim();
    if let Some(caps) = HEX_COLOR.captures(color) {
        return Ok(format!("0x{}", caps["hex"].to_lowercase()));
    }
    if NAMED_COLOR.is_match(color) {
        return Ok(color.to_lowercase());
    }
    Err(format!("Invalid color: {}", color))
}

pub fn validate_dimensions(width: u32, height: u32) -> Result<(), String> {
    let valid = |d: u32| (16..=MAX_THUMBNAIL_DIMENSION).contains(&d);
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(format!(
            "Thumbnail dimensions must be between 16 and {} pixels",
            MAX_THUMBNAIL_DIMENSION
        ))
    }
}

/// True for names produced by this service (`<uuid>.jpg`); rejects
/// anything that could escape the thumbnail directory.
pub fn is_thumbnail_file_name(name: &str) -> bool {
    THUMBNAIL_NAME.is_match(name)
}

/// Escape a filter option value for both levels FFmpeg parses: the
/// option string (`\`, `'`, `:`) and then the filtergraph around it.
fn escape_filter_value(value: &str) -> String {
    let escape = |input: &str, special: &[char]| {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            if special.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
        out
    };
    let option = escape(value, &['\\', '\'', ':']);
    escape(&option, &['\\', '\'', '[', ']', ',', ';'])
}

fn drawtext_filter(style: &ThumbnailStyle, text_file: &Path) -> Result<String, String> {
    let mut filter = format!(
        "drawtext=textfile={}:expansion=none:fontcolor={}:fontsize={}:x=(w-text_w)/2:y=(h-text_h)/2",
        escape_filter_value(&text_file.to_string_lossy()),
        ffmpeg_color(&style.text_color)?,
        style.font_size
    );
    if let Some(font_file) = &style.font_file {
        filter.push_str(&format!(":fontfile={}", escape_filter_value(font_file)));
    }
    Ok(filter)
}

/// Render a solid-colour thumbnail with centered text.
///
/// The text goes through a side file (`textfile=`) so quotes, colons and
/// percent signs in titles need no filter escaping; only the file paths
/// are escaped. The side file is removed before returning.
pub fn render_text_thumbnail(output_file: &Path, style: &ThumbnailStyle) -> Result<String, String> {
    validate_dimensions(style.width, style.height)?;
    let background = ffmpeg_color(&style.background_color)?;

    let text_file = output_file.with_extension("txt");
    std::fs::write(&text_file, style.text.as_bytes())
        .map_err(|e| format!("Failed to write thumbnail text: {}", e))?;

    let result = drawtext_filter(style, &text_file).and_then(|filter| {
        let mut command = Command::new("ffmpeg");
        command
            .arg("-f")
            .arg("lavfi")
            .arg("-i")
            .arg(format!("color=c={}:s={}x{}:d=1", background, style.width, style.height))
            .arg("-vf")
            .arg(filter)
            .arg("-frames:v")
            .arg("1")
            .arg("-y")
            .arg(output_file);
        execute_ffmpeg_command(command)
    });

    if let Err(e) = std::fs::remove_file(&text_file) {
        tracing::warn!("Failed to remove thumbnail text file {}: {}", text_file.display(), e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ffmpeg_color() {
        assert_eq!(ffmpeg_color("#FF8800").unwrap(), "0xff8800");
        assert_eq!(ffmpeg_color("1a1a2e").unwrap(), "0x1a1a2e");
        assert_eq!(ffmpeg_color("White").unwrap(), "white");
        assert!(ffmpeg_color("red:x=1").is_err());
        assert!(ffmpeg_color("#12345").is_err());
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions(1280, 720).is_ok());
        assert!(validate_dimensions(0, 720).is_err());
        assert!(validate_dimensions(1280, 10_000).is_err());
    }

    #[test]
    fn test_thumbnail_file_names() {
        assert!(is_thumbnail_file_name("0b7e9a3c-1f0e-4c53-9d5e-8a1c2b3d4e5f.jpg"));
        assert!(!is_thumbnail_file_name("../secret.jpg"));
        assert!(!is_thumbnail_file_name("a/b.jpg"));
        assert!(!is_thumbnail_file_name("thumb.png"));
    }

    #[test]
    fn test_drawtext_filter_references_text_file() {
        let style = ThumbnailStyle {
            text: "Episode 1: it's here 100%".to_string(),
            ..ThumbnailStyle::default()
        };
        let filter = drawtext_filter(&style, &PathBuf::from("outputs/thumbnails/abc.txt")).unwrap();
        assert!(filter.starts_with("drawtext=textfile=outputs/thumbnails/abc.txt:expansion=none:"));
        assert!(filter.contains("fontcolor=white"));
        assert!(filter.contains("fontsize=72"));
        assert!(!filter.contains("Episode"));
    }

    #[test]
    fn test_filter_paths_are_escaped() {
        assert_eq!(escape_filter_value("outputs/a-b_c.txt"), "outputs/a-b_c.txt");
        assert_eq!(escape_filter_value(r"C:\fonts\it's.ttf"), r"C\\:\\\\fonts\\\\it\\\'s.ttf");
        assert_eq!(escape_filter_value("dir[1],x;y"), r"dir\[1\]\,x\;y");

        let style = ThumbnailStyle {
            font_file: Some("/fonts/Bold: Display.ttf".to_string()),
            ..ThumbnailStyle::default()
        };
        let filter = drawtext_filter(&style, &PathBuf::from("/tmp/o'clock/abc.txt")).unwrap();
        assert!(filter.starts_with(r"drawtext=textfile=/tmp/o\\\'clock/abc.txt:"));
        assert!(filter.ends_with(r":fontfile=/fonts/Bold\\: Display.ttf"));
    }
}
