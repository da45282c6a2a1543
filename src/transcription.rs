// Speech-to-text for uploaded audio.
// Audio is normalized with FFmpeg, then sent to Google Cloud Speech-to-Text v1.
// Docs: https://cloud.google.com/speech-to-text/docs/reference/rest/v1/speech/recognize

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use crate::media;

pub const SUMMARY_WORDS: usize = 100;
pub const TRANSCRIPTION_FALLBACK: &str = "Unable to transcribe audio";

const SPEECH_URL: &str = "https://speech.googleapis.com/v1/speech:recognize";

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize 16 kHz mono LINEAR16 WAV bytes.
    async fn recognize(&self, wav: Vec<u8>) -> Result<String, String>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transcript {
    pub transcription: String,
    pub summary: String,
}

/// First 100 whitespace-separated words.
pub fn summarize(transcription: &str) -> String {
    transcription
        .split_whitespace()
        .take(SUMMARY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct GoogleSpeechClient {
    client: Client,
    api_key: String,
    language_code: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

impl GoogleSpeechClient {
    pub fn new(api_key: String, language_code: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            language_code,
        }
    }

    fn join_results(response: RecognizeResponse) -> String {
        response
            .results
            .into_iter()
            .filter_map(|result| result.alternatives.into_iter().next())
            .map(|alt| alt.transcript.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechClient {
    async fn recognize(&self, wav: Vec<u8>) -> Result<String, String> {
        let body = json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": 16000,
                "languageCode": self.language_code,
                "enableAutomaticPunctuation": true,
            },
            "audio": {
                "content": base64::engine::general_purpose::STANDARD.encode(&wav),
            }
        });

        let backoff_config = ExponentialBackoff {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(8),
            max_elapsed_time: Some(Duration::from_secs(60)),
            ..Default::default()
        };

        let operation = || async {
            let response = self
                .client
                .post(SPEECH_URL)
                .query(&[("key", &self.api_key)])
                .timeout(Duration::from_secs(120))
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_connect() || e.is_timeout() {
                        tracing::warn!("Speech API connection error (retrying): {}", e);
                        backoff::Error::transient(format!("Connection error: {}", e))
                    } else {
                        backoff::Error::permanent(format!("Request error: {}", e))
                    }
                })?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| backoff::Error::permanent(format!("Failed to read response: {}", e)))?;

            if status.as_u16() == 429 || status.is_server_error() {
                tracing::warn!("Speech API returned {} (retrying)", status);
                return Err(backoff::Error::transient(format!("API error ({}): {}", status, response_text)));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(format!("API error ({}): {}", status, response_text)));
            }

            serde_json::from_str::<RecognizeResponse>(&response_text)
                .map_err(|e| backoff::Error::permanent(format!("Failed to parse response: {}", e)))
        };

        let response = retry(backoff_config, operation).await?;
        let transcript = Self::join_results(response);
        if transcript.is_empty() {
            return Err("Speech was not recognized".to_string());
        }
        Ok(transcript)
    }
}

/// Temp file pair for one request; both paths carry a fresh uuid so
/// concurrent uploads never share files.
struct WorkFiles {
    source: PathBuf,
    wav: PathBuf,
}

impl WorkFiles {
    fn new(work_dir: &Path, original_name: &str) -> Self {
        let id = Uuid::new_v4();
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin");
        Self {
            source: work_dir.join(format!("{}_source.{}", id, extension)),
            wav: work_dir.join(format!("{}.wav", id)),
        }
    }

    async fn cleanup(&self) {
        for path in [&self.source, &self.wav] {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove temp file {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Save the upload, convert it to WAV and recognize it. Temp files are
/// removed whether or not recognition succeeds.
pub async fn transcribe_audio(
    recognizer: &dyn SpeechRecognizer,
    audio: &[u8],
    original_name: &str,
    work_dir: &Path,
) -> Result<Transcript, String> {
    tokio::fs::create_dir_all(work_dir)
        .await
        .map_err(|e| format!("Failed to create work directory: {}", e))?;

    let files = WorkFiles::new(work_dir, original_name);
    let result = run_transcription(recognizer, audio, &files).await;
    files.cleanup().await;

    let transcription = result?;
    Ok(Transcript {
        summary: summarize(&transcription),
        transcription,
    })
}

async fn run_transcription(
    recognizer: &dyn SpeechRecognizer,
    audio: &[u8],
    files: &WorkFiles,
) -> Result<String, String> {
    tokio::fs::write(&files.source, audio)
        .await
        .map_err(|e| format!("Failed to save audio: {}", e))?;

    let (source, wav) = (files.source.clone(), files.wav.clone());
    tokio::task::spawn_blocking(move || media::convert_to_wav(&source, &wav))
        .await
        .map_err(|e| format!("Audio conversion task failed: {}", e))??;

    let wav_bytes = tokio::fs::read(&files.wav)
        .await
        .map_err(|e| format!("Failed to read converted audio: {}", e))?;

    recognizer.recognize(wav_bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRecognizer {
        result: Result<String, String>,
        calls: AtomicUsize,
    }

    impl FixedRecognizer {
        fn new(result: Result<String, String>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for FixedRecognizer {
        async fn recognize(&self, wav: Vec<u8>) -> Result<String, String> {
            assert!(wav.starts_with(b"RIFF"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    /// One second of 16 kHz mono 16-bit silence.
    fn silent_wav() -> Vec<u8> {
        let samples = 16_000u32;
        let data_len = samples * 2;
        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes());
        wav.extend_from_slice(&16_000u32.to_le_bytes());
        wav.extend_from_slice(&32_000u32.to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(44 + data_len as usize, 0);
        wav
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_unreadable_audio_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let recognizer = FixedRecognizer::new(Ok("never used".to_string()));

        let result = transcribe_audio(&recognizer, b"definitely not audio", "clip.mp3", dir.path()).await;

        assert!(result.is_err());
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_transcribe_audio_cleans_up_after_recognition() {
        if media::check_ffmpeg_available().is_err() {
            eprintln!("ffmpeg not installed, skipping");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let wav = silent_wav();

        let ok = FixedRecognizer::new(Ok("hello from the recording".to_string()));
        let transcript = transcribe_audio(&ok, &wav, "clip.wav", dir.path()).await.unwrap();
        assert_eq!(transcript.transcription, "hello from the recording");
        assert_eq!(transcript.summary, "hello from the recording");
        assert_eq!(ok.calls.load(Ordering::SeqCst), 1);
        assert!(dir_is_empty(dir.path()));

        let failing = FixedRecognizer::new(Err("quota exceeded".to_string()));
        let err = transcribe_audio(&failing, &wav, "clip.wav", dir.path()).await.unwrap_err();
        assert_eq!(err, "quota exceeded");
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_summarize_keeps_first_hundred_words() {
        let text: String = (0..150).map(|i| format!("w{} ", i)).collect();
        let summary = summarize(&text);
        assert_eq!(summary.split(' ').count(), 100);
        assert!(summary.starts_with("w0 w1"));
        assert!(summary.ends_with("w99"));
        assert_eq!(summarize("  short   text "), "short text");
    }

    #[test]
    fn test_join_results_takes_first_alternative() {
        let response: RecognizeResponse = serde_json::from_value(json!({
            "results": [
                {"alternatives": [{"transcript": "hello world", "confidence": 0.9}, {"transcript": "hollow word"}]},
                {"alternatives": []},
                {"alternatives": [{"transcript": " second part "}]}
            ]
        }))
        .unwrap();
        assert_eq!(GoogleSpeechClient::join_results(response), "hello world second part");

        let empty: RecognizeResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(GoogleSpeechClient::join_results(empty), "");
    }

    #[test]
    fn test_work_files_are_unique_and_sanitized() {
        let dir = Path::new("uploads");
        let a = WorkFiles::new(dir, "clip.mp3");
        let b = WorkFiles::new(dir, "clip.mp3");
        assert_ne!(a.source, b.source);
        assert!(a.source.to_string_lossy().ends_with("_source.mp3"));
        let odd = WorkFiles::new(dir, "evil.m$3");
        assert!(odd.source.to_string_lossy().ends_with("_source.bin"));
    }
}
