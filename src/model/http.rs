use std::time::Duration;

use super::{AudioClip, ModelError, MusicModel, decode_wav};

/// Inference server reachable over HTTP.
///
/// `POST <endpoint>` with `{"prompt": "...", "duration": <secs>}`; a 2xx reply
/// carries the generated clip as a WAV body.
pub struct HttpModel {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpModel {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl MusicModel for HttpModel {
    fn generate(&self, prompt: &str, duration: Duration) -> Result<AudioClip, ModelError> {
        let body = serde_json::json!({
            "prompt": prompt,
            "duration": duration.as_secs_f64(),
        });

        let resp = self.client.post(&self.endpoint).json(&body).send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: body.trim().chars().take(200).collect(),
            });
        }

        let wav = resp.bytes()?;
        decode_wav(&wav)
    }
}
