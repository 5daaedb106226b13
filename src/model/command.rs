use std::process::{Command, Stdio};
use std::time::Duration;

use super::{AudioClip, ModelError, MusicModel, decode_wav};

/// Local generator program that prints a WAV file to stdout.
pub struct CommandModel {
    program: String,
    args: Vec<String>,
}

impl CommandModel {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }

    /// Arguments with `{prompt}` and `{duration}` filled in.
    fn expand_args(&self, prompt: &str, duration: Duration) -> Vec<String> {
        let secs = duration.as_secs().to_string();
        self.args
            .iter()
            .map(|a| a.replace("{duration}", &secs).replace("{prompt}", prompt))
            .collect()
    }
}

impl MusicModel for CommandModel {
    fn generate(&self, prompt: &str, duration: Duration) -> Result<AudioClip, ModelError> {
        let output = Command::new(&self.program)
            .args(self.expand_args(prompt, duration))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ModelError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(3).collect();
            return Err(ModelError::Process {
                status: output.status.to_string(),
                stderr: tail.into_iter().rev().collect::<Vec<_>>().join(" | "),
            });
        }

        decode_wav(&output.stdout)
    }
}
