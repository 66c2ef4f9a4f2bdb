//! FFmpeg-based video encoding for rendered slideshow frames
//!
//! Raw RGBA frames are piped to the system `ffmpeg` binary over stdin.

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use tracing::debug;

/// Build the ffmpeg argument list for a raw RGBA input stream
pub fn ffmpeg_args(width: u32, height: u32, fps: u32, codec: &str) -> Vec<String> {
    let size = format!("{}x{}", width, height);
    let rate = fps.to_string();
    [
        // Only report real problems; they are surfaced on failure
        "-loglevel",
        "error",
        // Input format: raw video
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        size.as_str(),
        "-framerate",
        rate.as_str(),
        // Read from stdin
        "-i",
        "pipe:0",
        // No audio track
        "-an",
        "-c:v",
        codec,
        "-r",
        rate.as_str(),
        "-pix_fmt",
        "yuv420p",
        // Overwrite output
        "-y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// FFmpeg video encoder that accepts raw RGBA frames via stdin
pub struct VideoEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
    frame_count: u64,
}

impl VideoEncoder {
    /// Spawn a new FFmpeg encoder process writing to `output`
    pub fn new(width: u32, height: u32, fps: u32, codec: &str, output: &Path) -> Result<Self> {
        let args = ffmpeg_args(width, height, fps, codec);
        debug!(args = ?args, output = %output.display(), "spawning ffmpeg");

        let mut cmd = Command::new("ffmpeg");
        cmd.args(&args).arg(output);
        Self::spawn(cmd, width, height)
    }

    /// Start an encoder process that reads raw frames on stdin
    pub fn spawn(mut cmd: Command, width: u32, height: u32) -> Result<Self> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to start FFmpeg encoder")?;

        let stdin = child.stdin.take().context("Failed to get FFmpeg stdin")?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            width,
            height,
            frame_count: 0,
        })
    }

    /// Write a raw RGBA frame to the encoder
    ///
    /// The frame data must be exactly `width * height * 4` bytes. If FFmpeg
    /// has already exited, its error output is reported instead of the pipe
    /// error.
    pub fn write_frame(&mut self, frame_data: &[u8]) -> Result<()> {
        check_frame_size(self.width, self.height, frame_data)?;

        let Some(stdin) = self.stdin.as_mut() else {
            anyhow::bail!("FFmpeg encoder is already closed");
        };

        if let Err(err) = stdin.write_all(frame_data) {
            drop(self.stdin.take());
            let status = self
                .child
                .wait()
                .context("Failed to wait for FFmpeg to finish")?;
            if !status.success() {
                return Err(self.failure(status));
            }
            return Err(err).context("Failed to write frame to FFmpeg");
        }

        self.frame_count += 1;
        Ok(())
    }

    /// Get the number of frames written
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Finish encoding and wait for FFmpeg to complete
    pub fn finish(mut self) -> Result<()> {
        // Close stdin to signal end of input
        drop(self.stdin.take());

        let status = self
            .child
            .wait()
            .context("Failed to wait for FFmpeg to finish")?;

        if !status.success() {
            return Err(self.failure(status));
        }

        debug!(frames = self.frame_count, "ffmpeg finished");
        Ok(())
    }

    /// Build the error for a failed FFmpeg run from the tail of its stderr
    fn failure(&mut self, status: ExitStatus) -> anyhow::Error {
        if let Some(ref mut stderr) = self.child.stderr {
            let mut error_output = String::new();
            let _ = stderr.read_to_string(&mut error_output);
            if !error_output.trim().is_empty() {
                return anyhow::anyhow!("FFmpeg encoding failed:\n{}", stderr_tail(&error_output, 5));
            }
        }
        anyhow::anyhow!("FFmpeg encoding failed with status: {}", status)
    }
}

/// Last `lines` lines of process output
fn stderr_tail(output: &str, lines: usize) -> String {
    let last_lines: Vec<&str> = output.lines().rev().take(lines).collect();
    last_lines.into_iter().rev().collect::<Vec<_>>().join("\n")
}

fn check_frame_size(width: u32, height: u32, frame_data: &[u8]) -> Result<()> {
    let expected_size = width as usize * height as usize * 4;
    if frame_data.len() != expected_size {
        anyhow::bail!(
            "Frame size mismatch: expected {} bytes, got {}",
            expected_size,
            frame_data.len()
        );
    }
    Ok(())
}

/// Check if FFmpeg is available
pub fn check_ffmpeg() -> Result<()> {
    let status = Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .context("FFmpeg not found. Please install ffmpeg and make sure it is on PATH")?;

    if !status.success() {
        anyhow::bail!("FFmpeg is installed but `ffmpeg -version` failed: {}", status);
    }
    Ok(())
}
