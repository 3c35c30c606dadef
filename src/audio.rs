//! Sound playback for page actions.
//!
//! With the `rodio_backend` feature sounds are decoded from disk and played on the
//! default output device. Without it playback requests are only logged.

use anyhow::Result;
use std::fmt;
use std::path::Path;

#[cfg(feature = "rodio_backend")]
mod backend {
    use super::*;
    use anyhow::Context;
    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use std::fs;
    use std::io::Cursor;
    use tracing::info;

    /// Output stream and the sinks still playing on it.
    struct Output {
        /// Must outlive every sink created from the handle.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        active: Vec<Sink>,
    }

    /// Opens the output device on first use, so runs that never play a sound
    /// work without one.
    #[derive(Default)]
    pub struct BackendState {
        output: Option<Output>,
    }

    impl BackendState {
        pub fn play(&mut self, path: &Path) -> Result<()> {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read sound {}", path.display()))?;
            let source = rodio::Decoder::new(Cursor::new(bytes))
                .with_context(|| format!("Failed to decode sound {}", path.display()))?;

            if self.output.is_none() {
                let (stream, handle) = OutputStream::try_default()
                    .context("Failed to create audio output stream")?;
                self.output = Some(Output {
                    _stream: stream,
                    handle,
                    active: Vec::new(),
                });
            }
            let output = self
                .output
                .as_mut()
                .context("Audio output stream unavailable")?;

            let sink = Sink::try_new(&output.handle).context("Failed to create audio sink")?;
            sink.append(source);
            output.active.retain(|s| !s.empty());
            output.active.push(sink);
            info!(path = %path.display(), "playing sound");
            Ok(())
        }

        pub fn active_count(&self) -> usize {
            self.output.as_ref().map_or(0, |o| o.active.len())
        }
    }
}

#[cfg(not(feature = "rodio_backend"))]
mod backend {
    use super::*;
    use tracing::info;

    /// Stand-in when rodio is not compiled in.
    #[derive(Default)]
    pub struct BackendState;

    impl BackendState {
        pub fn play(&mut self, path: &Path) -> Result<()> {
            info!(path = %path.display(), "sound requested (no audio backend)");
            Ok(())
        }

        pub fn active_count(&self) -> usize {
            0
        }
    }
}

/// Plays one-shot sounds requested by handlers.
#[derive(Default)]
pub struct SoundPlayer {
    backend: backend::BackendState,
}

impl SoundPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing the sound file at `path` and return immediately.
    pub fn play(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.backend.play(path.as_ref())
    }

    /// Sounds that were still playing when the last one started.
    pub fn active_count(&self) -> usize {
        self.backend.active_count()
    }
}

impl fmt::Debug for SoundPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundPlayer")
            .field("backend", &cfg!(feature = "rodio_backend"))
            .field("active", &self.active_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "rodio_backend")]
    #[test]
    fn missing_sound_file_is_an_error() {
        let mut player = SoundPlayer::new();
        let err = player.play("/definitely/missing.mp3").unwrap_err();
        assert!(format!("{err:#}").contains("missing.mp3"));
        assert_eq!(player.active_count(), 0);
    }

    #[cfg(feature = "rodio_backend")]
    #[test]
    fn undecodable_sound_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("portfolio3d-noise-{}.mp3", std::process::id()));
        std::fs::write(&path, b"not audio at all").unwrap();
        let mut player = SoundPlayer::new();
        assert!(player.play(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[cfg(not(feature = "rodio_backend"))]
    #[test]
    fn without_backend_requests_only_log() {
        let mut player = SoundPlayer::new();
        player.play("/definitely/missing.mp3").unwrap();
        assert_eq!(player.active_count(), 0);
    }
}
