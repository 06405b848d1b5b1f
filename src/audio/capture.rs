//! Microphone capture backend built on cpal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::backend::{CaptureBackend, CaptureConfig};
use crate::error::CoachError;

/// Wrapper for cpal::Stream to make it Send.
///
/// SAFETY: the stream is only touched behind the Mutex in `MicBackend`,
/// one thread at a time, so moving the handle across threads is sound.
struct SendableStream(cpal::Stream);

unsafe impl Send for SendableStream {}

/// Capture backend for the default input device.
///
/// Buffers 16-bit PCM from the cpal callback and cuts the buffer into one
/// opaque fragment per `fragment_ms` interval. Multi-channel input is mixed
/// to mono and resampled down to the target rate in software when the
/// device cannot deliver the preferred format natively.
pub struct MicBackend {
    config: CaptureConfig,
    stream: Arc<Mutex<Option<SendableStream>>>,
    pcm_buffer: Arc<Mutex<Vec<u8>>>,
    chunker: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
    opened: bool,
    capturing: bool,
}

impl MicBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            stream: Arc::new(Mutex::new(None)),
            pcm_buffer: Arc::new(Mutex::new(Vec::new())),
            chunker: None,
            shutdown: None,
            opened: false,
            capturing: false,
        }
    }

    fn build_stream(&self) -> Result<cpal::Stream, CoachError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or_else(|| {
            CoachError::PermissionDenied("no input device found".to_string())
        })?;

        if let Ok(name) = device.name() {
            info!("Input device: {}", name);
        }

        let err_callback = |err| {
            error!("Input stream error: {err}");
        };

        // Preferred path: mono at the target rate, converted transparently
        // by PipeWire/PulseAudio on most desktops.
        let preferred = cpal::StreamConfig {
            channels: self.config.channels,
            sample_rate: cpal::SampleRate(self.config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let buffer = Arc::clone(&self.pcm_buffer);
        if let Ok(stream) = device.build_input_stream(
            &preferred,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = buffer.lock() {
                    for &sample in data {
                        buf.extend_from_slice(&sample.to_le_bytes());
                    }
                }
            },
            err_callback,
            None,
        ) {
            return Ok(stream);
        }

        // Fallback: device native config, converted in software.
        let default_config = device.default_input_config().map_err(|e| {
            CoachError::PermissionDenied(format!("failed to query input config: {e}"))
        })?;

        let native_rate = default_config.sample_rate().0;
        let native_channels = default_config.channels() as usize;
        let target_rate = self.config.sample_rate;
        let stream_config: cpal::StreamConfig = default_config.clone().into();

        info!(
            "Using native audio format ({}ch/{}Hz/{:?}), converting in software",
            native_channels,
            native_rate,
            default_config.sample_format()
        );

        let buffer = Arc::clone(&self.pcm_buffer);
        match default_config.sample_format() {
            cpal::SampleFormat::I16 => device
                .build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let converted =
                            mix_to_mono_target_rate(data, native_channels, native_rate, target_rate);
                        if let Ok(mut buf) = buffer.lock() {
                            for &sample in &converted {
                                buf.extend_from_slice(&sample.to_le_bytes());
                            }
                        }
                    },
                    err_callback,
                    None,
                )
                .map_err(|e| CoachError::Capture(format!("failed to build i16 stream: {e}"))),
            cpal::SampleFormat::F32 => device
                .build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> = data
                            .iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                            .collect();
                        let converted = mix_to_mono_target_rate(
                            &i16_data,
                            native_channels,
                            native_rate,
                            target_rate,
                        );
                        if let Ok(mut buf) = buffer.lock() {
                            for &sample in &converted {
                                buf.extend_from_slice(&sample.to_le_bytes());
                            }
                        }
                    },
                    err_callback,
                    None,
                )
                .map_err(|e| CoachError::Capture(format!("failed to build f32 stream: {e}"))),
            fmt => Err(CoachError::Capture(format!(
                "unsupported native sample format: {fmt:?}"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl CaptureBackend for MicBackend {
    async fn open(&mut self) -> Result<(), CoachError> {
        if self.opened {
            return Ok(());
        }

        // Build and immediately drop a stream: this is the permission probe,
        // equivalent to requesting and releasing the device once at startup.
        let probe = self.build_stream()?;
        drop(probe);
        self.opened = true;
        Ok(())
    }

    async fn start(&mut self) -> Result<mpsc::Receiver<Vec<u8>>, CoachError> {
        if self.capturing {
            return Err(CoachError::Capture("capture already running".to_string()));
        }

        if let Ok(mut buf) = self.pcm_buffer.lock() {
            buf.clear();
        }

        let stream = self.build_stream()?;
        stream
            .play()
            .map_err(|e| CoachError::Capture(format!("failed to start stream: {e}")))?;
        if let Ok(mut guard) = self.stream.lock() {
            *guard = Some(SendableStream(stream));
        }

        let (tx, rx) = mpsc::channel::<Vec<u8>>(128);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let buffer = Arc::clone(&self.pcm_buffer);
        let fragment_ms = self.config.fragment_ms;

        let chunker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(fragment_ms.max(50)));
            interval.tick().await; // first tick completes immediately

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let fragment = drain_buffer(&buffer);
                        if !fragment.is_empty() {
                            if tx.send(fragment).await.is_err() {
                                debug!("Fragment receiver dropped, stopping chunker");
                                break;
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        // Flush whatever the callback buffered since the
                        // last tick, then close the channel by dropping tx.
                        let fragment = drain_buffer(&buffer);
                        if !fragment.is_empty() {
                            let _ = tx.send(fragment).await;
                        }
                        break;
                    }
                }
            }
        });

        self.chunker = Some(chunker);
        self.shutdown = Some(shutdown_tx);
        self.capturing = true;
        info!("Microphone capture started");
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<(), CoachError> {
        if !self.capturing {
            return Ok(());
        }
        self.capturing = false;

        // Release the hardware stream before flushing: no more callbacks
        // can append once the stream is dropped.
        if let Ok(mut guard) = self.stream.lock() {
            *guard = None;
        }

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(chunker) = self.chunker.take() {
            if let Err(e) = chunker.await {
                warn!("Capture chunker task panicked: {e}");
            }
        }

        info!("Microphone capture stopped");
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn name(&self) -> &str {
        "microphone"
    }
}

fn drain_buffer(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<u8> {
    match buffer.lock() {
        Ok(mut buf) => std::mem::take(&mut *buf),
        Err(_) => Vec::new(),
    }
}

/// Mix multi-channel audio to mono and resample to the target rate.
fn mix_to_mono_target_rate(
    samples: &[i16],
    channels: usize,
    source_rate: u32,
    target_rate: u32,
) -> Vec<i16> {
    let mono: Vec<i16> = if channels <= 1 {
        samples.to_vec()
    } else {
        samples
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    };

    resample(&mono, source_rate, target_rate)
}

/// Simple linear interpolation resampling. Handles non-integer rate ratios
/// (44.1 kHz native to a 16 kHz target), so the output always matches the
/// rate stamped on the upload.
fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_mixes_to_mono_average() {
        let samples = [100i16, 300, -50, -150];
        let mono = mix_to_mono_target_rate(&samples, 2, 16000, 16000);
        assert_eq!(mono, vec![200, -100]);
    }

    #[test]
    fn resample_halves_48k_to_24k() {
        let samples: Vec<i16> = (0..8).collect();
        let out = mix_to_mono_target_rate(&samples, 1, 48000, 24000);
        assert_eq!(out, vec![0, 2, 4, 6]);
    }

    #[test]
    fn resample_handles_non_integer_ratio() {
        // 10 ms at 44.1 kHz must come out as 10 ms at 16 kHz.
        let samples: Vec<i16> = (0..441).collect();
        let out = mix_to_mono_target_rate(&samples, 1, 44100, 16000);
        assert_eq!(out.len(), 160);
        assert_eq!(out[0], 0);
        assert!(out.windows(2).all(|w| w[0] < w[1]));
    }
}
