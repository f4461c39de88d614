//! cpal device glue. Unlike a push-model mixer that pre-renders audio on the
//! main thread and posts it through a ring buffer, the device callback here
//! pulls directly: it zeroes its buffer, locks the graph, and asks it to
//! render exactly the frame count the host requested.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error};

use crate::frame::Frame;
use crate::graph::AudioGraph;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("failed to query default output config: {0}")]
    Config(#[source] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[source] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[source] cpal::PlayStreamError),
}

/// Owns the live cpal stream backing an [`AudioGraph`]. Dropping this stops
/// playback.
pub struct AudioDevice {
    stream: cpal::Stream,
    sample_rate: u32,
    channels: u16,
}

impl AudioDevice {
    pub fn open(graph: Arc<Mutex<AudioGraph>>) -> Result<Self, DeviceError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(DeviceError::NoDevice)?;
        let config = device.default_output_config().map_err(DeviceError::Config)?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        let sample_format = config.sample_format();

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), graph)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), graph)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), graph)?,
            other => return Err(DeviceError::UnsupportedFormat(other)),
        };

        stream.play().map_err(DeviceError::PlayStream)?;
        debug!(sample_rate, channels, "audio device stream started");

        Ok(AudioDevice { stream, sample_rate, channels })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn pause(&self) {
        if let Err(err) = self.stream.pause() {
            error!("failed to pause audio stream: {err}");
        }
    }

    pub fn resume(&self) {
        if let Err(err) = self.stream.play() {
            error!("failed to resume audio stream: {err}");
        }
    }
}

fn build_stream<S>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    graph: Arc<Mutex<AudioGraph>>,
) -> Result<cpal::Stream, DeviceError>
where
    S: cpal::SizedSample + FromFrame + Send + 'static,
{
    let channels = config.channels.max(1) as usize;
    let mut scratch: Vec<Frame> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [S], _: &cpal::OutputCallbackInfo| {
                let frames_requested = data.len() / channels;
                scratch.clear();
                scratch.resize(frames_requested, Frame::SILENCE);
                graph.lock().generate(&mut scratch, frames_requested);

                for (chunk, frame) in data.chunks_mut(channels).zip(scratch.iter()) {
                    S::write_interleaved(*frame, chunk);
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )
        .map_err(DeviceError::BuildStream)
}

/// Converts a rendered [`Frame`] into the host's sample format, duplicating
/// to every channel beyond stereo and truncating below it.
trait FromFrame {
    fn write_interleaved(frame: Frame, out: &mut [Self])
    where
        Self: Sized;
}

impl FromFrame for f32 {
    fn write_interleaved(frame: Frame, out: &mut [Self]) {
        write_channels(out, frame, |s| s as f32 / 32_768.0);
    }
}

impl FromFrame for i16 {
    fn write_interleaved(frame: Frame, out: &mut [Self]) {
        write_channels(out, frame, |s| s);
    }
}

impl FromFrame for u16 {
    fn write_interleaved(frame: Frame, out: &mut [Self]) {
        write_channels(out, frame, |s| (s as i32 + 32_768) as u16);
    }
}

fn write_channels<T: Copy>(out: &mut [T], frame: Frame, convert: impl Fn(i16) -> T) {
    if out.is_empty() {
        return;
    }
    out[0] = convert(frame.l);
    if out.len() > 1 {
        out[1] = convert(frame.r);
        for slot in &mut out[2..] {
            *slot = convert(0);
        }
    }
}
