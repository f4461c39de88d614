//! Real-time grouped audio mixing graph with per-source resampling.
//!
//! Three layers: [`source`] implements individual playable sources
//! ([`source::SampleSource`], [`source::StreamingSource`]) behind the
//! [`source::AudioSource`] trait; [`graph::AudioGraph`] tracks a set of
//! sources and sums their output per group; [`device::AudioDevice`] drives a
//! `cpal` stream that pulls from the graph on the audio thread.

mod decoder;
mod device;
mod errors;
mod frame;
mod graph;
mod mix;
mod pan;
mod props;
mod resampler;
mod source;

pub use decoder::{ByteStream, Decoder, SeekFrom};
pub use device::{AudioDevice, DeviceError};
pub use errors::SourceError;
pub use frame::Frame;
pub use graph::AudioGraph;
pub use mix::{Group, GroupTarget, MixMatrix};
pub use pan::{BalanceLaw, PanLaw};
pub use resampler::{FrameSource, Resampler, MAX_SPEED, MIN_SPEED};
pub use source::{AudioSource, SampleSource, StreamingSource};
