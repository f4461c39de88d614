use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use tracing::debug;

use crate::decoder::Decoder;
use crate::frame::Frame;
use crate::mix::Group;
use crate::pan::{BalanceLaw, PanLaw};
use crate::resampler::{FrameSource, Resampler};

use super::{AudioSource, SourceCore};

/// Shared state machine for `Music` (FLAC stream) and `Module` (tracker
/// stream) sources: both stream stereo PCM through a bounded SPSC ring
/// buffer, the decoder itself not being this crate's concern.
///
/// `update` is the producer (main thread); `generate` is the consumer
/// (audio thread). Splitting the ring buffer's two halves into separate
/// mutexes keeps each side lock-uncontended even though both are `Sync`.
pub struct StreamingSource<D: Decoder> {
    core: SourceCore,
    decoder: Mutex<D>,
    producer: Mutex<HeapProd<Frame>>,
    consumer: Mutex<HeapCons<Frame>>,
    resampler: Mutex<Resampler>,
    chunk_frames: usize,
    decoder_channels: u8,
    completed: AtomicBool,
}

impl<D: Decoder> StreamingSource<D> {
    pub fn new(decoder: D, output_rate: u32, group_id: usize, pan_law: PanLaw, balance_law: BalanceLaw) -> Self {
        let source_rate = decoder.sample_rate();
        let channels = decoder.channels();
        let capacity = source_rate.max(1) as usize;
        let chunk_frames = (capacity / 4).max(1);

        let ring = HeapRb::<Frame>::new(capacity);
        let (producer, consumer) = ring.split();

        StreamingSource {
            core: SourceCore::new(channels.min(2).max(1), group_id, pan_law, balance_law),
            decoder: Mutex::new(decoder),
            producer: Mutex::new(producer),
            consumer: Mutex::new(consumer),
            resampler: Mutex::new(Resampler::new(source_rate, output_rate)),
            chunk_frames,
            decoder_channels: channels,
            completed: AtomicBool::new(false),
        }
    }

    pub fn set_group(&self, group_id: usize, group: Group) {
        self.core.set_group(group_id, group);
    }
    pub fn set_looped(&self, looped: bool) {
        self.core.set_looped(looped);
    }
    pub fn set_mix(&self, mix: crate::mix::MixMatrix, group: Group) {
        self.core.set_mix(mix, group);
    }
    pub fn set_pan(&self, pan: f32, law: PanLaw, group: Group) {
        self.core.set_pan(pan, law, group);
    }
    pub fn set_twin_pan(&self, left: f32, right: f32, law: PanLaw, group: Group) {
        self.core.set_twin_pan(left, right, law, group);
    }
    pub fn set_balance(&self, balance: f32, law: BalanceLaw, group: Group) {
        self.core.set_balance(balance, law, group);
    }
    pub fn set_gain(&self, gain: f32, group: Group) {
        self.core.set_gain(gain, group);
    }
    pub fn set_speed(&self, speed: f32) {
        self.core.set_speed(speed);
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Relaxed)
    }
}

impl<D: Decoder> AudioSource for StreamingSource<D> {
    fn reset(&self) {
        let mut decoder = self.decoder.lock();
        decoder.seek_to_pcm_frame(0);
        // Recreate ring buffer halves by draining; a fresh split isn't
        // needed since both sides already observe only each other's cursor.
        let mut consumer = self.consumer.lock();
        while consumer.try_pop().is_some() {}
        self.resampler.lock().reset();
        self.completed.store(false, Ordering::Relaxed);
    }

    fn update(&self, _dt: f32) -> bool {
        if self.completed.load(Ordering::Relaxed) {
            return true;
        }
        let mut producer = self.producer.lock();
        let available = producer.vacant_len().min(self.chunk_frames);
        if available == 0 {
            return true;
        }

        let mut decoder = self.decoder.lock();
        let channels = self.decoder_channels.max(1) as usize;
        let mut pcm = vec![0i16; available * channels];
        let decoded = decoder.read_pcm_frames(&mut pcm, available);

        let frames: Vec<Frame> = (0..decoded)
            .map(|i| {
                let base = i * channels;
                if channels == 1 {
                    Frame::new(pcm[base], pcm[base])
                } else {
                    Frame::new(pcm[base], pcm[base + 1])
                }
            })
            .collect();

        let pushed = producer.push_slice(&frames);
        if pushed < frames.len() {
            debug!("streaming source ring buffer overrun, dropped {} frames", frames.len() - pushed);
        }

        if decoded < available {
            if self.core.looped() {
                decoder.seek_to_pcm_frame(0);
            } else {
                self.completed.store(true, Ordering::Relaxed);
            }
        }
        true
    }

    fn generate(&self, out: &mut [Frame], frames: usize) -> bool {
        let props = self.core.snapshot();
        let mut resampler = self.resampler.lock();
        let mut consumer = self.consumer.lock();

        struct RingSource<'a> {
            consumer: &'a mut HeapCons<Frame>,
        }
        impl FrameSource for RingSource<'_> {
            fn next_frame(&mut self) -> Option<Frame> {
                self.consumer.try_pop()
            }
        }

        let mut raw = vec![Frame::SILENCE; frames];
        let mut ring_source = RingSource { consumer: &mut consumer };
        let produced = resampler.generate(&mut raw, &mut ring_source);

        for (slot, generated) in out.iter_mut().zip(raw.iter()).take(produced) {
            slot.accumulate(*generated, props.precomputed);
        }

        // Underrun while still streaming is a stall, not end-of-data; only
        // a completed decoder with a dry ring buffer ends the source.
        produced == frames || !self.is_completed()
    }

    fn on_group_changed(&self, group: Group) {
        self.core.on_group_changed(group);
    }

    fn group_id(&self) -> usize {
        self.core.group_id()
    }
}
