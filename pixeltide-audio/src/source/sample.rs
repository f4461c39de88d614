use parking_lot::Mutex;

use crate::errors::SourceError;
use crate::frame::Frame;
use crate::mix::Group;
use crate::pan::{BalanceLaw, PanLaw};
use crate::resampler::{FrameSource, Resampler};

use super::{AudioSource, SourceCore};

/// In-memory mono PCM source, fully decoded at construction. Max length is
/// bounded so a single stray asset can't balloon memory; the limit is a
/// construction parameter rather than a baked-in constant.
pub struct SampleSource {
    core: SourceCore,
    data: Vec<i16>,
    cursor: Mutex<usize>,
    resampler: Mutex<Resampler>,
}

impl SampleSource {
    pub fn new(
        data: Vec<i16>,
        source_rate: u32,
        channels: u8,
        output_rate: u32,
        group_id: usize,
        max_duration_secs: f32,
        pan_law: PanLaw,
        balance_law: BalanceLaw,
    ) -> Result<Self, SourceError> {
        if channels != 1 {
            return Err(SourceError::NotMono(channels));
        }
        if data.is_empty() {
            return Err(SourceError::Empty);
        }
        let duration = data.len() as f32 / source_rate as f32;
        if duration > max_duration_secs {
            return Err(SourceError::DurationExceeded(duration, max_duration_secs));
        }
        Ok(SampleSource {
            core: SourceCore::new(1, group_id, pan_law, balance_law),
            data,
            cursor: Mutex::new(0),
            resampler: Mutex::new(Resampler::new(source_rate, output_rate)),
        })
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
    pub fn set_balance(&self, balance: f32, law: BalanceLaw, group: Group) {
        self.core.set_balance(balance, law, group);
    }
    pub fn set_gain(&self, gain: f32, group: Group) {
        self.core.set_gain(gain, group);
    }
    pub fn set_speed(&self, speed: f32) {
        self.core.set_speed(speed);
    }

    pub fn frame_cursor(&self) -> usize {
        *self.cursor.lock()
    }
}

/// Pulls mono samples sequentially from the decoded buffer; does not loop —
/// looping is a [`SampleSource::generate`]-level concern so a loop point can
/// resume mid-call with the resampler reset cleanly.
struct BufferCursor<'a> {
    data: &'a [i16],
    cursor: &'a mut usize,
}

impl FrameSource for BufferCursor<'_> {
    fn next_frame(&mut self) -> Option<Frame> {
        let sample = *self.data.get(*self.cursor)?;
        *self.cursor += 1;
        Some(Frame::new(sample, sample))
    }
}

impl AudioSource for SampleSource {
    fn reset(&self) {
        *self.cursor.lock() = 0;
        self.resampler.lock().reset();
    }

    fn update(&self, _dt: f32) -> bool {
        true
    }

    fn generate(&self, out: &mut [Frame], frames: usize) -> bool {
        let props = self.core.snapshot();
        let mut resampler = self.resampler.lock();
        let mut cursor = self.cursor.lock();

        let mut raw = vec![Frame::SILENCE; frames];
        let mut produced = 0;
        let mut alive = true;
        while produced < frames {
            let mut source = BufferCursor { data: &self.data, cursor: &mut *cursor };
            produced += resampler.generate(&mut raw[produced..frames], &mut source);
            if produced >= frames {
                break;
            }
            // Resampler ran dry: either loop back to the start or stop.
            if props.looped {
                *cursor = 0;
                resampler.reset();
                continue;
            }
            alive = false;
            break;
        }

        for (slot, generated) in out.iter_mut().zip(raw.iter()).take(produced) {
            slot.accumulate(*generated, props.precomputed);
        }
        alive
    }

    fn on_group_changed(&self, group: Group) {
        self.core.on_group_changed(group);
    }

    fn group_id(&self) -> usize {
        self.core.group_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(data: Vec<i16>) -> SampleSource {
        SampleSource::new(data, 22_050, 1, 44_100, 0, 10.0, PanLaw::ConstantGain, BalanceLaw::Linear).unwrap()
    }

    #[test]
    fn empty_sample_is_rejected() {
        let err = SampleSource::new(vec![], 22_050, 1, 44_100, 0, 10.0, PanLaw::ConstantGain, BalanceLaw::Linear)
            .unwrap_err();
        assert!(matches!(err, SourceError::Empty));
    }

    #[test]
    fn too_long_sample_is_rejected() {
        let data = vec![0i16; 22_050 * 11];
        let err =
            SampleSource::new(data, 22_050, 1, 44_100, 0, 10.0, PanLaw::ConstantGain, BalanceLaw::Linear).unwrap_err();
        assert!(matches!(err, SourceError::DurationExceeded(_, _)));
    }

    #[test]
    fn stereo_input_rejected() {
        let err =
            SampleSource::new(vec![0, 0], 22_050, 2, 44_100, 0, 10.0, PanLaw::ConstantGain, BalanceLaw::Linear)
                .unwrap_err();
        assert!(matches!(err, SourceError::NotMono(2)));
    }

    #[test]
    fn reset_restores_cursor_to_zero() {
        let source = make(vec![1000; 8]);
        source.core.on_group_changed(Group::default());
        let mut out = vec![Frame::SILENCE; 8];
        source.generate(&mut out, 8);
        assert!(source.frame_cursor() > 0);
        source.reset();
        assert_eq!(source.frame_cursor(), 0);
    }

    #[test]
    fn non_looped_end_of_data_reports_false() {
        let source = make(vec![1000; 4]);
        source.core.on_group_changed(Group::default());
        let mut out = vec![Frame::SILENCE; 100];
        let alive = source.generate(&mut out, 100);
        assert!(!alive);
    }

    #[test]
    fn looped_source_never_ends() {
        let source = make(vec![1000; 4]);
        source.set_looped(true);
        source.core.on_group_changed(Group::default());
        let mut out = vec![Frame::SILENCE; 100];
        let alive = source.generate(&mut out, 100);
        assert!(alive);
    }
}
