//! Per-source rate/format conversion.
//!
//! Treated as an opaque "format converter": `(rate_in, channels_in) -> (s16,
//! rate_out, stereo)` with a mutable ratio, so `set_speed` can retune it
//! without reconstructing the source. A linear interpolator satisfies the
//! contract; nothing downstream depends on the interpolation kernel.

use crate::frame::Frame;

/// Lower bound on the speed factor, matching the Open Questions decision to
/// expose it as a runtime-configurable minimum rather than a silent clamp.
pub const MIN_SPEED: f32 = 0.02;
pub const MAX_SPEED: f32 = 50.0;

/// Pulls one frame at a time from whatever backs a source's PCM (an
/// in-memory buffer for `Sample`, a ring buffer consumer for streaming
/// sources). `None` means no data is currently available.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

/// Linear-interpolating resampler from `rate_in` to `rate_out`, with an
/// independent `speed` multiplier on top of the rate ratio.
pub struct Resampler {
    rate_in: u32,
    rate_out: u32,
    speed: f32,
    frac: f64,
    prev: Frame,
    curr: Frame,
    primed: bool,
}

impl Resampler {
    pub fn new(rate_in: u32, rate_out: u32) -> Self {
        Resampler {
            rate_in,
            rate_out,
            speed: 1.0,
            frac: 0.0,
            prev: Frame::SILENCE,
            curr: Frame::SILENCE,
            primed: false,
        }
    }

    #[inline]
    pub fn ratio(&self) -> f64 {
        (self.rate_in as f64 / self.rate_out as f64) * self.speed as f64
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn set_rate_in(&mut self, rate_in: u32) {
        self.rate_in = rate_in;
    }

    /// Resets interpolation state; does not touch `speed` or the rates.
    pub fn reset(&mut self) {
        self.frac = 0.0;
        self.prev = Frame::SILENCE;
        self.curr = Frame::SILENCE;
        self.primed = false;
    }

    /// Writes up to `out.len()` resampled frames, pulling from `source` as
    /// needed. Returns the number of frames actually written; fewer than
    /// `out.len()` means `source` ran dry mid-way.
    pub fn generate(&mut self, out: &mut [Frame], source: &mut impl FrameSource) -> usize {
        if !self.primed {
            let Some(first) = source.next_frame() else {
                return 0;
            };
            self.prev = first;
            self.curr = source.next_frame().unwrap_or(first);
            self.primed = true;
        }

        let ratio = self.ratio();
        let mut written = 0;
        for slot in out.iter_mut() {
            while self.frac >= 1.0 {
                self.prev = self.curr;
                match source.next_frame() {
                    Some(next) => self.curr = next,
                    None => return written,
                }
                self.frac -= 1.0;
            }
            let t = self.frac as f32;
            let l = self.prev.l as f32 * (1.0 - t) + self.curr.l as f32 * t;
            let r = self.prev.r as f32 * (1.0 - t) + self.curr.r as f32 * t;
            *slot = Frame::new(l.round() as i16, r.round() as i16);
            self.frac += ratio;
            written += 1;
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(Frame, usize);
    impl FrameSource for Constant {
        fn next_frame(&mut self) -> Option<Frame> {
            if self.1 == 0 {
                return None;
            }
            self.1 -= 1;
            Some(self.0)
        }
    }

    #[test]
    fn unity_rate_passes_through() {
        let mut r = Resampler::new(44_100, 44_100);
        let mut src = Constant(Frame::new(1000, -1000), 4);
        let mut out = [Frame::SILENCE; 4];
        let n = r.generate(&mut out, &mut src);
        assert_eq!(n, 4);
        assert!(out.iter().all(|f| f.l == 1000 && f.r == -1000));
    }

    #[test]
    fn exhausted_source_returns_partial_count() {
        let mut r = Resampler::new(44_100, 44_100);
        let mut src = Constant(Frame::new(5, 5), 2);
        let mut out = [Frame::SILENCE; 5];
        let n = r.generate(&mut out, &mut src);
        assert_eq!(n, 2);
    }
}
