use crate::mix::{Group, MixMatrix};
use crate::pan::{BalanceLaw, PanLaw};
use crate::resampler::{MAX_SPEED, MIN_SPEED};

/// The mutually-exclusive ways a source's own stereo contribution can be
/// specified; whichever was set last wins and overwrites the same 2x2
/// matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixInput {
    Matrix(MixMatrix),
    Pan { value: f32, law: PanLaw },
    /// Independently pans each of a stereo source's two input channels.
    TwinPan { left: f32, right: f32, law: PanLaw },
    Balance { value: f32, law: BalanceLaw },
}

impl MixInput {
    pub fn matrix(&self) -> MixMatrix {
        match *self {
            MixInput::Matrix(m) => m,
            MixInput::Pan { value, law } => law.matrix(value),
            MixInput::TwinPan { left, right, law } => {
                let (ll, lr) = law.gains(left);
                let (rl, rr) = law.gains(right);
                MixMatrix { ll, lr, rl, rr }
            }
            MixInput::Balance { value, law } => law.matrix(value),
        }
    }
}

/// The published property block of a source: everything the audio thread
/// must observe as a coherent snapshot. Guarded by a short-held mutex,
/// never locked across a decode (see the crate's concurrency notes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Props {
    pub group_id: usize,
    pub channels: u8,
    pub looped: bool,
    pub gain: f32,
    pub speed: f32,
    pub mix_input: MixInput,
    pub precomputed: MixMatrix,
}

impl Props {
    pub fn new(channels: u8, group_id: usize, pan_law: PanLaw, balance_law: BalanceLaw) -> Self {
        let mix_input = if channels == 1 {
            MixInput::Pan { value: 0.0, law: pan_law }
        } else {
            MixInput::Balance { value: 0.0, law: balance_law }
        };
        Props {
            group_id,
            channels,
            looped: false,
            gain: 1.0,
            speed: 1.0,
            mix_input,
            precomputed: MixMatrix::IDENTITY,
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Recomputes `precomputed = source.mix x group.mix x (source.gain *
    /// group.gain)`. Called by every mutator that can affect the mix.
    pub fn recompute(&mut self, group: Group) {
        self.precomputed = self.mix_input.matrix().compose(group.mix).scaled(self.gain * group.gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_source_defaults_to_pan_law() {
        let props = Props::new(1, 0, PanLaw::ConstantPowerSinCos, BalanceLaw::SinCos);
        assert!(matches!(props.mix_input, MixInput::Pan { .. }));
    }

    #[test]
    fn recompute_folds_in_group_gain() {
        let mut props = Props::new(1, 0, PanLaw::ConstantGain, BalanceLaw::Linear);
        props.gain = 2.0;
        let group = Group { mix: MixMatrix::IDENTITY, gain: 0.5 };
        props.recompute(group);
        // ConstantGain pan at 0.0 => l=r=0.5; overall gain = 2.0*0.5 = 1.0
        assert!((props.precomputed.ll - 0.5).abs() < 1e-5);
    }

    #[test]
    fn speed_is_clamped_to_bounds() {
        let mut props = Props::new(1, 0, PanLaw::ConstantGain, BalanceLaw::Linear);
        props.set_speed(0.0);
        assert_eq!(props.speed, MIN_SPEED);
        props.set_speed(1000.0);
        assert_eq!(props.speed, MAX_SPEED);
    }
}
