/// Four gain coefficients describing how left/right input contribute to
/// left/right output: `{L->L, L->R, R->L, R->R}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixMatrix {
    pub ll: f32,
    pub lr: f32,
    pub rl: f32,
    pub rr: f32,
}

impl MixMatrix {
    pub const IDENTITY: MixMatrix = MixMatrix { ll: 1.0, lr: 0.0, rl: 0.0, rr: 1.0 };
    pub const SILENT: MixMatrix = MixMatrix { ll: 0.0, lr: 0.0, rl: 0.0, rr: 0.0 };

    #[inline]
    pub fn scaled(self, gain: f32) -> MixMatrix {
        MixMatrix {
            ll: self.ll * gain,
            lr: self.lr * gain,
            rl: self.rl * gain,
            rr: self.rr * gain,
        }
    }

    /// Composes `self` (applied first) with `other` (applied second):
    /// `self x other` as 2x2 matrix multiplication.
    #[inline]
    pub fn compose(self, other: MixMatrix) -> MixMatrix {
        MixMatrix {
            ll: self.ll * other.ll + self.lr * other.rl,
            lr: self.ll * other.lr + self.lr * other.rr,
            rl: self.rl * other.ll + self.rr * other.rl,
            rr: self.rl * other.lr + self.rr * other.rr,
        }
    }
}

impl Default for MixMatrix {
    fn default() -> Self {
        MixMatrix::IDENTITY
    }
}

/// An aggregate mixer bus: a linear gain and a 2x2 stereo mix matrix applied
/// to every source routed to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Group {
    pub mix: MixMatrix,
    pub gain: f32,
}

impl Default for Group {
    fn default() -> Self {
        Group { mix: MixMatrix::IDENTITY, gain: 1.0 }
    }
}

/// Target of a group-changed broadcast: either one specific group, or every
/// tracked source regardless of its group (used when forcing precomputation
/// on `track`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTarget {
    Group(usize),
    Any,
}

impl GroupTarget {
    #[inline]
    pub fn matches(self, group_id: usize) -> bool {
        match self {
            GroupTarget::Group(id) => id == group_id,
            GroupTarget::Any => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_with_identity_is_noop() {
        let m = MixMatrix { ll: 0.5, lr: 0.1, rl: 0.2, rr: 0.7 };
        assert_eq!(m.compose(MixMatrix::IDENTITY), m);
    }

    #[test]
    fn scaled_by_zero_silences() {
        let m = MixMatrix::IDENTITY.scaled(0.0);
        assert_eq!(m, MixMatrix::SILENT);
    }
}
