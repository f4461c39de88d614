mod sample;
mod streaming;

pub use sample::SampleSource;
pub use streaming::StreamingSource;

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::frame::Frame;
use crate::mix::Group;
use crate::pan::{BalanceLaw, PanLaw};
use crate::props::{MixInput, Props};

/// Capability set every source variant exposes, per the data model's "ad-hoc
/// polymorphism" design note: sibling variants behind one interface, not an
/// inheritance hierarchy.
pub trait AudioSource: Send + Sync {
    /// Rewinds to the just-constructed state.
    fn reset(&self);
    /// Advances decode/streaming state by `dt` seconds. Main-thread only.
    fn update(&self, dt: f32) -> bool;
    /// Mixes up to `frames` frames into `out` (already zeroed by the
    /// caller), returning `false` once the source has reached end-of-data
    /// and should be untracked.
    fn generate(&self, out: &mut [Frame], frames: usize) -> bool;
    /// Recomputes the precomputed mix against `group`, the current snapshot
    /// of this source's group.
    fn on_group_changed(&self, group: Group);
    fn group_id(&self) -> usize;
}

/// Shared property block and accessors common to every source variant.
///
/// `group_id` is tracked outside the `Mutex<Props>` in its own atomic so
/// [`AudioGraph::track`]/broadcast lookups don't need to lock a source just
/// to find out which group it belongs to.
pub(crate) struct SourceCore {
    props: Mutex<Props>,
    group_id: AtomicUsize,
}

impl SourceCore {
    pub fn new(channels: u8, group_id: usize, pan_law: PanLaw, balance_law: BalanceLaw) -> Self {
        SourceCore {
            props: Mutex::new(Props::new(channels, group_id, pan_law, balance_law)),
            group_id: AtomicUsize::new(group_id),
        }
    }

    pub fn group_id(&self) -> usize {
        self.group_id.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Props {
        *self.props.lock()
    }

    pub fn on_group_changed(&self, group: Group) {
        self.props.lock().recompute(group);
    }

    pub fn set_group(&self, group_id: usize, group: Group) {
        self.group_id.store(group_id, Ordering::Relaxed);
        let mut props = self.props.lock();
        props.group_id = group_id;
        props.recompute(group);
    }

    pub fn set_looped(&self, looped: bool) {
        self.props.lock().looped = looped;
    }

    pub fn looped(&self) -> bool {
        self.props.lock().looped
    }

    pub fn set_mix(&self, mix: crate::mix::MixMatrix, group: Group) {
        let mut props = self.props.lock();
        props.mix_input = MixInput::Matrix(mix);
        props.recompute(group);
    }

    pub fn set_pan(&self, pan: f32, law: PanLaw, group: Group) {
        let mut props = self.props.lock();
        props.mix_input = MixInput::Pan { value: pan, law };
        props.recompute(group);
    }

    pub fn set_twin_pan(&self, left: f32, right: f32, law: PanLaw, group: Group) {
        let mut props = self.props.lock();
        props.mix_input = MixInput::TwinPan { left, right, law };
        props.recompute(group);
    }

    pub fn set_balance(&self, balance: f32, law: BalanceLaw, group: Group) {
        let mut props = self.props.lock();
        props.mix_input = MixInput::Balance { value: balance, law };
        props.recompute(group);
    }

    pub fn set_gain(&self, gain: f32, group: Group) {
        let mut props = self.props.lock();
        props.gain = gain.max(0.0);
        props.recompute(group);
    }

    pub fn set_speed(&self, speed: f32) {
        self.props.lock().set_speed(speed);
    }
}
