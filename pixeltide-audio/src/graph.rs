use std::sync::Arc;

use pixeltide_shared::{InvalidArgument, GROUPS_AMOUNT};
use tracing::warn;

use crate::frame::Frame;
use crate::mix::{Group, GroupTarget, MixMatrix};
use crate::pan::{BalanceLaw, PanLaw};
use crate::source::AudioSource;

/// Owns the group table and the registry of tracked sources; runs every
/// tracked source once per device pull and sums their stereo output.
///
/// Lifecycle: created at engine start; holds non-owning [`Arc`] references
/// to sources that live in a higher-level owning collection (the script
/// bridge's resource table). Structural mutation (`track`/`untrack`/`halt`)
/// happens from the main thread only; `generate` runs on the audio thread,
/// behind the mutex the device callback holds for the duration of the pull.
pub struct AudioGraph {
    groups: Vec<Group>,
    tracked: Vec<Arc<dyn AudioSource>>,
    default_pan_law: PanLaw,
    default_balance_law: BalanceLaw,
}

impl AudioGraph {
    pub fn new() -> Self {
        AudioGraph {
            groups: vec![Group::default(); GROUPS_AMOUNT],
            tracked: Vec::new(),
            default_pan_law: PanLaw::default(),
            default_balance_law: BalanceLaw::default(),
        }
    }

    pub fn with_default_laws(pan_law: PanLaw, balance_law: BalanceLaw) -> Self {
        AudioGraph {
            groups: vec![Group::default(); GROUPS_AMOUNT],
            tracked: Vec::new(),
            default_pan_law: pan_law,
            default_balance_law: balance_law,
        }
    }

    pub fn default_pan_law(&self) -> PanLaw {
        self.default_pan_law
    }

    pub fn default_balance_law(&self) -> BalanceLaw {
        self.default_balance_law
    }

    pub fn group(&self, group_id: usize) -> Result<Group, InvalidArgument> {
        self.groups.get(group_id).copied().ok_or(InvalidArgument::GroupId(group_id))
    }

    fn group_mut(&mut self, group_id: usize) -> Result<&mut Group, InvalidArgument> {
        self.groups.get_mut(group_id).ok_or(InvalidArgument::GroupId(group_id))
    }

    pub fn set_gain(&mut self, group_id: usize, gain: f32) -> Result<(), InvalidArgument> {
        self.group_mut(group_id)?.gain = gain.max(0.0);
        self.broadcast(GroupTarget::Group(group_id));
        Ok(())
    }

    pub fn set_mix(&mut self, group_id: usize, mix: MixMatrix) -> Result<(), InvalidArgument> {
        self.group_mut(group_id)?.mix = mix;
        self.broadcast(GroupTarget::Group(group_id));
        Ok(())
    }

    pub fn set_pan(&mut self, group_id: usize, pan: f32, law: PanLaw) -> Result<(), InvalidArgument> {
        self.group_mut(group_id)?.mix = law.matrix(pan);
        self.broadcast(GroupTarget::Group(group_id));
        Ok(())
    }

    pub fn set_balance(&mut self, group_id: usize, balance: f32, law: BalanceLaw) -> Result<(), InvalidArgument> {
        self.group_mut(group_id)?.mix = law.matrix(balance);
        self.broadcast(GroupTarget::Group(group_id));
        Ok(())
    }

    /// Notifies every tracked source matching `target` to recompute its
    /// precomputed mix against its (possibly just-changed) group.
    fn broadcast(&self, target: GroupTarget) {
        for source in &self.tracked {
            let group_id = source.group_id();
            if target.matches(group_id) {
                if let Some(group) = self.groups.get(group_id) {
                    source.on_group_changed(*group);
                }
            }
        }
    }

    /// Appends `source` if not already tracked, then forces it to
    /// precompute its mix once against its current group.
    pub fn track(&mut self, source: Arc<dyn AudioSource>) {
        if self.is_tracked(&source) {
            return;
        }
        let group = self.groups.get(source.group_id()).copied().unwrap_or_default();
        source.on_group_changed(group);
        self.tracked.push(source);
    }

    /// Removes `source` via swap-and-pop; order among remaining tracked
    /// sources is unspecified (mixing is commutative).
    pub fn untrack(&mut self, source: &Arc<dyn AudioSource>) {
        if let Some(idx) = self.tracked.iter().position(|s| Arc::ptr_eq(s, source)) {
            self.tracked.swap_remove(idx);
        }
    }

    pub fn is_tracked(&self, source: &Arc<dyn AudioSource>) -> bool {
        self.tracked.iter().any(|s| Arc::ptr_eq(s, source))
    }

    pub fn count_tracked(&self) -> usize {
        self.tracked.len()
    }

    pub fn halt(&mut self) {
        self.tracked.clear();
    }

    /// Drives every tracked source's `update(dt)`. Main-thread only.
    pub fn update(&mut self, dt: f32) -> bool {
        for source in &self.tracked {
            if !source.update(dt) {
                warn!("audio source update reported failure");
                return false;
            }
        }
        true
    }

    /// Iterates tracked sources in reverse order, accumulating their stereo
    /// output into `out` (already zeroed by the caller). Sources reporting
    /// end-of-data are removed in-place via swap-and-pop within this pass.
    pub fn generate(&mut self, out: &mut [Frame], frames: usize) {
        let mut i = self.tracked.len();
        while i > 0 {
            i -= 1;
            let alive = self.tracked[i].generate(out, frames);
            if !alive {
                self.tracked.swap_remove(i);
            }
        }
    }
}

impl Default for AudioGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SampleSource;

    fn sample(data: Vec<i16>) -> Arc<dyn AudioSource> {
        Arc::new(
            SampleSource::new(data, 44_100, 1, 44_100, 0, 10.0, PanLaw::ConstantPowerSinCos, BalanceLaw::SinCos)
                .unwrap(),
        )
    }

    #[test]
    fn track_is_idempotent() {
        let mut graph = AudioGraph::new();
        let source = sample(vec![1; 8]);
        graph.track(source.clone());
        graph.track(source.clone());
        assert_eq!(graph.count_tracked(), 1);
    }

    #[test]
    fn untrack_removes_source() {
        let mut graph = AudioGraph::new();
        let source = sample(vec![1; 8]);
        graph.track(source.clone());
        graph.untrack(&source);
        assert!(!graph.is_tracked(&source));
    }

    #[test]
    fn set_gain_zero_silences_group() {
        let mut graph = AudioGraph::new();
        let source = sample(vec![10_000; 100]);
        graph.track(source.clone());
        graph.set_gain(0, 0.0).unwrap();

        let mut out = vec![Frame::SILENCE; 1];
        graph.generate(&mut out, 1);
        assert_eq!(out[0], Frame::SILENCE);
    }

    #[test]
    fn constant_power_center_mix_matches_scenario_5() {
        let mut graph = AudioGraph::new();
        let a = sample(vec![10_000; 100]);
        let b = sample(vec![10_000; 100]);
        graph.track(a);
        graph.track(b);

        let mut out = vec![Frame::SILENCE; 1];
        graph.generate(&mut out, 1);
        // Each source contributes 10000 * cos(pi/4) ~= 7071; two sources summed ~= 14142.
        assert!((out[0].l as i32 - 14142).abs() <= 2);
        assert_eq!(out[0].l, out[0].r);
    }

    #[test]
    fn invalid_group_id_is_reported() {
        let mut graph = AudioGraph::new();
        let err = graph.set_gain(GROUPS_AMOUNT, 1.0).unwrap_err();
        assert!(matches!(err, InvalidArgument::GroupId(_)));
    }
}
