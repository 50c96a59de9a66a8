use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::action::{AnimationAction, LoopMode, TrackValue};
use crate::animation::binder::Binder;
use crate::animation::binding::TargetPath;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// The skinned-animation evaluator for one actor.
///
/// Owns one [`AnimationAction`] per unique clip name bound to a node
/// subtree. At most one action is *active* and at most one *previous* action
/// may be fading out; during the fade window both are evaluated and their
/// weighted poses blended into the scene nodes.
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    /// Clip name → action index. First write wins: a duplicate clip name in
    /// the asset never replaces the action bound earlier.
    names: FxHashMap<String, usize>,
    active: Option<usize>,
    previous: Option<usize>,
}

/// Weighted accumulator for one (node, property) pair.
struct BlendSlot {
    vec: Vec3,
    quat: Quat,
    total_weight: f32,
}

impl AnimationMixer {
    /// Builds one action per unique clip name, resolving each clip's tracks
    /// against the subtree under `root`.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clips: &[Arc<AnimationClip>]) -> Self {
        let mut actions = Vec::with_capacity(clips.len());
        let mut names = FxHashMap::default();

        for clip in clips {
            if names.contains_key(&clip.name) {
                continue;
            }
            let mut action = AnimationAction::new(Arc::clone(clip));
            action.bindings = Binder::bind(scene, root, clip);
            names.insert(clip.name.clone(), actions.len());
            actions.push(action);
        }

        Self {
            actions,
            names,
            active: None,
            previous: None,
        }
    }

    /// Cross-fades to the action bound under `name`.
    ///
    /// The currently active action (if it differs from the requested one)
    /// becomes the previous action and fades out linearly over `duration`
    /// seconds; the requested action is configured, reset to its start pose,
    /// fades in over `duration`, and starts playing. Requesting the already
    /// active action retires nothing.
    ///
    /// # Panics
    ///
    /// Panics if no action named `name` was bound. The set of valid names is
    /// an asset-time contract; an unknown name is a programming error, not a
    /// recoverable condition.
    pub fn cross_fade(
        &mut self,
        name: &str,
        duration: f32,
        loop_mode: LoopMode,
        time_scale: f32,
        weight: f32,
        clamp_when_finished: bool,
    ) {
        let Some(&idx) = self.names.get(name) else {
            panic!("no animation clip named `{name}` is bound to this mixer");
        };

        if let Some(active) = self.active
            && active != idx
        {
            self.actions[active].fade_out(duration);
            self.previous = Some(active);
        }
        self.active = Some(idx);

        let action = &mut self.actions[idx];
        action.loop_mode = loop_mode;
        action.clamp_when_finished = clamp_when_finished;
        action.reset();
        action.set_effective_time_scale(time_scale);
        action.set_effective_weight(weight);
        action.fade_in(duration);
        action.play();
    }

    /// Advances all actions by `dt` seconds, then writes the weight-blended
    /// pose of every contributing action into the scene nodes.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in &mut self.actions {
            action.update(dt);
        }

        // A completed fade-out retires the previous action for good.
        if let Some(prev) = self.previous
            && self.actions[prev].is_faded_out()
        {
            self.previous = None;
        }

        let mut slots: FxHashMap<(NodeHandle, TargetPath), BlendSlot> = FxHashMap::default();

        for action in &mut self.actions {
            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let (node, target) = {
                    let b = &action.bindings[i];
                    (b.node, b.target)
                };
                let track_index = action.bindings[i].track_index;
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };

                let slot = slots.entry((node, target)).or_insert(BlendSlot {
                    vec: Vec3::ZERO,
                    quat: Quat::IDENTITY,
                    total_weight: 0.0,
                });

                match value {
                    TrackValue::Vector3(v) => {
                        slot.vec += v * weight;
                        slot.total_weight += weight;
                    }
                    TrackValue::Quaternion(mut q) => {
                        if slot.total_weight <= 0.0 {
                            slot.quat = q;
                        } else {
                            // Neighborhood alignment before the incremental
                            // weighted average.
                            if slot.quat.dot(q) < 0.0 {
                                q = -q;
                            }
                            let t = weight / (slot.total_weight + weight);
                            slot.quat = slot.quat.slerp(q, t).normalize();
                        }
                        slot.total_weight += weight;
                    }
                    TrackValue::Scalar(_) => {
                        // No scalar-animated properties in this scene model.
                    }
                }
            }
        }

        for ((node, target), slot) in &slots {
            if slot.total_weight <= 0.0 {
                continue;
            }
            let Some(node) = scene.get_node_mut(*node) else {
                continue;
            };
            match target {
                TargetPath::Translation => {
                    node.transform.position = slot.vec / slot.total_weight;
                }
                TargetPath::Scale => {
                    node.transform.scale = slot.vec / slot.total_weight;
                }
                TargetPath::Rotation => {
                    node.transform.rotation = slot.quat;
                }
            }
            node.transform.mark_dirty();
        }
    }

    /// Looks up the action bound under `name`.
    #[must_use]
    pub fn action(&self, name: &str) -> Option<&AnimationAction> {
        self.names.get(name).map(|&idx| &self.actions[idx])
    }

    /// Name of the currently active action.
    #[must_use]
    pub fn active_action(&self) -> Option<&str> {
        self.active.map(|idx| self.actions[idx].clip().name.as_str())
    }

    /// Name of the action currently fading out, if any.
    #[must_use]
    pub fn previous_action(&self) -> Option<&str> {
        self.previous
            .map(|idx| self.actions[idx].clip().name.as_str())
    }

    /// Number of bound actions (one per unique clip name).
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}
