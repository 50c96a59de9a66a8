use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play through once. With `clamp_when_finished` the final pose is held;
    /// without it the action leaves the playing state at clip end.
    Once,
    /// Wrap around at clip end.
    Repeat,
}

/// Linear ramp on the fade factor, advanced in unscaled time.
#[derive(Debug, Clone, Copy)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// A runtime playback instance of an [`AnimationClip`].
///
/// The contribution of an action to the blended pose is
/// `weight * fade_factor`, where the fade factor ramps linearly during
/// cross-fades and sits at 1 (or 0, once faded out) otherwise.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    /// Configured base weight, set via [`set_effective_weight`](Self::set_effective_weight).
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub clamp_when_finished: bool,
    pub playing: bool,
    pub enabled: bool,

    fade: Option<Fade>,
    fade_factor: f32,

    pub bindings: Vec<PropertyBinding>,
    track_cursors: Vec<KeyframeCursor>,
}

pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
    Scalar(f32),
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Repeat,
            clamp_when_finished: false,
            playing: false,
            // Disabled until reset()/play(): a bound-but-never-started action
            // must not contribute its start pose to the blend.
            enabled: false,
            fade: None,
            fade_factor: 1.0,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Rewinds to the start pose and re-enables the action.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.enabled = true;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn set_effective_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale;
    }

    pub fn set_effective_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    /// Ramps the fade factor 0 → 1 over `duration` seconds. A zero or
    /// negative duration applies the full weight immediately.
    pub fn fade_in(&mut self, duration: f32) {
        if duration > 0.0 {
            self.fade = Some(Fade {
                from: 0.0,
                to: 1.0,
                duration,
                elapsed: 0.0,
            });
            self.fade_factor = 0.0;
        } else {
            self.fade = None;
            self.fade_factor = 1.0;
        }
    }

    /// Ramps the fade factor from its current value down to 0 over
    /// `duration` seconds, after which the action is disabled.
    pub fn fade_out(&mut self, duration: f32) {
        if duration > 0.0 {
            self.fade = Some(Fade {
                from: self.fade_factor,
                to: 0.0,
                duration,
                elapsed: 0.0,
            });
        } else {
            self.fade = None;
            self.fade_factor = 0.0;
            self.enabled = false;
            self.playing = false;
        }
    }

    /// The weight this action currently contributes to the blend.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.enabled {
            self.weight * self.fade_factor
        } else {
            0.0
        }
    }

    /// True once a fade-out has run to completion.
    #[must_use]
    pub fn is_faded_out(&self) -> bool {
        !self.enabled || (self.fade.is_none() && self.fade_factor <= 0.0)
    }

    /// Advances playback time and any active fade by `dt` seconds.
    ///
    /// Fades run in unscaled time; playback time honors `time_scale` and the
    /// loop mode.
    pub fn update(&mut self, dt: f32) {
        self.update_fade(dt);

        if !self.playing || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.playing = false;
                    if !self.clamp_when_finished {
                        // No clamp requested: the action stops contributing.
                        self.enabled = false;
                    }
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.playing = false;
                    if !self.clamp_when_finished {
                        self.enabled = false;
                    }
                }
            }
            LoopMode::Repeat => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
        }
    }

    fn update_fade(&mut self, dt: f32) {
        let Some(fade) = &mut self.fade else {
            return;
        };

        fade.elapsed += dt;
        if fade.elapsed >= fade.duration {
            let target = fade.to;
            self.fade_factor = target;
            self.fade = None;
            if target <= 0.0 {
                self.enabled = false;
                self.playing = false;
            }
        } else {
            let t = fade.elapsed / fade.duration;
            self.fade_factor = fade.from + (fade.to - fade.from) * t;
        }
    }

    /// Samples the value of the given track at the current playback time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        Some(match &track.data {
            TrackData::Vector3(t) => TrackValue::Vector3(t.sample_with_cursor(self.time, cursor)),
            TrackData::Quaternion(t) => {
                TrackValue::Quaternion(t.sample_with_cursor(self.time, cursor))
            }
            TrackData::Scalar(t) => TrackValue::Scalar(t.sample_with_cursor(self.time, cursor)),
        })
    }
}
