//! One-way notifications to the visual and audio layers.
//!
//! The engine tells the presentation layer "play this animation token" and
//! "play this sample at this position" and never waits for an answer. The
//! only thing read back is the animation playback state, which multi-frame
//! attacks use to time their hit windows.

use std::collections::HashMap;

use crate::world::{EntityId, Vec2};

/// Playback state of the animation currently running on an entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationState {
    pub token: String,
    pub frame: u32,
    pub done: bool,
}

/// Sink for visual/audio notifications.
pub trait PresentationSink {
    /// Start the animation identified by `token` on `entity`.
    fn play_animation(&mut self, entity: EntityId, token: &str);

    /// Play the sound resource identified by `name` at `position`.
    fn play_sound(&mut self, name: &str, position: Vec2);

    /// Current animation playback on `entity`, if the layer tracks one.
    fn animation_state(&self, _entity: EntityId) -> Option<AnimationState> {
        None
    }
}

/// Discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresentation;

impl PresentationSink for NullPresentation {
    fn play_animation(&mut self, _entity: EntityId, _token: &str) {}

    fn play_sound(&mut self, _name: &str, _position: Vec2) {}
}

/// A notification captured by [`RecordingPresentation`].
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    Animation { entity: EntityId, token: String },
    Sound { name: String, position: Vec2 },
}

/// Records notifications in order; handy for asserting what an attack announced.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation {
    pub notifications: Vec<Notification>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn animations_for(&self, entity: EntityId) -> Vec<&str> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Animation { entity: e, token } if *e == entity => {
                    Some(token.as_str())
                }
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<&str> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::Sound { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingPresentation {
    fn play_animation(&mut self, entity: EntityId, token: &str) {
        self.notifications.push(Notification::Animation {
            entity,
            token: token.to_string(),
        });
    }

    fn play_sound(&mut self, name: &str, position: Vec2) {
        self.notifications.push(Notification::Sound {
            name: name.to_string(),
            position,
        });
    }
}

/// Frame timing of one animation clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClip {
    pub frames: u32,
    pub frame_time: f32,
}

#[derive(Clone, Debug)]
struct Playback {
    token: String,
    clip: AnimationClip,
    elapsed: f32,
}

/// Headless stand-in for the sprite layer: advances registered clips on a clock.
///
/// Tokens without a registered clip are accepted and finish immediately.
#[derive(Clone, Debug, Default)]
pub struct FrameAnimator {
    clips: HashMap<String, AnimationClip>,
    playing: HashMap<EntityId, Playback>,
}

impl FrameAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, token: impl Into<String>, frames: u32, frame_time: f32) -> Self {
        self.clips.insert(
            token.into(),
            AnimationClip {
                frames: frames.max(1),
                frame_time: frame_time.max(f32::EPSILON),
            },
        );
        self
    }

    /// Advance every running clip by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for playback in self.playing.values_mut() {
            playback.elapsed += dt;
        }
    }

    /// Stop whatever is playing on `entity`.
    pub fn stop(&mut self, entity: EntityId) {
        self.playing.remove(&entity);
    }
}

impl PresentationSink for FrameAnimator {
    fn play_animation(&mut self, entity: EntityId, token: &str) {
        let clip = self.clips.get(token).copied().unwrap_or(AnimationClip {
            frames: 1,
            frame_time: 0.0,
        });
        self.playing.insert(
            entity,
            Playback {
                token: token.to_string(),
                clip,
                elapsed: 0.0,
            },
        );
    }

    fn play_sound(&mut self, name: &str, position: Vec2) {
        tracing::trace!(sound = name, x = position.x, y = position.y, "play sound");
    }

    fn animation_state(&self, entity: EntityId) -> Option<AnimationState> {
        let playback = self.playing.get(&entity)?;
        let total = playback.clip.frames as f32 * playback.clip.frame_time;
        let done = playback.elapsed >= total;
        let frame = if playback.clip.frame_time <= 0.0 {
            playback.clip.frames - 1
        } else {
            ((playback.elapsed / playback.clip.frame_time) as u32).min(playback.clip.frames - 1)
        };
        Some(AnimationState {
            token: playback.token.clone(),
            frame,
            done,
        })
    }
}
