//! Collaborators injected into the engine: randomness and presentation.

pub mod presentation;
pub mod rng;

pub use presentation::{
    AnimationClip, AnimationState, FrameAnimator, Notification, NullPresentation,
    PresentationSink, RecordingPresentation,
};
pub use rng::{PcgRng, RngOracle, ScriptedRng};
