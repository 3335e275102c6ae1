//! # Keyline Core
//!
//! Engine-agnostic core of the Keyline animation editor: the scene model,
//! the keyframe store, the interpolation engine and the playback clock.
//!
//! ## Core pieces
//!
//! *   **Scene Model**: [`scene::Project`] owning layers of shape elements
//!     (a recursive tagged union; groups own their children).
//! *   **Keyframe Store**: a flat, id-keyed keyframe list with upsert /
//!     delete / update / sorted-query operations on `Project`.
//! *   **Interpolation**: [`interp::value_at`] resolves a property value at
//!     any time, with preset and custom cubic-bezier easing.
//! *   **Playback**: [`playback::PlaybackController`], a pull-based logical
//!     clock with frame snapping and loop semantics.
//! *   **Import boundary**: [`import::VectorImporter`], the seam where an
//!     external vector parser hands the editor its initial scene.
//!
//! Everything here is single-threaded and synchronous; serialization to the
//! interchange format lives in the `lottie-bridge` crate.

/// Scene model: project, layers, elements, transforms and styles.
pub mod scene;

/// Keyframes, animatable properties and the store operations.
pub mod keyframes;

/// Easing descriptors and the cubic-bezier solver.
pub mod easing;

/// Pure keyframe-sequence evaluation.
pub mod interp;

/// The playback state machine and logical clock.
pub mod playback;

/// The external vector-import boundary.
pub mod import;

/// Shared primitive types (colors).
pub mod types;

pub mod errors;

pub use easing::Easing;
pub use errors::ImportError;
pub use keyframes::{AnimProperty, KeyValue, Keyframe, KeyframePatch};
pub use playback::{PlaybackController, PlaybackState};
pub use scene::{Element, Layer, Project, Shape, Style, Transform};
pub use types::Rgb;
