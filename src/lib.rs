//! # Keyline Engine
//!
//! `keyline` is a keyframe animation editor core for vector graphics.
//!
//! It provides a scene model, a keyframe interpolation engine, a timeline
//! playback controller and bidirectional Lottie interchange, tied together
//! by the [`Editor`] facade. Rendering pixels is out of scope; the engine
//! resolves live property values and leaves drawing to the host.

pub mod editor;

pub use editor::{Editor, TIME_SYNC_EPSILON};

pub use keyline_core::{
    AnimProperty, Easing, Element, ImportError, KeyValue, Keyframe, KeyframePatch, Layer,
    PlaybackController, PlaybackState, Project, Rgb, Shape, Style, Transform,
};
pub use lottie_bridge::{export_project, import_project, ConvertError};
pub use lottie_data::LottieJson;
