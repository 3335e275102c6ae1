//! # Editor
//!
//! The coordinator tying the pieces together: it owns the [`Project`] and
//! the [`PlaybackController`], keeps their clocks in agreement, resolves
//! live property values for display and drives the interchange boundary.

use anyhow::Context;
use keyline_core::import::ImportedDocument;
use keyline_core::interp::value_at;
use keyline_core::{
    AnimProperty, Easing, ImportError, KeyValue, Keyframe, KeyframePatch, PlaybackController,
    PlaybackState, Project,
};
use lottie_data::LottieJson;
use tracing::info;

/// Discrepancies between the controller clock and the stored time below
/// this are ignored by [`Editor::seek`], so controller-driven updates never
/// feed back into a re-seek and oscillate.
pub const TIME_SYNC_EPSILON: f64 = 1e-9;

/// The top-level editor session.
pub struct Editor {
    project: Project,
    playback: PlaybackController,
}

impl Editor {
    pub fn new(name: &str, width: u32, height: u32, frame_rate: f64, duration: f64) -> Self {
        let project = Project::new(name, width, height, frame_rate, duration);
        Self::from_project(project)
    }

    pub fn from_project(project: Project) -> Self {
        let playback = PlaybackController::new(project.duration, project.frame_rate);
        Self { project, playback }
    }

    /// Opens a session from a parsed vector document.
    pub fn from_import(name: &str, doc: ImportedDocument) -> Result<Self, ImportError> {
        let project = Project::from_import(name, doc)?;
        info!(name, layers = project.layers.len(), "imported vector document");
        Ok(Self::from_project(project))
    }

    /// Opens a session from interchange JSON text.
    pub fn import_lottie(source: &str) -> anyhow::Result<Self> {
        let doc: LottieJson =
            serde_json::from_str(source).context("interchange document did not parse")?;
        let project = lottie_bridge::import_project(&doc)?;
        info!(name = %project.name, layers = project.layers.len(), "imported interchange document");
        Ok(Self::from_project(project))
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    // ---- keyframe operations ------------------------------------------

    /// Adds (or replaces) a keyframe at the current playback time.
    pub fn add_keyframe(
        &mut self,
        layer_id: &str,
        property: AnimProperty,
        value: KeyValue,
        easing: Easing,
    ) -> String {
        self.project.upsert_keyframe(layer_id, property, value, easing)
    }

    pub fn delete_keyframe(&mut self, id: &str) {
        self.project.delete_keyframe(id);
    }

    pub fn update_keyframe(&mut self, id: &str, patch: KeyframePatch) {
        self.project.update_keyframe(id, patch);
    }

    pub fn keyframes_for(
        &self,
        layer_id: &str,
        property: Option<AnimProperty>,
    ) -> Vec<&Keyframe> {
        self.project.keyframes_for(layer_id, property)
    }

    // ---- playback ------------------------------------------------------

    pub fn play(&mut self) {
        self.playback.play();
        self.project.playing = true;
    }

    pub fn pause(&mut self) {
        self.playback.pause();
        self.project.playing = self.playback.state() == PlaybackState::Playing;
    }

    /// Stops playback and rewinds both clocks to zero.
    pub fn stop(&mut self) {
        self.playback.stop();
        self.project.playing = false;
        self.project.set_current_time(0.0);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.playback.set_looping(looping);
    }

    /// Moves the playhead. A seek within [`TIME_SYNC_EPSILON`] of the
    /// controller's clock is treated as an echo of a controller-driven
    /// update and does not re-seek the controller.
    pub fn seek(&mut self, t: f64) {
        if (self.playback.time() - t).abs() > TIME_SYNC_EPSILON {
            self.playback.seek(t);
        }
        self.project.set_current_time(self.playback.time());
    }

    /// Advances playback by `elapsed` seconds and syncs the project time.
    /// Returns the new time when playing, `None` otherwise.
    pub fn tick(&mut self, elapsed: f64) -> Option<f64> {
        let advanced = self.playback.tick(elapsed);
        if let Some(t) = advanced {
            self.project.set_current_time(t);
        }
        if self.playback.state() != PlaybackState::Playing {
            self.project.playing = false;
        }
        advanced
    }

    // ---- evaluation ------------------------------------------------------

    /// Resolves a property's live value at the current playhead: the
    /// interpolated keyframe value when the property is keyed, otherwise
    /// the element's static value. `None` when the layer does not exist or
    /// the property has no value (e.g. fill set to "none").
    pub fn resolve(&self, layer_id: &str, property: AnimProperty) -> Option<KeyValue> {
        let kfs = self.project.keyframes_for(layer_id, Some(property));
        if !kfs.is_empty() {
            return value_at(&kfs, self.project.current_time);
        }
        let layer = self.project.layer(layer_id)?;
        let t = layer.element.transform;
        let style = &layer.element.style;
        match property {
            AnimProperty::PositionX => Some(KeyValue::Number(t.x)),
            AnimProperty::PositionY => Some(KeyValue::Number(t.y)),
            AnimProperty::Rotation => Some(KeyValue::Number(t.rotation)),
            AnimProperty::ScaleX => Some(KeyValue::Number(t.scale_x)),
            AnimProperty::ScaleY => Some(KeyValue::Number(t.scale_y)),
            AnimProperty::Opacity => Some(KeyValue::Number(style.clamped_opacity())),
            AnimProperty::Fill => style.fill.clone().map(KeyValue::Color),
            AnimProperty::Stroke => style.stroke.clone().map(KeyValue::Color),
            AnimProperty::StrokeWidth => Some(KeyValue::Number(style.stroke_width)),
        }
    }

    // ---- interchange ---------------------------------------------------

    pub fn export(&self) -> LottieJson {
        lottie_bridge::export_project(&self.project)
    }

    /// Pretty-printed interchange JSON for the current project.
    pub fn export_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(&self.export()).context("export serialization failed")
    }
}
