//! # Import
//!
//! Reconstructs a project from an interchange document: the left-inverse of
//! export for every field export defines. Frame indices convert back to
//! seconds, percentages back to `[0,1]` fractions, normalized channels back
//! to hex. Per-segment timing-curve data, when present in foreign
//! documents, is recovered as custom cubic-bezier easing.

use keyline_core::{
    AnimProperty, Easing, Element, KeyValue, Project, Rgb, Shape, Style, Transform,
};
use lottie_data::model as lot;
use thiserror::Error;
use tracing::instrument;

use crate::path::{bezier_to_svg_path, PathError};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("document header is invalid: {0}")]
    InvalidHeader(String),
    #[error("layer '{0}' has unsupported type {1} (only shape layers convert)")]
    UnsupportedLayerType(String, u8),
    #[error("shape layer '{0}' contains no shape group")]
    MissingGroup(String),
    #[error("shape group '{0}' contains no supported geometry")]
    UnsupportedGeometry(String),
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Converts a document back into an editable project.
#[instrument(skip(doc), fields(name = %doc.nm, layers = doc.layers.len()))]
pub fn import_project(doc: &lot::LottieJson) -> Result<Project, ConvertError> {
    if !(doc.fr.is_finite() && doc.fr > 0.0) {
        return Err(ConvertError::InvalidHeader(format!(
            "non-positive frame rate {}",
            doc.fr
        )));
    }
    let duration = (doc.op / doc.fr).max(0.0);
    let mut project = Project::new(&doc.nm, doc.w, doc.h, doc.fr, duration);

    for lot_layer in &doc.layers {
        if lot_layer.ty != lot::SHAPE_LAYER_TYPE {
            return Err(ConvertError::UnsupportedLayerType(
                lot_layer.nm.clone(),
                lot_layer.ty,
            ));
        }
        let group = lot_layer
            .shapes
            .iter()
            .find_map(|s| match s {
                lot::Shape::Group(g) => Some(g),
                _ => None,
            })
            .ok_or_else(|| ConvertError::MissingGroup(lot_layer.nm.clone()))?;

        let mut element = group_to_element(&mut project, group, &lot_layer.nm)?;
        // The layer's ks bundle, not the group's closing transform, is the
        // root element's transform and opacity.
        element.transform = static_transform(&lot_layer.ks);
        element.style.opacity = first_scalar(&lot_layer.ks.o, 100.0) / 100.0;

        let layer_id = project.add_layer(&lot_layer.nm, element);
        if lot_layer.hd == Some(true) {
            if let Some(layer) = project.layer_mut(&layer_id) {
                layer.visible = false;
            }
        }
        recover_keyframes(&mut project, &layer_id, &lot_layer.ks);
    }

    project.set_current_time(0.0);
    Ok(project)
}

/// Inverts one shape group into an element: geometry (or nested child
/// groups), fill/stroke entries into style, the closing transform into the
/// element transform.
fn group_to_element(
    project: &mut Project,
    group: &lot::GroupShape,
    name: &str,
) -> Result<Element, ConvertError> {
    let mut geometry: Option<Shape> = None;
    let mut children: Vec<Element> = Vec::new();
    let mut style = Style::default();
    let mut transform = Transform::default();

    for item in &group.it {
        match item {
            lot::Shape::Rect(rc) => {
                let p = first_pair(&rc.p, [0.0, 0.0]);
                let s = first_pair(&rc.s, [0.0, 0.0]);
                let radius = first_scalar(&rc.r, 0.0);
                geometry = Some(Shape::Rect {
                    x: p[0] - s[0] / 2.0,
                    y: p[1] - s[1] / 2.0,
                    width: s[0],
                    height: s[1],
                    radius: (radius > 0.0).then_some(radius),
                });
            }
            lot::Shape::Ellipse(el) => {
                let p = first_pair(&el.p, [0.0, 0.0]);
                let s = first_pair(&el.s, [0.0, 0.0]);
                geometry = Some(if s[0] == s[1] {
                    Shape::Circle {
                        cx: p[0],
                        cy: p[1],
                        r: s[0] / 2.0,
                    }
                } else {
                    Shape::Ellipse {
                        cx: p[0],
                        cy: p[1],
                        rx: s[0] / 2.0,
                        ry: s[1] / 2.0,
                    }
                });
            }
            lot::Shape::Path(sh) => {
                geometry = Some(path_shape(&sh.ks));
            }
            lot::Shape::Group(nested) => {
                let child_name = nested.nm.as_deref().unwrap_or("group");
                children.push(group_to_element(project, nested, child_name)?);
            }
            lot::Shape::Fill(fl) => {
                style.fill = Some(channel_hex(&fl.c));
            }
            lot::Shape::Stroke(st) => {
                style.stroke = Some(channel_hex(&st.c));
                style.stroke_width = first_scalar(&st.w, 1.0).max(0.0);
            }
            lot::Shape::Transform(tr) => {
                transform = static_transform(&tr.t);
                style.opacity = first_scalar(&tr.t.o, 100.0) / 100.0;
            }
            lot::Shape::Unknown => continue,
        }
    }

    let shape = if !children.is_empty() {
        Shape::Group { children }
    } else {
        geometry.ok_or_else(|| ConvertError::UnsupportedGeometry(name.to_string()))?
    };
    let id = project.alloc_id("el");
    let mut element = Element::new(&id, name, shape);
    element.style = style;
    element.transform = transform;
    Ok(element)
}

/// A path item back into the editor's geometry: tangent-free paths are
/// polygons/polylines (by the closed flag), curved ones keep a command
/// string.
fn path_shape(ks: &lot::Property<lot::BezierPath>) -> Shape {
    let bezier = match &ks.k {
        lot::PropertyValue::Static(b) => b.clone(),
        lot::PropertyValue::Animated(frames) => frames
            .first()
            .and_then(|f| f.s.clone())
            .unwrap_or_default(),
    };
    if bezier.is_polyline() {
        let points = bezier
            .v
            .iter()
            .map(|p| format!("{},{}", p[0], p[1]))
            .collect::<Vec<_>>()
            .join(" ");
        if bezier.c {
            Shape::Polygon { points }
        } else {
            Shape::Polyline { points }
        }
    } else {
        Shape::Path {
            data: bezier_to_svg_path(&bezier),
        }
    }
}

/// The non-animated reading of a ks bundle; animated tracks contribute
/// their first keyframe's start value as the static default.
fn static_transform(ks: &lot::Transform) -> Transform {
    let p = first_pair(&ks.p, [0.0, 0.0]);
    let s = first_pair(&ks.s, [100.0, 100.0]);
    Transform {
        x: p[0],
        y: p[1],
        rotation: first_scalar(&ks.r, 0.0),
        scale_x: s[0] / 100.0,
        scale_y: s[1] / 100.0,
    }
}

fn first_pair(prop: &lot::Property<Vec<f64>>, default: [f64; 2]) -> [f64; 2] {
    let value = match &prop.k {
        lot::PropertyValue::Static(v) => Some(v),
        lot::PropertyValue::Animated(frames) => frames.first().and_then(|f| f.s.as_ref()),
    };
    match value {
        Some(v) => [
            v.first().copied().unwrap_or(default[0]),
            v.get(1).copied().unwrap_or(default[1]),
        ],
        None => default,
    }
}

fn first_scalar(prop: &lot::Property<f64>, default: f64) -> f64 {
    match &prop.k {
        lot::PropertyValue::Static(v) => *v,
        lot::PropertyValue::Animated(frames) => {
            frames.first().and_then(|f| f.s).unwrap_or(default)
        }
    }
}

/// Normalized channels back to canonical hex; extra channels (alpha) are
/// ignored, missing ones read as 0.
fn channel_hex(prop: &lot::Property<Vec<f64>>) -> String {
    let channels = match &prop.k {
        lot::PropertyValue::Static(v) => Some(v),
        lot::PropertyValue::Animated(frames) => frames.first().and_then(|f| f.s.as_ref()),
    };
    let pick = |i: usize| channels.and_then(|c| c.get(i).copied()).unwrap_or(0.0);
    Rgb::from_normalized([pick(0), pick(1), pick(2)]).to_hex()
}

/// Rebuilds editor keyframes from the animated tracks of a ks bundle.
/// Combined pairs split back into per-axis keyframes; percentages scale
/// back down; frame indices become seconds.
fn recover_keyframes(project: &mut Project, layer_id: &str, ks: &lot::Transform) {
    let fr = project.frame_rate;
    if let Some(frames) = ks.p.keyframes() {
        for f in frames {
            let Some(s) = &f.s else { continue };
            let easing = easing_of(f);
            push_keyframe(project, layer_id, AnimProperty::PositionX, f.t / fr, s[0], easing);
            if let Some(y) = s.get(1) {
                push_keyframe(project, layer_id, AnimProperty::PositionY, f.t / fr, *y, easing);
            }
        }
    }
    if let Some(frames) = ks.s.keyframes() {
        for f in frames {
            let Some(s) = &f.s else { continue };
            let easing = easing_of(f);
            push_keyframe(
                project,
                layer_id,
                AnimProperty::ScaleX,
                f.t / fr,
                s[0] / 100.0,
                easing,
            );
            if let Some(y) = s.get(1) {
                push_keyframe(
                    project,
                    layer_id,
                    AnimProperty::ScaleY,
                    f.t / fr,
                    y / 100.0,
                    easing,
                );
            }
        }
    }
    if let Some(frames) = ks.r.keyframes() {
        for f in frames {
            let Some(v) = f.s else { continue };
            push_keyframe(project, layer_id, AnimProperty::Rotation, f.t / fr, v, easing_of(f));
        }
    }
    if let Some(frames) = ks.o.keyframes() {
        for f in frames {
            let Some(v) = f.s else { continue };
            push_keyframe(
                project,
                layer_id,
                AnimProperty::Opacity,
                f.t / fr,
                v / 100.0,
                easing_of(f),
            );
        }
    }
}

fn push_keyframe(
    project: &mut Project,
    layer_id: &str,
    property: AnimProperty,
    time: f64,
    value: f64,
    easing: Easing,
) {
    project.set_current_time(time);
    project.upsert_keyframe(layer_id, property, KeyValue::Number(value), easing);
}

/// Recovers the easing descriptor of one document keyframe. Exported
/// documents carry none (Linear); hold markers and foreign timing handles
/// map to their editor equivalents.
fn easing_of<T>(f: &lot::Keyframe<T>) -> Easing {
    if f.h == Some(1) {
        return Easing::Hold;
    }
    match (f.o, f.i) {
        (Some(o), Some(i)) => Easing::CubicBezier {
            x1: o.x,
            y1: o.y,
            x2: i.x,
            y2: i.y,
        },
        _ => Easing::Linear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_project;

    fn minimal_doc(layers: Vec<lot::ShapeLayer>) -> lot::LottieJson {
        lot::LottieJson {
            v: "5.7.4".to_string(),
            fr: 30.0,
            ip: 0.0,
            op: 60.0,
            w: 800,
            h: 600,
            nm: "clip".to_string(),
            ddd: 0,
            assets: Vec::new(),
            layers,
        }
    }

    fn rect_group() -> lot::Shape {
        lot::Shape::Group(lot::GroupShape {
            nm: Some("box".to_string()),
            it: vec![
                lot::Shape::Rect(lot::RectShape {
                    nm: None,
                    p: lot::Property::fixed(vec![200.0, 100.0]),
                    s: lot::Property::fixed(vec![200.0, 100.0]),
                    r: lot::Property::fixed(0.0),
                }),
                lot::Shape::Fill(lot::FillShape {
                    nm: None,
                    c: lot::Property::fixed(vec![1.0, 0.0, 0.0, 1.0]),
                    o: lot::Property::fixed(100.0),
                }),
                lot::Shape::Transform(lot::TransformShape {
                    t: lot::Transform::default(),
                }),
            ],
        })
    }

    fn shape_layer(shapes: Vec<lot::Shape>) -> lot::ShapeLayer {
        lot::ShapeLayer {
            ty: lot::SHAPE_LAYER_TYPE,
            nm: "box".to_string(),
            ind: 1,
            ip: 0.0,
            op: 60.0,
            st: 0.0,
            ks: lot::Transform::default(),
            shapes,
            hd: None,
        }
    }

    #[test]
    fn header_maps_back_to_project_fields() {
        let doc = minimal_doc(vec![shape_layer(vec![rect_group()])]);
        let p = import_project(&doc).unwrap();
        assert_eq!(p.name, "clip");
        assert_eq!((p.width, p.height), (800, 600));
        assert_eq!(p.frame_rate, 30.0);
        assert_eq!(p.duration, 2.0);
        assert_eq!(p.current_time, 0.0);
    }

    #[test]
    fn rect_geometry_uncentered_and_fill_rehexed() {
        let doc = minimal_doc(vec![shape_layer(vec![rect_group()])]);
        let p = import_project(&doc).unwrap();
        let el = &p.layers[0].element;
        assert_eq!(
            el.shape,
            Shape::Rect {
                x: 100.0,
                y: 50.0,
                width: 200.0,
                height: 100.0,
                radius: None,
            }
        );
        assert_eq!(el.style.fill.as_deref(), Some("#ff0000"));
        assert_eq!(el.style.stroke, None);
    }

    #[test]
    fn equal_diameter_ellipse_imports_as_circle() {
        let circle = lot::Shape::Group(lot::GroupShape {
            nm: None,
            it: vec![
                lot::Shape::Ellipse(lot::EllipseShape {
                    nm: None,
                    p: lot::Property::fixed(vec![50.0, 50.0]),
                    s: lot::Property::fixed(vec![40.0, 40.0]),
                }),
                lot::Shape::Transform(lot::TransformShape {
                    t: lot::Transform::default(),
                }),
            ],
        });
        let doc = minimal_doc(vec![shape_layer(vec![circle])]);
        let p = import_project(&doc).unwrap();
        assert_eq!(
            p.layers[0].element.shape,
            Shape::Circle {
                cx: 50.0,
                cy: 50.0,
                r: 20.0
            }
        );
    }

    #[test]
    fn non_shape_layer_is_an_error() {
        let mut layer = shape_layer(vec![rect_group()]);
        layer.ty = 2;
        let err = import_project(&minimal_doc(vec![layer])).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedLayerType(_, 2)));
    }

    #[test]
    fn bad_frame_rate_is_an_error() {
        let mut doc = minimal_doc(vec![]);
        doc.fr = 0.0;
        assert!(matches!(
            import_project(&doc),
            Err(ConvertError::InvalidHeader(_))
        ));
    }

    #[test]
    fn animated_position_splits_into_axis_keyframes() {
        let mut layer = shape_layer(vec![rect_group()]);
        layer.ks.p = lot::Property::animated(vec![
            lot::Keyframe {
                t: 0.0,
                s: Some(vec![100.0, 0.0]),
                e: Some(vec![100.0, 0.0]),
                i: None,
                o: None,
                h: None,
            },
            lot::Keyframe {
                t: 30.0,
                s: Some(vec![300.0, 0.0]),
                e: Some(vec![300.0, 0.0]),
                i: None,
                o: None,
                h: None,
            },
        ]);
        let p = import_project(&minimal_doc(vec![layer])).unwrap();
        let layer_id = &p.layers[0].id;
        let xs = p.keyframes_for(layer_id, Some(AnimProperty::PositionX));
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0].time, 0.0);
        assert_eq!(xs[1].time, 1.0);
        assert_eq!(xs[1].value, KeyValue::Number(300.0));
        assert_eq!(xs[1].easing, Easing::Linear);
        // The element's static transform falls back to the first keyframe.
        assert_eq!(p.layers[0].element.transform.x, 100.0);
    }

    #[test]
    fn foreign_timing_handles_recover_as_custom_easing() {
        let mut layer = shape_layer(vec![rect_group()]);
        layer.ks.r = lot::Property::animated(vec![
            lot::Keyframe {
                t: 0.0,
                s: Some(0.0),
                e: Some(90.0),
                i: Some(lot::EasingHandle { x: 0.58, y: 1.0 }),
                o: Some(lot::EasingHandle { x: 0.42, y: 0.0 }),
                h: None,
            },
            lot::Keyframe {
                t: 60.0,
                s: Some(90.0),
                e: None,
                i: None,
                o: None,
                h: Some(1),
            },
        ]);
        let p = import_project(&minimal_doc(vec![layer])).unwrap();
        let layer_id = &p.layers[0].id;
        let rot = p.keyframes_for(layer_id, Some(AnimProperty::Rotation));
        assert_eq!(
            rot[0].easing,
            Easing::CubicBezier {
                x1: 0.42,
                y1: 0.0,
                x2: 0.58,
                y2: 1.0
            }
        );
        assert_eq!(rot[1].easing, Easing::Hold);
    }

    #[test]
    fn hidden_flag_clears_visibility() {
        let mut layer = shape_layer(vec![rect_group()]);
        layer.hd = Some(true);
        let p = import_project(&minimal_doc(vec![layer])).unwrap();
        assert!(!p.layers[0].visible);
    }

    #[test]
    fn export_then_import_reproduces_the_scene() {
        let mut original = Project::new("clip", 800, 600, 30.0, 2.0);
        let mut el = Element::new(
            "el-1",
            "box",
            Shape::Rect {
                x: 100.0,
                y: 50.0,
                width: 200.0,
                height: 100.0,
                radius: Some(8.0),
            },
        );
        el.style.fill = Some("#336699".to_string());
        el.style.stroke = Some("#000000".to_string());
        el.style.stroke_width = 2.0;
        el.style.opacity = 0.5;
        el.transform.x = 10.0;
        el.transform.rotation = 45.0;
        let layer_id = original.add_layer("box", el);
        original.set_current_time(0.0);
        original.upsert_keyframe(
            &layer_id,
            AnimProperty::Rotation,
            KeyValue::Number(0.0),
            Easing::Linear,
        );
        original.set_current_time(1.0);
        original.upsert_keyframe(
            &layer_id,
            AnimProperty::Rotation,
            KeyValue::Number(90.0),
            Easing::Linear,
        );

        let doc = export_project(&original);
        let back = import_project(&doc).unwrap();

        assert_eq!(back.name, original.name);
        assert_eq!(back.duration, original.duration);
        let el = &back.layers[0].element;
        assert_eq!(el.shape, original.layers[0].element.shape);
        assert_eq!(el.style.fill.as_deref(), Some("#336699"));
        assert_eq!(el.style.stroke_width, 2.0);
        assert_eq!(el.style.opacity, 0.5);
        assert_eq!(el.transform.x, 10.0);

        let rot = back.keyframes_for(&back.layers[0].id, Some(AnimProperty::Rotation));
        assert_eq!(rot.len(), 2);
        assert_eq!(rot[0].value, KeyValue::Number(0.0));
        assert_eq!(rot[1].value, KeyValue::Number(90.0));
        assert_eq!(rot[1].time, 1.0);
    }

    #[test]
    fn polygon_round_trips_through_the_path_primitive() {
        let mut original = Project::new("clip", 800, 600, 30.0, 1.0);
        let el = Element::new(
            "el-1",
            "tri",
            Shape::Polygon {
                points: "0,0 100,0 50,80".to_string(),
            },
        );
        original.add_layer("tri", el);
        let back = import_project(&export_project(&original)).unwrap();
        assert_eq!(
            back.layers[0].element.shape,
            Shape::Polygon {
                points: "0,0 100,0 50,80".to_string()
            }
        );
    }
}
