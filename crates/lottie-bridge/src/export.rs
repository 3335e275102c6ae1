//! # Export
//!
//! Turns a project into an interchange document. Export is deterministic
//! and total: every structurally valid project serializes, and malformed
//! geometry strings degrade to empty paths with a warning instead of
//! failing the whole document.
//!
//! Unit conventions of the output format: times are frame indices
//! (`round(seconds * fps)`), scale and opacity are percentages, colors are
//! normalized 0-1 channel lists. Exported keyframes carry their raw value
//! as both segment start and end; easing is an editor-side concern and is
//! not baked into the document's segments.

use keyline_core::{AnimProperty, Element, Layer, Project, Rgb, Shape, Style};
use lottie_data::model as lot;
use tracing::{instrument, warn};

use crate::path::{points_to_bezier, svg_path_to_bezier};

pub const LOTTIE_VERSION: &str = "5.7.4";

/// Serializes the whole project into a document value.
#[instrument(skip(project), fields(name = %project.name, layers = project.layers.len()))]
pub fn export_project(project: &Project) -> lot::LottieJson {
    let op = (project.duration * project.frame_rate).ceil();
    let layers = project
        .layers
        .iter()
        .enumerate()
        .map(|(i, layer)| export_layer(project, layer, i as u32 + 1, op))
        .collect();
    lot::LottieJson {
        v: LOTTIE_VERSION.to_string(),
        fr: project.frame_rate,
        ip: 0.0,
        op,
        w: project.width,
        h: project.height,
        nm: project.name.clone(),
        ddd: 0,
        assets: Vec::new(),
        layers,
    }
}

fn export_layer(project: &Project, layer: &Layer, ind: u32, op: f64) -> lot::ShapeLayer {
    lot::ShapeLayer {
        ty: lot::SHAPE_LAYER_TYPE,
        nm: layer.name.clone(),
        ind,
        ip: 0.0,
        op,
        st: 0.0,
        ks: transform_bundle(project, layer),
        shapes: vec![element_group(&layer.element, true)],
        hd: (!layer.visible).then_some(true),
    }
}

/// The layer's `ks` bundle. Position and scale are combined x/y pairs: when
/// either axis is keyed, the union of both axes' keyframe times is emitted
/// and an axis without a keyframe at a given time falls back to its static
/// value, not an interpolated one (a documented, lossy simplification).
fn transform_bundle(project: &Project, layer: &Layer) -> lot::Transform {
    let t = layer.element.transform;
    let style = &layer.element.style;
    let fr = project.frame_rate;
    lot::Transform {
        a: lot::Property::fixed(vec![0.0, 0.0]),
        p: pair_track(
            project,
            &layer.id,
            (AnimProperty::PositionX, AnimProperty::PositionY),
            (t.x, t.y),
            fr,
            |v| v,
        ),
        s: pair_track(
            project,
            &layer.id,
            (AnimProperty::ScaleX, AnimProperty::ScaleY),
            (t.scale_x, t.scale_y),
            fr,
            |v| v * 100.0,
        ),
        r: scalar_track(project, &layer.id, AnimProperty::Rotation, t.rotation, fr, |v| v),
        o: scalar_track(
            project,
            &layer.id,
            AnimProperty::Opacity,
            style.clamped_opacity(),
            fr,
            |v| v.clamp(0.0, 1.0) * 100.0,
        ),
    }
}

fn frame_index(time: f64, fr: f64) -> f64 {
    (time * fr).round()
}

/// One exported keyframe: raw value as both segment start and end.
fn flat_keyframe<T: Clone>(t: f64, value: T) -> lot::Keyframe<T> {
    lot::Keyframe {
        t,
        s: Some(value.clone()),
        e: Some(value),
        i: None,
        o: None,
        h: None,
    }
}

fn scalar_track(
    project: &Project,
    layer_id: &str,
    property: AnimProperty,
    static_value: f64,
    fr: f64,
    map: impl Fn(f64) -> f64,
) -> lot::Property<f64> {
    let kfs = project.keyframes_for(layer_id, Some(property));
    if kfs.is_empty() {
        return lot::Property::fixed(map(static_value));
    }
    lot::Property::animated(
        kfs.iter()
            .map(|k| {
                let v = map(k.value.as_number().unwrap_or(static_value));
                flat_keyframe(frame_index(k.time, fr), v)
            })
            .collect(),
    )
}

fn pair_track(
    project: &Project,
    layer_id: &str,
    (prop_x, prop_y): (AnimProperty, AnimProperty),
    (static_x, static_y): (f64, f64),
    fr: f64,
    map: impl Fn(f64) -> f64,
) -> lot::Property<Vec<f64>> {
    let xs = project.keyframes_for(layer_id, Some(prop_x));
    let ys = project.keyframes_for(layer_id, Some(prop_y));
    if xs.is_empty() && ys.is_empty() {
        return lot::Property::fixed(vec![map(static_x), map(static_y)]);
    }
    let mut times: Vec<f64> = xs.iter().chain(ys.iter()).map(|k| k.time).collect();
    times.sort_by(f64::total_cmp);
    times.dedup();

    lot::Property::animated(
        times
            .iter()
            .map(|&t| {
                let x = map(axis_value(&xs, t, static_x));
                let y = map(axis_value(&ys, t, static_y));
                flat_keyframe(frame_index(t, fr), vec![x, y])
            })
            .collect(),
    )
}

/// The axis value at an exact union time: the keyframe's value when one
/// exists there, otherwise the axis's static value (never interpolated).
fn axis_value(kfs: &[&keyline_core::Keyframe], t: f64, fallback: f64) -> f64 {
    kfs.iter()
        .find(|k| k.time == t)
        .and_then(|k| k.value.as_number())
        .unwrap_or(fallback)
}

/// One element as a shape group: geometry (or child groups), then fill,
/// then stroke, then the group's closing transform. Absent fill/stroke
/// simply omit the entry.
pub(crate) fn element_group(element: &Element, root: bool) -> lot::Shape {
    let mut items: Vec<lot::Shape> = Vec::new();
    match &element.shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            radius,
        } => items.push(lot::Shape::Rect(lot::RectShape {
            nm: None,
            p: lot::Property::fixed(vec![x + width / 2.0, y + height / 2.0]),
            s: lot::Property::fixed(vec![*width, *height]),
            r: lot::Property::fixed(radius.unwrap_or(0.0)),
        })),
        Shape::Circle { cx, cy, r } => items.push(ellipse_item(*cx, *cy, 2.0 * r, 2.0 * r)),
        Shape::Ellipse { cx, cy, rx, ry } => items.push(ellipse_item(*cx, *cy, 2.0 * rx, 2.0 * ry)),
        Shape::Path { data } => {
            let bezier = svg_path_to_bezier(data).unwrap_or_else(|e| {
                warn!(element = %element.id, error = %e, "unconvertible path data, exporting empty path");
                lot::BezierPath::default()
            });
            items.push(path_item(bezier));
        }
        Shape::Polygon { points } => items.push(path_item(points_to_bezier(points, true))),
        Shape::Polyline { points } => items.push(path_item(points_to_bezier(points, false))),
        Shape::Group { children } => {
            items.extend(children.iter().map(|child| element_group(child, false)));
        }
    }

    if let Some(color) = Style::paint_color(&element.style.fill) {
        items.push(lot::Shape::Fill(lot::FillShape {
            nm: None,
            c: lot::Property::fixed(color_channels(color)),
            o: lot::Property::fixed(100.0),
        }));
    }
    if let Some(color) = Style::paint_color(&element.style.stroke) {
        items.push(lot::Shape::Stroke(lot::StrokeShape {
            nm: None,
            c: lot::Property::fixed(color_channels(color)),
            o: lot::Property::fixed(100.0),
            w: lot::Property::fixed(element.style.stroke_width.max(0.0)),
            lc: 2,
            lj: 2,
        }));
    }

    // The root element's transform already lives on the layer's ks, so its
    // group closes with the identity; nested children carry their own.
    let tr = if root {
        lot::Transform::default()
    } else {
        child_transform(element)
    };
    items.push(lot::Shape::Transform(lot::TransformShape { t: tr }));

    lot::Shape::Group(lot::GroupShape {
        nm: Some(element.name.clone()),
        it: items,
    })
}

fn child_transform(element: &Element) -> lot::Transform {
    let t = element.transform;
    lot::Transform {
        a: lot::Property::fixed(vec![0.0, 0.0]),
        p: lot::Property::fixed(vec![t.x, t.y]),
        s: lot::Property::fixed(vec![t.scale_x * 100.0, t.scale_y * 100.0]),
        r: lot::Property::fixed(t.rotation),
        o: lot::Property::fixed(element.style.clamped_opacity() * 100.0),
    }
}

fn ellipse_item(cx: f64, cy: f64, dx: f64, dy: f64) -> lot::Shape {
    lot::Shape::Ellipse(lot::EllipseShape {
        nm: None,
        p: lot::Property::fixed(vec![cx, cy]),
        s: lot::Property::fixed(vec![dx, dy]),
    })
}

fn path_item(bezier: lot::BezierPath) -> lot::Shape {
    lot::Shape::Path(lot::PathShape {
        nm: None,
        ks: lot::Property::fixed(bezier),
    })
}

/// Hex color to normalized `[r, g, b, 1.0]`; unresolvable input is black.
fn color_channels(color: &str) -> Vec<f64> {
    let [r, g, b] = Rgb::parse_or_black(color).to_normalized();
    vec![r, g, b, 1.0]
}
