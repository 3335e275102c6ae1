//! # Lottie Data
//!
//! A typed, serde-backed model of the Lottie JSON document, covering the
//! subset the Keyline editor reads and writes: shape layers, the animatable
//! transform bundle, geometry/fill/stroke shape items and keyframed
//! properties. Unknown shape items parse as [`model::Shape::Unknown`] so
//! foreign documents survive the parts we do not understand.

pub mod model;

pub use model::{
    BezierPath, EasingHandle, EllipseShape, FillShape, GroupShape, Keyframe, LottieJson,
    PathShape, Property, PropertyValue, RectShape, Shape, ShapeLayer, StrokeShape, Transform,
    TransformShape, SHAPE_LAYER_TYPE,
};

#[cfg(test)]
mod tests {
    use super::model::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_document() {
        let doc = json!({
            "v": "5.7.4",
            "fr": 30.0,
            "ip": 0,
            "op": 150,
            "w": 800,
            "h": 600,
            "nm": "clip",
            "ddd": 0,
            "assets": [],
            "layers": []
        });
        let parsed: LottieJson = serde_json::from_value(doc).unwrap();
        assert_eq!(parsed.v, "5.7.4");
        assert_eq!(parsed.op, 150.0);
        assert_eq!(parsed.w, 800);
        assert!(parsed.layers.is_empty());
    }

    #[test]
    fn parses_shape_layer_with_group() {
        let doc = json!({
            "ty": 4,
            "nm": "square",
            "ind": 1,
            "ip": 0,
            "op": 150,
            "st": 0,
            "ks": {
                "a": { "a": 0, "k": [0, 0] },
                "p": { "a": 0, "k": [100, 50] },
                "s": { "a": 0, "k": [100, 100] },
                "r": { "a": 0, "k": 0 },
                "o": { "a": 0, "k": 100 }
            },
            "shapes": [{
                "ty": "gr",
                "it": [
                    { "ty": "rc",
                      "p": { "a": 0, "k": [50, 25] },
                      "s": { "a": 0, "k": [100, 50] },
                      "r": { "a": 0, "k": 0 } },
                    { "ty": "fl",
                      "c": { "a": 0, "k": [1.0, 0.0, 0.0, 1.0] },
                      "o": { "a": 0, "k": 100 } },
                    { "ty": "tr",
                      "a": { "a": 0, "k": [0, 0] },
                      "p": { "a": 0, "k": [0, 0] },
                      "s": { "a": 0, "k": [100, 100] },
                      "r": { "a": 0, "k": 0 },
                      "o": { "a": 0, "k": 100 } }
                ]
            }]
        });
        let layer: ShapeLayer = serde_json::from_value(doc).unwrap();
        assert_eq!(layer.ty, SHAPE_LAYER_TYPE);
        assert_eq!(layer.shapes.len(), 1);
        let Shape::Group(group) = &layer.shapes[0] else {
            panic!("expected a group");
        };
        assert_eq!(group.it.len(), 3);
        assert!(matches!(group.it[0], Shape::Rect(_)));
        assert!(matches!(group.it[1], Shape::Fill(_)));
        assert!(matches!(group.it[2], Shape::Transform(_)));
    }

    #[test]
    fn static_and_animated_properties_disambiguate() {
        let fixed: Property<Vec<f64>> =
            serde_json::from_value(json!({ "a": 0, "k": [10.0, 20.0] })).unwrap();
        assert!(!fixed.is_animated());
        assert_eq!(fixed.static_value(), Some(&vec![10.0, 20.0]));

        let animated: Property<Vec<f64>> = serde_json::from_value(json!({
            "a": 1,
            "k": [
                { "t": 0, "s": [0.0, 0.0], "e": [100.0, 0.0] },
                { "t": 30, "s": [100.0, 0.0] }
            ]
        }))
        .unwrap();
        let frames = animated.keyframes().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].t, 0.0);
        assert_eq!(frames[0].e, Some(vec![100.0, 0.0]));
    }

    #[test]
    fn easing_handles_accept_scalar_and_array_coordinates() {
        let scalar: EasingHandle = serde_json::from_value(json!({ "x": 0.42, "y": 0.0 })).unwrap();
        assert_eq!(scalar.x, 0.42);

        let array: EasingHandle =
            serde_json::from_value(json!({ "x": [0.58], "y": [1.0] })).unwrap();
        assert_eq!(array.x, 0.58);
        assert_eq!(array.y, 1.0);
    }

    #[test]
    fn unknown_shape_items_are_tolerated() {
        let shape: Shape = serde_json::from_value(json!({
            "ty": "rp",
            "c": { "a": 0, "k": 3 }
        }))
        .unwrap();
        assert!(matches!(shape, Shape::Unknown));
    }

    #[test]
    fn hold_keyframes_round_trip() {
        let kf = Keyframe::<f64> {
            t: 15.0,
            s: Some(1.0),
            e: None,
            i: None,
            o: None,
            h: Some(1),
        };
        let encoded = serde_json::to_value(&kf).unwrap();
        assert_eq!(encoded, json!({ "t": 15.0, "s": 1.0, "h": 1 }));
    }

    #[test]
    fn polyline_detection() {
        let flat = BezierPath {
            c: true,
            i: vec![[0.0, 0.0]; 3],
            o: vec![[0.0, 0.0]; 3],
            v: vec![[0.0, 0.0], [10.0, 0.0], [5.0, 8.0]],
        };
        assert!(flat.is_polyline());

        let curved = BezierPath {
            i: vec![[0.0, 0.0], [-2.0, 1.0]],
            o: vec![[2.0, -1.0], [0.0, 0.0]],
            v: vec![[0.0, 0.0], [10.0, 10.0]],
            ..Default::default()
        };
        assert!(!curved.is_polyline());
    }
}
