//! # Geometry Conversion
//!
//! SVG-style geometry strings to and from the document format's bezier
//! vertex representation. The document stores a path as parallel vertex and
//! tangent lists (tangents relative to their vertex); the editor stores the
//! command string. Supported commands: M/m, L/l, H/h, V/v, C/c, Q/q, Z/z;
//! quadratics are raised to cubics on conversion. Only the first subpath is
//! converted; the document's path primitive holds a single contour.

use lottie_data::model::BezierPath;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("unsupported path command '{0}'")]
    UnsupportedCommand(char),
    #[error("path command '{0}' is missing arguments")]
    MissingArguments(char),
    #[error("path has no vertices")]
    Empty,
}

/// Parses a flat space/comma-delimited coordinate list into point pairs.
/// A trailing unpaired number is dropped.
pub fn parse_points(points: &str) -> Vec<[f64; 2]> {
    let nums: Vec<f64> = points
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    nums.chunks_exact(2).map(|c| [c[0], c[1]]).collect()
}

/// Builds the bezier form of a polygon (`closed`) or polyline (open):
/// straight segments, every tangent zero.
pub fn points_to_bezier(points: &str, closed: bool) -> BezierPath {
    let v = parse_points(points);
    let zeros = vec![[0.0, 0.0]; v.len()];
    BezierPath {
        c: closed,
        i: zeros.clone(),
        o: zeros,
        v,
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

fn lex(data: &str) -> Vec<Token> {
    let bytes = data.as_bytes();
    let mut tokens = Vec::new();
    let mut idx = 0;
    while idx < bytes.len() {
        let c = bytes[idx] as char;
        if c.is_ascii_alphabetic() {
            tokens.push(Token::Command(c));
            idx += 1;
        } else if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' {
            let start = idx;
            idx += 1;
            let mut seen_dot = c == '.';
            let mut seen_exp = false;
            while idx < bytes.len() {
                match bytes[idx] as char {
                    '0'..='9' => idx += 1,
                    '.' if !seen_dot && !seen_exp => {
                        seen_dot = true;
                        idx += 1;
                    }
                    'e' | 'E' if !seen_exp => {
                        seen_exp = true;
                        idx += 1;
                        if idx < bytes.len() && matches!(bytes[idx], b'-' | b'+') {
                            idx += 1;
                        }
                    }
                    _ => break,
                }
            }
            if let Ok(n) = data[start..idx].parse::<f64>() {
                tokens.push(Token::Number(n));
            }
        } else {
            // Separators (whitespace, commas).
            idx += 1;
        }
    }
    tokens
}

struct Vertex {
    v: [f64; 2],
    tan_in: [f64; 2],
    tan_out: [f64; 2],
}

/// Converts an SVG path string into the document's bezier form.
pub fn svg_path_to_bezier(data: &str) -> Result<BezierPath, PathError> {
    let tokens = lex(data);
    let mut verts: Vec<Vertex> = Vec::new();
    let mut closed = false;
    let mut pos = 0usize;

    let mut cmd: Option<char> = None;
    'outer: while pos < tokens.len() {
        match tokens[pos] {
            Token::Command(c) => {
                if matches!(c, 'Z' | 'z') {
                    closed = true;
                    break;
                }
                // A second subpath starts; only the first is kept.
                if matches!(c, 'M' | 'm') && !verts.is_empty() {
                    break;
                }
                if !matches!(c, 'M' | 'm' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v' | 'C' | 'c' | 'Q' | 'q')
                {
                    return Err(PathError::UnsupportedCommand(c));
                }
                cmd = Some(c);
                pos += 1;
            }
            Token::Number(_) => {
                let Some(c) = cmd else {
                    return Err(PathError::Empty);
                };
                let relative = c.is_ascii_lowercase();
                let cur = verts.last().map(|v| v.v).unwrap_or([0.0, 0.0]);
                let argc = match c.to_ascii_uppercase() {
                    'H' | 'V' => 1,
                    'C' => 6,
                    'Q' => 4,
                    _ => 2,
                };
                let mut args = [0.0f64; 6];
                for slot in args.iter_mut().take(argc) {
                    match tokens.get(pos) {
                        Some(Token::Number(n)) => {
                            *slot = *n;
                            pos += 1;
                        }
                        _ => return Err(PathError::MissingArguments(c)),
                    }
                }
                let abs = |p: [f64; 2]| {
                    if relative {
                        [cur[0] + p[0], cur[1] + p[1]]
                    } else {
                        p
                    }
                };
                match c.to_ascii_uppercase() {
                    'M' | 'L' => {
                        // A moveto's extra pairs act as implicit linetos, so
                        // both commands reduce to appending a flat vertex.
                        line_to(&mut verts, abs([args[0], args[1]]));
                    }
                    'H' => {
                        let x = if relative { cur[0] + args[0] } else { args[0] };
                        line_to(&mut verts, [x, cur[1]]);
                    }
                    'V' => {
                        let y = if relative { cur[1] + args[0] } else { args[0] };
                        line_to(&mut verts, [cur[0], y]);
                    }
                    'C' => {
                        let c1 = abs([args[0], args[1]]);
                        let c2 = abs([args[2], args[3]]);
                        let end = abs([args[4], args[5]]);
                        curve_to(&mut verts, c1, c2, end);
                    }
                    'Q' => {
                        // Raise the quadratic to a cubic: each control point
                        // moves 2/3 of the way from its endpoint to q.
                        let q = abs([args[0], args[1]]);
                        let end = abs([args[2], args[3]]);
                        let c1 = [
                            cur[0] + 2.0 / 3.0 * (q[0] - cur[0]),
                            cur[1] + 2.0 / 3.0 * (q[1] - cur[1]),
                        ];
                        let c2 = [
                            end[0] + 2.0 / 3.0 * (q[0] - end[0]),
                            end[1] + 2.0 / 3.0 * (q[1] - end[1]),
                        ];
                        curve_to(&mut verts, c1, c2, end);
                    }
                    _ => break 'outer,
                }
            }
        }
    }

    if verts.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(BezierPath {
        c: closed,
        i: verts.iter().map(|v| v.tan_in).collect(),
        o: verts.iter().map(|v| v.tan_out).collect(),
        v: verts.iter().map(|v| v.v).collect(),
    })
}

fn line_to(verts: &mut Vec<Vertex>, p: [f64; 2]) {
    verts.push(Vertex {
        v: p,
        tan_in: [0.0, 0.0],
        tan_out: [0.0, 0.0],
    });
}

fn curve_to(verts: &mut Vec<Vertex>, c1: [f64; 2], c2: [f64; 2], end: [f64; 2]) {
    if let Some(prev) = verts.last_mut() {
        prev.tan_out = [c1[0] - prev.v[0], c1[1] - prev.v[1]];
    }
    verts.push(Vertex {
        v: end,
        tan_in: [c2[0] - end[0], c2[1] - end[1]],
        tan_out: [0.0, 0.0],
    });
}

fn is_flat(h: [f64; 2]) -> bool {
    h[0].abs() < 1e-9 && h[1].abs() < 1e-9
}

/// Reconstructs an SVG path string from the bezier form. Straight segments
/// come back as `L`, curved ones as `C` with absolute control points.
pub fn bezier_to_svg_path(path: &BezierPath) -> String {
    let Some(first) = path.v.first() else {
        return String::new();
    };
    let tan = |list: &[[f64; 2]], k: usize| list.get(k).copied().unwrap_or([0.0, 0.0]);
    let mut out = format!("M {} {}", first[0], first[1]);
    for k in 1..path.v.len() {
        segment(&mut out, path.v[k - 1], tan(&path.o, k - 1), path.v[k], tan(&path.i, k));
    }
    if path.c {
        if let Some(last) = path.v.last() {
            let o = tan(&path.o, path.v.len() - 1);
            let i = tan(&path.i, 0);
            // A curved closing segment needs an explicit C before the Z.
            if !(is_flat(o) && is_flat(i)) {
                segment(&mut out, *last, o, *first, i);
            }
        }
        out.push_str(" Z");
    }
    out
}

fn segment(out: &mut String, from: [f64; 2], o: [f64; 2], to: [f64; 2], i: [f64; 2]) {
    use std::fmt::Write;
    if is_flat(o) && is_flat(i) {
        let _ = write!(out, " L {} {}", to[0], to[1]);
    } else {
        let _ = write!(
            out,
            " C {} {} {} {} {} {}",
            from[0] + o[0],
            from[1] + o[1],
            to[0] + i[0],
            to[1] + i[1],
            to[0],
            to[1]
        );
    }
}
