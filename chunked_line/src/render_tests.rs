// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use chunked_core::{
    Easing, ElementKey, Geometry, PointKey, Role, Scene, SceneGraph, StyleMap, Transition,
};
use kurbo::{BezPath, PathEl, Point, Rect};

use crate::{
    ChunkDefinition, ChunkDefinitions, LineChunked, PointIdentity, Selection, StyleSpec,
};

type Datum = (f64, Option<f64>);
type Series = Vec<Datum>;

fn series(raw: &[(f64, Option<f64>)]) -> Series {
    raw.to_vec()
}

/// `[[0,1],[1,2],[2,null],[3,null],[4,1],[5,null],[6,2],[7,3]]`
fn with_gaps() -> Series {
    series(&[
        (0.0, Some(1.0)),
        (1.0, Some(2.0)),
        (2.0, None),
        (3.0, None),
        (4.0, Some(1.0)),
        (5.0, None),
        (6.0, Some(2.0)),
        (7.0, Some(3.0)),
    ])
}

fn chunked() -> LineChunked<Datum> {
    LineChunked::new().defined_compute(|d: &Datum| d.1.is_some())
}

fn zero_width() -> LineChunked<Datum> {
    chunked().with_line_attrs(StyleSpec::new().with("stroke-width", 0))
}

fn linear(ms: u64) -> Transition {
    Transition::new(Duration::from_millis(ms)).with_easing(Easing::Linear)
}

fn path(scene: &Scene, series: u32, chunk: &str) -> BezPath {
    scene
        .element(&ElementKey::path(series, chunk))
        .and_then(|e| e.geometry.as_path().cloned())
        .expect("path should exist")
}

fn vertices(path: &BezPath) -> Vec<Point> {
    path.elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            _ => None,
        })
        .collect()
}

fn markers(scene: &Scene, series: u32, chunk: &str) -> Vec<(PointKey, kurbo::Circle)> {
    scene
        .paint_order()
        .into_iter()
        .filter(|(k, _)| k.is_in(series, chunk))
        .filter_map(|(k, e)| match (k.role, e.geometry) {
            (Role::Point(p), Geometry::Circle(c)) => Some((p, c)),
            _ => None,
        })
        .collect()
}

fn rects(scene: &Scene, series: u32, chunk: &str, debug: bool) -> Vec<Rect> {
    let mut out: Vec<(u32, Rect)> = scene
        .paint_order()
        .into_iter()
        .filter(|(k, _)| k.is_in(series, chunk))
        .filter_map(|(k, e)| match (k.role, debug) {
            (Role::ClipRect(i), false) | (Role::DebugRect(i), true) => {
                Some((i, e.geometry.as_rect()?))
            }
            _ => None,
        })
        .collect();
    out.sort_by_key(|&(i, _)| i);
    out.into_iter().map(|(_, r)| r).collect()
}

fn clip_rects(scene: &Scene) -> Vec<Rect> {
    rects(scene, 0, "line", false)
}

fn assert_close(a: f64, b: f64, what: &str) {
    assert!((a - b).abs() <= 1e-9, "{what}: {a} != {b}");
}

/// Asserts `r` has the given `x`, `width`, `y`, `height`.
fn assert_rect(r: Rect, x: f64, width: f64, y: f64, height: f64) {
    assert_close(r.x0, x, "x");
    assert_close(r.width(), width, "width");
    assert_close(r.y0, y, "y");
    assert_close(r.height(), height, "height");
}

fn text(map: &StyleMap, key: &str) -> Option<String> {
    map.get(key).map(ToString::to_string)
}

#[test]
fn empty_selection_is_a_no_op() {
    let mut scene = Scene::new();
    let data: Vec<Series> = Vec::new();
    chunked().render(&mut scene, &Selection::new(&data));
    assert!(scene.is_empty());
}

#[test]
fn empty_series() {
    let mut scene = Scene::new();
    let data = Series::new();
    chunked().render(&mut scene, &Selection::single(&data));

    assert_eq!(vertices(&path(&scene, 0, "line")).len(), 0);
    assert_eq!(vertices(&path(&scene, 0, "gap")).len(), 0);
    assert!(markers(&scene, 0, "line").is_empty());
    assert!(clip_rects(&scene).is_empty());
}

#[test]
fn one_point() {
    let mut scene = Scene::new();
    let data = series(&[(0.0, Some(1.0))]);
    chunked().render(&mut scene, &Selection::single(&data));

    assert_eq!(vertices(&path(&scene, 0, "line")).len(), 1);
    assert_eq!(vertices(&path(&scene, 0, "gap")).len(), 1);
    let points = markers(&scene, 0, "line");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].0, PointKey::from_x(0.0));
    assert_close(points[0].1.radius, 2.5, "default radius is stroke-width + 1");
    assert_eq!(clip_rects(&scene).len(), 1);
}

#[test]
fn all_undefined_to_all_undefined_with_transition() {
    let mut scene = Scene::new();
    let data = series(&[(0.0, None)]);
    let chunked = chunked();
    chunked.render(&mut scene, &Selection::single(&data));
    chunked.render(&mut scene, &Selection::single(&data).with_transition(linear(100)));
    scene.finish();

    assert_eq!(vertices(&path(&scene, 0, "line")).len(), 0);
    assert_eq!(vertices(&path(&scene, 0, "gap")).len(), 0);
    assert!(markers(&scene, 0, "line").is_empty());
    assert!(clip_rects(&scene).is_empty());
}

#[test]
fn many_points() {
    let mut scene = Scene::new();
    let data = series(&[(0.0, Some(1.0)), (1.0, Some(2.0)), (2.0, Some(1.0))]);
    zero_width().render(&mut scene, &Selection::single(&data));

    assert_eq!(vertices(&path(&scene, 0, "line")).len(), 3);
    assert_eq!(vertices(&path(&scene, 0, "gap")).len(), 3);
    assert!(markers(&scene, 0, "line").is_empty());
    let rects = clip_rects(&scene);
    assert_eq!(rects.len(), 1);
    assert_rect(rects[0], 0.0, 2.0, 1.0, 1.0);
}

#[test]
fn many_points_with_gaps() {
    let mut scene = Scene::new();
    let data = with_gaps();
    zero_width().render(&mut scene, &Selection::single(&data));

    assert_eq!(vertices(&path(&scene, 0, "line")).len(), 5);
    assert_eq!(vertices(&path(&scene, 0, "gap")).len(), 5);
    assert_eq!(markers(&scene, 0, "line").len(), 1);
    let rects = clip_rects(&scene);
    assert_eq!(rects.len(), 3);
    assert_rect(rects[0], 0.0, 1.0, 1.0, 2.0);
    assert_rect(rects[1], 4.0, 0.0, 1.0, 2.0);
    assert_rect(rects[2], 6.0, 1.0, 1.0, 2.0);
}

#[test]
fn attrs_and_styles_are_applied() {
    let mut scene = Scene::new();
    let data = with_gaps();
    let chunked = chunked()
        .with_line_attrs(
            StyleSpec::new()
                .with("stroke-width", 4)
                .with_compute("stroke", |_, i| if i == 0 { "blue" } else { "red" }),
        )
        .with_line_styles(
            StyleSpec::new()
                .with("fill", "purple")
                .with_compute("stroke", |_, i| if i == 0 { "orange" } else { "green" }),
        )
        .with_gap_attrs(
            StyleSpec::new()
                .with("stroke-width", 2)
                .with_compute("stroke", |_, i| if i == 0 { "teal" } else { "cyan" }),
        )
        .with_gap_styles(
            StyleSpec::new()
                .with_compute("stroke", |_, i| if i == 0 { "magenta" } else { "brown" }),
        )
        .with_point_attrs(StyleSpec::new().with("r", 20))
        .with_point_styles(
            StyleSpec::new()
                .with("fill", "maroon")
                .with_compute("stroke", |_, i| if i == 0 { "indigo" } else { "violet" }),
        );
    chunked.render(&mut scene, &Selection::single(&data));

    let line = scene.element(&ElementKey::path(0, "line")).unwrap().presentation;
    assert_eq!(text(&line.attrs, "stroke-width").as_deref(), Some("4"));
    assert_eq!(text(&line.attrs, "stroke").as_deref(), Some("blue"));
    assert_eq!(text(&line.styles, "fill").as_deref(), Some("purple"));
    assert_eq!(text(&line.styles, "stroke").as_deref(), Some("orange"));
    assert_eq!(line.clip_path.as_deref(), Some("line-chunked-clip-line-0"));
    assert_eq!(
        line.classes.as_slice(),
        ["line-chunked-defined", "line-chunked-chunk-line"]
    );

    let gap = scene.element(&ElementKey::path(0, "gap")).unwrap().presentation;
    assert_eq!(text(&gap.attrs, "stroke-width").as_deref(), Some("2"));
    assert_eq!(text(&gap.attrs, "stroke").as_deref(), Some("teal"));
    assert_eq!(text(&gap.styles, "fill").as_deref(), Some("purple"));
    assert_eq!(text(&gap.styles, "stroke").as_deref(), Some("magenta"));
    assert_eq!(gap.clip_path, None, "the gap path is never clipped");
    assert_eq!(
        gap.classes.as_slice(),
        ["line-chunked-undefined", "line-chunked-chunk-gap"]
    );

    let (key, circle) = markers(&scene, 0, "line")[0];
    let point = scene
        .element(&ElementKey::point(0, "line", key))
        .unwrap()
        .presentation;
    assert_close(circle.radius, 20.0, "r");
    assert!(!point.attrs.contains_key("r"), "radius lives in the geometry");
    assert_eq!(text(&point.attrs, "fill").as_deref(), Some("blue"));
    assert_eq!(text(&point.styles, "fill").as_deref(), Some("maroon"));
    assert_eq!(text(&point.styles, "stroke").as_deref(), Some("indigo"));
    assert_eq!(
        point.classes.as_slice(),
        ["line-chunked-defined-point", "line-chunked-chunk-line-point"]
    );
}

#[test]
fn stroke_width_pads_clip_rects_at_the_edges() {
    let mut scene = Scene::new();
    let data = with_gaps();
    chunked()
        .with_line_attrs(StyleSpec::new().with("stroke-width", 2))
        .render(&mut scene, &Selection::single(&data));

    assert_eq!(vertices(&path(&scene, 0, "line")).len(), 5);
    assert_eq!(markers(&scene, 0, "line").len(), 1);
    let rects = clip_rects(&scene);
    assert_eq!(rects.len(), 3);
    assert_rect(rects[0], -2.0, 3.0, -1.0, 6.0);
    assert_rect(rects[1], 4.0, 0.0, -1.0, 6.0);
    assert_rect(rects[2], 6.0, 3.0, -1.0, 6.0);
}

#[test]
fn stroke_width_style_beats_attribute() {
    let mut scene = Scene::new();
    let data = with_gaps();
    chunked()
        .with_line_attrs(StyleSpec::new().with("stroke-width", 2))
        .with_line_styles(StyleSpec::new().with("stroke-width", "1px"))
        .render(&mut scene, &Selection::single(&data));
    assert_rect(clip_rects(&scene)[0], -1.0, 2.0, 0.0, 4.0);
}

#[test]
fn zero_length_transition_lands_on_final_geometry() {
    let mut scene = Scene::new();
    let data = with_gaps();
    zero_width().render(
        &mut scene,
        &Selection::single(&data).with_transition(linear(0)),
    );

    assert_eq!(vertices(&path(&scene, 0, "line")).len(), 5);
    assert_eq!(markers(&scene, 0, "line").len(), 1);
    let rects = clip_rects(&scene);
    assert_eq!(rects.len(), 3);
    assert_rect(rects[0], 0.0, 1.0, 1.0, 2.0);
    assert_rect(rects[1], 4.0, 0.0, 1.0, 2.0);
    assert_rect(rects[2], 6.0, 1.0, 1.0, 2.0);
}

#[test]
fn defined_and_is_next_produce_the_same_clip_rects() {
    let mut by_defined = Scene::new();
    let data = with_gaps();
    zero_width().render(&mut by_defined, &Selection::single(&data));

    let mut by_is_next = Scene::new();
    let compact = series(&[
        (0.0, Some(1.0)),
        (1.0, Some(2.0)),
        (4.0, Some(1.0)),
        (6.0, Some(2.0)),
        (7.0, Some(3.0)),
    ]);
    zero_width()
        .is_next_compute(|prev: &Datum, curr: &Datum| curr.0 == prev.0 + 1.0)
        .render(&mut by_is_next, &Selection::single(&compact));

    assert_eq!(clip_rects(&by_defined), clip_rects(&by_is_next));
}

#[test]
fn extend_ends_only_extends_the_gap_path() {
    let mut scene = Scene::new();
    let data = series(&[
        (1.0, Some(2.0)),
        (2.0, Some(1.0)),
        (3.0, None),
        (4.0, Some(1.0)),
        (5.0, None),
        (6.0, Some(2.0)),
        (7.0, Some(3.0)),
    ]);
    zero_width()
        .with_extend_ends(Some([0.0, 10.0]))
        .render(&mut scene, &Selection::single(&data));

    let gap = vertices(&path(&scene, 0, "gap"));
    assert_eq!(gap.len(), 7);
    assert_eq!(gap[0], Point::new(0.0, 2.0));
    assert_eq!(gap[1], Point::new(1.0, 2.0));
    assert_eq!(gap[6], Point::new(10.0, 3.0));

    let line = vertices(&path(&scene, 0, "line"));
    assert_eq!(line.len(), 5);
    assert_eq!(line[0], Point::new(1.0, 2.0));

    assert_eq!(markers(&scene, 0, "line").len(), 1);
    let rects = clip_rects(&scene);
    assert_eq!(rects.len(), 3);
    assert_rect(rects[0], 1.0, 1.0, 1.0, 2.0);
    assert_rect(rects[1], 4.0, 0.0, 1.0, 2.0);
    assert_rect(rects[2], 6.0, 1.0, 1.0, 2.0);
}

#[test]
fn rendering_twice_is_idempotent() {
    let mut scene = Scene::new();
    let data = with_gaps();
    let chunked = chunked().chunk_compute(|d: &Datum| {
        if d.1.unwrap_or(0.0) > 1.5 {
            "high".into()
        } else {
            "line".into()
        }
    });
    let chunked = chunked.with_chunk_definitions(ChunkDefinitions::new().with(
        "high",
        ChunkDefinition::new().with_styles(StyleSpec::new().with("stroke", "red")),
    ));
    chunked.render(&mut scene, &Selection::single(&data));
    let first = scene.paint_order();
    chunked.render(&mut scene, &Selection::single(&data));
    assert_eq!(scene.paint_order(), first);
}

#[test]
fn markers_paint_above_everything_else() {
    let mut scene = Scene::new();
    let a = with_gaps();
    let b = series(&[(0.0, Some(5.0)), (1.0, None), (2.0, Some(6.0))]);
    let data = vec![a, b];
    chunked().render(&mut scene, &Selection::new(&data));

    let keys = scene.keys();
    let first_marker = keys.iter().position(ElementKey::is_point).unwrap();
    assert!(
        keys[first_marker..].iter().all(ElementKey::is_point),
        "markers must be painted last: {keys:?}"
    );
    assert_eq!(keys.iter().filter(|k| k.is_point()).count(), 3);
}

#[test]
fn each_series_is_keyed_by_index() {
    let mut scene = Scene::new();
    let data = vec![
        series(&[(0.0, Some(1.0)), (1.0, Some(2.0))]),
        series(&[(0.0, Some(3.0)), (1.0, Some(4.0))]),
    ];
    chunked()
        .with_line_attrs(
            StyleSpec::new().with_compute("stroke", |_, i| if i == 0 { "blue" } else { "red" }),
        )
        .render(&mut scene, &Selection::new(&data));

    let stroke = |series| {
        let el = scene.element(&ElementKey::path(series, "line")).unwrap();
        text(&el.presentation.attrs, "stroke")
    };
    assert_eq!(stroke(0).as_deref(), Some("blue"));
    assert_eq!(stroke(1).as_deref(), Some("red"));

    let clip = |series| match scene.element(&ElementKey::clip_path(series, "line")) {
        Some(el) => match el.geometry {
            Geometry::ClipPath { id } => id,
            _ => panic!("not a clip path"),
        },
        None => panic!("missing clip path"),
    };
    assert_ne!(clip(0), clip(1), "clip ids are unique per series");
    assert_eq!(vertices(&path(&scene, 1, "line"))[0], Point::new(0.0, 3.0));
}

#[test]
fn chunks_share_boundary_points() {
    let mut scene = Scene::new();
    let data = series(&[
        (0.0, Some(1.0)),
        (1.0, Some(1.0)),
        (2.0, Some(2.0)),
        (3.0, Some(2.0)),
        (4.0, Some(1.0)),
    ]);
    zero_width()
        .chunk_compute(|d: &Datum| {
            if d.1.unwrap_or(0.0) > 1.5 {
                "high".into()
            } else {
                "line".into()
            }
        })
        .with_chunk_definitions(ChunkDefinitions::new().with(
            "high",
            ChunkDefinition::new().with_styles(StyleSpec::new().with("stroke", "red")),
        ))
        .render(&mut scene, &Selection::single(&data));

    let high = rects(&scene, 0, "high", false);
    assert_eq!(high.len(), 1);
    assert_rect(high[0], 1.0, 3.0, 1.0, 1.0);

    let line = rects(&scene, 0, "line", false);
    assert_eq!(line.len(), 2);
    assert_rect(line[0], 0.0, 1.0, 1.0, 1.0);
    assert_rect(line[1], 4.0, 0.0, 1.0, 1.0);
    // The trailing line point is isolated, so it gets a marker.
    assert_eq!(markers(&scene, 0, "line").len(), 1);

    let high_path = scene.element(&ElementKey::path(0, "high")).unwrap();
    assert_eq!(
        text(&high_path.presentation.styles, "stroke").as_deref(),
        Some("red")
    );
    assert_eq!(
        high_path.presentation.classes.as_slice(),
        ["line-chunked-chunk-high"]
    );
    assert_eq!(
        vertices(&high_path.geometry.as_path().cloned().unwrap()).len(),
        5,
        "every chunk path runs through all defined points"
    );
}

#[test]
fn dropped_chunks_are_removed() {
    let mut scene = Scene::new();
    let data = with_gaps();
    let defs = ChunkDefinitions::new().with("high", ChunkDefinition::new());
    chunked()
        .with_chunk_definitions(defs)
        .render(&mut scene, &Selection::single(&data));
    assert!(scene.contains(&ElementKey::path(0, "high")));

    chunked().render(&mut scene, &Selection::single(&data));
    assert!(scene.keys().iter().all(|k| k.chunk != "high"));
}

#[test]
fn debug_rects_mirror_clip_rects() {
    let mut scene = Scene::new();
    let data = with_gaps();
    zero_width()
        .with_debug(true)
        .render(&mut scene, &Selection::single(&data));

    assert_eq!(rects(&scene, 0, "line", true), clip_rects(&scene));
    let debug = scene
        .element(&ElementKey::debug_rect(0, "line", 0))
        .unwrap()
        .presentation;
    assert_eq!(
        text(&debug.styles, "fill").as_deref(),
        Some("rgba(255, 0, 0, 0.3)")
    );

    zero_width().render(&mut scene, &Selection::single(&data));
    assert!(rects(&scene, 0, "line", true).is_empty());
    assert_eq!(clip_rects(&scene).len(), 3);
}

#[test]
fn point_identity_by_index() {
    let mut scene = Scene::new();
    let data = with_gaps();
    chunked()
        .with_point_identity(PointIdentity::Index)
        .render(&mut scene, &Selection::single(&data));
    let points = markers(&scene, 0, "line");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].0, PointKey::Index(4));
}

#[test]
fn initial_render_rises_from_the_bottom() {
    let mut scene = Scene::new();
    let data = series(&[(0.0, Some(1.0)), (1.0, Some(3.0)), (2.0, Some(2.0))]);
    chunked().render(
        &mut scene,
        &Selection::single(&data).with_transition(linear(100)),
    );

    let start = vertices(&path(&scene, 0, "line"));
    assert!(start.iter().all(|p| p.y == 3.0), "{start:?}");

    scene.advance_by(Duration::from_millis(50));
    let mid = vertices(&path(&scene, 0, "line"));
    assert_close(mid[0].y, 2.0, "halfway from 3 to 1");

    scene.finish();
    let end = vertices(&path(&scene, 0, "line"));
    assert_eq!(end.iter().map(|p| p.y).collect::<Vec<_>>(), vec![1.0, 3.0, 2.0]);
}

#[test]
fn initial_render_without_transition_initial() {
    let mut scene = Scene::new();
    let data = series(&[(0.0, Some(1.0)), (1.0, None), (2.0, Some(2.0))]);
    chunked()
        .with_transition_initial(false)
        .render(
            &mut scene,
            &Selection::single(&data).with_transition(linear(100)),
        );

    let start = vertices(&path(&scene, 0, "line"));
    assert_eq!(start, vec![Point::new(0.0, 1.0), Point::new(2.0, 2.0)]);
    let points = markers(&scene, 0, "line");
    assert_eq!(points.len(), 2);
    assert!(
        points.iter().all(|(_, c)| (c.radius - 2.5).abs() < 1e-9),
        "markers appear at full size"
    );
}

#[test]
fn markers_grow_late_and_shrink_early() {
    let mut scene = Scene::new();
    let chunked = chunked();
    let before = series(&[(0.0, Some(1.0)), (1.0, None), (2.0, Some(1.0)), (3.0, Some(1.0))]);
    chunked.render(&mut scene, &Selection::single(&before));
    assert_eq!(markers(&scene, 0, "line")[0].0, PointKey::from_x(0.0));

    let after = series(&[(0.0, Some(1.0)), (1.0, Some(1.0)), (2.0, None), (3.0, Some(1.0))]);
    chunked.render(
        &mut scene,
        &Selection::single(&after).with_transition(linear(100)),
    );

    let old = ElementKey::point(0, "line", PointKey::from_x(0.0));
    let new = ElementKey::point(0, "line", PointKey::from_x(3.0));
    assert!(scene.contains(&old), "exiting marker is still shown");
    let radius = |scene: &Scene, key: &ElementKey| {
        scene
            .element(key)
            .and_then(|e| e.geometry.as_circle())
            .map(|c| c.radius)
    };
    assert!(radius(&scene, &new).unwrap() < 1e-3);

    scene.advance_to(Duration::from_millis(5));
    assert!(!scene.contains(&old), "exit takes 5% of the duration");

    scene.advance_to(Duration::from_millis(80));
    assert!(radius(&scene, &new).unwrap() < 1e-3, "growth waits for the line");

    scene.finish();
    assert_close(radius(&scene, &new).unwrap(), 2.5, "final radius");
}

#[test]
fn clip_rects_animate_between_layouts() {
    let mut scene = Scene::new();
    let chunked = zero_width();
    let full = series(&[
        (0.0, Some(1.0)),
        (1.0, Some(1.0)),
        (2.0, Some(2.0)),
        (3.0, Some(1.0)),
        (4.0, Some(1.0)),
    ]);
    chunked.render(&mut scene, &Selection::single(&full));
    assert_eq!(clip_rects(&scene).len(), 1);

    let split = series(&[
        (0.0, Some(1.0)),
        (1.0, Some(1.0)),
        (2.0, None),
        (3.0, Some(1.0)),
        (4.0, Some(1.0)),
    ]);
    chunked.render(
        &mut scene,
        &Selection::single(&split).with_transition(linear(100)),
    );

    // The new rect starts where it is already visible.
    let start = clip_rects(&scene);
    assert_eq!(start.len(), 2);
    assert_rect(start[1], 3.0, 1.0, 1.0, 0.0);

    scene.advance_to(Duration::from_millis(50));
    let mid = clip_rects(&scene);
    assert_close(mid[0].x1, 2.5, "shrinking from 4 to 1");

    // Re-render mid-flight: the exiting rect starts from its current extent.
    chunked.render(
        &mut scene,
        &Selection::single(&full).with_transition(linear(100)),
    );
    let restarted = clip_rects(&scene);
    assert_close(restarted[0].x1, 2.5, "restart from the sampled value");
    assert_eq!(restarted.len(), 2, "second rect is still exiting");

    scene.finish();
    let end = clip_rects(&scene);
    assert_eq!(end.len(), 1);
    assert_rect(end[0], 0.0, 4.0, 1.0, 1.0);
}

#[test]
fn exiting_rects_collapse_into_the_next_visible_area() {
    let mut scene = Scene::new();
    let chunked = zero_width();
    let split = series(&[
        (0.0, Some(1.0)),
        (1.0, Some(1.0)),
        (2.0, None),
        (5.0, Some(1.0)),
        (6.0, Some(2.0)),
    ]);
    chunked.render(&mut scene, &Selection::single(&split));

    let first_only = series(&[(0.0, Some(1.0)), (1.0, Some(1.0))]);
    chunked.render(
        &mut scene,
        &Selection::single(&first_only).with_transition(linear(100)),
    );
    scene.advance_to(Duration::from_millis(99));
    let exiting = clip_rects(&scene)[1];
    // Midpoint 5.5 lies outside [0, 1], so the rect collapses to it.
    assert_close(exiting.x0, 5.5 - 0.005, "collapsing left edge");
    scene.finish();
    assert_eq!(clip_rects(&scene).len(), 1);
}

#[test]
fn exiting_rects_collapse_around_their_run_not_their_padding() {
    let mut scene = Scene::new();
    let split = series(&[
        (0.0, Some(1.0)),
        (1.0, Some(1.0)),
        (2.0, None),
        (5.0, Some(1.0)),
        (6.0, Some(2.0)),
    ]);
    chunked().render(&mut scene, &Selection::single(&split));
    // The last run touches the x extent, so its rect is padded on the right.
    assert_rect(clip_rects(&scene)[1], 5.0, 2.5, -0.5, 4.0);

    let first_only = series(&[(0.0, Some(1.0)), (1.0, Some(1.0))]);
    chunked().render(
        &mut scene,
        &Selection::single(&first_only).with_transition(linear(100)),
    );
    scene.advance_to(Duration::from_millis(99));
    let exiting = clip_rects(&scene)[1];
    // Run [5, 6] collapses to 5.5, not to the middle of the padded [5, 7.5].
    assert_close(exiting.x0, 5.0 + 0.5 * 0.99, "left edge");
    assert_close(exiting.x1, 7.5 - 2.0 * 0.99, "right edge");
}

fn series_keys(scene: &Scene, series: u32) -> Vec<ElementKey> {
    scene
        .keys()
        .into_iter()
        .filter(|k| k.series == series)
        .collect()
}

#[test]
fn series_leaving_the_selection_are_removed() {
    let mut scene = Scene::new();
    let three = vec![with_gaps(), with_gaps(), with_gaps()];
    chunked().render(&mut scene, &Selection::new(&three));
    assert!(!series_keys(&scene, 2).is_empty());

    chunked().render(&mut scene, &Selection::new(&three[..2]));
    assert!(series_keys(&scene, 2).is_empty());
    assert!(scene.contains(&ElementKey::path(1, "line")));

    let mut fresh = Scene::new();
    chunked().render(&mut fresh, &Selection::new(&three[..2]));
    assert_eq!(scene.len(), fresh.len());
}

#[test]
fn series_leaving_the_selection_animate_out() {
    let mut scene = Scene::new();
    let three = vec![with_gaps(), with_gaps(), with_gaps()];
    chunked().render(&mut scene, &Selection::new(&three));
    let before = series_keys(&scene, 2).len();

    chunked().render(
        &mut scene,
        &Selection::new(&three[..2]).with_transition(linear(100)),
    );
    assert_eq!(series_keys(&scene, 2).len(), before, "nothing is dropped early");

    scene.advance_to(Duration::from_millis(10));
    assert!(markers(&scene, 2, "line").is_empty(), "markers shrink away first");

    scene.advance_to(Duration::from_millis(50));
    // Every vertex sinks halfway toward the bottom of the extent (y = 3).
    let ys: Vec<f64> = vertices(&path(&scene, 2, "gap")).iter().map(|p| p.y).collect();
    for (y, expected) in ys.iter().zip([2.0, 2.5, 2.0, 2.5, 3.0]) {
        assert_close(*y, expected, "sinking gap vertex");
    }
    // Run [0, 1] collapses to its midpoint; the rect started padded at -1.5.
    let first = rects(&scene, 2, "line", false)[0];
    assert_close(first.x0, -0.5, "collapsing left edge");
    assert!(scene.contains(&ElementKey::clip_path(2, "line")));

    scene.finish();
    assert!(series_keys(&scene, 2).is_empty());
    assert_eq!(vertices(&path(&scene, 1, "line")).len(), 5);
}

#[test]
fn clip_ids_come_from_the_injected_generator() {
    let ids = std::sync::Arc::new(chunked_core::CounterClipIds::with_prefix("plot"));
    let mut scene = Scene::new();
    let data = with_gaps();
    let chunked = chunked().with_clip_ids(ids.clone());
    chunked.render(&mut scene, &Selection::single(&data));
    let line = scene.element(&ElementKey::path(0, "line")).unwrap();
    assert_eq!(line.presentation.clip_path.as_deref(), Some("plot-line-0"));

    // A second renderer sharing the generator gets fresh ids.
    let mut other = Scene::new();
    chunked.clone().render(&mut other, &Selection::single(&data));
    let line = other.element(&ElementKey::path(0, "line")).unwrap();
    assert_eq!(line.presentation.clip_path.as_deref(), Some("plot-line-1"));
}
