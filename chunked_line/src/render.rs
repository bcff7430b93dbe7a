// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reconciling planned geometry against a scene.

use chunked_core::{
    Element, ElementKey, Geometry, PointKey, Presentation, Role, SceneGraph, Transition,
};
use kurbo::{BezPath, Circle, Point, Rect};

use crate::chunk::{ChunkOrder, GAP_CHUNK, LINE_CHUNK, compute_chunk_runs};
use crate::config::{LineChunked, PointIdentity};
use crate::geometry::{
    Extent, LinePlan, Marker, Span, clip_band, clip_rect, extend_ends, flatten_path,
    next_visible_area, plan_line, previous_visible_area, run_span, visible_start_end,
};
use crate::segment::compute_segments;
use crate::style::EvaluatedDefinition;

/// Radius markers grow from and shrink to. Zero radii are dropped by some renderers.
const MIN_RADIUS: f64 = 1e-6;

/// Share of the transition a marker takes to shrink away.
const MARKER_EXIT_SHARE: f64 = 0.05;

/// Share of the transition, at its end, a new marker takes to grow.
const MARKER_ENTER_SHARE: f64 = 0.15;

const DEBUG_FILL: &str = "rgba(255, 0, 0, 0.3)";
const DEBUG_STROKE: &str = "rgba(255, 0, 0, 0.6)";

/// What to render: the bound series, and optionally a transition to animate with.
pub trait RenderTarget<R> {
    /// The series to draw, one line each. The position of a series is its identity.
    fn selection(&self) -> &[R];

    /// The transition changes are animated with, if any.
    fn transition(&self) -> Option<&Transition> {
        None
    }
}

/// A set of series rendered without animation.
#[derive(Debug)]
pub struct Selection<'a, R> {
    data: &'a [R],
}

impl<'a, R> Selection<'a, R> {
    /// Binds a list of series.
    pub fn new(data: &'a [R]) -> Self {
        Self { data }
    }

    /// Binds a single series.
    pub fn single(datum: &'a R) -> Self {
        Self {
            data: core::slice::from_ref(datum),
        }
    }

    /// Animates the render with `transition`.
    pub fn with_transition(self, transition: Transition) -> Transitioning<'a, R> {
        Transitioning {
            selection: self,
            transition,
        }
    }
}

impl<R> RenderTarget<R> for Selection<'_, R> {
    fn selection(&self) -> &[R] {
        self.data
    }
}

/// A set of series rendered with a transition.
#[derive(Debug)]
pub struct Transitioning<'a, R> {
    selection: Selection<'a, R>,
    transition: Transition,
}

impl<R> RenderTarget<R> for Transitioning<'_, R> {
    fn selection(&self) -> &[R] {
        self.selection.data
    }

    fn transition(&self) -> Option<&Transition> {
        Some(&self.transition)
    }
}

/// Per-series state shared by every chunk.
struct Pass<'a> {
    series: u32,
    transition: Option<&'a Transition>,
    initial: bool,
    x: Option<Extent>,
    y: Option<Extent>,
}

impl<D, R> LineChunked<D, R> {
    /// Draws every series of `target` into `scene`.
    ///
    /// Elements from previous renders are updated in place, animating from their current
    /// geometry when `target` carries a transition. Series past the end of the selection are
    /// removed, animating out under the transition. An empty selection does nothing.
    pub fn render<S, T>(&self, scene: &mut S, target: &T)
    where
        S: SceneGraph + ?Sized,
        T: RenderTarget<R> + ?Sized,
    {
        let data = target.selection();
        if data.is_empty() {
            tracing::trace!("empty selection, nothing to render");
            return;
        }
        let defined: Vec<&str> = self.styles.chunk_definitions.names().collect();
        let render_order = ChunkOrder::render(defined.iter().copied());
        let resolution_order = ChunkOrder::resolution(defined.iter().copied());

        let mut rendered = 0_u32;
        for (index, datum) in data.iter().enumerate() {
            let Ok(series) = u32::try_from(index) else {
                tracing::warn!(index, "too many series; the rest are not rendered");
                break;
            };
            self.render_series(
                scene,
                datum,
                index,
                series,
                target.transition(),
                &render_order,
                &resolution_order,
            );
            raise_markers(scene);
            rendered = series.saturating_add(1);
        }
        remove_exited_series(scene, rendered, target.transition());

        self.styles.chunk_definitions.warn_misnamed();
    }

    fn is_defined(&self, d: &D) -> bool {
        self.defined.eval(d) && self.x.eval(d).is_finite() && self.y.eval(d).is_finite()
    }

    fn point_of(&self, d: &D) -> Point {
        Point::new(self.x.eval(d), self.y.eval(d))
    }

    fn point_key(&self, index: usize, p: Point) -> PointKey {
        match self.point_identity {
            PointIdentity::X => PointKey::from_x(p.x),
            PointIdentity::Index => PointKey::Index(u32::try_from(index).unwrap_or(u32::MAX)),
        }
    }

    fn render_series<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        datum: &R,
        index: usize,
        series: u32,
        transition: Option<&Transition>,
        render_order: &ChunkOrder,
        resolution_order: &ChunkOrder,
    ) {
        let points = (self.access_data)(datum);
        let indexed: Vec<(usize, &D)> = points.iter().enumerate().collect();
        let runs = compute_segments(
            &indexed,
            |(_, d)| self.is_defined(d),
            |(_, a), (_, b)| self.is_next.eval(a, b),
        );

        let coords: Vec<Point> = runs.iter().flatten().map(|&&(_, d)| self.point_of(d)).collect();
        let x = Extent::of(coords.iter().map(|p| p.x));
        let y = Extent::of(coords.iter().map(|p| p.y));
        let initial = !scene.contains(&ElementKey::path(series, LINE_CHUNK));
        let flatten_to = if initial && self.transition_initial {
            y.map(|e| e.max)
        } else {
            None
        };

        let line_plan = plan_line(&coords, &*self.curve, flatten_to);
        let gap_plan = match self.extend_ends {
            Some(_) => plan_line(
                &extend_ends(&coords, self.extend_ends),
                &*self.curve,
                flatten_to,
            ),
            None => line_plan.clone(),
        };

        let pass = Pass {
            series,
            transition,
            initial,
            x,
            y,
        };
        remove_stale_chunks(scene, series, render_order);

        for chunk in render_order.iter() {
            let def = self.styles.evaluate(chunk, datum, index);
            if chunk == GAP_CHUNK {
                self.render_path(scene, &pass, chunk, &gap_plan, &def, None);
                continue;
            }

            let clip_id = self.ensure_clip_path(scene, series, chunk);
            self.render_path(scene, &pass, chunk, &line_plan, &def, Some(clip_id));

            let chunk_runs = compute_chunk_runs(
                chunk,
                &runs,
                |&(_, d): &(usize, &D)| self.chunk.eval(d),
                &*self.chunk_line_resolver,
                resolution_order,
            );
            let mut markers = Vec::new();
            let mut spans = Vec::with_capacity(chunk_runs.len());
            for run in &chunk_runs {
                let pts: Vec<Point> = run.iter().map(|&&(_, d)| self.point_of(d)).collect();
                if let &[&(i, _)] = run.as_slice() {
                    markers.push(Marker {
                        key: self.point_key(i, pts[0]),
                        center: pts[0],
                    });
                }
                spans.extend(run_span(&pts));
            }

            self.render_markers(scene, &pass, chunk, &markers, &def);
            self.render_clip_rects(scene, &pass, chunk, &spans, &def);
        }

        tracing::debug!(
            series,
            points = coords.len(),
            runs = runs.len(),
            initial,
            animated = transition.is_some(),
            "rendered chunked line"
        );
    }

    fn ensure_clip_path<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        series: u32,
        chunk: &str,
    ) -> String {
        let key = ElementKey::clip_path(series, chunk);
        if let Some(Geometry::ClipPath { id }) = scene.element(&key).map(|e| e.geometry) {
            return id;
        }
        let id = self.clip_ids.next_id(chunk);
        scene.insert(key, Element::new(Geometry::ClipPath { id: id.clone() }));
        id
    }

    fn render_path<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        pass: &Pass<'_>,
        chunk: &str,
        plan: &LinePlan,
        def: &EvaluatedDefinition,
        clip_path: Option<String>,
    ) {
        let key = ElementKey::path(pass.series, chunk);
        if !scene.contains(&key) {
            scene.insert(key.clone(), Element::new(Geometry::Path(BezPath::new())));
        }
        if pass.initial {
            scene.set_geometry(&key, Geometry::Path(plan.initial.clone()), None);
        }
        scene.set_presentation(
            &key,
            Presentation {
                attrs: def.attrs.clone(),
                styles: def.styles.clone(),
                classes: chunk_classes(chunk, "").into_iter().collect(),
                clip_path,
                bound_span: None,
            },
        );
        scene.set_geometry(&key, Geometry::Path(plan.line.clone()), pass.transition);
    }

    fn render_markers<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        pass: &Pass<'_>,
        chunk: &str,
        markers: &[Marker],
        def: &EvaluatedDefinition,
    ) {
        let series = pass.series;
        let existing: Vec<ElementKey> = scene
            .keys()
            .into_iter()
            .filter(|k| k.is_in(series, chunk) && k.is_point())
            .collect();
        let wanted: Vec<(ElementKey, Point)> = markers
            .iter()
            .map(|m| (ElementKey::point(series, chunk, m.key), m.center))
            .collect();

        for key in &existing {
            if wanted.iter().any(|(k, _)| k == key) {
                continue;
            }
            let current = scene.element(key).and_then(|e| e.geometry.as_circle());
            match (pass.transition, current) {
                (Some(t), Some(circle)) => {
                    let shrunk = Geometry::Circle(Circle::new(circle.center, MIN_RADIUS));
                    scene.remove(key, Some((shrunk, &marker_exit(t))));
                }
                _ => scene.remove(key, None),
            }
        }

        let radius = def.point_radius().unwrap_or(0.0);
        let mut attrs = def.point_attrs.clone();
        // The radius is carried by the geometry.
        attrs.remove("r");
        let presentation = Presentation {
            attrs,
            styles: def.point_styles.clone(),
            classes: chunk_classes(chunk, "-point").into_iter().collect(),
            clip_path: None,
            bound_span: None,
        };

        for (key, center) in wanted {
            let target = Geometry::Circle(Circle::new(center, radius));
            if existing.contains(&key) {
                scene.set_presentation(&key, presentation.clone());
                scene.set_geometry(&key, target, pass.transition);
                continue;
            }

            scene.insert(
                key.clone(),
                Element::new(Geometry::Circle(Circle::new(center, MIN_RADIUS)))
                    .with_presentation(presentation.clone()),
            );
            match pass.transition {
                Some(t) if !pass.initial || self.transition_initial => {
                    let grow = t.duration.mul_f64(MARKER_ENTER_SHARE);
                    let enter = Transition {
                        delay: t.delay + t.duration.saturating_sub(grow),
                        duration: grow,
                        easing: t.easing,
                    };
                    scene.set_geometry(&key, target, Some(&enter));
                }
                _ => scene.set_geometry(&key, target, None),
            }
        }
    }

    fn render_clip_rects<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        pass: &Pass<'_>,
        chunk: &str,
        spans: &[Span],
        def: &EvaluatedDefinition,
    ) {
        let stroke_width = def.stroke_width();
        let (targets, band) = match (pass.x, pass.y) {
            (Some(x), Some(y)) => (
                spans
                    .iter()
                    .map(|&span| clip_rect(span, x, y, stroke_width))
                    .collect(),
                clip_band(y, stroke_width),
            ),
            _ => (Vec::new(), (0.0, 0.0)),
        };

        let existing = indexed_rects(scene, pass.series, chunk, RectKind::Clip);
        let (previous, next) = if pass.transition.is_some() {
            let current: Vec<Rect> = existing.iter().map(|&(_, r)| r).collect();
            (
                previous_visible_area(&current, pass.x),
                next_visible_area(spans),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        let join = RectJoin {
            pass,
            chunk,
            targets: &targets,
            spans,
            band,
            previous: &previous,
            next: &next,
        };
        join.apply(scene, RectKind::Clip, &existing, &Presentation::default());

        let debug_existing = indexed_rects(scene, pass.series, chunk, RectKind::Debug);
        if self.debug {
            let presentation = Presentation {
                styles: [("fill", DEBUG_FILL), ("stroke", DEBUG_STROKE)]
                    .into_iter()
                    .collect(),
                ..Presentation::default()
            };
            join.apply(scene, RectKind::Debug, &debug_existing, &presentation);
        } else {
            for (i, _) in debug_existing {
                scene.remove(&ElementKey::debug_rect(pass.series, chunk, i), None);
            }
        }
    }
}

fn chunk_classes(chunk: &str, suffix: &str) -> Vec<String> {
    let mut classes = Vec::with_capacity(2);
    match chunk {
        LINE_CHUNK => classes.push(format!("line-chunked-defined{suffix}")),
        GAP_CHUNK => classes.push(format!("line-chunked-undefined{suffix}")),
        _ => {}
    }
    classes.push(format!("line-chunked-chunk-{chunk}{suffix}"));
    classes
}

fn raise_markers<S: SceneGraph + ?Sized>(scene: &mut S) {
    for key in scene.keys().into_iter().filter(ElementKey::is_point) {
        scene.raise(&key);
    }
}

/// The shrink a marker exits with: the start of `t`, cut to its exit share.
fn marker_exit(t: &Transition) -> Transition {
    Transition {
        duration: t.duration.mul_f64(MARKER_EXIT_SHARE),
        ..*t
    }
}

/// Removes every element of a series at or past `count`.
///
/// Under a transition, paths flatten to the bottom of their extent, rectangles collapse as if
/// their chunk had no runs left, and markers shrink away. Without one they go immediately.
fn remove_exited_series<S: SceneGraph + ?Sized>(
    scene: &mut S,
    count: u32,
    transition: Option<&Transition>,
) {
    for key in scene.keys() {
        if key.series < count {
            continue;
        }
        let exit = transition.and_then(|t| {
            let element = scene.element(&key)?;
            series_exit(key.role, element, t)
        });
        match exit {
            Some((geometry, t)) => scene.remove(&key, Some((geometry, &t))),
            None => scene.remove(&key, None),
        }
    }
}

fn series_exit(role: Role, element: Element, t: &Transition) -> Option<(Geometry, Transition)> {
    match (role, element.geometry) {
        (Role::Path, Geometry::Path(path)) => {
            let y = Extent::of(
                path.elements()
                    .iter()
                    .filter_map(|el| el.end_point())
                    .map(|p| p.y),
            )?;
            Some((Geometry::Path(flatten_path(&path, y.max)), *t))
        }
        (Role::ClipRect(_) | Role::DebugRect(_), Geometry::Rect(rect)) => {
            let span = element.presentation.bound_span.unwrap_or([rect.x0, rect.x1]);
            let [start, end] = visible_start_end(span, &next_visible_area(&[]));
            Some((Geometry::Rect(Rect::new(start, rect.y0, end, rect.y1)), *t))
        }
        (Role::Point(_), Geometry::Circle(circle)) => Some((
            Geometry::Circle(Circle::new(circle.center, MIN_RADIUS)),
            marker_exit(t),
        )),
        // Kept until the paths it clips are gone.
        (Role::ClipPath, geometry) => Some((geometry, *t)),
        _ => None,
    }
}

/// Drops elements of `series` whose chunk is no longer drawn.
fn remove_stale_chunks<S: SceneGraph + ?Sized>(scene: &mut S, series: u32, order: &ChunkOrder) {
    for key in scene.keys() {
        if key.series == series && !order.contains(&key.chunk) {
            scene.remove(&key, None);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RectKind {
    Clip,
    Debug,
}

impl RectKind {
    fn role(self, index: u32) -> Role {
        match self {
            Self::Clip => Role::ClipRect(index),
            Self::Debug => Role::DebugRect(index),
        }
    }

    fn index_of(self, role: Role) -> Option<u32> {
        match (self, role) {
            (Self::Clip, Role::ClipRect(i)) | (Self::Debug, Role::DebugRect(i)) => Some(i),
            _ => None,
        }
    }
}

/// Rectangles of one kind for `(series, chunk)`, with their current geometry, ordered by index.
fn indexed_rects<S: SceneGraph + ?Sized>(
    scene: &S,
    series: u32,
    chunk: &str,
    kind: RectKind,
) -> Vec<(u32, Rect)> {
    let mut rects: Vec<(u32, Rect)> = scene
        .keys()
        .into_iter()
        .filter(|k| k.is_in(series, chunk))
        .filter_map(|k| {
            let i = kind.index_of(k.role)?;
            Some((i, scene.element(&k)?.geometry.as_rect()?))
        })
        .collect();
    rects.sort_by_key(|&(i, _)| i);
    rects
}

/// An index-keyed join of rectangles against their targets.
struct RectJoin<'a> {
    pass: &'a Pass<'a>,
    chunk: &'a str,
    targets: &'a [Rect],
    spans: &'a [Span],
    band: (f64, f64),
    previous: &'a [Span],
    next: &'a [Span],
}

impl RectJoin<'_> {
    fn apply<S: SceneGraph + ?Sized>(
        &self,
        scene: &mut S,
        kind: RectKind,
        existing: &[(u32, Rect)],
        presentation: &Presentation,
    ) {
        let key_for = |i: u32| ElementKey::new(self.pass.series, self.chunk, kind.role(i));

        let live = u32::try_from(self.targets.len()).unwrap_or(u32::MAX);
        for &(i, rect) in existing {
            if i < live {
                continue;
            }
            let key = key_for(i);
            match self.pass.transition {
                Some(t) => {
                    let span = scene
                        .element(&key)
                        .and_then(|e| e.presentation.bound_span)
                        .unwrap_or([rect.x0, rect.x1]);
                    let [start, end] = visible_start_end(span, self.next);
                    let collapsed = Rect::new(start, rect.y0, end, rect.y1);
                    scene.remove(&key, Some((Geometry::Rect(collapsed), t)));
                }
                None => scene.remove(&key, None),
            }
        }

        for (i, (&target, &span)) in self.targets.iter().zip(self.spans).enumerate() {
            let Ok(i) = u32::try_from(i) else {
                break;
            };
            let key = key_for(i);
            let presentation = Presentation {
                bound_span: Some(span),
                ..presentation.clone()
            };
            if existing.iter().any(|&(j, _)| j == i) {
                scene.set_presentation(&key, presentation);
            } else {
                let start = match self.pass.transition {
                    Some(_) => {
                        let [x0, x1] = visible_start_end(span, self.previous);
                        Rect::new(x0, self.band.0, x1, self.band.1)
                    }
                    None => target,
                };
                scene.insert(
                    key.clone(),
                    Element::new(Geometry::Rect(start)).with_presentation(presentation),
                );
            }
            scene.set_geometry(&key, Geometry::Rect(target), self.pass.transition);
        }
    }
}
