// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gallery of chunked line renders.
//!
//! Writes `chunked_demo.html` with one SVG per static example and a strip of frames for each
//! transition. Pass a JSON options file as the first argument to layer it onto every example.

mod html;
mod svg;

use core::time::Duration;

use anyhow::{Context, Result};
use chunked_core::{Easing, Scene, Transition, Value};
use chunked_line::{
    ChunkDefinition, ChunkDefinitions, LineChunked, LineChunkedOptions, MonotoneX, Selection,
    StyleSpec,
};
use kurbo::Rect;
use peniko::color::palette::css;
use tracing_subscriber::EnvFilter;

type Datum = (f64, Option<f64>);

const WIDTH: f64 = 300.0;
const HEIGHT: f64 = 100.0;
const DURATION: Duration = Duration::from_millis(2500);
const FRAMES: u32 = 5;

/// A linear map from a data domain onto an output range.
#[derive(Clone, Copy, Debug)]
struct ScaleLinear {
    domain: [f64; 2],
    range: [f64; 2],
}

impl ScaleLinear {
    fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    fn map(self, v: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }
}

fn default_x() -> ScaleLinear {
    ScaleLinear::new([0.0, 10.0], [10.0, WIDTH - 10.0])
}

fn default_y() -> ScaleLinear {
    ScaleLinear::new([0.0, 4.0], [HEIGHT - 10.0, 10.0])
}

fn data(raw: &[(f64, Option<f64>)]) -> Vec<Datum> {
    raw.to_vec()
}

/// `[[0,1],[1,2],[2,null],[3,null],[4,1],[5,null],[6,2],[7,3],[8,null],[9,1],[10,1]]`
fn typical() -> Vec<Datum> {
    data(&[
        (0.0, Some(1.0)),
        (1.0, Some(2.0)),
        (2.0, None),
        (3.0, None),
        (4.0, Some(1.0)),
        (5.0, None),
        (6.0, Some(2.0)),
        (7.0, Some(3.0)),
        (8.0, None),
        (9.0, Some(1.0)),
        (10.0, Some(1.0)),
    ])
}

fn undefined_at_ends() -> Vec<Datum> {
    data(&[
        (0.0, None),
        (1.0, None),
        (2.0, Some(1.0)),
        (3.0, Some(3.0)),
        (4.0, Some(2.0)),
        (5.0, Some(2.0)),
        (6.0, Some(0.0)),
        (7.0, Some(1.0)),
        (8.0, Some(1.0)),
        (9.0, None),
        (10.0, None),
    ])
}

fn with_missing() -> Vec<Datum> {
    data(&[
        (0.0, Some(1.0)),
        (2.0, Some(2.0)),
        (4.0, Some(1.0)),
        (5.0, None),
        (6.0, Some(2.0)),
        (7.0, None),
        (8.0, Some(2.0)),
        (9.0, Some(0.0)),
    ])
}

struct Gallery {
    /// Raw JSON options layered onto every example.
    options: Option<String>,
}

impl Gallery {
    fn chunked(&self, x: ScaleLinear, y: ScaleLinear) -> Result<LineChunked<Datum>> {
        let chunked = LineChunked::new()
            .x_compute(move |d: &Datum| x.map(d.0))
            .y_compute(move |d: &Datum| d.1.map_or(f64::NAN, |v| y.map(v)))
            .defined_compute(|d: &Datum| d.1.is_some());
        Ok(match &self.options {
            Some(json) => chunked.apply_options(LineChunkedOptions::from_json_str(json)?),
            None => chunked,
        })
    }

    fn default_chunked(&self) -> Result<LineChunked<Datum>> {
        self.chunked(default_x(), default_y())
    }

    fn still(
        &self,
        title: &'static str,
        description: &'static str,
        chunked: &LineChunked<Datum>,
        series: &[Vec<Datum>],
    ) -> html::HtmlSection {
        let mut scene = Scene::new();
        chunked.render(&mut scene, &Selection::new(series));
        html::HtmlSection {
            title,
            description,
            frames: vec![html::Frame {
                label: "final".into(),
                svg: svg::scene_to_svg(&scene, view_box()),
            }],
        }
    }

    fn animated(
        &self,
        title: &'static str,
        description: &'static str,
        chunked: &LineChunked<Datum>,
        start: Option<Vec<Datum>>,
        end: Vec<Datum>,
    ) -> html::HtmlSection {
        let mut scene = Scene::new();
        if let Some(start) = &start {
            chunked.render(&mut scene, &Selection::single(start));
        }
        let transition = Transition::new(DURATION).with_easing(Easing::CubicInOut);
        chunked.render(
            &mut scene,
            &Selection::single(&end).with_transition(transition),
        );

        let frames = (0..FRAMES)
            .map(|i| {
                let at = DURATION.mul_f64(f64::from(i) / f64::from(FRAMES - 1));
                scene.advance_to(at);
                html::Frame {
                    label: format!("{} ms", at.as_millis()),
                    svg: svg::scene_to_svg(&scene, view_box()),
                }
            })
            .collect();
        tracing::debug!(title, animating = scene.is_animating(), "sampled transition");
        html::HtmlSection {
            title,
            description,
            frames,
        }
    }

    fn sections(&self) -> Result<Vec<html::HtmlSection>> {
        let chunked = self.default_chunked()?;
        let transitioning = chunked.clone().with_transition_initial(false);

        let high_low = self
            .default_chunked()?
            .chunk_compute(|d: &Datum| match d.1 {
                Some(v) if v >= 2.0 => "high".into(),
                _ => "line".into(),
            })
            .with_chunk_definitions(ChunkDefinitions::new().with(
                "high",
                ChunkDefinition::new()
                    .with_styles(StyleSpec::new().with("stroke", css::CRIMSON))
                    .with_point_styles(StyleSpec::new().with("fill", css::CRIMSON)),
            ));

        let by_series = self.default_chunked()?.with_line_styles(
            StyleSpec::new().with_compute("stroke", |series: &Vec<Datum>, i| -> Value {
                match (i, series.len()) {
                    (0, _) => css::STEEL_BLUE.into(),
                    (_, n) if n > 8 => css::DARK_ORANGE.into(),
                    _ => css::SEA_GREEN.into(),
                }
            }),
        );

        let overlap_x = ScaleLinear::new([3.0, 19.0], [10.0, WIDTH - 10.0]);
        let overlap_y = ScaleLinear::new([2.0, 230.0], [HEIGHT - 10.0, 10.0]);
        let overlap = self
            .chunked(overlap_x, overlap_y)?
            .with_transition_initial(false);

        Ok(vec![
            self.still("Typical", "Gaps bridged by a faded line.", &chunked, &[typical()]),
            self.still(
                "Typical with curve",
                "Monotone interpolation; clip rects still cut at the defined points.",
                &chunked.clone().with_curve(MonotoneX),
                &[typical()],
            ),
            self.still(
                "Many points, all defined",
                "A single clip rect covers the whole line.",
                &chunked,
                &[data(&[
                    (0.0, Some(1.0)),
                    (2.0, Some(2.0)),
                    (4.0, Some(1.0)),
                    (10.0, Some(0.0)),
                ])],
            ),
            self.still(
                "Undefined at ends",
                "Nothing is drawn outside the defined extent.",
                &chunked,
                &[undefined_at_ends()],
            ),
            self.still(
                "Undefined at ends + extendEnds",
                "The gap path runs to the edges of the x range.",
                &chunked
                    .clone()
                    .with_extend_ends(Some(default_x().range)),
                &[undefined_at_ends()],
            ),
            self.still(
                "Lines along top and bottom edges",
                "Clip rects are padded by the stroke width so edges are not cut.",
                &chunked.clone().with_line_attrs(
                    StyleSpec::new()
                        .with("stroke", "#222")
                        .with("stroke-width", 4),
                ),
                &[data(&[
                    (0.0, Some(0.0)),
                    (4.0, Some(0.0)),
                    (5.0, Some(2.0)),
                    (6.0, Some(2.0)),
                    (7.0, Some(4.0)),
                    (10.0, Some(4.0)),
                ])],
            ),
            self.still(
                "Data length 1",
                "A lone point is a marker.",
                &chunked,
                &[data(&[(0.0, Some(1.0))])],
            ),
            self.still("Empty data", "Renders empty paths.", &chunked, &[Vec::new()]),
            self.still(
                "One undefined point",
                "Renders empty paths.",
                &chunked,
                &[data(&[(0.0, None)])],
            ),
            self.still(
                "Many points, all undefined",
                "Renders empty paths.",
                &chunked,
                &[data(&[(0.0, None), (1.0, None), (2.0, None), (3.0, None)])],
            ),
            self.still(
                "Chunks",
                "Values of 2 and above belong to the `high` chunk.",
                &high_low,
                &[typical()],
            ),
            self.still(
                "Several series",
                "Styles are evaluated per series.",
                &by_series,
                &[typical(), undefined_at_ends(), with_missing()],
            ),
            self.still(
                "Debug",
                "Clip rects drawn as translucent overlays.",
                &chunked.clone().with_debug(true),
                &[typical()],
            ),
            self.animated(
                "Transition: transitionInitial=true",
                "The line rises from the bottom of its extent.",
                &chunked,
                None,
                with_missing(),
            ),
            self.animated(
                "Transition: full to missing",
                "Clip rects shrink to reveal the gaps.",
                &transitioning,
                Some(data(&[
                    (0.0, Some(1.0)),
                    (2.0, Some(2.0)),
                    (4.0, Some(1.0)),
                    (6.0, Some(2.0)),
                    (8.0, Some(2.0)),
                    (9.0, Some(0.0)),
                ])),
                with_missing(),
            ),
            self.animated(
                "Transition: from point",
                "A lone marker grows into a line.",
                &transitioning,
                Some(data(&[(5.0, Some(1.0))])),
                with_missing(),
            ),
            self.animated(
                "Transition: from point + extendEnds",
                "As above, with the gap path extended to the edges.",
                &transitioning
                    .clone()
                    .with_extend_ends(Some(default_x().range)),
                Some(data(&[(5.0, Some(1.0))])),
                with_missing(),
            ),
            self.animated(
                "Transition: gap to line",
                "A gap closes.",
                &transitioning,
                Some(data(&[
                    (0.0, Some(1.0)),
                    (2.0, Some(2.0)),
                    (4.0, Some(1.0)),
                    (5.0, None),
                    (8.0, Some(2.0)),
                    (9.0, Some(0.0)),
                ])),
                data(&[
                    (0.0, Some(1.0)),
                    (2.0, Some(2.0)),
                    (4.0, Some(1.0)),
                    (6.0, Some(2.0)),
                    (8.0, Some(2.0)),
                    (9.0, Some(0.0)),
                ]),
            ),
            self.animated(
                "Transition: few -> many segments",
                "Runs are split with isNext instead of defined.",
                &transitioning
                    .clone()
                    .is_next_compute(|prev: &Datum, curr: &Datum| curr.0 == prev.0 + 1.0),
                Some(data(&[
                    (0.0, Some(1.0)),
                    (1.0, Some(2.0)),
                    (7.0, Some(0.0)),
                    (8.0, Some(1.0)),
                    (9.0, Some(0.0)),
                    (10.0, Some(1.0)),
                ])),
                data(&[
                    (0.0, Some(1.0)),
                    (1.0, Some(2.0)),
                    (3.0, Some(0.0)),
                    (4.0, Some(1.0)),
                    (6.0, Some(3.0)),
                    (7.0, Some(2.0)),
                    (9.0, Some(1.0)),
                    (10.0, Some(1.0)),
                ]),
            ),
            self.animated(
                "Transition: end segment overlap",
                "Exiting rects collapse into what stays visible.",
                &overlap,
                Some(overlap_start()),
                overlap_end(),
            ),
        ])
    }
}

fn overlap_start() -> Vec<Datum> {
    let ys = [
        Some(13.0),
        Some(230.0),
        None,
        Some(4.0),
        Some(21.0),
        Some(2.0),
        Some(6.0),
        Some(14.0),
        None,
        Some(36.0),
        Some(9.0),
        None,
        Some(5.0),
        Some(5.0),
        Some(25.0),
        Some(3.0),
        Some(34.0),
    ];
    (3..).map(f64::from).zip(ys).collect()
}

fn overlap_end() -> Vec<Datum> {
    let ys = [
        Some(63.0),
        Some(16.0),
        Some(45.0),
        Some(3.0),
        Some(6.0),
        Some(22.0),
        None,
        Some(173.0),
        Some(110.0),
        Some(17.0),
        Some(11.0),
        Some(2.0),
        None,
        Some(149.0),
        Some(99.0),
        Some(20.0),
        Some(10.0),
    ];
    (3..).map(f64::from).zip(ys).collect()
}

fn view_box() -> Rect {
    Rect::new(0.0, 0.0, WIDTH, HEIGHT)
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let options = match std::env::args().nth(1) {
        Some(path) => Some(
            std::fs::read_to_string(&path).with_context(|| format!("read options from {path}"))?,
        ),
        None => None,
    };
    if let Some(json) = &options {
        // Fail before rendering anything.
        LineChunkedOptions::from_json_str(json).context("parse options")?;
    }

    let gallery = Gallery { options };
    let sections = gallery.sections()?;

    let html = html::render_report("Chunked line gallery", &sections);
    std::fs::write("chunked_demo.html", html).context("write chunked_demo.html")?;
    tracing::info!(sections = sections.len(), "wrote chunked_demo.html");
    Ok(())
}
