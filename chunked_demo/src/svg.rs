// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump utilities for `chunked_demo`.

use std::collections::HashMap;

use chunked_core::{Element, ElementKey, Geometry, Presentation, Role, Scene, StyleMap, Value};
use kurbo::Rect;

/// Serializes the displayed state of `scene` as a standalone SVG document.
///
/// Clip rectangles are gathered into `<clipPath>` definitions keyed by the id their container
/// carries; everything else is written in paint order.
pub(crate) fn scene_to_svg(scene: &Scene, view_box: Rect) -> String {
    let elements = scene.paint_order();

    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="{} {} {} {}" width="{}" height="{}" preserveAspectRatio="xMinYMin meet">"#,
        view_box.x0,
        view_box.y0,
        view_box.width(),
        view_box.height(),
        view_box.width(),
        view_box.height()
    ));
    out.push('\n');

    write_clip_defs(&mut out, &elements);

    for (key, element) in &elements {
        write_element(&mut out, key, element);
    }

    out.push_str("</svg>\n");
    out
}

fn write_clip_defs(out: &mut String, elements: &[(ElementKey, Element)]) {
    let mut ids: Vec<(&ElementKey, &str)> = Vec::new();
    let mut rects: HashMap<(u32, &str), Vec<(u32, Rect)>> = HashMap::new();
    for (key, element) in elements {
        match (&key.role, &element.geometry) {
            (Role::ClipPath, Geometry::ClipPath { id }) => ids.push((key, id)),
            (Role::ClipRect(i), Geometry::Rect(r)) => rects
                .entry((key.series, key.chunk.as_str()))
                .or_default()
                .push((*i, *r)),
            _ => {}
        }
    }
    if ids.is_empty() {
        return;
    }

    out.push_str("<defs>\n");
    for (key, id) in ids {
        out.push_str(&format!(r#"<clipPath id="{}">"#, escape_xml(id)));
        out.push('\n');
        if let Some(group) = rects.get_mut(&(key.series, key.chunk.as_str())) {
            group.sort_by_key(|&(i, _)| i);
            for (_, r) in group.iter() {
                out.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
                    r.x0,
                    r.y0,
                    r.width(),
                    r.height(),
                ));
                out.push('\n');
            }
        }
        out.push_str("</clipPath>\n");
    }
    out.push_str("</defs>\n");
}

fn write_element(out: &mut String, key: &ElementKey, element: &Element) {
    let p = &element.presentation;
    match (&key.role, &element.geometry) {
        (Role::Path, Geometry::Path(path)) => {
            // An empty `d` is valid SVG and keeps the element in the output.
            out.push_str(&format!(r#"<path d="{}""#, path.to_svg()));
            write_presentation(out, p);
            out.push_str("/>\n");
        }
        (Role::Point(_), Geometry::Circle(c)) => {
            out.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="{}""#,
                c.center.x, c.center.y, c.radius
            ));
            write_presentation(out, p);
            out.push_str("/>\n");
        }
        (Role::DebugRect(_), Geometry::Rect(r)) => {
            out.push_str(&format!(
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                r.x0,
                r.y0,
                r.width(),
                r.height(),
            ));
            write_presentation(out, p);
            out.push_str("/>\n");
        }
        // Clip geometry is written in `<defs>`.
        _ => {}
    }
}

fn write_presentation(out: &mut String, p: &Presentation) {
    if !p.classes.is_empty() {
        out.push_str(&format!(r#" class="{}""#, escape_xml(&p.classes.join(" "))));
    }
    if let Some(id) = &p.clip_path {
        out.push_str(&format!(r#" clip-path="url(#{})""#, escape_xml(id)));
    }
    for (name, value) in p.attrs.iter() {
        write_value_attr(out, name, value);
    }
    write_style(out, &p.styles);
}

fn svg_value(value: &Value) -> (String, Option<f64>) {
    match value {
        Value::Color(color) => {
            let rgba = color.to_rgba8();
            let paint = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (paint, opacity)
        }
        other => (other.to_string(), None),
    }
}

fn write_value_attr(out: &mut String, name: &str, value: &Value) {
    let (value, opacity) = svg_value(value);
    out.push_str(&format!(r#" {name}="{}""#, escape_xml(&value)));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn write_style(out: &mut String, styles: &StyleMap) {
    if styles.is_empty() {
        return;
    }
    let mut decls = Vec::with_capacity(styles.len());
    for (name, value) in styles.iter() {
        let (value, opacity) = svg_value(value);
        decls.push(format!("{name}: {value}"));
        if let Some(o) = opacity {
            decls.push(format!("{name}-opacity: {o}"));
        }
    }
    out.push_str(&format!(r#" style="{}""#, escape_xml(&decls.join("; "))));
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
