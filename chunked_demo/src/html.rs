// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-page HTML report of SVG snapshots.

/// One snapshot of a scene.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) label: String,
    pub(crate) svg: String,
}

/// A gallery entry: one configuration, one or more frames.
#[derive(Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
    pub(crate) frames: Vec<Frame>,
}

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    out.push_str(STYLE);
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));

    for section in sections {
        out.push_str("<section>\n");
        out.push_str(&format!("<h2>{}</h2>\n", escape_html(section.title)));
        out.push_str(&format!("<p>{}</p>\n", escape_html(section.description)));
        out.push_str("<div class=\"frames\">\n");
        for frame in &section.frames {
            out.push_str("<figure>\n");
            out.push_str(&frame.svg);
            out.push_str(&format!(
                "<figcaption>{}</figcaption>\n",
                escape_html(&frame.label)
            ));
            out.push_str("</figure>\n");
        }
        out.push_str("</div>\n</section>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

const STYLE: &str = "<style>
body { font-family: sans-serif; margin: 24px; }
section { margin-bottom: 32px; }
.frames { display: flex; flex-wrap: wrap; gap: 12px; }
figure { margin: 0; border: 1px solid #ddd; }
figcaption { font-size: 11px; color: #666; padding: 2px 6px; }
</style>
";

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
