//! SVG export serializer.
//!
//! Builds the painting as an SVG document with the [`svg`] crate:
//!
//! - a `<clipPath>` made of every silhouette contour,
//! - one `<path>` per cell, clipped to the silhouette,
//! - optional silhouette outlines drawn on top,
//! - optional number labels at each cell's centroid.
//!
//! Optional [`SvgMetadata`] embeds `<title>`, `<desc>`, and a
//! `<metadata>` block carrying the generating parameters.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::{Definitions, Description, Element, Path, Title};
use svg::node::{Node, Text};

use enigma_pipeline::{Painting, cell_path, contour_path};

use crate::{CELL_STROKE, CellColor, ExportOptions, LABEL_FILL, MONOCHROME_STROKE, OUTLINE_STROKE};

/// Id of the silhouette clip path.
pub const CLIP_PATH_ID: &str = "silhouette-clip";

/// XML namespace of the `<enigma:params>` metadata element.
const METADATA_NAMESPACE: &str = "urn:enigma:painting:1";

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped by the `svg`
/// crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized generation parameters, emitted inside `<metadata>` as
    /// a namespaced `<enigma:params>` element so exported files can be
    /// regenerated exactly.
    pub params_json: Option<&'a str>,
}

/// Serialize `painting` as a standalone SVG document.
#[must_use]
pub fn to_svg(painting: &Painting, options: &ExportOptions, metadata: &SvgMetadata<'_>) -> String {
    let dims = painting.dimensions();
    let mut doc = Document::new()
        .set("width", dims.width)
        .set("height", dims.height)
        .set("viewBox", (0, 0, dims.width, dims.height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(params_json) = metadata.params_json {
        let mut params_el = Element::new("enigma:params");
        params_el.assign("xmlns:enigma", METADATA_NAMESPACE);
        params_el.append(Text::new(params_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(params_el);
        doc = doc.add(metadata_el);
    }

    let silhouette_paths: Vec<String> = painting
        .silhouette
        .iter()
        .map(contour_path)
        .filter(|d| !d.is_empty())
        .collect();

    let mut clip = Element::new("clipPath");
    clip.assign("id", CLIP_PATH_ID);
    for d in &silhouette_paths {
        clip.append(Path::new().set("d", d.as_str()));
    }
    doc = doc.add(Definitions::new().add(clip));

    let clip_ref = format!("url(#{CLIP_PATH_ID})");
    for cell in &painting.cells {
        let (fill, stroke, stroke_width) = if options.color_mode {
            (CellColor::for_cell(cell.id).css(), CELL_STROKE, 0.5)
        } else {
            ("none".to_owned(), MONOCHROME_STROKE, 1.0)
        };
        let path = Path::new()
            .set("d", cell_path(&cell.polygon))
            .set("fill", fill)
            .set("stroke", stroke)
            .set("stroke-width", stroke_width)
            .set("clip-path", clip_ref.as_str());
        doc = doc.add(path);
    }

    if options.show_outline {
        for d in &silhouette_paths {
            let outline = Path::new()
                .set("d", d.as_str())
                .set("fill", "none")
                .set("stroke", OUTLINE_STROKE)
                .set("stroke-width", 1.2);
            doc = doc.add(outline);
        }
    }

    if options.show_numbers {
        for cell in &painting.cells {
            let mut label = Element::new("text");
            label.assign("x", format!("{:.1}", cell.centroid.x));
            label.assign("y", format!("{:.1}", cell.centroid.y));
            label.assign("font-size", 6);
            label.assign("text-anchor", "middle");
            label.assign("dominant-baseline", "middle");
            label.assign("fill", LABEL_FILL);
            label.append(Text::new(cell.ordinal().to_string()));
            doc = doc.add(label);
        }
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
