//! Superficies de firma a mano alzada
//!
//! Cada superficie acumula trazos (listas de puntos) y se exporta como imagen SVG.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const SURFACE_WIDTH: f64 = 500.0;
pub const SURFACE_HEIGHT: f64 = 150.0;
const STROKE_COLOR: &str = "#22c1b4";

/// Parte que firma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureParty {
    Driver,
    Responsible,
}

impl SignatureParty {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureParty::Driver => "driver",
            SignatureParty::Responsible => "responsible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn clamped(self) -> Self {
        let clamp = |v: f64, max: f64| if v.is_finite() { v.clamp(0.0, max) } else { 0.0 };
        Self {
            x: clamp(self.x, SURFACE_WIDTH),
            y: clamp(self.y, SURFACE_HEIGHT),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SignatureSurface {
    strokes: Vec<Vec<Point>>,
}

impl SignatureSurface {
    /// Añade un trazo; los puntos se recortan a los límites de la superficie.
    /// Un trazo vacío se ignora.
    pub fn draw_stroke(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        self.strokes
            .push(points.iter().copied().map(Point::clamped).collect());
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Exporta la superficie a SVG. Una superficie vacía produce una imagen vacía.
    pub fn export_svg(&self) -> Vec<u8> {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = SURFACE_WIDTH,
            h = SURFACE_HEIGHT,
        );
        for stroke in &self.strokes {
            let mut path = String::new();
            for (i, point) in stroke.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(path, "{}{:.1} {:.1} ", cmd, point.x, point.y);
            }
            // Un solo punto se dibuja como un toque
            if stroke.len() == 1 {
                let _ = write!(path, "L{:.1} {:.1}", stroke[0].x, stroke[0].y);
            }
            let _ = write!(
                svg,
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="2" stroke-linecap="round"/>"#,
                path.trim_end(),
                STROKE_COLOR,
            );
        }
        svg.push_str("</svg>");
        svg.into_bytes()
    }
}
