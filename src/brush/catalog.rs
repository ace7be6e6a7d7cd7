// src/brush/catalog.rs
//
// Named brush registry: the standard set plus anything added in code or
// loaded from a JSON catalog file.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::brush_model::{Brush, PressureSpec, RotationMode};
use super::brush_spec::{BrushError, BrushSpec};
use super::tips::{CustomTip, MarkerTip, PencilTip, SprayTip, Tip, TipGeometry, TipKind};
use crate::render::Layer;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read brush catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("brush catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Brush(#[from] BrushError),
}

#[derive(Debug, Clone, Default)]
pub struct BrushCatalog {
    brushes: HashMap<String, Brush>,
    order: Vec<String>,
}

/// weight, vibration, definition, quality, opacity, spacing, pressure curve, min/max
type PencilRow = (&'static str, [f32; 6], [f32; 2], [f32; 2]);

const PENCILS: [PencilRow; 8] = [
    ("pen", [0.35, 0.12, 0.5, 8.0, 200.0, 0.3], [0.15, 0.2], [1.4, 0.9]),
    ("rotring", [0.2, 0.05, 1.0, 3.0, 250.0, 0.15], [0.05, 0.2], [1.7, 0.8]),
    ("2B", [0.35, 0.5, 0.1, 8.0, 180.0, 0.2], [0.15, 0.2], [1.3, 1.0]),
    ("HB", [0.3, 0.5, 0.4, 4.0, 180.0, 0.25], [0.15, 0.2], [1.2, 0.9]),
    ("2H", [0.2, 0.4, 0.3, 2.0, 150.0, 0.2], [0.15, 0.2], [1.2, 0.9]),
    ("cpencil", [0.4, 0.6, 0.8, 7.0, 120.0, 0.15], [0.15, 0.2], [0.95, 1.2]),
    ("charcoal", [0.5, 2.0, 0.8, 300.0, 110.0, 0.06], [0.15, 0.2], [1.3, 0.8]),
    ("hatch_brush", [0.2, 0.4, 0.3, 2.0, 150.0, 0.15], [0.5, 0.7], [1.0, 1.5]),
];

fn gaussian(curve: [f32; 2], min_max: [f32; 2]) -> PressureSpec {
    PressureSpec::Gaussian {
        curve,
        min: min_max[0],
        max: min_max[1],
    }
}

impl BrushCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in brushes sized for a canvas `canvas_width` pixels wide.
    pub fn standard(canvas_width: f32) -> Self {
        let scale = canvas_width / 250.0;
        let mut catalog = Self::new();

        for (name, [weight, vibration, definition, quality, opacity, spacing], curve, min_max) in PENCILS {
            catalog.insert(Brush {
                name: name.to_string(),
                tip: Tip::Pencil(PencilTip { definition, quality }),
                weight,
                vibration,
                opacity,
                spacing,
                pressure: gaussian(curve, min_max),
                blend: false,
                rotation: RotationMode::None,
            });
        }

        catalog.insert(Brush {
            name: "spray".into(),
            tip: Tip::Spray(SprayTip { quality: 40.0 }),
            weight: 0.3,
            vibration: 12.0,
            opacity: 80.0,
            spacing: 0.65,
            pressure: gaussian([0.0, 0.1], [0.15, 1.2]),
            blend: false,
            rotation: RotationMode::None,
        });
        catalog.insert(Brush {
            name: "marker".into(),
            tip: Tip::Marker(MarkerTip),
            weight: 2.5,
            vibration: 0.12,
            opacity: 25.0,
            spacing: 0.4,
            pressure: gaussian([0.35, 0.25], [1.5, 1.0]),
            blend: true,
            rotation: RotationMode::None,
        });

        // Square nib with a notch, sized in canvas units
        let geometry: TipGeometry = Arc::new(move |layer: &mut Layer<'_>| {
            layer.rect(-1.5 * scale, -1.5 * scale, 3.0 * scale, 3.0 * scale);
            layer.rect(scale, scale, scale, scale);
        });
        catalog.insert(Brush {
            name: "marker2".into(),
            tip: Tip::Custom(CustomTip { geometry }),
            weight: 2.5,
            vibration: 0.12,
            opacity: 25.0,
            spacing: 0.35,
            pressure: gaussian([0.35, 0.25], [1.3, 0.95]),
            blend: true,
            rotation: RotationMode::Natural,
        });

        for name in catalog.order.clone() {
            if let Some(brush) = catalog.brushes.get_mut(&name) {
                *brush = brush.scaled(scale);
            }
        }
        catalog
    }

    /// Adds or replaces a brush, keeping its original position in `names`.
    pub fn insert(&mut self, brush: Brush) {
        if !self.brushes.contains_key(&brush.name) {
            self.order.push(brush.name.clone());
        }
        self.brushes.insert(brush.name.clone(), brush);
    }

    /// Validates `spec` and registers it under `name`.
    pub fn add(&mut self, name: &str, spec: BrushSpec) -> Result<(), BrushError> {
        let brush = spec.build(name)?;
        log::debug!("registered brush `{}` ({:?})", name, brush.kind());
        self.insert(brush);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Brush> {
        self.brushes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.brushes.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Image sources referenced by image-tip brushes.
    pub fn image_sources(&self) -> Vec<String> {
        self.order
            .iter()
            .filter_map(|name| self.brushes.get(name))
            .filter(|b| b.kind() == TipKind::Image)
            .filter_map(|b| b.tip.image_source().map(str::to_string))
            .collect()
    }

    /// Parses a JSON object of `name: spec` records and adds every brush.
    /// Nothing is added when any record is invalid.
    pub fn extend_from_json(&mut self, json: &str) -> Result<Vec<String>, CatalogError> {
        let specs: BTreeMap<String, BrushSpec> = serde_json::from_str(json)?;
        let brushes = specs
            .into_iter()
            .map(|(name, spec)| spec.build(&name))
            .collect::<Result<Vec<_>, _>>()?;
        let names = brushes.iter().map(|b| b.name.clone()).collect();
        brushes.into_iter().for_each(|b| self.insert(b));
        Ok(names)
    }

    pub fn load_json<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<String>, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let names = self.extend_from_json(&content)?;
        log::info!("loaded {} brushes from {}", names.len(), path.display());
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod standard_tests {
        use super::*;

        #[test]
        fn test_standard_set_in_order() {
            let catalog = BrushCatalog::standard(250.0);
            let names: Vec<&str> = catalog.names().collect();
            assert_eq!(
                names,
                vec![
                    "pen", "rotring", "2B", "HB", "2H", "cpencil", "charcoal", "hatch_brush", "spray", "marker",
                    "marker2"
                ]
            );
            assert_eq!(catalog.get("marker2").map(|b| b.kind()), Some(TipKind::Custom));
            assert_eq!(catalog.get("marker2").map(|b| b.rotation), Some(RotationMode::Natural));
        }

        #[test]
        fn test_standard_set_scales_with_canvas() {
            let catalog = BrushCatalog::standard(500.0);
            let hb = catalog.get("HB").unwrap();
            assert!((hb.weight - 0.6).abs() < 1e-6);
            assert!((hb.vibration - 1.0).abs() < 1e-6);
            assert!((hb.spacing - 0.5).abs() < 1e-6);
            assert_eq!(hb.opacity, 180.0);
        }
    }

    mod json_tests {
        use super::*;

        #[test]
        fn test_extend_from_json() {
            let mut catalog = BrushCatalog::new();
            let names = catalog
                .extend_from_json(
                    r#"{
                        "felt": {"type": "marker", "weight": 3, "opacity": 40, "spacing": 0.5},
                        "stamp": {"type": "image", "weight": 10, "opacity": 60, "spacing": 2,
                                  "image": {"src": "brushes/stamp.png"}}
                    }"#,
                )
                .unwrap();
            assert_eq!(names, vec!["felt".to_string(), "stamp".to_string()]);
            assert_eq!(catalog.image_sources(), vec!["brushes/stamp.png".to_string()]);
        }

        #[test]
        fn test_invalid_record_adds_nothing() {
            let mut catalog = BrushCatalog::new();
            let result = catalog.extend_from_json(
                r#"{
                    "ok": {"type": "marker", "weight": 3, "opacity": 40, "spacing": 0.5},
                    "bad": {"type": "spray", "weight": 3, "opacity": 40, "spacing": 0.5}
                }"#,
            );
            assert!(matches!(result, Err(CatalogError::Brush(_))));
            assert!(catalog.is_empty());
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let mut catalog = BrushCatalog::new();
            let result = catalog.load_json("does/not/exist.json");
            assert!(matches!(result, Err(CatalogError::Io { .. })));
        }
    }
}
