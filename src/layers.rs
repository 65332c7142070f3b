//! Sibling layers drawn under and over the ROIs: the raster image and text labels.
//!
//! Both layers move together with the shapes while panning and snap back to
//! the scene origin when the view is fitted.

use std::collections::HashMap;

use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::{ArrayD, ArrayViewD};

use crate::error::ViewerError;
use crate::model::Point;

/// The displayed raster image.
#[derive(Debug, Clone, Default)]
pub struct ImageLayer {
    /// The array as handed over by the host (gray or BGR)
    source: Option<ArrayD<u8>>,
    /// RGB pixels prepared for display
    display: Option<RgbImage>,
    /// Scene position of the image's top-left corner
    offset: Point,
}

impl ImageLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the image and prepare it for a view of `view_size`.
    ///
    /// Accepts `(height, width)` grayscale or `(height, width, 3)` BGR arrays.
    pub fn set_image(
        &mut self,
        array: ArrayViewD<'_, u8>,
        view_size: (f32, f32),
    ) -> Result<(), ViewerError> {
        let rgb = to_rgb(&array)?;
        let display = fit_to_view(rgb, view_size);
        log::info!(
            "Image set: source {:?}, displayed at {}x{}",
            array.shape(),
            display.width(),
            display.height()
        );
        self.source = Some(array.to_owned());
        self.display = Some(display);
        Ok(())
    }

    /// Rebuild the display image for a new view size.
    pub fn refresh(&mut self, view_size: (f32, f32)) {
        let Some(source) = &self.source else {
            return;
        };
        match to_rgb(&source.view()) {
            Ok(rgb) => self.display = Some(fit_to_view(rgb, view_size)),
            Err(e) => log::warn!("Failed to refresh image: {}", e),
        }
    }

    /// The array last passed to [`ImageLayer::set_image`].
    pub fn source(&self) -> Option<&ArrayD<u8>> {
        self.source.as_ref()
    }

    pub fn display(&self) -> Option<&RgbImage> {
        self.display.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.display.is_some()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.offset = self.offset.offset(dx, dy);
    }

    pub fn reset_position(&mut self) {
        self.offset = Point::default();
    }
}

/// Convert a grayscale or BGR array to an RGB image.
fn to_rgb(array: &ArrayViewD<'_, u8>) -> Result<RgbImage, ViewerError> {
    let shape = array.shape();
    let (height, width, channels) = match *shape {
        [h, w] => (h, w, 1),
        [h, w, 3] => (h, w, 3),
        _ => {
            log::warn!("Rejected image with shape {:?}", shape);
            return Err(ViewerError::UnsupportedImageShape {
                shape: shape.to_vec(),
            });
        }
    };
    if height == 0 || width == 0 {
        return Err(ViewerError::EmptyImage);
    }

    // Logical (row-major) order, whatever the memory layout.
    let values: Vec<u8> = array.iter().copied().collect();
    let mut pixels = Vec::with_capacity(height * width * 3);
    if channels == 1 {
        pixels.extend(values.iter().flat_map(|&v| [v, v, v]));
    } else {
        for bgr in values.chunks_exact(3) {
            pixels.extend([bgr[2], bgr[1], bgr[0]]);
        }
    }

    RgbImage::from_raw(width as u32, height as u32, pixels).ok_or(ViewerError::EmptyImage)
}

/// Size `width × height` scaled down to fit `view_size`, keeping the aspect ratio.
///
/// Images that already fit are returned at native size.
pub fn display_size(width: u32, height: u32, view_size: (f32, f32)) -> (u32, u32) {
    let (view_w, view_h) = view_size;
    let (w, h) = (width as f32, height as f32);
    if w <= view_w && h <= view_h {
        return (width, height);
    }
    let ratio = (view_w / w).min(view_h / h);
    (
        ((w * ratio).round() as u32).max(1),
        ((h * ratio).round() as u32).max(1),
    )
}

fn fit_to_view(image: RgbImage, view_size: (f32, f32)) -> RgbImage {
    let (w, h) = display_size(image.width(), image.height(), view_size);
    if (w, h) == image.dimensions() {
        image
    } else {
        imageops::resize(&image, w, h, FilterType::Triangle)
    }
}

/// A text label placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub color: [u8; 3],
    pub position: Point,
}

/// Named text labels.
#[derive(Debug, Clone, Default)]
pub struct TextLayer {
    labels: HashMap<String, TextLabel>,
    /// Offset applied by panning, on top of each label's own position
    offset: Point,
}

impl TextLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label, replacing any existing label with the same name.
    pub fn add(&mut self, name: impl Into<String>, text: impl Into<String>, color: [u8; 3], position: Point) {
        let name = name.into();
        log::debug!("Adding text label '{}'", name);
        self.labels.insert(
            name,
            TextLabel {
                text: text.into(),
                color,
                position,
            },
        );
    }

    pub fn update(&mut self, name: &str, text: impl Into<String>) -> Result<(), ViewerError> {
        let label = self
            .labels
            .get_mut(name)
            .ok_or_else(|| ViewerError::UnknownText {
                name: name.to_string(),
            })?;
        label.text = text.into();
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<TextLabel, ViewerError> {
        self.labels
            .remove(name)
            .ok_or_else(|| ViewerError::UnknownText {
                name: name.to_string(),
            })
    }

    pub fn get(&self, name: &str) -> Option<&TextLabel> {
        self.labels.get(name)
    }

    /// Scene position of a label, including the layer's pan offset.
    pub fn scene_position(&self, name: &str) -> Option<Point> {
        self.labels
            .get(name)
            .map(|label| label.position.offset(self.offset.x, self.offset.y))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TextLabel)> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.offset = self.offset.offset(dx, dy);
    }

    pub fn reset_position(&mut self) {
        self.offset = Point::default();
    }
}
