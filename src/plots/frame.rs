//! Plot frame: margins, title, gridlines, axes and tick labels.

use crate::color::Rgba;
use crate::format;
use crate::output::{SvgEncoder, TextAnchor};
use crate::scale::{BandScale, LinearScale, Scale};

const TITLE_SIZE: f32 = 16.0;
const LABEL_SIZE: f32 = 12.0;
const TICK_SIZE: f32 = 10.0;
const TICK_COUNT: usize = 6;

/// Pixel layout of a cartesian chart.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame {
    pub(crate) width: u32,
    pub(crate) height: u32,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl Frame {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self { width, height, left: 72.0, right: 24.0, top: 56.0, bottom: 64.0 }
    }

    /// Leave room on the right (pie legends).
    pub(crate) fn with_right_margin(mut self, right: f32) -> Self {
        self.right = right;
        self
    }

    /// Horizontal pixel range of the plotting area.
    pub(crate) fn x_range(&self) -> (f32, f32) {
        (self.left, self.width as f32 - self.right)
    }

    /// Vertical pixel range, bottom first so larger values sit higher.
    pub(crate) fn y_range(&self) -> (f32, f32) {
        (self.height as f32 - self.bottom, self.top)
    }

    /// Empty scene with the title drawn.
    pub(crate) fn scene(&self, title: &str) -> SvgEncoder {
        let scene = SvgEncoder::new(self.width, self.height);
        if title.is_empty() {
            return scene;
        }
        scene.text_anchored(
            self.width as f32 / 2.0,
            28.0,
            title,
            TITLE_SIZE,
            Rgba::AXIS,
            TextAnchor::Middle,
        )
    }

    /// Gridlines, tick labels and label for a value axis.
    pub(crate) fn y_axis(&self, mut scene: SvgEncoder, scale: &LinearScale, label: &str) -> SvgEncoder {
        let (x0, x1) = self.x_range();
        for tick in scale.ticks(TICK_COUNT) {
            let y = scale.scale(tick);
            scene = scene.line(x0, y, x1, y, Rgba::GRID, 1.0).text_anchored(
                x0 - 6.0,
                y + TICK_SIZE / 3.0,
                &format::tick(tick),
                TICK_SIZE,
                Rgba::AXIS,
                TextAnchor::End,
            );
        }
        let (y_bottom, y_top) = self.y_range();
        scene
            .line(x0, y_bottom, x0, y_top, Rgba::AXIS, 1.0)
            .text(8.0, self.top - 12.0, label, LABEL_SIZE, Rgba::AXIS)
    }

    /// Continuous x axis with ticks.
    pub(crate) fn x_axis(&self, mut scene: SvgEncoder, scale: &LinearScale, label: &str) -> SvgEncoder {
        let (y_bottom, _) = self.y_range();
        for tick in scale.ticks(TICK_COUNT) {
            let x = scale.scale(tick);
            scene = scene.line(x, y_bottom, x, y_bottom + 5.0, Rgba::AXIS, 1.0).text_anchored(
                x,
                y_bottom + 18.0,
                &format::tick(tick),
                TICK_SIZE,
                Rgba::AXIS,
                TextAnchor::Middle,
            );
        }
        self.x_baseline(scene, label)
    }

    /// Categorical x axis, one label per band.
    pub(crate) fn x_axis_bands(
        &self,
        mut scene: SvgEncoder,
        bands: &BandScale,
        categories: &[String],
        label: &str,
    ) -> SvgEncoder {
        let (y_bottom, _) = self.y_range();
        // Crowded axes keep every other label.
        let stride = if bands.step() < 36.0 { 2 } else { 1 };
        for (i, category) in categories.iter().enumerate().step_by(stride) {
            scene = scene.text_anchored(
                bands.center(i),
                y_bottom + 18.0,
                category,
                TICK_SIZE,
                Rgba::AXIS,
                TextAnchor::Middle,
            );
        }
        self.x_baseline(scene, label)
    }

    fn x_baseline(&self, scene: SvgEncoder, label: &str) -> SvgEncoder {
        let (x0, x1) = self.x_range();
        let (y_bottom, _) = self.y_range();
        scene.line(x0, y_bottom, x1, y_bottom, Rgba::AXIS, 1.0).text_anchored(
            (x0 + x1) / 2.0,
            self.height as f32 - 18.0,
            label,
            LABEL_SIZE,
            Rgba::AXIS,
            TextAnchor::Middle,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::SvgElement;

    #[test]
    fn test_ranges_inside_canvas() {
        let frame = Frame::new(800, 500);
        let (x0, x1) = frame.x_range();
        let (yb, yt) = frame.y_range();
        assert!(x0 > 0.0 && x1 < 800.0 && x0 < x1);
        assert!(yt > 0.0 && yb < 500.0 && yt < yb);
    }

    #[test]
    fn test_y_axis_labels_ticks() {
        let frame = Frame::new(400, 300);
        let scale = LinearScale::new((0.0, 100.0), frame.y_range()).unwrap();
        let scene = frame.y_axis(frame.scene("t"), &scale, "count");
        let texts: Vec<&str> = scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SvgElement::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"t"));
        assert!(texts.contains(&"count"));
        assert!(texts.contains(&"100"));
    }

    #[test]
    fn test_untitled_scene_is_empty() {
        assert!(Frame::new(10, 10).scene("").elements().is_empty());
    }
}
