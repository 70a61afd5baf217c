use crate::annotation::annotation_renderer::{draw_rectangle, draw_text, Color, LabelFont};
use crate::detection::domain::detector_parameters::DetectorParameters;
use crate::detection::domain::object_detector::ObjectDetector;
use crate::shared::frame::Frame;
use crate::shared::geometry::dimensions;
use crate::transform::frame_transform::to_gray;

/// Locates faces in a frame and annotates each one in place.
pub struct FaceDetector {
    line_thickness: u32,
    box_color: Color,
    label_color: Color,
    label_font: LabelFont,
}

impl FaceDetector {
    pub fn new(line_thickness: u32) -> Self {
        Self {
            line_thickness,
            box_color: Color::HIGHLIGHT,
            label_color: Color::BLACK,
            label_font: LabelFont::Plain,
        }
    }

    /// Detects on the gray version of `frame`, outlines every hit on
    /// `frame` and returns how many were found.
    ///
    /// Every label is drawn at the same anchor, `(width / 25, height / 10)`,
    /// so with several faces only the last label stays readable.
    pub fn detect_and_annotate(
        &self,
        frame: &mut Frame,
        detector: &mut dyn ObjectDetector,
        params: &DetectorParameters,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        let (width, height) = dimensions(frame);
        let gray = to_gray(frame)?;
        let faces = detector.detect(&gray, params)?;

        let label_anchor = ((width / 25) as i32, (height / 10) as i32);
        for face in &faces {
            draw_rectangle(
                frame,
                face.top_left(),
                face.bottom_right(),
                self.box_color,
                self.line_thickness,
            );

            let label = face.label();
            log::info!("{label}");
            draw_text(
                frame,
                &label,
                label_anchor,
                self.label_font,
                1.0,
                self.label_color,
                1,
            );
        }

        Ok(faces.len())
    }
}
