use crate::detection::domain::detector_parameters::DetectorParameters;
use crate::shared::frame::Frame;
use crate::shared::rect::Rectangle;

/// Multi-scale object detection on a single-channel intensity frame.
///
/// Rectangles come back in the detector's own order; callers must not
/// assume sorting or overlap suppression beyond what the detector does.
pub trait ObjectDetector: Send {
    fn detect(
        &mut self,
        gray: &Frame,
        params: &DetectorParameters,
    ) -> Result<Vec<Rectangle>, Box<dyn std::error::Error>>;
}
