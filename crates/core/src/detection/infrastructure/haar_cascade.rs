//! Boosted Haar-feature cascade evaluated on an image pyramid.
//!
//! Reads the XML layout written by OpenCV's `opencv_traincascade`
//! (`stageType` BOOST, `featureType` HAAR). Upright features only.

use image::imageops::{self, FilterType};
use image::GrayImage;
use roxmltree::{Document, Node};
use thiserror::Error;

use crate::detection::domain::detector_parameters::DetectorParameters;
use crate::detection::domain::object_detector::ObjectDetector;
use crate::shared::frame::{ColorSpace, Frame};
use crate::shared::geometry::dimensions;
use crate::shared::rect::Rectangle;

use super::rectangle_grouping::{group_rectangles, GROUP_EPS};

/// Windows whose normalised spread falls below this are skipped as flat.
const FLAT_WINDOW_RATIO: f64 = 0.1;

/// Pyramid levels past this scale are scanned at every pixel.
const FINE_STEP_FACTOR: f64 = 2.0;

#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Unsupported(String),
}

fn malformed(reason: impl Into<String>) -> CascadeError {
    CascadeError::Malformed(reason.into())
}

#[derive(Debug, Clone)]
struct WeightedRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    weight: f64,
}

#[derive(Debug, Clone)]
struct HaarFeature {
    rects: Vec<WeightedRect>,
}

impl HaarFeature {
    fn value(&self, integral: &IntegralImage, x: u32, y: u32) -> f64 {
        self.rects
            .iter()
            .map(|r| r.weight * integral.sum(x + r.x, y + r.y, r.width, r.height) as f64)
            .sum()
    }
}

/// Split node; children `> 0` are node indices, `<= 0` are negated leaf indices.
#[derive(Debug, Clone)]
struct TreeNode {
    left: i32,
    right: i32,
    feature: usize,
    threshold: f64,
}

#[derive(Debug, Clone)]
struct WeakClassifier {
    nodes: Vec<TreeNode>,
    leaves: Vec<f64>,
}

impl WeakClassifier {
    fn vote(
        &self,
        features: &[HaarFeature],
        integral: &IntegralImage,
        x: u32,
        y: u32,
        norm: f64,
    ) -> f64 {
        let mut idx = 0i32;
        loop {
            let node = &self.nodes[idx as usize];
            let value = features[node.feature].value(integral, x, y) * norm;
            idx = if value < node.threshold {
                node.left
            } else {
                node.right
            };
            if idx <= 0 {
                break;
            }
        }
        self.leaves[(-idx) as usize]
    }
}

#[derive(Debug, Clone)]
struct Stage {
    threshold: f64,
    classifiers: Vec<WeakClassifier>,
}

/// A trained cascade held in memory, ready to scan gray frames.
#[derive(Debug, Clone)]
pub struct HaarCascade {
    window: (u32, u32),
    stages: Vec<Stage>,
    features: Vec<HaarFeature>,
}

impl HaarCascade {
    pub fn from_xml(xml: &str) -> Result<Self, CascadeError> {
        let doc = Document::parse(xml)?;
        let root = doc.root_element();
        let cascade = child(root, "cascade").ok_or_else(|| {
            if root.children().any(|n| n.attribute("type_id") == Some("opencv-haar-classifier")) {
                CascadeError::Unsupported("legacy haar classifier layout".into())
            } else {
                malformed("missing <cascade> element")
            }
        })?;

        let stage_type = text_of(cascade, "stageType")?;
        if stage_type != "BOOST" {
            return Err(CascadeError::Unsupported(format!("stage type {stage_type}")));
        }
        let feature_type = text_of(cascade, "featureType")?;
        if feature_type != "HAAR" {
            return Err(CascadeError::Unsupported(format!("feature type {feature_type}")));
        }

        let width: u32 = parse_field(cascade, "width")?;
        let height: u32 = parse_field(cascade, "height")?;
        if width < 3 || height < 3 {
            return Err(malformed(format!("window {width}x{height} is too small")));
        }

        let features = items(required(cascade, "features")?)
            .map(|node| parse_feature(node, width, height))
            .collect::<Result<Vec<_>, _>>()?;

        let stages = items(required(cascade, "stages")?)
            .map(|node| parse_stage(node, features.len()))
            .collect::<Result<Vec<_>, _>>()?;
        if stages.is_empty() {
            return Err(malformed("cascade has no stages"));
        }

        Ok(Self {
            window: (width, height),
            stages,
            features,
        })
    }

    /// Base detection window in pixels.
    pub fn window_size(&self) -> (u32, u32) {
        self.window
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Raw window hits over every pyramid level, before grouping.
    pub fn scan(
        &self,
        gray: &Frame,
        params: &DetectorParameters,
    ) -> Result<Vec<Rectangle>, Box<dyn std::error::Error>> {
        params.validate()?;
        if gray.color_space() != ColorSpace::Gray {
            return Err(format!(
                "cascade expects a gray frame, got {:?}",
                gray.color_space()
            )
            .into());
        }
        let (img_w, img_h) = dimensions(gray);
        let (win_w, win_h) = self.window;
        let max_size = params.max_size.unwrap_or((img_w, img_h));

        let source = GrayImage::from_raw(img_w, img_h, gray.data().to_vec())
            .ok_or("gray buffer does not match its dimensions")?;
        let mut hits = Vec::new();
        let mut factor = 1.0f64;
        loop {
            let scaled_win = (
                (win_w as f64 * factor).round() as u32,
                (win_h as f64 * factor).round() as u32,
            );
            if scaled_win.0 > max_size.0 || scaled_win.1 > max_size.1 {
                break;
            }
            let level_w = (img_w as f64 / factor).round() as u32;
            let level_h = (img_h as f64 / factor).round() as u32;
            if level_w < win_w || level_h < win_h {
                break;
            }

            if scaled_win.0 >= params.min_size.0 && scaled_win.1 >= params.min_size.1 {
                let integral = if (level_w, level_h) == (img_w, img_h) {
                    IntegralImage::new(img_w, img_h, source.as_raw())
                } else {
                    let level = imageops::resize(&source, level_w, level_h, FilterType::Triangle);
                    IntegralImage::new(level_w, level_h, level.as_raw())
                };

                let step = if factor > FINE_STEP_FACTOR { 1 } else { 2 };
                for y in (0..=level_h - win_h).step_by(step) {
                    for x in (0..=level_w - win_w).step_by(step) {
                        if self.accepts(&integral, x, y) {
                            hits.push(Rectangle::new(
                                (x as f64 * factor).round() as i32,
                                (y as f64 * factor).round() as i32,
                                scaled_win.0 as i32,
                                scaled_win.1 as i32,
                            ));
                        }
                    }
                }
            }

            factor *= params.scale_factor;
        }

        log::debug!("cascade scan produced {} raw hits", hits.len());
        Ok(hits)
    }

    /// Runs every stage on the window at `(x, y)`; rejects at the first
    /// stage whose vote total falls short of its threshold.
    fn accepts(&self, integral: &IntegralImage, x: u32, y: u32) -> bool {
        let (win_w, win_h) = self.window;
        let (inner_w, inner_h) = (win_w - 2, win_h - 2);
        let area = (inner_w * inner_h) as f64;
        let sum = integral.sum(x + 1, y + 1, inner_w, inner_h) as f64;
        let sq_sum = integral.sq_sum(x + 1, y + 1, inner_w, inner_h) as f64;

        let spread = area * sq_sum - sum * sum;
        if spread <= 0.0 {
            return false;
        }
        let norm = 1.0 / spread.sqrt();
        if area * norm >= FLAT_WINDOW_RATIO {
            return false;
        }

        self.stages.iter().all(|stage| {
            let total: f64 = stage
                .classifiers
                .iter()
                .map(|weak| weak.vote(&self.features, integral, x, y, norm))
                .sum();
            total >= stage.threshold
        })
    }
}

impl ObjectDetector for HaarCascade {
    fn detect(
        &mut self,
        gray: &Frame,
        params: &DetectorParameters,
    ) -> Result<Vec<Rectangle>, Box<dyn std::error::Error>> {
        let hits = self.scan(gray, params)?;
        Ok(group_rectangles(&hits, params.min_neighbors, GROUP_EPS))
    }
}

/// Summed-area tables of pixel values and squared pixel values, with a
/// zero row and column in front.
struct IntegralImage {
    stride: usize,
    sum: Vec<i64>,
    sq_sum: Vec<i64>,
}

impl IntegralImage {
    fn new(width: u32, height: u32, pixels: &[u8]) -> Self {
        let (w, h) = (width as usize, height as usize);
        let stride = w + 1;
        let mut sum = vec![0i64; stride * (h + 1)];
        let mut sq_sum = vec![0i64; stride * (h + 1)];
        for y in 0..h {
            let mut row = 0i64;
            let mut row_sq = 0i64;
            for x in 0..w {
                let v = pixels[y * w + x] as i64;
                row += v;
                row_sq += v * v;
                let at = (y + 1) * stride + x + 1;
                sum[at] = sum[at - stride] + row;
                sq_sum[at] = sq_sum[at - stride] + row_sq;
            }
        }
        Self { stride, sum, sq_sum }
    }

    fn sum(&self, x: u32, y: u32, w: u32, h: u32) -> i64 {
        self.area(&self.sum, x, y, w, h)
    }

    fn sq_sum(&self, x: u32, y: u32, w: u32, h: u32) -> i64 {
        self.area(&self.sq_sum, x, y, w, h)
    }

    fn area(&self, table: &[i64], x: u32, y: u32, w: u32, h: u32) -> i64 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        table[y1 * self.stride + x1] - table[y0 * self.stride + x1] - table[y1 * self.stride + x0]
            + table[y0 * self.stride + x0]
    }
}

// --- XML helpers ---

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn required<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Result<Node<'a, 'input>, CascadeError> {
    child(node, name).ok_or_else(|| malformed(format!("missing <{name}> element")))
}

/// Element children named `_`, the list-item tag of OpenCV storage files.
fn items<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.has_tag_name("_"))
}

fn text_of<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, CascadeError> {
    Ok(required(node, name)?.text().unwrap_or("").trim())
}

fn parse_field<T: std::str::FromStr>(node: Node<'_, '_>, name: &str) -> Result<T, CascadeError> {
    let text = text_of(node, name)?;
    text.parse()
        .map_err(|_| malformed(format!("<{name}> is not a valid number: {text:?}")))
}

fn numbers(node: Node<'_, '_>, what: &str) -> Result<Vec<f64>, CascadeError> {
    node.text()
        .unwrap_or("")
        .split_whitespace()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| malformed(format!("{what}: bad number {t:?}")))
        })
        .collect()
}

fn parse_feature(node: Node<'_, '_>, win_w: u32, win_h: u32) -> Result<HaarFeature, CascadeError> {
    if let Some(tilted) = child(node, "tilted") {
        if tilted.text().map(str::trim).unwrap_or("0") != "0" {
            return Err(CascadeError::Unsupported("tilted features".into()));
        }
    }

    let rects = items(required(node, "rects")?)
        .map(|rect_node| {
            let v = numbers(rect_node, "feature rect")?;
            if v.len() != 5 {
                return Err(malformed(format!("feature rect has {} values, expected 5", v.len())));
            }
            if v[..4].iter().any(|&c| c < 0.0 || c.fract() != 0.0) {
                return Err(malformed("feature rect coordinates must be whole and non-negative"));
            }
            let rect = WeightedRect {
                x: v[0] as u32,
                y: v[1] as u32,
                width: v[2] as u32,
                height: v[3] as u32,
                weight: v[4],
            };
            if rect.x + rect.width > win_w || rect.y + rect.height > win_h {
                return Err(malformed("feature rect lies outside the detection window"));
            }
            Ok(rect)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if rects.is_empty() {
        return Err(malformed("feature without rects"));
    }
    Ok(HaarFeature { rects })
}

fn parse_stage(node: Node<'_, '_>, feature_count: usize) -> Result<Stage, CascadeError> {
    let threshold: f64 = parse_field(node, "stageThreshold")?;
    let classifiers = items(required(node, "weakClassifiers")?)
        .map(|weak| parse_weak_classifier(weak, feature_count))
        .collect::<Result<Vec<_>, _>>()?;
    if classifiers.is_empty() {
        return Err(malformed("stage without weak classifiers"));
    }
    Ok(Stage {
        threshold,
        classifiers,
    })
}

fn parse_weak_classifier(node: Node<'_, '_>, feature_count: usize) -> Result<WeakClassifier, CascadeError> {
    let raw = numbers(required(node, "internalNodes")?, "internalNodes")?;
    let leaves = numbers(required(node, "leafValues")?, "leafValues")?;
    if raw.is_empty() || raw.len() % 4 != 0 {
        return Err(malformed(format!(
            "internalNodes holds {} values, expected groups of 4",
            raw.len()
        )));
    }

    let nodes: Vec<TreeNode> = raw
        .chunks_exact(4)
        .map(|n| TreeNode {
            left: n[0] as i32,
            right: n[1] as i32,
            feature: n[2] as usize,
            threshold: n[3],
        })
        .collect();

    for (i, node) in nodes.iter().enumerate() {
        if node.feature >= feature_count {
            return Err(malformed(format!("feature index {} out of range", node.feature)));
        }
        for target in [node.left, node.right] {
            let valid = if target > 0 {
                // Forward links only, so every walk terminates.
                (target as usize) > i && (target as usize) < nodes.len()
            } else {
                ((-target) as usize) < leaves.len()
            };
            if !valid {
                return Err(malformed(format!("tree link {target} out of range")));
            }
        }
    }

    Ok(WeakClassifier { nodes, leaves })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// One-stage cascade whose single stump fires when the left half of the
    /// window is brighter than the right half.
    fn edge_cascade_xml(size: u32) -> String {
        let half = size / 2;
        format!(
            r#"<?xml version="1.0"?>
<opencv_storage>
<cascade type_id="opencv-cascade-classifier">
  <stageType>BOOST</stageType>
  <featureType>HAAR</featureType>
  <height>{size}</height>
  <width>{size}</width>
  <stageParams><maxWeakCount>1</maxWeakCount></stageParams>
  <featureParams><maxCatCount>0</maxCatCount></featureParams>
  <stageNum>1</stageNum>
  <stages>
    <!-- stage 0 -->
    <_>
      <maxWeakCount>1</maxWeakCount>
      <stageThreshold>5.0e-01</stageThreshold>
      <weakClassifiers>
        <_>
          <internalNodes>
            0 -1 0 0.</internalNodes>
          <leafValues>
            -1. 1.</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>
          0 0 {size} {size} -1.</_>
        <_>
          0 0 {half} {size} 2.</_></rects></_></features></cascade>
</opencv_storage>
"#
        )
    }

    fn gray_with_block(w: u32, h: u32, x0: u32, y0: u32, bw: u32, bh: u32) -> Frame {
        let mut frame = Frame::filled(w, h, ColorSpace::Gray, 0);
        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                frame.pixel_mut(x, y)[0] = 255;
            }
        }
        frame
    }

    fn single_scale(size: u32, min_neighbors: u32) -> DetectorParameters {
        DetectorParameters::new(1.2, min_neighbors, (size, size), Some((size, size))).unwrap()
    }

    // --- Parsing ---

    #[test]
    fn test_parses_synthetic_cascade() {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        assert_eq!(cascade.window_size(), (6, 6));
        assert_eq!(cascade.stage_count(), 1);
    }

    #[test]
    fn test_parses_multi_node_tree() {
        let xml = edge_cascade_xml(6).replace(
            "0 -1 0 0.</internalNodes>",
            "1 -1 0 0. 0 -2 0 5.</internalNodes>",
        )
        .replace("-1. 1.</leafValues>", "-1. 1. 2.</leafValues>");
        assert!(HaarCascade::from_xml(&xml).is_ok());
    }

    #[test]
    fn test_rejects_tilted_features() {
        let xml = edge_cascade_xml(6).replace("</rects></_></features>", "</rects><tilted>1</tilted></_></features>");
        let err = HaarCascade::from_xml(&xml).unwrap_err();
        assert!(matches!(err, CascadeError::Unsupported(_)));
    }

    #[rstest]
    #[case::lbp("<featureType>HAAR</featureType>", "<featureType>LBP</featureType>")]
    #[case::gentle("<stageType>BOOST</stageType>", "<stageType>GENTLE</stageType>")]
    fn test_rejects_unsupported_kinds(#[case] from: &str, #[case] to: &str) {
        let xml = edge_cascade_xml(6).replace(from, to);
        assert!(matches!(
            HaarCascade::from_xml(&xml).unwrap_err(),
            CascadeError::Unsupported(_)
        ));
    }

    #[rstest]
    #[case::bad_feature_index("0 -1 0 0.</internalNodes>", "0 -1 3 0.</internalNodes>")]
    #[case::bad_leaf("0 -1 0 0.</internalNodes>", "0 -4 0 0.</internalNodes>")]
    #[case::backward_link("0 -1 0 0.</internalNodes>", "0 -1 0 0. 1 0 0 0.</internalNodes>")]
    #[case::short_node("0 -1 0 0.</internalNodes>", "0 -1 0</internalNodes>")]
    #[case::rect_outside("0 0 3 6 2.", "4 0 3 6 2.")]
    #[case::not_a_number("<width>6</width>", "<width>six</width>")]
    #[case::no_stages("<stages>", "<stagez>")]
    fn test_rejects_malformed(#[case] from: &str, #[case] to: &str) {
        let xml = edge_cascade_xml(6).replace(from, to);
        assert_ne!(xml, edge_cascade_xml(6));
        let err = HaarCascade::from_xml(&xml).unwrap_err();
        assert!(
            matches!(err, CascadeError::Malformed(_) | CascadeError::Xml(_)),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn test_rejects_non_xml() {
        assert!(matches!(
            HaarCascade::from_xml("not xml at all").unwrap_err(),
            CascadeError::Xml(_)
        ));
    }

    #[test]
    fn test_rejects_legacy_layout() {
        let xml = r#"<?xml version="1.0"?>
<opencv_storage>
<haarcascade_frontalface_alt type_id="opencv-haar-classifier">
  <size>20 20</size>
</haarcascade_frontalface_alt>
</opencv_storage>"#;
        assert!(matches!(
            HaarCascade::from_xml(xml).unwrap_err(),
            CascadeError::Unsupported(_)
        ));
    }

    // --- Integral image ---

    #[test]
    fn test_integral_sums_match_direct_sums() {
        let pixels: Vec<u8> = (0..20u8).collect();
        let integral = IntegralImage::new(5, 4, &pixels);
        // Rows 1..3, cols 2..5.
        let direct: i64 = [7, 8, 9, 12, 13, 14].iter().sum();
        assert_eq!(integral.sum(2, 1, 3, 2), direct);
        let direct_sq: i64 = [7i64, 8, 9, 12, 13, 14].iter().map(|v| v * v).sum();
        assert_eq!(integral.sq_sum(2, 1, 3, 2), direct_sq);
        assert_eq!(integral.sum(0, 0, 5, 4), (0..20).sum::<i64>());
    }

    // --- Scanning ---

    #[test]
    fn test_scan_finds_exact_windows() {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let gray = gray_with_block(30, 30, 10, 10, 3, 6);

        let hits = cascade.scan(&gray, &single_scale(6, 1)).unwrap();

        let expected: Vec<Rectangle> = [6, 8, 10, 12, 14]
            .iter()
            .map(|&y| Rectangle::new(10, y, 6, 6))
            .collect();
        assert_eq!(hits, expected);
    }

    #[test]
    fn test_flat_image_has_no_hits() {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let gray = Frame::filled(40, 40, ColorSpace::Gray, 128);
        let hits = cascade.scan(&gray, &DetectorParameters::new(1.2, 1, (6, 6), None).unwrap()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_scan_covers_larger_scales() {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let gray = gray_with_block(60, 60, 20, 10, 12, 30);
        let params = DetectorParameters::new(1.5, 1, (6, 6), None).unwrap();

        let hits = cascade.scan(&gray, &params).unwrap();

        assert!(hits.iter().any(|r| r.width == 6));
        assert!(hits.iter().any(|r| r.width > 6));
        assert!(hits.iter().all(|r| r.width <= 60 && r.height <= 60));
    }

    #[test]
    fn test_image_smaller_than_window_has_no_hits() {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let gray = gray_with_block(5, 5, 0, 0, 2, 5);
        let hits = cascade.scan(&gray, &DetectorParameters::new(1.2, 1, (1, 1), None).unwrap()).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_min_size_skips_small_levels() {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let gray = gray_with_block(60, 60, 20, 10, 12, 30);
        let params = DetectorParameters::new(1.5, 1, (12, 12), None).unwrap();

        let hits = cascade.scan(&gray, &params).unwrap();

        assert!(hits.iter().all(|r| r.width >= 12));
    }

    #[test]
    fn test_scan_rejects_color_frame() {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let frame = Frame::filled(20, 20, ColorSpace::Bgr, 0);
        assert!(cascade.scan(&frame, &DetectorParameters::default()).is_err());
    }

    // --- Detection ---

    #[rstest]
    #[case::unit_factor(1.0)]
    #[case::shrinking_factor(0.8)]
    #[case::nan_factor(f64::NAN)]
    fn test_scan_rejects_non_growing_pyramid(#[case] scale_factor: f64) {
        let cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let params = DetectorParameters {
            scale_factor,
            min_neighbors: 3,
            min_size: (6, 6),
            max_size: None,
        };
        let gray = Frame::filled(40, 40, ColorSpace::Gray, 7);
        assert!(cascade.scan(&gray, &params).is_err());
        assert!(cascade.clone().detect(&gray, &params).is_err());
    }

    #[test]
    fn test_detect_groups_hits_into_one_region() {
        let mut cascade = HaarCascade::from_xml(&edge_cascade_xml(10)).unwrap();
        let gray = gray_with_block(60, 60, 20, 20, 5, 10);

        let faces = cascade.detect(&gray, &single_scale(10, 3)).unwrap();

        assert_eq!(faces, vec![Rectangle::new(20, 20, 10, 10)]);
    }

    #[test]
    fn test_detect_drops_isolated_hits() {
        let mut cascade = HaarCascade::from_xml(&edge_cascade_xml(6)).unwrap();
        let gray = gray_with_block(30, 30, 10, 10, 3, 6);

        let faces = cascade.detect(&gray, &single_scale(6, 1)).unwrap();

        assert!(faces.is_empty());
    }

    #[test]
    fn test_detect_respects_min_neighbors() {
        let mut cascade = HaarCascade::from_xml(&edge_cascade_xml(10)).unwrap();
        let gray = gray_with_block(60, 60, 20, 20, 5, 10);

        // 27 raw hits form the only cluster.
        assert_eq!(cascade.detect(&gray, &single_scale(10, 26)).unwrap().len(), 1);
        assert!(cascade.detect(&gray, &single_scale(10, 27)).unwrap().is_empty());
    }
}
