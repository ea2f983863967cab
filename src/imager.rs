//! Frame thresholding and observed-star extraction
//!
//! Turns a raw BGR frame into a brightness-sorted list of
//! [ObservedStar]s: luminance threshold, 8-connectivity connected
//! components, centroid, area and field-mask filtering.

//a Imports
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{Error, TrackerConfig};

//a ObservedStar
//tp ObservedStar
/// A single star centroid extracted from a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedStar {
    /// Connected-component area, in pixels; used as a brightness proxy
    pub pixel_count: u32,
    /// Centroid position, in pixel coordinates (x right, y down)
    pub position: (f64, f64),
}

//a Frame
//tp Frame
/// A raw `W x H` BGR frame, one byte per channel, row-major
pub struct Frame<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

//ip Frame
impl<'a> Frame<'a> {
    //cp new
    /// Wrap a raw BGR buffer; panics if `data.len() != width * height * 3`
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Self {
        assert_eq!(
            data.len(),
            width * height * 3,
            "frame buffer size does not match width * height * 3"
        );
        Self {
            width,
            height,
            data,
        }
    }

    //ap width
    pub fn width(&self) -> usize {
        self.width
    }

    //ap height
    pub fn height(&self) -> usize {
        self.height
    }

    //mp luminance
    /// BT.601 luminance of the pixel at `(x, y)`
    fn luminance(&self, x: usize, y: usize) -> u8 {
        let i = (y * self.width + x) * 3;
        let b = self.data[i] as f32;
        let g = self.data[i + 1] as f32;
        let r = self.data[i + 2] as f32;
        (0.299 * r + 0.587 * g + 0.114 * b) as u8
    }

    //cp load_image
    /// Decode a PNG/JPEG frame from disk into an owned buffer; requires the `image` feature
    #[cfg(feature = "image")]
    pub fn load_image<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<(usize, usize, Vec<u8>), Error> {
        let img = image::open(path)
            .map_err(|e| Error::InvalidConfig(format!("failed to load frame image: {e}")))?
            .to_rgb8();
        let (width, height) = (img.width() as usize, img.height() as usize);
        let mut data = Vec::with_capacity(width * height * 3);
        for px in img.pixels() {
            data.push(px[2]);
            data.push(px[1]);
            data.push(px[0]);
        }
        Ok((width, height, data))
    }
}

//a Imager
//tp Imager
/// Stateless extractor from a [Frame] to a brightness-sorted list of [ObservedStar]
pub struct Imager;

//ip Imager
impl Imager {
    //cp extract
    /// Run thresholding, connected-component labeling, area and
    /// field-mask filtering, and brightness sort; returns
    /// `Error::InsufficientStars` if fewer than 4 stars survive
    pub fn extract(frame: &Frame, config: &TrackerConfig) -> Result<Vec<ObservedStar>, Error> {
        let mask = Self::threshold(frame, config.star_threshold);
        let components = Self::label_components(frame.width, frame.height, &mask);

        let radius = frame.width.min(frame.height) as f64 / 2.0;
        let center = (frame.width as f64 / 2.0, frame.height as f64 / 2.0);

        let (area_min, area_max) = config.component_area_bounds;
        let mut stars: Vec<ObservedStar> = components
            .into_iter()
            .filter(|c| c.area >= area_min && c.area <= area_max)
            .map(|c| ObservedStar {
                pixel_count: c.area,
                position: c.centroid,
            })
            .filter(|s| {
                let dx = s.position.0 - center.0;
                let dy = s.position.1 - center.1;
                (dx * dx + dy * dy).sqrt() <= radius
            })
            .collect();

        stars.sort_by(|a, b| b.pixel_count.cmp(&a.pixel_count));

        debug!(
            "extracted {} viable stars from {}x{} frame (threshold {})",
            stars.len(),
            frame.width,
            frame.height,
            config.star_threshold
        );

        if stars.len() < 4 {
            warn!("frame rejected: only {} viable stars", stars.len());
            return Err(Error::InsufficientStars {
                found: stars.len(),
                needed: 4,
            });
        }
        Ok(stars)
    }

    //fi threshold
    /// Binary luminance mask: `true` where luminance exceeds `star_threshold`
    fn threshold(frame: &Frame, star_threshold: u8) -> Vec<bool> {
        let mut mask = vec![false; frame.width * frame.height];
        for y in 0..frame.height {
            for x in 0..frame.width {
                mask[y * frame.width + x] = frame.luminance(x, y) > star_threshold;
            }
        }
        mask
    }

    //fi label_components
    /// 8-connectivity flood-fill connected component labeling,
    /// returning area and centroid per component
    fn label_components(width: usize, height: usize, mask: &[bool]) -> Vec<Component> {
        let mut visited = vec![false; width * height];
        let mut components = vec![];
        let mut stack = vec![];

        for y0 in 0..height {
            for x0 in 0..width {
                let i0 = y0 * width + x0;
                if visited[i0] || !mask[i0] {
                    continue;
                }
                stack.clear();
                stack.push((x0, y0));
                visited[i0] = true;
                let mut area = 0u32;
                let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
                while let Some((x, y)) = stack.pop() {
                    area += 1;
                    sum_x += x as f64;
                    sum_y += y as f64;
                    for dy in -1isize..=1 {
                        for dx in -1isize..=1 {
                            if dx == 0 && dy == 0 {
                                continue;
                            }
                            let nx = x as isize + dx;
                            let ny = y as isize + dy;
                            if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
                                continue;
                            }
                            let (nx, ny) = (nx as usize, ny as usize);
                            let ni = ny * width + nx;
                            if !visited[ni] && mask[ni] {
                                visited[ni] = true;
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
                components.push(Component {
                    area,
                    centroid: (sum_x / area as f64, sum_y / area as f64),
                });
            }
        }
        components
    }
}

//tp Component
struct Component {
    area: u32,
    centroid: (f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: usize, height: usize, fill: u8) -> Vec<u8> {
        vec![fill; width * height * 3]
    }

    fn draw_square(data: &mut [u8], width: usize, x0: usize, y0: usize, size: usize, v: u8) {
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                let i = (y * width + x) * 3;
                data[i] = v;
                data[i + 1] = v;
                data[i + 2] = v;
            }
        }
    }

    #[test]
    fn extracts_bright_blobs_inside_field_mask() {
        let (w, h) = (100, 100);
        let mut data = solid_frame(w, h, 0);
        // three 2x2 blobs near the center, inside the inscribed circle
        draw_square(&mut data, w, 48, 48, 2, 255);
        draw_square(&mut data, w, 60, 60, 2, 255);
        draw_square(&mut data, w, 40, 55, 2, 255);
        // one blob in a far corner, outside the inscribed circle
        draw_square(&mut data, w, 2, 2, 2, 255);

        let frame = Frame::new(w, h, &data);
        let mut config = TrackerConfig::default();
        config.component_area_bounds = (1, 20);
        // only 3 stars survive the field mask; fewer than 4 is an error
        let result = Imager::extract(&frame, &config);
        assert!(matches!(result, Err(Error::InsufficientStars { found: 3, .. })));
    }

    #[test]
    fn sorts_by_brightness_area() {
        let (w, h) = (100, 100);
        let mut data = solid_frame(w, h, 0);
        draw_square(&mut data, w, 40, 50, 4, 255);
        draw_square(&mut data, w, 50, 50, 2, 255);
        draw_square(&mut data, w, 55, 40, 2, 255);
        draw_square(&mut data, w, 55, 60, 2, 255);

        let frame = Frame::new(w, h, &data);
        let mut config = TrackerConfig::default();
        config.component_area_bounds = (1, 20);
        let stars = Imager::extract(&frame, &config).unwrap();
        assert_eq!(stars.len(), 4);
        assert_eq!(stars[0].pixel_count, 16);
    }
}
