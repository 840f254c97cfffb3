use image::imageops::{self, FilterType};
use image::RgbImage;

/// Terminal cells are roughly twice as tall as they are wide.
pub const DEFAULT_CELL_ASPECT: f64 = 0.5;

pub const DEFAULT_SCALE: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetGeometry {
    pub columns: u32,
    pub rows: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutPolicy {
    /// Columns are the source pixel width times the factor.
    Scale(f64),
    FixedColumns(u32),
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        LayoutPolicy::Scale(DEFAULT_SCALE)
    }
}

impl LayoutPolicy {
    pub fn columns(&self, source_width: u32) -> Option<u32> {
        let columns = match *self {
            LayoutPolicy::Scale(scale) => {
                if !scale.is_finite() || scale <= 0.0 {
                    return None;
                }
                let columns = (f64::from(source_width) * scale).round();
                if columns > f64::from(u32::MAX) {
                    return None;
                }
                columns as u32
            },
            LayoutPolicy::FixedColumns(columns) => columns,
        };

        (columns > 0).then_some(columns)
    }

    pub fn derive(
        &self,
        source_width: u32,
        source_height: u32,
        cell_aspect: f64,
    ) -> Option<TargetGeometry> {
        if source_width == 0 || source_height == 0 {
            return None;
        }

        let columns = self.columns(source_width)?;
        let rows = rows_for(source_width, source_height, columns, cell_aspect);
        Some(TargetGeometry { columns, rows })
    }
}

/// Rows needed to keep the source aspect ratio at `columns` wide, never less than one.
pub fn rows_for(source_width: u32, source_height: u32, columns: u32, cell_aspect: f64) -> u32 {
    if source_width == 0 {
        return 1;
    }
    let ratio = f64::from(source_height) / f64::from(source_width);
    let rows = (ratio * f64::from(columns) * cell_aspect).round();
    rows.clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Bicubic resample to the exact target grid.
pub fn resample(image: &RgbImage, columns: u32, rows: u32) -> RgbImage {
    if image.dimensions() == (columns, rows) {
        return image.clone();
    }
    imageops::resize(image, columns.max(1), rows.max(1), FilterType::CatmullRom)
}
