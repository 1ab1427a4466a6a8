//! Renderer trait at the seam between series building and drawing.

use crate::composer::PanelSpec;
use crate::series::RegionSeries;
use crate::style::StyleMap;
use countywatch_common::Result;
use std::path::Path;

/// Something that turns computed series into a figure on disk.
pub trait FigureRenderer {
    /// Renders `series` into a new (or overwritten) file at `output_path`.
    fn render(
        &self,
        output_path: &Path,
        series: &[RegionSeries],
        styles: &StyleMap,
        spec: &PanelSpec,
    ) -> Result<()>;

    /// Gets the name of this renderer.
    fn name(&self) -> &'static str;
}
