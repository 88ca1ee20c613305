//! Three-block partitioning of the design extent.

use blocks_common::{BoundingBox, DesignError, DesignResult};

/// A design always has exactly three blocks.
pub const BLOCK_COUNT: usize = 3;

/// One of the three panel regions, ordered left to right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockRegion {
    /// Ordinal 0..=2, region 0 is leftmost.
    pub index: usize,
    pub bounds: BoundingBox,
}

/// Split `extent` into three equal-width blocks with proportional gaps.
///
/// Each gap is `extent.width() * gap_percent`; there are two gaps, so the
/// blocks span `width * (1 - 2 * gap_percent)` in total. Blocks take the
/// full extent height. The partition is deterministic.
pub fn partition_blocks(
    extent: &BoundingBox,
    gap_percent: f64,
) -> DesignResult<[BlockRegion; BLOCK_COUNT]> {
    if !extent.is_finite() {
        return Err(DesignError::InvalidBounds(format!(
            "extent is not finite: {:?}",
            extent
        )));
    }
    if extent.is_degenerate() {
        return Err(DesignError::InvalidBounds(format!(
            "extent has zero area: width={}, height={}",
            extent.width(),
            extent.height()
        )));
    }
    if !gap_percent.is_finite() || !(0.0..0.5).contains(&gap_percent) {
        return Err(DesignError::InvalidConfig(format!(
            "gap_percent must be in [0, 0.5), got {}",
            gap_percent
        )));
    }

    let gap = extent.width() * gap_percent;
    let block_width = (extent.width() - 2.0 * gap) / BLOCK_COUNT as f64;

    let mut regions = [BlockRegion {
        index: 0,
        bounds: *extent,
    }; BLOCK_COUNT];

    for (i, region) in regions.iter_mut().enumerate() {
        let left = extent.min_x + i as f64 * (block_width + gap);
        region.index = i;
        region.bounds = BoundingBox::new(left, extent.min_y, left + block_width, extent.max_y);
    }

    Ok(regions)
}
