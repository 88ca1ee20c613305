//! Property-style tests for partitioning, indexing, and clipping.

use blocks_common::BoundingBox;
use contour_geometry::{
    clip_all, clip_polyline, clip_to_region, partition_blocks, ContourSet, Polyline, SpatialIndex,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn line(coords: &[(f64, f64)]) -> Polyline {
    Polyline::from_coords(coords)
}

// ============================================================================
// Partition + clip interplay
// ============================================================================

#[test]
fn test_geometry_inside_one_region_stays_verbatim() {
    // Extent (0,0)-(100,50), gap 5%: blocks are [0,30], [35,65], [70,100]
    let set = ContourSet::new(vec![
        line(&[(2.0, 10.0), (28.0, 40.0)]),
        line(&[(37.0, 10.0), (63.0, 40.0)]),
        line(&[(72.0, 10.0), (98.0, 40.0)]),
    ])
    .unwrap();
    let extent = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
    let regions = partition_blocks(&extent, 0.05).unwrap();
    let index = SpatialIndex::build(&set);

    let clipped = clip_all(&set, &index, &regions);
    assert_eq!(clipped.len(), 3);

    for (i, region_clip) in clipped.iter().enumerate() {
        // Exactly the one line confined to this third, unchanged
        assert_eq!(region_clip.lines.len(), 1, "region {}", i);
        assert_eq!(region_clip.lines[0], set.lines()[i]);
    }
}

#[test]
fn test_geometry_outside_all_regions_never_appears() {
    let set = ContourSet::new(vec![
        line(&[(5.0, 5.0), (25.0, 25.0)]),
        // Far away from the partitioned extent
        line(&[(1000.0, 1000.0), (1010.0, 1010.0)]),
    ])
    .unwrap();
    let extent = BoundingBox::new(0.0, 0.0, 90.0, 30.0);
    let regions = partition_blocks(&extent, 0.01).unwrap();
    let index = SpatialIndex::build(&set);

    for region in &regions {
        let clipped = clip_to_region(&set, &index, region);
        for piece in &clipped.lines {
            for p in &piece.points {
                assert!(region.bounds.contains_point(p.x, p.y));
                assert!(p.x < 500.0);
            }
        }
    }
}

#[test]
fn test_empty_region_is_valid() {
    // All geometry in the left third; middle and right come out empty
    let set = ContourSet::new(vec![line(&[(1.0, 1.0), (5.0, 5.0)])]).unwrap();
    let extent = BoundingBox::new(0.0, 0.0, 90.0, 30.0);
    let regions = partition_blocks(&extent, 0.0).unwrap();
    let index = SpatialIndex::build(&set);

    let clipped = clip_all(&set, &index, &regions);
    assert!(!clipped[0].is_empty());
    assert!(clipped[1].is_empty());
    assert!(clipped[2].is_empty());
}

#[test]
fn test_no_gap_reassembly_preserves_length() {
    // With zero gaps the three regions tile the extent, so the total clipped
    // length must equal the in-extent length of the input: no loss, no
    // duplication.
    let set = ContourSet::new(vec![
        line(&[(5.0, 5.0), (85.0, 25.0)]),
        line(&[(10.0, 20.0), (40.0, 3.0), (80.0, 28.0)]),
    ])
    .unwrap();
    let extent = set.extent();
    let regions = partition_blocks(&extent, 0.0).unwrap();
    let index = SpatialIndex::build(&set);

    let clipped = clip_all(&set, &index, &regions);
    let clipped_total: f64 = clipped
        .iter()
        .flat_map(|c| c.lines.iter())
        .map(|l| l.length())
        .sum();
    let original_total: f64 = set.lines().iter().map(|l| l.length()).sum();

    assert!(
        (clipped_total - original_total).abs() < 1e-6,
        "clipped {} vs original {}",
        clipped_total,
        original_total
    );
}

#[test]
fn test_zero_gap_boundary_line_lands_in_both_regions() {
    // Closed rectangles share their boundary at gap 0: a line exactly on
    // the seam between blocks 0 and 1 belongs to both. Pinned so a change
    // to half-open boundaries shows up here.
    let extent = BoundingBox::new(0.0, 0.0, 90.0, 30.0);
    let seam = line(&[(30.0, 5.0), (30.0, 25.0)]);
    let set = ContourSet::new(vec![seam.clone(), line(&[(1.0, 1.0), (5.0, 5.0)])]).unwrap();
    let regions = partition_blocks(&extent, 0.0).unwrap();
    let index = SpatialIndex::build(&set);

    let clipped = clip_all(&set, &index, &regions);
    assert!(clipped[0].lines.contains(&seam));
    assert!(clipped[1].lines.contains(&seam));
    assert!(clipped[2].is_empty());
}

// ============================================================================
// Index prefilter correctness
// ============================================================================

fn brute_force_clip(set: &ContourSet, rect: &BoundingBox) -> Vec<Polyline> {
    set.lines()
        .iter()
        .flat_map(|l| clip_polyline(l, rect))
        .collect()
}

#[test]
fn test_prefilter_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);

    // Random short lines scattered over (0,0)-(200,100)
    let lines: Vec<Polyline> = (0..300)
        .map(|_| {
            let x = rng.gen_range(0.0..200.0);
            let y = rng.gen_range(0.0..100.0);
            let dx = rng.gen_range(-15.0..15.0);
            let dy = rng.gen_range(-15.0..15.0);
            line(&[(x, y), (x + dx, y + dy)])
        })
        .filter(|l| !l.is_degenerate())
        .collect();
    let set = ContourSet::new(lines).unwrap();
    let index = SpatialIndex::build(&set);

    for _ in 0..50 {
        let x0 = rng.gen_range(-20.0..180.0);
        let y0 = rng.gen_range(-20.0..80.0);
        let rect = BoundingBox::new(x0, y0, x0 + rng.gen_range(1.0..80.0), y0 + rng.gen_range(1.0..50.0));

        let mut via_index: Vec<Polyline> = index
            .query(&rect)
            .into_iter()
            .flat_map(|h| clip_polyline(&set.lines()[h], &rect))
            .collect();
        let mut brute = brute_force_clip(&set, &rect);

        let key = |l: &Polyline| {
            let p = l.points[0];
            (p.x.to_bits(), p.y.to_bits())
        };
        via_index.sort_by_key(key);
        brute.sort_by_key(key);

        assert_eq!(via_index, brute);
    }
}

#[test]
fn test_query_is_superset_of_exact_hits() {
    let set = ContourSet::new(vec![
        line(&[(0.0, 0.0), (50.0, 50.0)]),
        line(&[(60.0, 0.0), (60.0, 50.0)]),
    ])
    .unwrap();
    let index = SpatialIndex::build(&set);

    // A bbox can overlap while the line itself misses the rectangle: the
    // diagonal's bbox covers (0,0)-(50,50) but the line avoids the corner
    let rect = BoundingBox::new(0.0, 40.0, 8.0, 50.0);
    let handles = index.query(&rect);
    assert!(handles.contains(&0)); // false positive allowed
    let exact: Vec<Polyline> = handles
        .into_iter()
        .flat_map(|h| clip_polyline(&set.lines()[h], &rect))
        .collect();
    assert!(exact.is_empty()); // filtered by the exact test
}
