//! Ear-clipping triangulation of simple 2D polygons.
//!
//! The input is an open ring of `(x, z)` points (the closing duplicate must
//! already be dropped). The returned indices always refer to the input
//! ordering, even though the algorithm internally normalizes the winding to
//! counter-clockwise before searching for ears. Degenerate and
//! self-intersecting rings never deadlock: when a full pass over the ring
//! finds no ear the remainder is fan-triangulated and the algorithm stops.

/// Triangulate a simple polygon into an index list, three per triangle.
///
/// Returns an empty list for fewer than three points, and `3 * (n - 2)`
/// indices otherwise. Duplicate consecutive points are tolerated; they end
/// up in zero-area triangles that consumers must accept.
pub fn triangulate(points: &[(f64, f64)]) -> Vec<u32> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    // Normalize to counter-clockwise, remembering the original position of
    // every working vertex so emitted indices match the caller's ordering.
    let mut working: Vec<(f64, f64)> = points.to_vec();
    let mut original: Vec<u32> = (0..n as u32).collect();
    if signed_area_doubled(points) > 0.0 {
        working.reverse();
        original.reverse();
    }

    let mut ring: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(3 * (n - 2));

    while ring.len() > 2 {
        let mut clipped = false;

        for i in 0..ring.len() {
            let prev = ring[(i + ring.len() - 1) % ring.len()];
            let curr = ring[i];
            let next = ring[(i + 1) % ring.len()];

            let p = working[prev];
            let c = working[curr];
            let q = working[next];

            // Reflex and collinear vertices are skipped; only strictly
            // convex corners are ear candidates.
            let cross = (c.0 - p.0) * (q.1 - p.1) - (c.1 - p.1) * (q.0 - p.0);
            if cross >= 0.0 {
                continue;
            }

            let mut is_ear = true;
            for &other in &ring {
                if other == prev || other == curr || other == next {
                    continue;
                }
                if point_in_triangle(working[other], p, c, q) {
                    is_ear = false;
                    break;
                }
            }

            if is_ear {
                triangles.extend([original[prev], original[curr], original[next]]);
                ring.remove(i);
                clipped = true;
                break;
            }
        }

        if !clipped {
            // No ear anywhere: the ring is degenerate or self-intersecting.
            // Fan out from the first remaining vertex and stop.
            for k in 1..ring.len() - 1 {
                triangles.extend([
                    original[ring[0]],
                    original[ring[k]],
                    original[ring[k + 1]],
                ]);
            }
            break;
        }
    }

    triangles
}

/// Twice the signed area of the ring (shoelace sum). Positive means
/// clockwise in the screen-space convention where +z points down.
fn signed_area_doubled(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].0 * points[j].1;
        area -= points[j].0 * points[i].1;
    }
    area
}

/// Signed-area containment test. Points on the triangle boundary count as
/// inside, which keeps ears conservative around collinear runs.
fn point_in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    fn sign(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)) -> f64 {
        (p1.0 - p3.0) * (p2.1 - p3.1) - (p2.0 - p3.0) * (p1.1 - p3.1)
    }

    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}
