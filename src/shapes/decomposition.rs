//! Convex decomposition of simple polygons.
//!
//! Contours are ear-clipped into triangles, then neighbouring pieces are merged
//! back together for as long as the merged piece stays convex
//! (Hertel-Mehlhorn). The result has at most four times the optimal number of
//! pieces, which is plenty for narrow-phase use.

use crate::math::{signed_area, Ray, Vector, EPSILON};

/// Splits a contour into convex pieces whose union rebuilds it.
///
/// Returns one piece for a convex contour, many for a concave one and none
/// for fewer than three points, zero area or a self-intersecting contour.
/// Pieces are wound counter-clockwise.
pub fn quick_decomp(points: &[Vector]) -> Vec<Vec<Vector>> {
    if points.len() < 3 || !is_simple(points) {
        return Vec::new();
    }

    let mut contour = points.to_vec();
    let area = signed_area(&contour);
    if area.abs() < EPSILON {
        return Vec::new();
    }
    if area < 0.0 {
        contour.reverse();
    }

    let all: Vec<usize> = (0..contour.len()).collect();
    if is_convex(&contour, &all) {
        return vec![contour];
    }

    merge_convex(&contour, triangulate(&contour))
        .into_iter()
        .map(|piece| piece.into_iter().map(|i| contour[i]).collect())
        .collect()
}

/// Checks that no two non-adjacent edges of a closed contour touch
pub fn is_simple(points: &[Vector]) -> bool {
    let len = points.len();
    if len < 4 {
        return true;
    }

    for i in 0..len {
        let edge = Ray::new(points[i], points[(i + 1) % len]);
        for j in (i + 2)..len {
            // the last edge shares a vertex with the first one
            if i == 0 && j == len - 1 {
                continue;
            }
            if edge.intersect_segment(points[j], points[(j + 1) % len]).is_some() {
                return false;
            }
        }
    }

    true
}

/// Cross product of the turn `a -> b -> c`, positive for a left turn
#[inline]
fn turn(a: Vector, b: Vector, c: Vector) -> f32 {
    (b - a).perp(&(c - b))
}

fn is_convex(contour: &[Vector], piece: &[usize]) -> bool {
    let len = piece.len();
    (0..len).all(|i| {
        turn(
            contour[piece[i]],
            contour[piece[(i + 1) % len]],
            contour[piece[(i + 2) % len]],
        ) >= -EPSILON
    })
}

fn point_in_triangle(p: Vector, a: Vector, b: Vector, c: Vector) -> bool {
    (b - a).perp(&(p - a)) >= 0.0
        && (c - b).perp(&(p - b)) >= 0.0
        && (a - c).perp(&(p - c)) >= 0.0
}

/// Ear clipping over a counter-clockwise contour
fn triangulate(contour: &[Vector]) -> Vec<[usize; 3]> {
    let mut remaining: Vec<usize> = (0..contour.len()).collect();
    let mut triangles = Vec::with_capacity(contour.len().saturating_sub(2));

    while remaining.len() > 3 {
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            let prev = remaining[(i + len - 1) % len];
            let curr = remaining[i];
            let next = remaining[(i + 1) % len];
            is_ear(contour, &remaining, prev, curr, next)
        });

        match ear {
            Some(i) => {
                let prev = remaining[(i + len - 1) % len];
                let next = remaining[(i + 1) % len];
                triangles.push([prev, remaining[i], next]);
                remaining.remove(i);
            }
            None => {
                // only collinear vertices left to clip, drop one without a triangle
                let flat = (0..len).find(|&i| {
                    let prev = contour[remaining[(i + len - 1) % len]];
                    let next = contour[remaining[(i + 1) % len]];
                    turn(prev, contour[remaining[i]], next).abs() < EPSILON
                });
                match flat {
                    Some(i) => {
                        remaining.remove(i);
                    }
                    None => break,
                }
            }
        }
    }

    if remaining.len() == 3 {
        let [a, b, c] = [remaining[0], remaining[1], remaining[2]];
        if turn(contour[a], contour[b], contour[c]) > EPSILON {
            triangles.push([a, b, c]);
        }
    }

    triangles
}

fn is_ear(contour: &[Vector], remaining: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let (a, b, c) = (contour[prev], contour[curr], contour[next]);
    if turn(a, b, c) <= EPSILON {
        return false;
    }

    remaining
        .iter()
        .filter(|&&i| i != prev && i != curr && i != next)
        .all(|&i| {
            let p = contour[i];
            // duplicated vertices sit on a corner and cannot block the ear
            p == a || p == b || p == c || !point_in_triangle(p, a, b, c)
        })
}

/// Merges pieces across shared diagonals while the result stays convex
fn merge_convex(contour: &[Vector], triangles: Vec<[usize; 3]>) -> Vec<Vec<usize>> {
    let mut pieces: Vec<Vec<usize>> = triangles.into_iter().map(|t| t.to_vec()).collect();

    loop {
        let mut merged_any = false;

        'search: for i in 0..pieces.len() {
            for j in (i + 1)..pieces.len() {
                if let Some(merged) = try_merge(contour, &pieces[i], &pieces[j]) {
                    pieces[i] = merged;
                    pieces.swap_remove(j);
                    merged_any = true;
                    break 'search;
                }
            }
        }

        if !merged_any {
            return pieces;
        }
    }
}

fn try_merge(contour: &[Vector], p: &[usize], q: &[usize]) -> Option<Vec<usize>> {
    let (np, nq) = (p.len(), q.len());

    // edge u -> v in p runs v -> u in q
    let (pi, qi) = (0..np).find_map(|a| {
        let (u, v) = (p[a], p[(a + 1) % np]);
        (0..nq)
            .find(|&b| q[b] == v && q[(b + 1) % nq] == u)
            .map(|b| (a, b))
    })?;

    let mut merged = Vec::with_capacity(np + nq - 2);
    // v around p back to u
    merged.extend((0..np).map(|k| p[(pi + 1 + k) % np]));
    // q strictly between u and v
    merged.extend((1..nq - 1).map(|k| q[(qi + 1 + k) % nq]));

    if is_convex(contour, &merged) {
        Some(merged)
    } else {
        None
    }
}
