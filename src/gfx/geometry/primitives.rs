//! # Primitive Shape Generation
//!
//! This module contains functions to generate the 3D primitive shapes used by
//! the court scene builder. All triangle-list shapes are generated with
//! counter-clockwise winding and outward-facing normals.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a rectangular box centered at the origin
///
/// # Arguments
/// * `width` - Extent along the x axis
/// * `height` - Extent along the y axis
/// * `depth` - Extent along the z axis
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

    // 4 vertices per face so each face carries its own normal
    let positions = [
        // Front face (+z)
        [-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd],
        // Back face (-z)
        [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd], [hw, -hh, -hd],
        // Left face (-x)
        [-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd],
        // Right face (+x)
        [hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd],
        // Top face (+y)
        [-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd],
        // Bottom face (-y)
        [-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd],
    ];

    let normals = [
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = normals.to_vec();

    data.indices = vec![
        0, 1, 2, 2, 3, 0, // front
        4, 5, 6, 6, 7, 4, // back
        8, 9, 10, 10, 11, 8, // left
        12, 13, 14, 14, 15, 12, // right
        16, 17, 18, 18, 19, 16, // top
        20, 21, 22, 22, 23, 20, // bottom
    ];

    data
}

/// Generate a UV sphere centered at the origin
///
/// # Arguments
/// * `radius` - Radius of the sphere
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();

            // Spherical to Cartesian, y-up
            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a capped cylinder along the y axis
///
/// # Arguments
/// * `radius` - Radius of the cylinder
/// * `height` - Height of the cylinder (along the y axis)
/// * `segments` - Number of circular segments
///
/// Returns a cylinder centered at the origin extending from -height/2 to height/2 in y.
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side vertices
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let x = radius * cos_a;
        let z = radius * sin_a;

        data.vertices.push([x, -half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);

        data.vertices.push([x, half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
    }

    // Side faces
    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices.push(bottom_current);
        data.indices.push(bottom_next);
        data.indices.push(top_current);

        data.indices.push(top_current);
        data.indices.push(bottom_next);
        data.indices.push(top_next);
    }

    // Cap center vertices
    let center_bottom_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);

    let center_top_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, half_height, 0.0]);
    data.normals.push([0.0, 1.0, 0.0]);

    // Bottom cap
    for i in 0..segs {
        let current = i * 2;
        let next = (i + 1) * 2;

        data.indices.push(center_bottom_idx);
        data.indices.push(current);
        data.indices.push(next);
    }

    // Top cap
    for i in 0..segs {
        let current = i * 2 + 1;
        let next = (i + 1) * 2 + 1;

        data.indices.push(center_top_idx);
        data.indices.push(next);
        data.indices.push(current);
    }

    data
}

/// Generate a torus lying in the xy plane, centered at the origin
///
/// # Arguments
/// * `radius` - Distance from the torus center to the tube center
/// * `tube_radius` - Radius of the tube
/// * `ring_segments` - Number of segments around the main ring
/// * `tube_segments` - Number of segments around the tube
pub fn generate_torus(
    radius: f32,
    tube_radius: f32,
    ring_segments: u32,
    tube_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let ring_segs = ring_segments.max(3);
    let tube_segs = tube_segments.max(3);

    for j in 0..=ring_segs {
        let theta = j as f32 * 2.0 * PI / ring_segs as f32;
        let cos_theta = theta.cos();
        let sin_theta = theta.sin();

        for i in 0..=tube_segs {
            let phi = i as f32 * 2.0 * PI / tube_segs as f32;
            let cos_phi = phi.cos();
            let sin_phi = phi.sin();

            let x = (radius + tube_radius * cos_phi) * cos_theta;
            let y = (radius + tube_radius * cos_phi) * sin_theta;
            let z = tube_radius * sin_phi;

            data.vertices.push([x, y, z]);
            data.normals.push([cos_phi * cos_theta, cos_phi * sin_theta, sin_phi]);
        }
    }

    for j in 0..ring_segs {
        for i in 0..tube_segs {
            let first = j * (tube_segs + 1) + i;
            let second = first + tube_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a flat annulus sector in the xy plane with a +z normal
///
/// # Arguments
/// * `inner_radius` - Inner edge radius
/// * `outer_radius` - Outer edge radius
/// * `segments` - Number of angular subdivisions
/// * `theta_start` - Starting angle in radians
/// * `theta_length` - Angular span in radians (2*PI for a full ring)
pub fn generate_ring(
    inner_radius: f32,
    outer_radius: f32,
    segments: u32,
    theta_start: f32,
    theta_length: f32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);

    for s in 0..=segs {
        let theta = theta_start + s as f32 * theta_length / segs as f32;
        let cos_t = theta.cos();
        let sin_t = theta.sin();

        data.vertices.push([inner_radius * cos_t, inner_radius * sin_t, 0.0]);
        data.normals.push([0.0, 0.0, 1.0]);

        data.vertices.push([outer_radius * cos_t, outer_radius * sin_t, 0.0]);
        data.normals.push([0.0, 0.0, 1.0]);
    }

    for s in 0..segs {
        let inner_current = s * 2;
        let outer_current = inner_current + 1;
        let inner_next = inner_current + 2;
        let outer_next = inner_current + 3;

        data.indices.push(inner_current);
        data.indices.push(outer_current);
        data.indices.push(inner_next);

        data.indices.push(outer_current);
        data.indices.push(outer_next);
        data.indices.push(inner_next);
    }

    data
}

/// Generate a two-vertex segment for a line-list mesh
pub fn generate_line(from: [f32; 3], to: [f32; 3]) -> GeometryData {
    let mut data = GeometryData::new();

    data.vertices = vec![from, to];
    // Normals are unused by the unlit line material but keep the vertex layout uniform
    data.normals = vec![[0.0, 1.0, 0.0], [0.0, 1.0, 0.0]];
    data.indices = vec![0, 1];

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let slab = generate_box(30.0, 0.2, 15.0);
        assert_eq!(slab.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(slab.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(slab.triangle_count(), 12);

        // Extents match the requested dimensions
        for v in &slab.vertices {
            assert!(v[0].abs() <= 15.0 + f32::EPSILON);
            assert!(v[1].abs() <= 0.1 + f32::EPSILON);
            assert!(v[2].abs() <= 7.5 + f32::EPSILON);
        }
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.24, 8, 6);
        assert!(sphere.vertices.len() > 0);
        assert!(sphere.indices.len() > 0);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());

        // Every vertex lies on the sphere surface
        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 0.24).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_generation() {
        let pole = generate_cylinder(0.15, 6.0, 16);
        // 2 verts per side step plus 2 cap centers
        assert_eq!(pole.vertices.len(), (16 + 1) * 2 + 2);
        // Side quads plus both caps
        assert_eq!(pole.indices.len() as u32, 16 * 6 + 16 * 3 * 2);

        for v in &pole.vertices {
            assert!(v[1].abs() <= 3.0 + f32::EPSILON);
        }
    }

    #[test]
    fn test_torus_lies_in_xy_plane() {
        let rim = generate_torus(0.23, 0.02, 16, 8);
        assert_eq!(rim.vertices.len(), (16 + 1) * (8 + 1));
        assert_eq!(rim.triangle_count(), 16 * 8 * 2);

        // Tube never leaves the xy plane by more than its own radius
        for v in &rim.vertices {
            assert!(v[2].abs() <= 0.02 + 1e-6);
        }
    }

    #[test]
    fn test_ring_full_and_half() {
        let circle = generate_ring(1.8, 2.0, 32, 0.0, 2.0 * PI);
        assert_eq!(circle.vertices.len(), (32 + 1) * 2);
        assert_eq!(circle.triangle_count(), 32 * 2);

        let arc = generate_ring(6.7, 6.9, 32, 0.0, PI);
        // Half ring stays in the upper half of the xy plane
        for v in &arc.vertices {
            assert!(v[1] >= -1e-5);
            let r = (v[0] * v[0] + v[1] * v[1]).sqrt();
            assert!(r >= 6.7 - 1e-4 && r <= 6.9 + 1e-4);
        }
    }

    #[test]
    fn test_line_generation() {
        let seg = generate_line([0.23, 0.0, 0.0], [0.13, -0.5, 0.0]);
        assert_eq!(seg.vertices.len(), 2);
        assert_eq!(seg.indices, vec![0, 1]);
    }
}
