//! Ray type and skew-line projection helpers

use crate::core::types::Vec3;

/// A ray defined by origin and direction (direction should be normalized)
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest point on the axis line to the ray (skew-line closest point).
///
/// Falls back to the axis origin when the lines are parallel, where no
/// unique closest point exists.
pub fn closest_point_on_axis(ray: &Ray, axis_origin: Vec3, axis_dir: Vec3) -> Vec3 {
    let n = axis_dir.cross(ray.direction);
    let n1 = ray.direction.cross(n);
    let denom = axis_dir.dot(n1);
    if denom.abs() < 1e-8 {
        return axis_origin;
    }
    axis_origin + (ray.origin - axis_origin).dot(n1) / denom * axis_dir
}

/// Nearest point on the ray to the axis line (skew-line closest point)
pub fn closest_point_on_ray(ray: &Ray, axis_origin: Vec3, axis_dir: Vec3) -> Vec3 {
    let n = axis_dir.cross(ray.direction);
    let n0 = axis_dir.cross(n);
    let denom = ray.direction.dot(n0);
    if denom.abs() < 1e-8 {
        return ray.origin;
    }
    ray.origin + (axis_origin - ray.origin).dot(n0) / denom * ray.direction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.at(3.0), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_closest_point_perpendicular() {
        // Ray along X at height y=1, axis along Z through the origin.
        // The closest point on the axis is the origin itself.
        let ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);
        let p = closest_point_on_axis(&ray, Vec3::ZERO, Vec3::Z);
        assert!(p.distance(Vec3::ZERO) < 1e-5);
    }

    #[test]
    fn test_closest_point_offset_axis() {
        // Axis along Y through (2, 0, 0); ray along X at y=3 passes over it.
        let ray = Ray::new(Vec3::new(-10.0, 3.0, 0.0), Vec3::X);
        let p = closest_point_on_axis(&ray, Vec3::new(2.0, 0.0, 0.0), Vec3::Y);
        assert!(p.distance(Vec3::new(2.0, 3.0, 0.0)) < 1e-5);
    }

    #[test]
    fn test_closest_point_on_ray_matches_axis_point_when_intersecting() {
        let ray = Ray::new(Vec3::new(-4.0, 2.0, 0.0), Vec3::X);
        let axis_origin = Vec3::new(1.0, 0.0, 0.0);
        let on_axis = closest_point_on_axis(&ray, axis_origin, Vec3::Y);
        let on_ray = closest_point_on_ray(&ray, axis_origin, Vec3::Y);
        // The lines intersect at (1, 2, 0), so both closest points coincide
        assert!(on_axis.distance(on_ray) < 1e-5);
        assert!(on_axis.distance(Vec3::new(1.0, 2.0, 0.0)) < 1e-5);
    }

    #[test]
    fn test_parallel_fallback() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        let p = closest_point_on_axis(&ray, Vec3::ZERO, Vec3::X);
        assert_eq!(p, Vec3::ZERO);
    }
}
