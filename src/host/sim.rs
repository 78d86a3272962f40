//! In-memory host simulator
//!
//! A minimal stand-in for the engine side of the host contracts: a dense
//! grid with a translation + uniform-scale pose, a DDA voxel raycast, a
//! grayscale palette and a recording debug-draw sink. Tests and benches
//! drive the editing core against these.

use crate::core::types::{IVec3, Quat, UVec3, Vec3, Vec4};
use crate::host::{DebugDraw, EditorHost, Palette, RaycastHit, ShapeId, VoxelShape};
use crate::math::ray::Ray;
use crate::voxel::face::FaceFlags;

/// Dense in-memory voxel shape
pub struct SimShape {
    id: ShapeId,
    dim: UVec3,
    data: Vec<u8>,
    /// World position of the grid's (0,0,0) corner
    pub origin: Vec3,
    /// World-space edge length of one voxel
    pub voxel_size: f32,
    voxelize_count: u32,
    snapshot_count: u32,
}

impl SimShape {
    pub fn new(id: u64, dim: UVec3) -> Self {
        Self {
            id: ShapeId(id),
            dim,
            data: vec![0; (dim.x * dim.y * dim.z) as usize],
            origin: Vec3::ZERO,
            voxel_size: 1.0,
            voxelize_count: 0,
            snapshot_count: 0,
        }
    }

    /// Shape with every voxel set to `value`
    pub fn filled(id: u64, dim: UVec3, value: u8) -> Self {
        let mut shape = Self::new(id, dim);
        shape.data.fill(value);
        shape
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn voxel(&self, coord: UVec3) -> u8 {
        self.grid().get(coord).unwrap_or(0)
    }

    pub fn set_voxel(&mut self, coord: UVec3, value: u8) {
        self.grid_mut().set(coord, value);
    }

    /// Number of voxelize requests issued so far
    pub fn voxelize_count(&self) -> u32 {
        self.voxelize_count
    }

    /// Number of snapshot commits issued so far
    pub fn snapshot_count(&self) -> u32 {
        self.snapshot_count
    }

    /// Count of solid (nonzero) voxels
    pub fn solid_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    fn sample(&self, cell: IVec3) -> u8 {
        self.grid().sample(cell)
    }
}

/// Slab intersection against the box [0, max]; returns entry/exit distances
/// and the axes that bound them
fn slab_intersect(o: Vec3, d: Vec3, max: Vec3) -> Option<(f32, f32, usize, usize)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = 0;
    let mut exit_axis = 0;

    for axis in 0..3 {
        if d[axis].abs() < 1e-12 {
            if o[axis] < 0.0 || o[axis] > max[axis] {
                return None;
            }
        } else {
            let t0 = -o[axis] / d[axis];
            let t1 = (max[axis] - o[axis]) / d[axis];
            let (lo, hi) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
            if lo > t_enter {
                t_enter = lo;
                enter_axis = axis;
            }
            if hi < t_exit {
                t_exit = hi;
                exit_axis = axis;
            }
        }
    }

    (t_enter <= t_exit).then_some((t_enter, t_exit, enter_axis, exit_axis))
}

fn axis_normal(axis: usize, sign: f32) -> Vec3 {
    let mut n = Vec3::ZERO;
    n[axis] = sign;
    n
}

impl VoxelShape for SimShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn dim(&self) -> UVec3 {
        self.dim
    }

    fn voxel_data(&self) -> &[u8] {
        &self.data
    }

    fn voxel_data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn voxelize(&mut self) {
        self.voxelize_count += 1;
    }

    fn commit_snapshot(&mut self) {
        self.snapshot_count += 1;
    }

    fn to_world_space(&self, local: Vec3) -> Vec3 {
        self.origin + local * self.voxel_size
    }

    fn to_local_space(&self, world: Vec3) -> Vec3 {
        (world - self.origin) / self.voxel_size
    }

    fn to_local_dir(&self, world_dir: Vec3) -> Vec3 {
        world_dir / self.voxel_size
    }

    fn to_local_coord(&self, world: Vec3) -> IVec3 {
        self.to_local_space(world).floor().as_ivec3()
    }

    fn world_orientation(&self) -> Quat {
        Quat::IDENTITY
    }

    fn voxel_world_size(&self) -> Vec3 {
        Vec3::splat(self.voxel_size)
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RaycastHit> {
        let o = self.to_local_space(ray.origin);
        let d = self.to_local_dir(ray.direction);
        if d.length_squared() < 1e-12 {
            return None;
        }
        let dim = self.dim.as_vec3();

        let (t_enter, t_exit, enter_axis, _) = slab_intersect(o, d, dim)?;
        if t_exit < 0.0 {
            return None;
        }

        // Amanatides-Woo grid walk from the entry point
        let mut t = t_enter.max(0.0);
        let start = o + d * t;
        let mut cell = start
            .floor()
            .as_ivec3()
            .clamp(IVec3::ZERO, self.dim.as_ivec3() - IVec3::ONE);

        let step = IVec3::new(
            d.x.signum() as i32,
            d.y.signum() as i32,
            d.z.signum() as i32,
        );
        let mut t_max = Vec3::INFINITY;
        let mut t_delta = Vec3::INFINITY;
        for axis in 0..3 {
            if d[axis].abs() > 1e-12 {
                let next_boundary = cell[axis] as f32 + if d[axis] > 0.0 { 1.0 } else { 0.0 };
                t_max[axis] = (next_boundary - o[axis]) / d[axis];
                t_delta[axis] = 1.0 / d[axis].abs();
            }
        }

        // Entry face normal; when starting inside, fall back to the
        // dominant ray axis
        let mut normal_axis = if t_enter >= 0.0 {
            enter_axis
        } else {
            let ad = d.abs();
            if ad.y > ad.x && ad.y > ad.z {
                1
            } else if ad.z > ad.x {
                2
            } else {
                0
            }
        };

        loop {
            if t > max_distance {
                return None;
            }
            if self.sample(cell) != 0 {
                let nl = axis_normal(normal_axis, -(d[normal_axis].signum()));
                return Some(RaycastHit {
                    coord: cell.as_uvec3(),
                    distance: t,
                    normal: nl,
                    normal_local: nl,
                });
            }

            let axis = if t_max.x <= t_max.y && t_max.x <= t_max.z {
                0
            } else if t_max.y <= t_max.z {
                1
            } else {
                2
            };
            cell[axis] += step[axis];
            t = t_max[axis];
            if t > t_exit || cell[axis] < 0 || cell[axis] >= self.dim[axis] as i32 {
                return None;
            }
            t_max[axis] += t_delta[axis];
            normal_axis = axis;
        }
    }

    fn raycast_bounds(
        &self,
        ray: &Ray,
        max_distance: f32,
        flip_winding: bool,
    ) -> Option<RaycastHit> {
        let o = self.to_local_space(ray.origin);
        let d = self.to_local_dir(ray.direction);
        let dim = self.dim.as_vec3();

        let (t_enter, t_exit, enter_axis, exit_axis) = slab_intersect(o, d, dim)?;
        if t_exit < 0.0 {
            return None;
        }

        let (t, axis) = if flip_winding {
            (t_exit, exit_axis)
        } else {
            (t_enter.max(0.0), enter_axis)
        };
        if t > max_distance {
            return None;
        }

        // Nudge the sample point just inside the box
        let p = if flip_winding {
            o + d * t - d * 1e-4
        } else {
            o + d * t + d * 1e-4
        };
        let cell = p
            .floor()
            .as_ivec3()
            .clamp(IVec3::ZERO, self.dim.as_ivec3() - IVec3::ONE);

        let nl = axis_normal(axis, -(d[axis].signum()));
        Some(RaycastHit {
            coord: cell.as_uvec3(),
            distance: t,
            normal: nl,
            normal_local: nl,
        })
    }
}

/// Fixed-table palette
pub struct SimPalette {
    colors: Vec<Vec4>,
}

impl SimPalette {
    /// 255 grayscale entries
    pub fn grayscale() -> Self {
        Self {
            colors: (0..255)
                .map(|i| {
                    let v = i as f32 / 254.0;
                    Vec4::new(v, v, v, 1.0)
                })
                .collect(),
        }
    }

    pub fn from_colors(colors: Vec<Vec4>) -> Self {
        Self { colors }
    }
}

impl Palette for SimPalette {
    fn color(&self, index: u8) -> Vec4 {
        self.colors
            .get(index as usize)
            .copied()
            .unwrap_or(Vec4::new(0.5, 0.5, 0.5, 1.0))
    }
}

/// One recorded debug-draw call
#[derive(Clone, Copy, Debug)]
pub struct DrawCall {
    pub center: Vec3,
    pub extent: Vec3,
    pub color: Vec4,
    pub always_in_front: bool,
    pub faces: FaceFlags,
}

/// Debug-draw sink that records every call
#[derive(Default)]
pub struct DrawLog {
    pub boxes: Vec<DrawCall>,
    pub solid_boxes: Vec<DrawCall>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.solid_boxes.clear();
    }
}

impl DebugDraw for DrawLog {
    fn draw_box(
        &mut self,
        center: Vec3,
        _orientation: Quat,
        extent: Vec3,
        color: Vec4,
        always_in_front: bool,
        faces: FaceFlags,
    ) {
        self.boxes.push(DrawCall {
            center,
            extent,
            color,
            always_in_front,
            faces,
        });
    }

    fn draw_solid_box(
        &mut self,
        center: Vec3,
        _orientation: Quat,
        extent: Vec3,
        color: Vec4,
        always_in_front: bool,
        faces: FaceFlags,
    ) {
        self.solid_boxes.push(DrawCall {
            center,
            extent,
            color,
            always_in_front,
            faces,
        });
    }
}

/// Editor host that records undo/redo registration labels
#[derive(Default)]
pub struct SimEditor {
    pub states: Vec<(String, ShapeId)>,
}

impl SimEditor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditorHost for SimEditor {
    fn push_undo_redo_state(&mut self, label: &str, shape: ShapeId, _skip_serialization: bool) {
        self.states.push((label.to_string(), shape));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raycast_hits_first_solid() {
        let mut shape = SimShape::new(1, UVec3::new(8, 8, 8));
        shape.set_voxel(UVec3::new(3, 4, 4), 7);
        shape.set_voxel(UVec3::new(5, 4, 4), 9);

        // Ray along +X at the center of row y=4, z=4
        let ray = Ray::new(Vec3::new(-2.0, 4.5, 4.5), Vec3::X);
        let hit = shape.raycast(&ray, f32::MAX).expect("should hit");
        assert_eq!(hit.coord, UVec3::new(3, 4, 4));
        assert_eq!(hit.normal_local, Vec3::new(-1.0, 0.0, 0.0));
        assert!((hit.distance - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_raycast_misses_empty_row() {
        let mut shape = SimShape::new(1, UVec3::new(8, 8, 8));
        shape.set_voxel(UVec3::new(3, 4, 4), 7);

        let ray = Ray::new(Vec3::new(-2.0, 6.5, 6.5), Vec3::X);
        assert!(shape.raycast(&ray, f32::MAX).is_none());
    }

    #[test]
    fn test_raycast_from_above() {
        let mut shape = SimShape::new(1, UVec3::new(8, 8, 8));
        shape.set_voxel(UVec3::new(2, 3, 2), 1);

        let ray = Ray::new(Vec3::new(2.5, 20.0, 2.5), Vec3::NEG_Y);
        let hit = shape.raycast(&ray, f32::MAX).expect("should hit");
        assert_eq!(hit.coord, UVec3::new(2, 3, 2));
        assert_eq!(hit.normal_local, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let mut shape = SimShape::new(1, UVec3::new(8, 8, 8));
        shape.set_voxel(UVec3::new(3, 4, 4), 7);

        let ray = Ray::new(Vec3::new(-2.0, 4.5, 4.5), Vec3::X);
        assert!(shape.raycast(&ray, 2.0).is_none());
    }

    #[test]
    fn test_raycast_bounds_entry_and_exit() {
        let shape = SimShape::new(1, UVec3::new(4, 4, 4));
        let ray = Ray::new(Vec3::new(-3.0, 1.5, 1.5), Vec3::X);

        let front = shape.raycast_bounds(&ray, f32::MAX, false).expect("entry");
        assert_eq!(front.coord, UVec3::new(0, 1, 1));
        assert_eq!(front.normal_local, Vec3::new(-1.0, 0.0, 0.0));

        let back = shape.raycast_bounds(&ray, f32::MAX, true).expect("exit");
        assert_eq!(back.coord, UVec3::new(3, 1, 1));
    }

    #[test]
    fn test_transform_roundtrip() {
        let shape = SimShape::new(1, UVec3::new(4, 4, 4)).with_origin(Vec3::new(10.0, 0.0, -5.0));
        let local = Vec3::new(1.5, 2.5, 3.5);
        let world = shape.to_world_space(local);
        assert!(shape.to_local_space(world).distance(local) < 1e-6);
        assert_eq!(shape.to_local_coord(world), IVec3::new(1, 2, 3));
    }
}
