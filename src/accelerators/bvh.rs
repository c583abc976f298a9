//! Bounding volume hierarchy over primitives.
//!
//! The tree is built recursively into a **typed_arena** and then
//! flattened depth-first into a vector of **LinearBVHNode**s: the
//! first child of an interior node directly follows it, the second
//! child is referenced by index. Traversal walks that array with an
//! explicit stack, visiting the near child first.

// std
use std::cmp::Ordering;
use std::sync::Arc;
// others
use clap::ValueEnum;
use log::{debug, info};
use rayon::prelude::*;
use smallvec::SmallVec;
use strum_macros::{Display, EnumIter, EnumString};
use typed_arena::Arena;
// pbrt
use crate::core::geometry::{bnd3_union_bnd3f, bnd3_union_pnt3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::Float;
use crate::core::primitive::Primitive;

const N_BUCKETS: usize = 12;
// inline capacity of the traversal stack; deeper trees spill to the heap
const MAX_TODO: usize = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, EnumIter, ValueEnum)]
pub enum SplitMethod {
    /// Surface area heuristic over 12 buckets
    #[strum(serialize = "sah")]
    #[value(name = "sah")]
    SAH,
    /// Split the centroid bounds in half
    #[strum(serialize = "middle")]
    #[value(name = "middle")]
    Middle,
    /// Split into two halves with the same number of primitives
    #[strum(serialize = "equal")]
    #[value(name = "equal")]
    EqualCounts,
}

impl Default for SplitMethod {
    fn default() -> Self {
        SplitMethod::SAH
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct BVHPrimitiveInfo {
    primitive_number: usize,
    bounds: Bounds3f,
    centroid: Point3f,
}

impl BVHPrimitiveInfo {
    pub fn new(primitive_number: usize, bounds: Bounds3f) -> Self {
        BVHPrimitiveInfo {
            primitive_number,
            bounds,
            centroid: bounds.p_min * 0.5 + bounds.p_max * 0.5,
        }
    }
}

#[derive(Debug)]
pub struct BVHBuildNode<'a> {
    pub bounds: Bounds3f,
    pub child1: Option<&'a BVHBuildNode<'a>>,
    pub child2: Option<&'a BVHBuildNode<'a>>,
    pub split_axis: u8,
    pub first_prim_offset: usize,
    pub n_primitives: usize,
}

impl<'a> BVHBuildNode<'a> {
    fn leaf(first: usize, n: usize, b: &Bounds3f) -> Self {
        BVHBuildNode {
            bounds: *b,
            child1: None,
            child2: None,
            split_axis: 0_u8,
            first_prim_offset: first,
            n_primitives: n,
        }
    }
    fn interior(axis: u8, c0: &'a BVHBuildNode<'a>, c1: &'a BVHBuildNode<'a>) -> Self {
        BVHBuildNode {
            bounds: bnd3_union_bnd3f(&c0.bounds, &c1.bounds),
            child1: Some(c0),
            child2: Some(c1),
            split_axis: axis,
            first_prim_offset: 0_usize,
            n_primitives: 0_usize,
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
struct BucketInfo {
    count: usize,
    bounds: Bounds3f,
}

#[derive(Debug, Default, Copy, Clone)]
pub struct LinearBVHNode {
    bounds: Bounds3f,
    /// first primitive (leaf) or second child (interior)
    offset: usize,
    n_primitives: usize,
    axis: u8,
}

pub struct BVHAccel {
    max_prims_in_node: usize,
    split_method: SplitMethod,
    pub primitives: Vec<Arc<Primitive>>,
    pub nodes: Vec<LinearBVHNode>,
}

/// Move the elements matching `pred` to the front of `v` and return
/// how many there are.
fn partition_in_place<T, P>(v: &mut [T], pred: P) -> usize
where
    P: Fn(&T) -> bool,
{
    let mut first: usize = 0;
    for i in 0..v.len() {
        if pred(&v[i]) {
            v.swap(first, i);
            first += 1;
        }
    }
    first
}

impl BVHAccel {
    pub fn new(p: Vec<Arc<Primitive>>, max_prims_in_node: usize, split_method: SplitMethod) -> Self {
        let max_prims_in_node: usize = max_prims_in_node.max(1).min(255);
        let num_prims: usize = p.len();
        if num_prims == 0 {
            debug!("BVH without primitives");
            return BVHAccel {
                max_prims_in_node,
                split_method,
                primitives: p,
                nodes: Vec::new(),
            };
        }
        let mut primitive_info: Vec<BVHPrimitiveInfo> = p
            .par_iter()
            .enumerate()
            .map(|(i, prim)| BVHPrimitiveInfo::new(i, prim.world_bound()))
            .collect();
        let arena: Arena<BVHBuildNode> = Arena::with_capacity(2 * num_prims);
        let mut total_nodes: usize = 0;
        let mut ordered_prims: Vec<Arc<Primitive>> = Vec::with_capacity(num_prims);
        let root: &BVHBuildNode = BVHAccel::recursive_build(
            &p,
            max_prims_in_node,
            split_method,
            &arena,
            &mut primitive_info,
            0,
            num_prims,
            &mut total_nodes,
            &mut ordered_prims,
        );
        let mut nodes: Vec<LinearBVHNode> = vec![LinearBVHNode::default(); total_nodes];
        let mut offset: usize = 0;
        BVHAccel::flatten_bvh_tree(root, &mut nodes, &mut offset);
        debug_assert_eq!(offset, total_nodes);
        info!(
            "BVH ({}) created with {} nodes for {} primitives",
            split_method, total_nodes, num_prims
        );
        BVHAccel {
            max_prims_in_node,
            split_method,
            primitives: ordered_prims,
            nodes,
        }
    }
    pub fn get_max_prims_in_node(&self) -> usize {
        self.max_prims_in_node
    }
    pub fn get_split_method(&self) -> SplitMethod {
        self.split_method
    }
    fn create_leaf<'a>(
        primitives: &[Arc<Primitive>],
        arena: &'a Arena<BVHBuildNode<'a>>,
        primitive_info: &[BVHPrimitiveInfo],
        bounds: &Bounds3f,
        ordered_prims: &mut Vec<Arc<Primitive>>,
    ) -> &'a BVHBuildNode<'a> {
        let first_prim_offset: usize = ordered_prims.len();
        for info in primitive_info {
            ordered_prims.push(primitives[info.primitive_number].clone());
        }
        arena.alloc(BVHBuildNode::leaf(
            first_prim_offset,
            primitive_info.len(),
            bounds,
        ))
    }
    #[allow(clippy::too_many_arguments)]
    fn recursive_build<'a>(
        primitives: &[Arc<Primitive>],
        max_prims_in_node: usize,
        split_method: SplitMethod,
        arena: &'a Arena<BVHBuildNode<'a>>,
        primitive_info: &mut Vec<BVHPrimitiveInfo>,
        start: usize,
        end: usize,
        total_nodes: &mut usize,
        ordered_prims: &mut Vec<Arc<Primitive>>,
    ) -> &'a BVHBuildNode<'a> {
        debug_assert!(start < end);
        *total_nodes += 1_usize;
        // compute bounds of all primitives in BVH node
        let bounds: Bounds3f = primitive_info[start..end]
            .iter()
            .fold(Bounds3f::default(), |b, info| bnd3_union_bnd3f(&b, &info.bounds));
        let n_primitives: usize = end - start;
        if n_primitives == 1 {
            return BVHAccel::create_leaf(
                primitives,
                arena,
                &primitive_info[start..end],
                &bounds,
                ordered_prims,
            );
        }
        // compute bound of primitive centroids, choose split dimension
        let centroid_bounds: Bounds3f = primitive_info[start..end]
            .iter()
            .fold(Bounds3f::default(), |b, info| bnd3_union_pnt3f(&b, &info.centroid));
        let dim: XYZEnum = centroid_bounds.maximum_extent();
        if centroid_bounds.p_max[dim] == centroid_bounds.p_min[dim] {
            // all centroids coincide, nothing to split
            return BVHAccel::create_leaf(
                primitives,
                arena,
                &primitive_info[start..end],
                &bounds,
                ordered_prims,
            );
        }
        let mut mid: usize = (start + end) / 2;
        let mut equal_counts: bool = false;
        match split_method {
            SplitMethod::Middle => {
                let pmid: Float = (centroid_bounds.p_min[dim] + centroid_bounds.p_max[dim]) / 2.0;
                mid = start
                    + partition_in_place(&mut primitive_info[start..end], |pi| {
                        pi.centroid[dim] < pmid
                    });
                if mid == start || mid == end {
                    equal_counts = true;
                }
            }
            SplitMethod::EqualCounts => {
                equal_counts = true;
            }
            SplitMethod::SAH => {
                if n_primitives <= 2 {
                    equal_counts = true;
                } else {
                    let bucket_of = |centroid: &Point3f| -> usize {
                        let b: usize =
                            (N_BUCKETS as Float * centroid_bounds.offset(centroid)[dim]) as usize;
                        b.min(N_BUCKETS - 1)
                    };
                    let mut buckets: [BucketInfo; N_BUCKETS] = [BucketInfo::default(); N_BUCKETS];
                    for info in &primitive_info[start..end] {
                        let b: usize = bucket_of(&info.centroid);
                        buckets[b].count += 1;
                        buckets[b].bounds = bnd3_union_bnd3f(&buckets[b].bounds, &info.bounds);
                    }
                    // cost of splitting after each bucket
                    let mut cost: [Float; N_BUCKETS - 1] = [0.0; N_BUCKETS - 1];
                    for (i, c) in cost.iter_mut().enumerate() {
                        let mut b0: Bounds3f = Bounds3f::default();
                        let mut b1: Bounds3f = Bounds3f::default();
                        let mut count0: usize = 0;
                        let mut count1: usize = 0;
                        for bucket in &buckets[..=i] {
                            b0 = bnd3_union_bnd3f(&b0, &bucket.bounds);
                            count0 += bucket.count;
                        }
                        for bucket in &buckets[(i + 1)..] {
                            b1 = bnd3_union_bnd3f(&b1, &bucket.bounds);
                            count1 += bucket.count;
                        }
                        *c = 1.0
                            + (count0 as Float * b0.surface_area()
                                + count1 as Float * b1.surface_area())
                                / bounds.surface_area();
                    }
                    // bucket to split at that minimizes the SAH metric
                    let mut min_cost: Float = cost[0];
                    let mut min_cost_split_bucket: usize = 0;
                    for (i, c) in cost.iter().enumerate().skip(1) {
                        if *c < min_cost {
                            min_cost = *c;
                            min_cost_split_bucket = i;
                        }
                    }
                    let leaf_cost: Float = n_primitives as Float;
                    if n_primitives > max_prims_in_node || min_cost < leaf_cost {
                        mid = start
                            + partition_in_place(&mut primitive_info[start..end], |pi| {
                                bucket_of(&pi.centroid) <= min_cost_split_bucket
                            });
                        if mid == start || mid == end {
                            equal_counts = true;
                        }
                    } else {
                        return BVHAccel::create_leaf(
                            primitives,
                            arena,
                            &primitive_info[start..end],
                            &bounds,
                            ordered_prims,
                        );
                    }
                }
            }
        }
        if equal_counts {
            mid = (start + end) / 2;
            primitive_info[start..end].select_nth_unstable_by(mid - start, |a, b| {
                a.centroid[dim]
                    .partial_cmp(&b.centroid[dim])
                    .unwrap_or(Ordering::Equal)
            });
        }
        let c0: &BVHBuildNode = BVHAccel::recursive_build(
            primitives,
            max_prims_in_node,
            split_method,
            arena,
            primitive_info,
            start,
            mid,
            total_nodes,
            ordered_prims,
        );
        let c1: &BVHBuildNode = BVHAccel::recursive_build(
            primitives,
            max_prims_in_node,
            split_method,
            arena,
            primitive_info,
            mid,
            end,
            total_nodes,
            ordered_prims,
        );
        arena.alloc(BVHBuildNode::interior(dim as u8, c0, c1))
    }
    fn flatten_bvh_tree(node: &BVHBuildNode, nodes: &mut Vec<LinearBVHNode>, offset: &mut usize) -> usize {
        let my_offset: usize = *offset;
        *offset += 1;
        match (node.child1, node.child2) {
            (Some(child1), Some(child2)) => {
                BVHAccel::flatten_bvh_tree(child1, nodes, offset);
                let second_child_offset: usize = BVHAccel::flatten_bvh_tree(child2, nodes, offset);
                nodes[my_offset] = LinearBVHNode {
                    bounds: node.bounds,
                    offset: second_child_offset,
                    n_primitives: 0_usize,
                    axis: node.split_axis,
                };
            }
            _ => {
                nodes[my_offset] = LinearBVHNode {
                    bounds: node.bounds,
                    offset: node.first_prim_offset,
                    n_primitives: node.n_primitives,
                    axis: 0_u8,
                };
            }
        }
        my_offset
    }
    pub fn world_bound(&self) -> Bounds3f {
        if let Some(root) = self.nodes.first() {
            root.bounds
        } else {
            Bounds3f::default()
        }
    }
    fn ray_setup(ray: &Ray) -> (Vector3f, [usize; 3]) {
        let inv_dir: Vector3f = Vector3f {
            x: 1.0 / ray.d.x,
            y: 1.0 / ray.d.y,
            z: 1.0 / ray.d.z,
        };
        let dir_is_neg: [usize; 3] = [
            (inv_dir.x < 0.0) as usize,
            (inv_dir.y < 0.0) as usize,
            (inv_dir.z < 0.0) as usize,
        ];
        (inv_dir, dir_is_neg)
    }
    /// Nearest hit; every primitive hit shrinks `ray.t_max`, which
    /// prunes all nodes further away.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        if self.nodes.is_empty() {
            return None;
        }
        let (inv_dir, dir_is_neg) = BVHAccel::ray_setup(ray);
        let mut si: Option<SurfaceInteraction> = None;
        let mut current_node_index: usize = 0;
        let mut nodes_to_visit: SmallVec<[usize; MAX_TODO]> = SmallVec::new();
        loop {
            let node: &LinearBVHNode = &self.nodes[current_node_index];
            if node.bounds.intersect_p(ray, &inv_dir, &dir_is_neg) {
                if node.n_primitives > 0 {
                    for i in 0..node.n_primitives {
                        if let Some(isect) = self.primitives[node.offset + i].intersect(ray) {
                            si = Some(isect);
                        }
                    }
                    match nodes_to_visit.pop() {
                        Some(next) => current_node_index = next,
                        None => break,
                    }
                } else if dir_is_neg[node.axis as usize] == 1 {
                    // put far node on the stack, advance to near node
                    nodes_to_visit.push(current_node_index + 1);
                    current_node_index = node.offset;
                } else {
                    nodes_to_visit.push(node.offset);
                    current_node_index += 1;
                }
            } else {
                match nodes_to_visit.pop() {
                    Some(next) => current_node_index = next,
                    None => break,
                }
            }
        }
        si
    }
    /// Any hit; returns as soon as one is confirmed.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let (inv_dir, dir_is_neg) = BVHAccel::ray_setup(ray);
        let mut current_node_index: usize = 0;
        let mut nodes_to_visit: SmallVec<[usize; MAX_TODO]> = SmallVec::new();
        loop {
            let node: &LinearBVHNode = &self.nodes[current_node_index];
            if node.bounds.intersect_p(ray, &inv_dir, &dir_is_neg) {
                if node.n_primitives > 0 {
                    for i in 0..node.n_primitives {
                        if self.primitives[node.offset + i].intersect_p(ray) {
                            return true;
                        }
                    }
                    match nodes_to_visit.pop() {
                        Some(next) => current_node_index = next,
                        None => break,
                    }
                } else if dir_is_neg[node.axis as usize] == 1 {
                    nodes_to_visit.push(current_node_index + 1);
                    current_node_index = node.offset;
                } else {
                    nodes_to_visit.push(node.offset);
                    current_node_index += 1;
                }
            } else {
                match nodes_to_visit.pop() {
                    Some(next) => current_node_index = next,
                    None => break,
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vector3f;
    use crate::core::primitive::GeometricPrimitive;
    use crate::core::rng::Rng;
    use crate::core::transform::Transform;
    use crate::shapes::sphere::Sphere;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    fn random_spheres(n: usize, rng: &mut Rng) -> Vec<Arc<Primitive>> {
        (0..n)
            .map(|_| {
                let center: Vector3f = Vector3f {
                    x: 20.0 * rng.uniform_float() - 10.0,
                    y: 20.0 * rng.uniform_float() - 10.0,
                    z: 20.0 * rng.uniform_float() - 10.0,
                };
                let radius: Float = 0.2 + rng.uniform_float();
                let o2w: Transform = Transform::translate(&center);
                let sphere: Sphere =
                    Sphere::full(Arc::new(o2w), Arc::new(o2w.inverse()), false, radius).unwrap();
                Arc::new(Primitive::Geometric(Box::new(GeometricPrimitive::new(
                    Arc::new(sphere),
                    None,
                    None,
                ))))
            })
            .collect()
    }

    fn random_ray(rng: &mut Rng) -> Ray {
        let o: Point3f = Point3f {
            x: 30.0 * rng.uniform_float() - 15.0,
            y: 30.0 * rng.uniform_float() - 15.0,
            z: 30.0 * rng.uniform_float() - 15.0,
        };
        let target: Point3f = Point3f {
            x: 10.0 * rng.uniform_float() - 5.0,
            y: 10.0 * rng.uniform_float() - 5.0,
            z: 10.0 * rng.uniform_float() - 5.0,
        };
        Ray::new(o, (target - o).normalize())
    }

    fn brute_force<'a>(prims: &'a [Arc<Primitive>], ray: &Ray) -> Option<SurfaceInteraction<'a>> {
        let mut nearest: Option<SurfaceInteraction> = None;
        for p in prims {
            if let Some(isect) = p.intersect(ray) {
                nearest = Some(isect);
            }
        }
        nearest
    }

    #[test]
    fn empty_bvh_has_no_hits() {
        let bvh: BVHAccel = BVHAccel::new(Vec::new(), 4, SplitMethod::SAH);
        assert!(bvh.world_bound().is_empty());
        let mut rng: Rng = Rng::default();
        let ray: Ray = random_ray(&mut rng);
        assert!(bvh.intersect(&ray).is_none());
        assert!(!bvh.intersect_p(&ray));
    }

    #[test]
    fn max_prims_is_clamped() {
        let mut rng: Rng = Rng::default();
        let bvh: BVHAccel = BVHAccel::new(random_spheres(3, &mut rng), 1000, SplitMethod::Middle);
        assert_eq!(bvh.get_max_prims_in_node(), 255);
    }

    #[test]
    fn matches_brute_force_for_every_split_method() {
        let mut rng: Rng = Rng::new(7);
        let prims: Vec<Arc<Primitive>> = random_spheres(100, &mut rng);
        for split_method in SplitMethod::iter() {
            let bvh: BVHAccel = BVHAccel::new(prims.clone(), 4, split_method);
            assert_eq!(bvh.primitives.len(), prims.len());
            for _ in 0..300 {
                let ray: Ray = random_ray(&mut rng);
                let bvh_ray: Ray = ray.clone();
                let brute_ray: Ray = ray.clone();
                let expected = brute_force(&prims, &brute_ray);
                let found = bvh.intersect(&bvh_ray);
                assert_eq!(found.is_some(), expected.is_some(), "{:?}", split_method);
                assert_eq!(bvh.intersect_p(&ray), expected.is_some());
                if let (Some(found), Some(expected)) = (found, expected) {
                    assert_relative_eq!(bvh_ray.t_max.get(), brute_ray.t_max.get(), epsilon = 1e-4);
                    let same: bool = match (found.primitive, expected.primitive) {
                        (Some(a), Some(b)) => std::ptr::eq(a, b),
                        _ => false,
                    };
                    assert!(same, "{:?}", split_method);
                }
            }
        }
    }

    #[test]
    fn node_count_matches_tree() {
        let mut rng: Rng = Rng::new(3);
        let prims: Vec<Arc<Primitive>> = random_spheres(37, &mut rng);
        let bvh: BVHAccel = BVHAccel::new(prims, 1, SplitMethod::EqualCounts);
        // every leaf holds exactly one primitive, so the tree is full
        assert_eq!(bvh.nodes.len(), 2 * 37 - 1);
        let b: Bounds3f = bvh.world_bound();
        for p in &bvh.primitives {
            let pb: Bounds3f = p.world_bound();
            assert!(pb.p_min.x >= b.p_min.x && pb.p_max.z <= b.p_max.z);
        }
    }

    #[test]
    fn deep_middle_split_tree_is_traversable() {
        // exponentially spaced centroids turn middle splits into a chain
        let prims: Vec<Arc<Primitive>> = (0..150)
            .map(|i| {
                let center: Vector3f = Vector3f {
                    x: 1.0 + (1.7 as Float).powi(i),
                    y: 0.0,
                    z: 0.0,
                };
                let o2w: Transform = Transform::translate(&center);
                let sphere: Sphere =
                    Sphere::full(Arc::new(o2w), Arc::new(o2w.inverse()), false, 0.2).unwrap();
                Arc::new(Primitive::Geometric(Box::new(GeometricPrimitive::new(
                    Arc::new(sphere),
                    None,
                    None,
                ))))
            })
            .collect();
        let bvh: BVHAccel = BVHAccel::new(prims, 1, SplitMethod::Middle);
        assert_eq!(bvh.nodes.len(), 2 * 150 - 1);
        let ray: Ray = Ray::new(
            Point3f::default(),
            Vector3f {
                x: 1.0,
                y: 0.0,
                z: 0.0,
            },
        );
        assert!(bvh.intersect(&ray).is_some());
        // the first sphere sits at x = 2
        assert_relative_eq!(ray.t_max.get(), 1.8, epsilon = 1e-4);
        assert!(bvh.intersect_p(&ray));
    }
}
