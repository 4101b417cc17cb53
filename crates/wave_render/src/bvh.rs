//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in a flat arena and reference children and primitives by
//! index, so the tree is a pair of plain vectors that every render thread
//! can read without synchronization. Built once, never mutated afterwards.

use std::ops::AddAssign;

use wave_core::Primitive;
use wave_math::{Aabb, Ray, Vec3};

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::hit::HitRecord;

/// Maximum primitives per leaf node before splitting.
pub const LEAF_MAX_SIZE: usize = 4;

/// Traversal stack size. Median splits halve the primitive count at every
/// level, so 64 covers any scene that fits in memory.
const STACK_SIZE: usize = 64;

/// BVH node - either a branch with two children or a leaf with primitives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNode {
    /// Internal node; children are arena indices.
    Branch { bbox: Aabb, left: u32, right: u32 },
    /// Leaf covering `count` entries of the primitive index list from `first`.
    Leaf { bbox: Aabb, first: u32, count: u32 },
}

impl BvhNode {
    /// Bounds of everything below this node.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Branch { bbox, .. } | BvhNode::Leaf { bbox, .. } => *bbox,
        }
    }
}

/// Work counters for one or more traversals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    pub nodes_visited: u64,
    pub primitives_tested: u64,
}

impl AddAssign for TraversalStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes_visited += other.nodes_visited;
        self.primitives_tested += other.primitives_tested;
    }
}

impl std::ops::Add for TraversalStats {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

/// Centroid and bounds of one primitive during construction.
struct PrimitiveInfo {
    index: u32,
    bbox: Aabb,
    centroid: Vec3,
}

/// Flat-array BVH over a subset of the scene's primitives.
#[derive(Debug, Clone)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitive_indices: Vec<u32>,
}

impl Bvh {
    /// Build a BVH over the listed primitive indices.
    ///
    /// Returns `None` if `indices` is empty.
    pub fn build(primitives: &[Primitive], indices: &[u32]) -> Option<Self> {
        if indices.is_empty() {
            return None;
        }

        let mut infos: Vec<PrimitiveInfo> = indices
            .iter()
            .map(|&index| {
                let bbox = primitives[index as usize].bounding_box();
                PrimitiveInfo {
                    index,
                    bbox,
                    centroid: bbox.centroid(),
                }
            })
            .collect();

        let mut bvh = Self {
            nodes: Vec::with_capacity(2 * infos.len()),
            primitive_indices: Vec::with_capacity(infos.len()),
        };
        bvh.build_recursive(&mut infos);
        Some(bvh)
    }

    /// Recursive construction; returns the arena index of the new node.
    ///
    /// Simple median-split approach: sort primitives by centroid on the
    /// longest axis of the centroid bounds, split in half, recurse.
    fn build_recursive(&mut self, infos: &mut [PrimitiveInfo]) -> u32 {
        let node_index = self.nodes.len() as u32;

        // Bounds of all primitives in this subtree
        let bounds = infos
            .iter()
            .fold(infos[0].bbox, |acc, info| Aabb::surrounding(&acc, &info.bbox));

        // Create leaf for small sets
        if infos.len() <= LEAF_MAX_SIZE {
            let first = self.primitive_indices.len() as u32;
            self.primitive_indices.extend(infos.iter().map(|info| info.index));
            self.nodes.push(BvhNode::Leaf {
                bbox: bounds,
                first,
                count: infos.len() as u32,
            });
            return node_index;
        }

        // Choose split axis based on centroid spread
        let mut centroid_bounds = Aabb::EMPTY;
        for info in infos.iter() {
            centroid_bounds.grow_point(info.centroid);
        }
        let axis = centroid_bounds.longest_axis();

        infos.sort_by(|a, b| {
            a.centroid[axis]
                .partial_cmp(&b.centroid[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });

        // Placeholder until both children exist
        self.nodes.push(BvhNode::Branch {
            bbox: bounds,
            left: 0,
            right: 0,
        });

        let mid = infos.len() / 2;
        let (left_infos, right_infos) = infos.split_at_mut(mid);
        let left = self.build_recursive(left_infos);
        let right = self.build_recursive(right_infos);

        self.nodes[node_index as usize] = BvhNode::Branch {
            bbox: bounds,
            left,
            right,
        };
        node_index
    }

    /// The node arena; index 0 is the root.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Primitive indices in leaf order.
    pub fn primitive_indices(&self) -> &[u32] {
        &self.primitive_indices
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, BvhNode::Leaf { .. }))
            .count()
    }

    /// Closest hit along `ray`.
    ///
    /// With `prune` set, subtrees whose box the ray misses (or only reaches
    /// beyond the current closest hit) are skipped. Without it every node is
    /// visited, which degrades to a linear scan over the leaves but returns
    /// the same hit.
    pub fn intersect(
        &self,
        primitives: &[Primitive],
        ray: &Ray,
        prune: bool,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord> {
        let mut closest_t = ray.interval.max;
        let mut closest = None;

        let mut stack = [0u32; STACK_SIZE];
        let mut stack_ptr = 1usize;

        while stack_ptr > 0 {
            stack_ptr -= 1;
            let node = &self.nodes[stack[stack_ptr] as usize];
            stats.nodes_visited += 1;

            if prune && !node.bounding_box().hit(ray, ray.interval.with_max(closest_t)) {
                continue;
            }

            match *node {
                BvhNode::Leaf { first, count, .. } => {
                    let range = first as usize..(first + count) as usize;
                    for &index in &self.primitive_indices[range] {
                        stats.primitives_tested += 1;
                        let primitive = &primitives[index as usize];
                        if let Some(surface) =
                            primitive.intersect(ray, ray.interval.with_max(closest_t))
                        {
                            closest_t = surface.t;
                            closest = Some(HitRecord::new(
                                ray,
                                surface,
                                index,
                                primitive.material() as u32,
                            ));
                        }
                    }
                }
                BvhNode::Branch { left, right, .. } => {
                    // Left is popped first so ties resolve the same way every time
                    stack[stack_ptr] = right;
                    stack[stack_ptr + 1] = left;
                    stack_ptr += 2;
                }
            }
        }

        closest
    }
}

/// Spatial index used by the intersection stage.
#[derive(Debug, Clone)]
pub enum Accelerator {
    /// BVH traversal.
    Bvh {
        bvh: Bvh,
        prune: bool,
        /// Degenerate primitives left out at build
        excluded: usize,
    },
    /// Exhaustive scan, optionally rejecting primitives by bounding box first.
    Linear {
        indices: Vec<u32>,
        prune: bool,
        excluded: usize,
    },
}

impl Accelerator {
    /// Build the accelerator the config asks for.
    ///
    /// Degenerate primitives are excluded with a warning. Fails with
    /// [`RenderError::EmptyScene`] if nothing usable remains.
    pub fn build(primitives: &[Primitive], config: &RenderConfig) -> RenderResult<Self> {
        let mut usable = Vec::with_capacity(primitives.len());
        for (index, primitive) in primitives.iter().enumerate() {
            if primitive.is_degenerate() {
                log::warn!(
                    "Excluding degenerate primitive {}: {:?}",
                    index,
                    primitive.shape()
                );
            } else {
                usable.push(index as u32);
            }
        }

        let excluded = primitives.len() - usable.len();
        if usable.is_empty() {
            return Err(RenderError::EmptyScene);
        }

        let prune = config.aabb_pruning;
        if config.use_bvh {
            let bvh = Bvh::build(primitives, &usable).ok_or(RenderError::EmptyScene)?;
            log::info!(
                "Built BVH: {} primitives ({} excluded), {} nodes, {} leaves",
                usable.len(),
                excluded,
                bvh.nodes().len(),
                bvh.leaf_count()
            );
            Ok(Accelerator::Bvh {
                bvh,
                prune,
                excluded,
            })
        } else {
            log::info!(
                "Using linear scan: {} primitives ({} excluded), aabb pruning {}",
                usable.len(),
                excluded,
                prune
            );
            Ok(Accelerator::Linear {
                indices: usable,
                prune,
                excluded,
            })
        }
    }

    /// Number of primitives that can be hit.
    pub fn primitive_count(&self) -> usize {
        match self {
            Accelerator::Bvh { bvh, .. } => bvh.primitive_indices().len(),
            Accelerator::Linear { indices, .. } => indices.len(),
        }
    }

    /// Number of degenerate primitives excluded at build.
    pub fn excluded_count(&self) -> usize {
        match self {
            Accelerator::Bvh { excluded, .. } | Accelerator::Linear { excluded, .. } => *excluded,
        }
    }

    /// Closest hit strictly inside the ray's interval, or `None` on a miss.
    pub fn intersect(&self, primitives: &[Primitive], ray: &Ray) -> Option<HitRecord> {
        self.intersect_with_stats(primitives, ray, &mut TraversalStats::default())
    }

    /// [`intersect`](Self::intersect), counting the work done.
    pub fn intersect_with_stats(
        &self,
        primitives: &[Primitive],
        ray: &Ray,
        stats: &mut TraversalStats,
    ) -> Option<HitRecord> {
        match self {
            Accelerator::Bvh { bvh, prune, .. } => bvh.intersect(primitives, ray, *prune, stats),
            Accelerator::Linear { indices, prune, .. } => {
                let mut closest_t = ray.interval.max;
                let mut closest = None;

                for &index in indices {
                    let primitive = &primitives[index as usize];
                    let interval = ray.interval.with_max(closest_t);
                    if *prune && !primitive.bounding_box().hit(ray, interval) {
                        continue;
                    }
                    stats.primitives_tested += 1;
                    if let Some(surface) = primitive.intersect(ray, interval) {
                        closest_t = surface.t;
                        closest = Some(HitRecord::new(
                            ray,
                            surface,
                            index,
                            primitive.material() as u32,
                        ));
                    }
                }

                closest
            }
        }
    }
}
