// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// A point sample of transported radiant power, deposited on a diffuse
/// surface during photon tracing. Immutable once created; owned by the map
/// that stores it.
#[derive(Debug, Clone)]
pub struct Photon {
    pub throughput: Vector3f,
    pub position: Vector3f,
    pub wi: Vector3f,
}

impl Photon {
    pub fn new(throughput: Vector3f, position: Vector3f, wi: Vector3f) -> Self {
        Self { throughput, position, wi }
    }
}

#[derive(Debug)]
pub enum PhotonMapError {
    EmptyPhotonSet,
}

impl fmt::Display for PhotonMapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhotonMapError::EmptyPhotonSet => {
                write!(f, "cannot build a photon map from zero photons")
            }
        }
    }
}

#[derive(Clone)]
struct KdNode {
    photon: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Balanced kd-tree over photon positions. Construction consumes the photon
/// list, so a map is always built before it can be queried and can never be
/// mutated afterwards; concurrent queries need no locking.
pub struct PhotonMap {
    photons: Vec<Photon>,
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

struct Neighbor {
    dist2: Float,
    index: usize,
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist2
            .total_cmp(&other.dist2)
            .then(self.index.cmp(&other.index))
    }
}

impl PhotonMap {
    /// Build the spatial index over the supplied photons. Photon indices
    /// reported by queries refer to the supplied order. Construction is
    /// deterministic for a fixed input order.
    pub fn build(photons: Vec<Photon>) -> Result<Self, PhotonMapError> {
        if photons.is_empty() {
            return Err(PhotonMapError::EmptyPhotonSet);
        }

        let mut map = Self {
            nodes: Vec::with_capacity(photons.len()),
            photons,
            root: None,
        };
        let mut indices: Vec<usize> = (0..map.photons.len()).collect();
        map.root = map.build_node(&mut indices);
        Ok(map)
    }

    pub fn len(&self) -> usize {
        self.photons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photons.is_empty()
    }

    /// O(1) lookup of a photon by the index returned from a query.
    pub fn photon(&self, index: usize) -> &Photon {
        &self.photons[index]
    }

    /// Indices of the `min(k, len)` photons nearest to `point`, together
    /// with the squared distance to the farthest of them. The only per-query
    /// allocation is the candidate heap of at most k entries.
    pub fn query_k_nearest(&self, point: &Vector3f, k: usize) -> (Vec<usize>, Float) {
        if k == 0 {
            return (Vec::new(), 0.0);
        }

        let mut heap: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);
        self.search(self.root, point, k, &mut heap);

        let max_dist2 = heap.peek().map(|n| n.dist2).unwrap_or(0.0);
        let result: Vec<usize> = heap.into_sorted_vec().iter().map(|n| n.index).collect();
        (result, max_dist2)
    }

    // Split at the median along the axis of greatest extent; ties on equal
    // coordinates break on photon index so rebuilds are reproducible.
    fn build_node(&mut self, indices: &mut [usize]) -> Option<usize> {
        if indices.is_empty() {
            return None;
        }

        let axis = self.widest_axis(indices);
        indices.sort_unstable_by(|a, b| {
            self.photons[*a].position[axis]
                .total_cmp(&self.photons[*b].position[axis])
                .then(a.cmp(b))
        });

        let mid = indices.len() / 2;
        let node_index = self.nodes.len();
        self.nodes.push(KdNode {
            photon: indices[mid],
            axis,
            left: None,
            right: None,
        });

        let (lower, rest) = indices.split_at_mut(mid);
        let upper = &mut rest[1..];
        let left = self.build_node(lower);
        let right = self.build_node(upper);
        self.nodes[node_index].left = left;
        self.nodes[node_index].right = right;

        Some(node_index)
    }

    fn widest_axis(&self, indices: &[usize]) -> usize {
        let mut min = Vector3f::new(Float::MAX, Float::MAX, Float::MAX);
        let mut max = Vector3f::new(Float::MIN, Float::MIN, Float::MIN);
        for &i in indices {
            let p = self.photons[i].position;
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }

        let extent = max - min;
        let mut axis = 0;
        if extent.y > extent[axis] {
            axis = 1;
        }
        if extent.z > extent[axis] {
            axis = 2;
        }
        axis
    }

    fn search(&self, node: Option<usize>, point: &Vector3f, k: usize,
              heap: &mut BinaryHeap<Neighbor>) {
        let node_index = match node {
            Some(index) => index,
            None => return,
        };

        let node = &self.nodes[node_index];
        let photon = &self.photons[node.photon];
        let dist2 = (photon.position - point).norm_squared();
        heap.push(Neighbor { dist2, index: node.photon });
        if heap.len() > k {
            heap.pop();
        }

        let delta = point[node.axis] - photon.position[node.axis];
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.search(near, point, k, heap);

        // The far subtree can only contain closer photons when the splitting
        // plane is inside the current search radius.
        let radius2 = heap.peek().map(|n| n.dist2).unwrap_or(Float::MAX);
        if heap.len() < k || delta * delta < radius2 {
            self.search(far, point, k, heap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;

    fn random_photons(n: usize, seed: u64) -> Vec<Photon> {
        let mut rng = LcgRng::new(seed);
        (0..n)
            .map(|_| {
                let position = Vector3f::new(
                    rng.next_f32() * 10.0 - 5.0,
                    rng.next_f32() * 10.0 - 5.0,
                    rng.next_f32() * 10.0 - 5.0,
                );
                Photon::new(Vector3f::new(1.0, 1.0, 1.0), position, Vector3f::new(0.0, 0.0, 1.0))
            })
            .collect()
    }

    fn brute_force_distances(photons: &[Photon], point: &Vector3f, k: usize) -> Vec<Float> {
        let mut dists: Vec<Float> = photons
            .iter()
            .map(|p| (p.position - point).norm_squared())
            .collect();
        dists.sort_by(|a, b| a.total_cmp(b));
        dists.truncate(k);
        dists
    }

    #[test]
    fn test_build_rejects_empty_photon_set() {
        assert!(PhotonMap::build(Vec::new()).is_err());
    }

    #[test]
    fn test_query_matches_brute_force() {
        let photons = random_photons(256, 11);
        let map = PhotonMap::build(photons.clone()).unwrap();

        let mut rng = LcgRng::new(99);
        for _ in 0..32 {
            let point = Vector3f::new(
                rng.next_f32() * 10.0 - 5.0,
                rng.next_f32() * 10.0 - 5.0,
                rng.next_f32() * 10.0 - 5.0,
            );
            let k = 16;
            let (indices, max_dist2) = map.query_k_nearest(&point, k);
            assert_eq!(indices.len(), k);

            let mut seen = indices.clone();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), k, "returned indices must be unique");
            assert!(seen.iter().all(|&i| i < photons.len()));

            let expected = brute_force_distances(&photons, &point, k);
            let mut returned: Vec<Float> = indices
                .iter()
                .map(|&i| (photons[i].position - point).norm_squared())
                .collect();
            returned.sort_by(|a, b| a.total_cmp(b));
            for (r, e) in returned.iter().zip(expected.iter()) {
                assert!((r - e).abs() <= 1e-6 * e.max(1.0));
            }
            assert!((max_dist2 - expected[k - 1]).abs() <= 1e-6 * expected[k - 1].max(1.0));
        }
    }

    #[test]
    fn test_query_with_fewer_photons_than_k() {
        let photons = random_photons(5, 3);
        let map = PhotonMap::build(photons.clone()).unwrap();
        let point = Vector3f::new(0.0, 0.0, 0.0);
        let (indices, max_dist2) = map.query_k_nearest(&point, 100);
        assert_eq!(indices.len(), 5);

        let expected = brute_force_distances(&photons, &point, 5);
        assert!((max_dist2 - expected[4]).abs() <= 1e-6 * expected[4].max(1.0));
    }

    #[test]
    fn test_single_photon_at_query_point() {
        let photon = Photon::new(
            Vector3f::new(1.0, 0.5, 0.25),
            Vector3f::new(1.0, 2.0, 3.0),
            Vector3f::new(0.0, 0.0, 1.0),
        );
        let map = PhotonMap::build(vec![photon]).unwrap();
        let (indices, max_dist2) = map.query_k_nearest(&Vector3f::new(1.0, 2.0, 3.0), 4);
        assert_eq!(indices, vec![0]);
        assert_eq!(max_dist2, 0.0);
    }

    #[test]
    fn test_build_is_deterministic() {
        let photons = random_photons(128, 77);
        let map_a = PhotonMap::build(photons.clone()).unwrap();
        let map_b = PhotonMap::build(photons).unwrap();

        let mut rng = LcgRng::new(5);
        for _ in 0..16 {
            let point = Vector3f::new(
                rng.next_f32() * 10.0 - 5.0,
                rng.next_f32() * 10.0 - 5.0,
                rng.next_f32() * 10.0 - 5.0,
            );
            let (indices_a, dist_a) = map_a.query_k_nearest(&point, 8);
            let (indices_b, dist_b) = map_b.query_k_nearest(&point, 8);
            assert_eq!(indices_a, indices_b);
            assert_eq!(dist_a, dist_b);
        }
    }

    #[test]
    fn test_photon_lookup_round_trip() {
        let photons = random_photons(32, 21);
        let map = PhotonMap::build(photons.clone()).unwrap();
        for i in 0..32 {
            assert_eq!(map.photon(i).position, photons[i].position);
        }
    }
}
