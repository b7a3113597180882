use crate::actor::Entity;
use crate::food::Food;
use crate::geometry::dist_sqr;
use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};

type FoodLocation = GeomWithData<[f64; 2], usize>;

/// R*-tree over the live food of one tick, keyed by index into the food list.
pub struct FoodIndex {
    tree: RTree<FoodLocation>,
}

impl FoodIndex {
    /// Bulk load (O(n log n)) every live food item.
    pub fn build(food: &[Food]) -> Self {
        let locations = food
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_alive())
            .map(|(idx, f)| FoodLocation::new(f.position(), idx))
            .collect();
        Self {
            tree: RTree::bulk_load(locations),
        }
    }

    /// Indices of food within `radius` of `center`, in ascending index order.
    /// Liveness is not rechecked; food eaten since the build is still listed.
    pub fn within(&self, center: [f64; 2], radius: f64) -> Vec<usize> {
        let envelope = AABB::from_corners(
            [center[0] - radius, center[1] - radius],
            [center[0] + radius, center[1] + radius],
        );
        let r_sq = radius * radius;
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope(&envelope)
            .filter(|loc| dist_sqr(*loc.geom(), center) <= r_sq)
            .map(|loc| loc.data)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Body;
    use crate::geometry::Bounds;

    fn food_at(x: f64, y: f64) -> Food {
        let bounds = Bounds::new(100.0, 100.0);
        Food::new(Body::new([x, y], 0.0, 5.0, 100.0, &bounds), 50.0)
    }

    #[test]
    fn within_returns_sorted_hits_inside_radius() {
        let food = vec![food_at(50.0, 50.0), food_at(10.0, 10.0), food_at(53.0, 54.0)];
        let index = FoodIndex::build(&food);
        assert_eq!(index.len(), 3);
        assert_eq!(index.within([51.0, 51.0], 5.0), vec![0, 2]);
        assert!(index.within([90.0, 90.0], 5.0).is_empty());
    }

    #[test]
    fn dead_food_is_not_indexed() {
        let mut food = vec![food_at(50.0, 50.0), food_at(51.0, 50.0)];
        food[0].eat();
        let index = FoodIndex::build(&food);
        assert_eq!(index.within([50.0, 50.0], 5.0), vec![1]);
    }
}
