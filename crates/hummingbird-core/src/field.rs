//! The flower field: exclusive owner of a stable, indexable flower collection.

use crate::flower::Flower;
use rand::Rng;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    NoFlowers,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::NoFlowers => write!(f, "a flower field must contain at least one flower"),
        }
    }
}

impl Error for FieldError {}

/// Owns the flowers of one foraging area. Insertion order is stable for the
/// lifetime of the field, so flower indices remain valid across episodes.
#[derive(Clone, Debug)]
pub struct FlowerField {
    flowers: Vec<Flower>,
    center: [f64; 3],
}

impl FlowerField {
    pub fn new(flowers: Vec<Flower>, center: [f64; 3]) -> Result<Self, FieldError> {
        if flowers.is_empty() {
            return Err(FieldError::NoFlowers);
        }
        Ok(Self { flowers, center })
    }

    /// Reset every flower to full.
    pub fn reset_flowers(&mut self) {
        for flower in &mut self.flowers {
            flower.reset();
        }
    }

    /// Sum of nectar across all flowers.
    pub fn total_nectar(&self) -> f32 {
        self.flowers.iter().map(|f| f.nectar()).sum()
    }

    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }

    pub fn get(&self, index: usize) -> Option<&Flower> {
        self.flowers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Flower> {
        self.flowers.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.flowers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flowers.is_empty()
    }

    /// Center of the area, used as the origin for free-placement sampling.
    pub fn center(&self) -> [f64; 3] {
        self.center
    }

    /// Uniform random flower index over the whole collection, empty flowers
    /// included. Callers check `has_nectar` before use.
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.random_range(0..self.flowers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flower::AnchorPose;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn field(n: usize) -> FlowerField {
        let flowers = (0..n)
            .map(|i| {
                Flower::new(
                    1.0,
                    AnchorPose::new([i as f64, 1.0, 0.0], [0.0, 1.0, 0.0]),
                )
            })
            .collect();
        FlowerField::new(flowers, [0.0, 0.0, 0.0]).unwrap()
    }

    #[test]
    fn empty_field_is_rejected() {
        assert_eq!(
            FlowerField::new(Vec::new(), [0.0, 0.0, 0.0]).unwrap_err(),
            FieldError::NoFlowers
        );
    }

    #[test]
    fn total_nectar_matches_member_sum() {
        let mut field = field(3);
        field.get_mut(0).unwrap().feed(0.25).unwrap();
        field.get_mut(2).unwrap().feed(1.0).unwrap();
        let expected: f32 = field.flowers().iter().map(|f| f.nectar()).sum();
        assert!((field.total_nectar() - expected).abs() < f32::EPSILON);
        assert!((field.total_nectar() - 1.75).abs() < 1e-6);
    }

    #[test]
    fn reset_refills_every_flower() {
        let mut field = field(4);
        for i in 0..4 {
            field.get_mut(i).unwrap().feed(2.0).unwrap();
        }
        assert_eq!(field.total_nectar(), 0.0);
        field.reset_flowers();
        assert_eq!(field.total_nectar(), 4.0);
        assert!(field.flowers().iter().all(|f| f.has_nectar()));
    }

    #[test]
    fn pick_random_is_uniform_over_full_collection() {
        let mut field = field(3);
        // Empty one flower; it must still be selectable.
        field.get_mut(1).unwrap().feed(2.0).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[field.pick_random(&mut rng)] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn pick_random_is_deterministic_for_fixed_seed() {
        let field = field(5);
        let mut a = ChaCha12Rng::seed_from_u64(11);
        let mut b = ChaCha12Rng::seed_from_u64(11);
        let picks_a: Vec<usize> = (0..32).map(|_| field.pick_random(&mut a)).collect();
        let picks_b: Vec<usize> = (0..32).map(|_| field.pick_random(&mut b)).collect();
        assert_eq!(picks_a, picks_b);
    }
}
