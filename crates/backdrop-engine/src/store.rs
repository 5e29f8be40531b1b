//! Entity storage and random sampling for effect rebuilds.

use std::f32::consts::TAU;
use std::ops::{Deref, DerefMut};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Uniform sampling over configured ranges.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    /// Seeded when `seed` is given, otherwise from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self {
                rng: StdRng::from_entropy(),
            },
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// An independent sampler derived from this one.
    pub fn fork(&mut self) -> Sampler {
        Sampler::seeded(self.rng.r#gen())
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.rng.r#gen::<f32>()
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.unit() * (hi - lo)
    }

    /// Uniform in `[-half, half)`.
    pub fn signed(&mut self, half: f32) -> f32 {
        (self.unit() - 0.5) * 2.0 * half
    }

    /// Uniform phase in `[0, 2π)`.
    pub fn angle(&mut self) -> f32 {
        self.unit() * TAU
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

/// How an effect reacts when its region changes size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Entity layout depends on absolute position: replace the batch.
    Rebuild,
    /// Only the surface is resized; entities are kept and re-enter through their
    /// boundary policy.
    Rescale,
}

/// A contiguous batch of entities, replaced wholesale on rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityBatch<E> {
    entities: Vec<E>,
}

impl<E> Default for EntityBatch<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
        }
    }
}

impl<E> EntityBatch<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entity.
    pub fn rebuild(&mut self, entities: impl IntoIterator<Item = E>) {
        self.entities = entities.into_iter().collect();
    }

    /// Stable ascending sort on a depth key, so far (small) entities draw first.
    pub fn sort_by_depth(&mut self, key: impl Fn(&E) -> f32) {
        self.entities.sort_by(|a, b| key(a).total_cmp(&key(b)));
    }
}

impl<E> Deref for EntityBatch<E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        &self.entities
    }
}

impl<E> DerefMut for EntityBatch<E> {
    fn deref_mut(&mut self) -> &mut [E] {
        &mut self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = Sampler::seeded(7);
        let mut b = Sampler::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.unit(), b.unit());
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut sampler = Sampler::seeded(1);
        for _ in 0..1000 {
            let v = sampler.range(50.0, 200.0);
            assert!((50.0..200.0).contains(&v));
            let s = sampler.signed(0.15);
            assert!((-0.15..0.15).contains(&s));
        }
        assert_eq!(sampler.range(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_pick() {
        let mut sampler = Sampler::seeded(2);
        let items = ["a", "b", "c"];
        for _ in 0..20 {
            assert!(items.contains(sampler.pick(&items).unwrap()));
        }
        let empty: [u8; 0] = [];
        assert!(sampler.pick(&empty).is_none());
    }

    #[test]
    fn test_rebuild_replaces_batch() {
        let mut batch = EntityBatch::new();
        batch.rebuild([1, 2, 3]);
        assert_eq!(batch.len(), 3);
        batch.rebuild([9]);
        assert_eq!(&batch[..], &[9]);
    }

    #[test]
    fn test_sort_by_depth_is_ascending_and_stable() {
        let mut batch = EntityBatch::new();
        batch.rebuild([(3.0, 'a'), (1.0, 'b'), (3.0, 'c'), (2.0, 'd')]);
        batch.sort_by_depth(|e| e.0);
        let order: Vec<char> = batch.iter().map(|e| e.1).collect();
        assert_eq!(order, vec!['b', 'd', 'a', 'c']);
    }
}
