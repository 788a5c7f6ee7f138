//! Falling Stars
//!
//! Generational arena of star records. Every star walks one path:
//! `Active → Caught | Fallen → removed`. Ids carry the slot generation, so a
//! removal that arrives late can never hit a star spawned into a reused slot.

use glam::Vec2;

use crate::core::draw::Color;
use crate::core::physics::ArcadeBody;

/// Tint applied to a caught star.
pub const CAUGHT_TINT: Color = Color::from_rgb_hex(0x00ff00);

/// Tint applied to a star that hit the ground.
pub const FALLEN_TINT: Color = Color::from_rgb_hex(0xff0000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StarId {
    index: u32,
    generation: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarPhase {
    Active,
    Caught,
    Fallen,
}

#[derive(Clone, Debug)]
pub struct Star {
    pub body: ArcadeBody,
    pub phase: StarPhase,
    pub tint: Option<Color>,
}

impl Star {
    pub fn new(position: Vec2, size: Vec2, velocity: Vec2) -> Self {
        let mut body = ArcadeBody::new(position, size);
        body.velocity = velocity;
        Self {
            body,
            phase: StarPhase::Active,
            tint: None,
        }
    }

    /// Active → Caught. Returns false if the star already left `Active`.
    pub fn catch(&mut self) -> bool {
        if self.phase != StarPhase::Active {
            return false;
        }
        self.phase = StarPhase::Caught;
        self.tint = Some(CAUGHT_TINT);
        self.body.freeze();
        true
    }

    /// Active → Fallen. Returns false if the star already left `Active`.
    pub fn fall(&mut self) -> bool {
        if self.phase != StarPhase::Active {
            return false;
        }
        self.phase = StarPhase::Fallen;
        self.tint = Some(FALLEN_TINT);
        self.body.freeze();
        true
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    star: Option<Star>,
}

/// Arena owning every live star of one play session.
#[derive(Debug, Default)]
pub struct StarPool {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl StarPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, star: Star) -> StarId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.star = Some(star);
            return StarId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            star: Some(star),
        });
        StarId { index, generation: 0 }
    }

    pub fn get(&self, id: StarId) -> Option<&Star> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.star.as_ref())
    }

    pub fn get_mut(&mut self, id: StarId) -> Option<&mut Star> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.star.as_mut())
    }

    /// Removes a star. Stale or repeated ids return `None` and change nothing.
    pub fn remove(&mut self, id: StarId) -> Option<Star> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let star = slot.star.take()?;
        self.free.push(id.index);
        Some(star)
    }

    /// Live stars in spawn-slot order.
    pub fn iter(&self) -> impl Iterator<Item = (StarId, &Star)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.star.as_ref().map(|star| {
                (
                    StarId {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    star,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StarId, &mut Star)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.star.as_mut().map(|star| {
                (
                    StarId {
                        index: i as u32,
                        generation,
                    },
                    star,
                )
            })
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star_at(x: f32) -> Star {
        Star::new(Vec2::new(x, 26.0), Vec2::splat(50.0), Vec2::new(0.0, 200.0))
    }

    #[test]
    fn double_remove_is_noop() {
        let mut pool = StarPool::new();
        let id = pool.spawn(star_at(100.0));
        assert!(pool.remove(id).is_some());
        assert!(pool.remove(id).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn stale_id_does_not_alias_reused_slot() {
        let mut pool = StarPool::new();
        let old = pool.spawn(star_at(100.0));
        pool.remove(old);
        let new = pool.spawn(star_at(200.0));

        assert_ne!(old, new);
        assert!(pool.get(old).is_none());
        assert!(pool.remove(old).is_none());
        assert_eq!(pool.get(new).unwrap().body.position.x, 200.0);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn lifecycle_leaves_active_once() {
        let mut star = star_at(100.0);
        assert!(star.catch());
        assert_eq!(star.tint, Some(CAUGHT_TINT));
        assert_eq!(star.body.velocity, Vec2::ZERO);
        assert!(!star.catch());
        assert!(!star.fall());
        assert_eq!(star.phase, StarPhase::Caught);

        let mut star = star_at(100.0);
        assert!(star.fall());
        assert!(!star.catch());
        assert_eq!(star.tint, Some(FALLEN_TINT));
    }

    #[test]
    fn iterates_live_stars_only() {
        let mut pool = StarPool::new();
        let a = pool.spawn(star_at(1.0));
        let b = pool.spawn(star_at(2.0));
        let c = pool.spawn(star_at(3.0));
        pool.remove(b);

        let ids: Vec<StarId> = pool.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);

        for (_, star) in pool.iter_mut() {
            star.body.position.y = 0.0;
        }
        assert!(pool.iter().all(|(_, s)| s.body.position.y == 0.0));
    }
}
