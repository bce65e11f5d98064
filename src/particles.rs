// Bounded 2D point-mass simulation
//
// Shared by the particle effects (falling balls, snow, expanding balls).
// The pool is a bounded FIFO: capacity is a hard limit and overflow always
// evicts the single oldest particle. There is no lifetime or out-of-bounds
// culling; turnover comes from capacity alone.

use std::collections::VecDeque;

use rand::Rng;

use crate::color::Rgb;

/// 2D float vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// A single point mass. Owned exclusively by one pool.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub color: Rgb,
    pub size: f32,
    pub remaining_life: f32,
}

/// Color distribution for newly spawned particles.
#[derive(Debug, Clone, Copy)]
pub enum ColorRange {
    /// Every particle gets the same color.
    Fixed(Rgb),
    /// Hue/saturation/lightness sampled per spawn.
    Hsl {
        hue: (f32, f32),
        saturation: (f32, f32),
        lightness: (f32, f32),
    },
}

impl ColorRange {
    pub fn sample(&self, rng: &mut impl Rng) -> Rgb {
        match *self {
            ColorRange::Fixed(c) => c,
            ColorRange::Hsl {
                hue,
                saturation,
                lightness,
            } => Rgb::from_hsl(
                sample(rng, hue),
                sample(rng, saturation),
                sample(rng, lightness),
            ),
        }
    }
}

/// Randomization ranges for `spawn`, fixed per effect family.
#[derive(Debug, Clone, Copy)]
pub struct SpawnRanges {
    pub velocity_x: (f32, f32),
    pub velocity_y: (f32, f32),
    pub accel_x: (f32, f32),
    pub accel_y: (f32, f32),
    pub size: f32,
    pub color: ColorRange,
}

/// Bounded FIFO of particles sharing one spawn origin.
#[derive(Debug)]
pub struct ParticlePool {
    pub origin: Vec2,
    max: usize,
    particles: VecDeque<Particle>,
}

impl ParticlePool {
    pub fn new(max: usize, origin: Vec2) -> Self {
        Self {
            origin,
            max,
            particles: VecDeque::with_capacity(max),
        }
    }

    /// Append a particle, evicting the oldest first when at capacity.
    pub fn push(&mut self, particle: Particle) {
        if self.max == 0 {
            return;
        }
        if self.particles.len() >= self.max {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Spawn a randomized particle at the pool origin.
    pub fn spawn(&mut self, rng: &mut impl Rng, ranges: &SpawnRanges) {
        let particle = Particle {
            position: self.origin,
            velocity: Vec2::new(
                sample(rng, ranges.velocity_x),
                sample(rng, ranges.velocity_y),
            ),
            acceleration: Vec2::new(sample(rng, ranges.accel_x), sample(rng, ranges.accel_y)),
            color: ranges.color.sample(rng),
            size: ranges.size,
            remaining_life: 255.0,
        };
        self.push(particle);
    }

    /// Advance every particle one tick: Euler integration at unit timestep.
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.velocity += p.acceleration;
            p.position += p.velocity;
        }
    }

    /// Replace every particle's acceleration with a shared wind, then step.
    pub fn blow(&mut self, wind: Vec2) {
        for p in &mut self.particles {
            p.acceleration = wind;
        }
        self.step();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }
}

fn sample(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(n: f32) -> Particle {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            color: Rgb::BLACK,
            size: n,
            remaining_life: 255.0,
        }
    }

    #[test]
    fn test_capacity_is_a_hard_bound() {
        let mut pool = ParticlePool::new(20, Vec2::ZERO);
        for i in 1..=25 {
            pool.push(marker(i as f32));
            assert!(pool.len() <= 20);
        }
        assert_eq!(pool.len(), 20);
        // The oldest five were evicted: 6..=25 survive in order
        let sizes: Vec<f32> = pool.iter().map(|p| p.size).collect();
        assert_eq!(sizes, (6..=25).map(|i| i as f32).collect::<Vec<f32>>());
    }

    #[test]
    fn test_eviction_removes_oldest() {
        let mut pool = ParticlePool::new(2, Vec2::ZERO);
        pool.push(marker(1.0));
        pool.push(marker(2.0));
        pool.push(marker(3.0));
        let sizes: Vec<f32> = pool.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![2.0, 3.0]);
    }

    #[test]
    fn test_spawn_bounded_after_many_calls() {
        let mut rng = rand::rng();
        let ranges = SpawnRanges {
            velocity_x: (-5.0, 5.0),
            velocity_y: (-5.0, 5.0),
            accel_x: (0.0, 0.0),
            accel_y: (0.01, 0.12),
            size: 8.0,
            color: ColorRange::Fixed(Rgb::WHITE),
        };
        let mut pool = ParticlePool::new(50, Vec2::new(200.0, 10.0));
        for _ in 0..500 {
            pool.spawn(&mut rng, &ranges);
        }
        assert_eq!(pool.len(), 50);
        for p in pool.iter() {
            assert!(p.velocity.x >= -5.0 && p.velocity.x < 5.0);
            assert!(p.acceleration.y >= 0.01 && p.acceleration.y < 0.12);
        }
    }

    #[test]
    fn test_step_integrates_euler() {
        let mut pool = ParticlePool::new(4, Vec2::ZERO);
        let mut p = marker(1.0);
        p.velocity = Vec2::new(1.0, 0.0);
        p.acceleration = Vec2::new(0.0, 0.5);
        pool.push(p);

        pool.step();
        let p = pool.iter().next().unwrap();
        // Velocity picks up acceleration before the position update
        assert_eq!(p.velocity, Vec2::new(1.0, 0.5));
        assert_eq!(p.position, Vec2::new(1.0, 0.5));

        pool.step();
        let p = pool.iter().next().unwrap();
        assert_eq!(p.velocity, Vec2::new(1.0, 1.0));
        assert_eq!(p.position, Vec2::new(2.0, 1.5));
    }

    #[test]
    fn test_blow_applies_uniform_wind() {
        let mut pool = ParticlePool::new(4, Vec2::ZERO);
        for i in 0..3 {
            let mut p = marker(i as f32);
            p.acceleration = Vec2::new(9.0, 9.0);
            pool.push(p);
        }
        pool.blow(Vec2::new(0.1, -0.2));
        for p in pool.iter() {
            assert_eq!(p.acceleration, Vec2::new(0.1, -0.2));
            assert_eq!(p.velocity, Vec2::new(0.1, -0.2));
        }
    }

    #[test]
    fn test_hsl_range_sampling_stays_bright() {
        let mut rng = rand::rng();
        let range = ColorRange::Hsl {
            hue: (0.0, 360.0),
            saturation: (0.0, 1.0),
            lightness: (0.6, 1.0),
        };
        for _ in 0..200 {
            let c = range.sample(&mut rng);
            // Lightness floor of 0.6 keeps every channel off the floor
            assert!(c.r + c.g + c.b > 0.5);
        }
    }
}
