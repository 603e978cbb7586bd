use crate::config::{
    Color, EXPLOSION_PALETTE, PARTICLE_GRAVITY, PARTICLE_LIFETIME, PARTICLE_MIN_RADIUS,
    PARTICLE_RADIUS_RANGE, PARTICLE_SPREAD,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Explosion particle: falls under gravity and fades out over its lifetime
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub color: Color,
    pub life: u32,
    pub max_life: u32,
    pub radius: f64,
}

impl Particle {
    pub fn new(x: f64, y: f64, color: Color, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y,
            color,
            vel_x: (rng.gen::<f64>() - 0.5) * PARTICLE_SPREAD,
            vel_y: (rng.gen::<f64>() - 0.5) * PARTICLE_SPREAD,
            life: PARTICLE_LIFETIME,
            max_life: PARTICLE_LIFETIME,
            radius: rng.gen::<f64>() * PARTICLE_RADIUS_RANGE + PARTICLE_MIN_RADIUS,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vel_x;
        self.y += self.vel_y;
        self.vel_y += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining lifetime fraction, used for both opacity and size
    pub fn alpha(&self) -> f64 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f64 / self.max_life as f64
    }

    pub fn draw_radius(&self) -> f64 {
        self.radius * self.alpha()
    }
}

/// Live explosion particles, owned by the game
#[derive(Clone, Debug, Default)]
pub struct Particles {
    particles: Vec<Particle>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` particles at (x, y) in random palette colours
    pub fn burst(&mut self, x: f64, y: f64, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            let color = *EXPLOSION_PALETTE.choose(rng).unwrap_or(&EXPLOSION_PALETTE[0]);
            self.particles.push(Particle::new(x, y, color, rng));
        }
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advance every particle one frame and drop the expired ones.
    /// Returns the particles still alive.
    pub fn advance_and_prune(&mut self) -> &[Particle] {
        for particle in &mut self.particles {
            particle.update();
        }
        self.particles.retain(Particle::is_alive);
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WHITE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_particle_lives_for_ten_ticks() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut particles = Particles::new();
        particles.push(Particle::new(100.0, 100.0, WHITE, &mut rng));

        for tick in 1..PARTICLE_LIFETIME {
            let alive = particles.advance_and_prune();
            assert_eq!(alive.len(), 1, "particle should survive tick {}", tick);
        }

        assert!(particles.advance_and_prune().is_empty());
        assert!(particles.advance_and_prune().is_empty());
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut particle = Particle::new(0.0, 0.0, WHITE, &mut rng);
        let vel_y = particle.vel_y;
        particle.update();
        assert!((particle.vel_y - (vel_y + PARTICLE_GRAVITY)).abs() < 1e-9);
        assert!((particle.y - vel_y).abs() < 1e-9);
        assert_eq!(particle.life, PARTICLE_LIFETIME - 1);
    }

    #[test]
    fn test_fade_and_shrink() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut particle = Particle::new(0.0, 0.0, WHITE, &mut rng);
        assert_eq!(particle.alpha(), 1.0);
        assert_eq!(particle.draw_radius(), particle.radius);

        for _ in 0..5 {
            particle.update();
        }
        assert_eq!(particle.alpha(), 0.5);
        assert_eq!(particle.draw_radius(), particle.radius * 0.5);
    }

    #[test]
    fn test_burst_spawns_from_palette() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut particles = Particles::new();
        particles.burst(10.0, 20.0, 8, &mut rng);

        assert_eq!(particles.len(), 8);
        for particle in particles.iter() {
            assert!(EXPLOSION_PALETTE.contains(&particle.color));
            assert_eq!((particle.x, particle.y), (10.0, 20.0));
        }
    }
}
