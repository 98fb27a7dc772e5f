//! Drifting particle backdrop for the hero section.
//!
//! The field belongs to whoever draws the hero: created when the hero comes
//! on screen and dropped when it leaves, so nothing animates off-screen.

use std::f64::consts::TAU;
use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

pub const PARTICLE_COUNT: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: usize,
    /// Resting position, percent of the area.
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    started: Instant,
    elapsed: f64,
    /// Pointer position, percent of the area.
    pointer: (f64, f64),
}

impl ParticleField {
    pub fn new(seed: u64, now: Instant) -> Self {
        let mut rng = seed;
        let mut next = move || {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (rng >> 11) as f64 / (1u64 << 53) as f64
        };

        let particles = (0..PARTICLE_COUNT)
            .map(|id| Particle {
                id,
                x: next() * 100.0,
                y: next() * 100.0,
                size: next() * 3.0 + 1.0,
                speed: next() * 0.5 + 0.2,
            })
            .collect();

        Self {
            particles,
            started: now,
            elapsed: 0.0,
            pointer: (50.0, 50.0),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn tick(&mut self, now: Instant) {
        self.elapsed = now.saturating_duration_since(self.started).as_secs_f64();
    }

    pub fn pointer_moved(&mut self, area: Rect, column: u16, row: u16) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let x = f64::from(column.saturating_sub(area.x)) / f64::from(area.width) * 100.0;
        let y = f64::from(row.saturating_sub(area.y)) / f64::from(area.height) * 100.0;
        self.pointer = (x.clamp(0.0, 100.0), y.clamp(0.0, 100.0));
    }

    /// Current position in percent, wrapped into `[0, 100)`.
    pub fn position(&self, particle: &Particle) -> (f64, f64) {
        let cycle = 5.0 + particle.speed * 5.0;
        let phase = (self.elapsed / cycle).fract() * TAU;
        let id = particle.id as f64;

        // Larger particles sit "closer" and drift further with the pointer.
        let parallax = particle.size * 0.6;
        let x = particle.x
            + id.cos() * 15.0 * phase.sin()
            + (self.pointer.0 - 50.0) / 50.0 * parallax;
        let y = particle.y
            + id.sin() * 20.0 * phase.sin()
            + (self.pointer.1 - 50.0) / 50.0 * parallax;

        (x.rem_euclid(100.0), y.rem_euclid(100.0))
    }

    pub fn widget(&self, color: Color) -> Particles<'_> {
        Particles { field: self, color }
    }
}

pub struct Particles<'a> {
    field: &'a ParticleField,
    color: Color,
}

impl Widget for Particles<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        for particle in self.field.particles() {
            let (px, py) = self.field.position(particle);
            let x = area.x + ((px / 100.0) * f64::from(area.width)) as u16;
            let y = area.y + ((py / 100.0) * f64::from(area.height)) as u16;
            let glyph = if particle.size > 3.0 {
                '•'
            } else if particle.size > 2.0 {
                '∙'
            } else {
                '·'
            };
            if let Some(cell) = buf.cell_mut((x.min(area.right() - 1), y.min(area.bottom() - 1))) {
                cell.set_char(glyph).set_fg(self.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn seeded_field_is_deterministic_and_in_range() {
        let now = Instant::now();
        let a = ParticleField::new(7, now);
        let b = ParticleField::new(7, now);
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.particles().len(), PARTICLE_COUNT);
        for p in a.particles() {
            assert!((0.0..100.0).contains(&p.x));
            assert!((1.0..=4.0).contains(&p.size));
            let (x, y) = a.position(p);
            assert!((0.0..100.0).contains(&x) && (0.0..100.0).contains(&y));
        }
    }

    #[test]
    fn particles_move_over_time() {
        let now = Instant::now();
        let mut field = ParticleField::new(1, now);
        let before: Vec<_> = field.particles().iter().map(|p| field.position(p)).collect();
        field.tick(now + Duration::from_millis(1500));
        let after: Vec<_> = field.particles().iter().map(|p| field.position(p)).collect();
        assert_ne!(before, after);
    }

    #[test]
    fn renders_inside_area() {
        let field = ParticleField::new(3, Instant::now());
        let area = Rect::new(2, 1, 20, 8);
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 12));
        field.widget(Color::Cyan).render(area, &mut buf);

        let mut drawn = 0;
        for y in 0..12 {
            for x in 0..30 {
                let symbol = buf[(x, y)].symbol();
                if symbol != " " {
                    drawn += 1;
                    assert!(area.contains((x, y).into()), "{x},{y}");
                }
            }
        }
        assert!(drawn > 0);
    }
}
