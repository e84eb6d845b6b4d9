//! Headless flappy-bird environment.
//!
//! Every agent controls its own bird at a fixed horizontal position; all birds
//! share the same stream of pipes. Nothing is drawn and frames advance as fast
//! as the caller steps them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::params::GameParams;
use crate::neat::episode::{Environment, EpisodeResult};
use crate::neat::error::Result;

/// Number of values in every observation.
pub const OBSERVATION_SIZE: usize = 4;

/// Decision value that makes a bird flap.
pub const FLAP: u8 = 1;

/// One agent's bird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Vertical centre, growing downwards.
    pub y: f32,
    /// Vertical speed, positive is falling.
    pub speed: f32,
    /// Whether the bird is still in play.
    pub alive: bool,
    /// Frames survived since the last reset.
    pub frames_survived: u32,
}

impl Bird {
    fn new(y: f32) -> Self {
        Self {
            y,
            speed: 0.0,
            alive: true,
            frames_survived: 0,
        }
    }
}

/// A pipe column with a single opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    /// Left edge.
    pub x: f32,
    /// Upper edge of the opening.
    pub gap_top: f32,
}

/// The flappy world: birds, pipes and a frame counter.
#[derive(Debug, Clone)]
pub struct FlappyGame {
    params: GameParams,
    rng: ChaCha8Rng,
    birds: Vec<Bird>,
    pipes: Vec<Pipe>,
    frame: u32,
}

impl FlappyGame {
    /// Creates an empty game. Pipe openings are drawn from a generator seeded with `seed`.
    pub fn new(params: GameParams, seed: u64) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            rng: ChaCha8Rng::seed_from_u64(seed),
            birds: Vec::new(),
            pipes: Vec::new(),
            frame: 0,
        })
    }

    /// Game constants.
    pub fn params(&self) -> &GameParams {
        &self.params
    }

    /// Birds in agent order.
    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    /// Pipes on screen, oldest (leftmost) first.
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Number of birds still in play.
    pub fn alive_count(&self) -> usize {
        self.birds.iter().filter(|b| b.alive).count()
    }

    /// First pipe the birds have not yet cleared.
    pub fn next_pipe(&self) -> Option<&Pipe> {
        let tail = self.params.bird_x - self.params.bird_radius;
        self.pipes
            .iter()
            .find(|pipe| pipe.x + self.params.pipe_width >= tail)
    }

    fn spawn_pipe(&mut self) {
        let (lowest, highest) = self.params.gap_top_bounds();
        let gap_top = self.rng.random_range(lowest..=highest);
        self.pipes.push(Pipe {
            x: self.params.width,
            gap_top,
        });
    }

    fn collides(&self, bird: &Bird) -> bool {
        let p = &self.params;
        let top = bird.y - p.bird_radius;
        let bottom = bird.y + p.bird_radius;

        if top < 0.0 || bottom > p.height {
            return true;
        }

        let left = p.bird_x - p.bird_radius;
        let right = p.bird_x + p.bird_radius;
        self.pipes.iter().any(|pipe| {
            let overlaps_column = right > pipe.x && left < pipe.x + p.pipe_width;
            overlaps_column && (top < pipe.gap_top || bottom > pipe.gap_top + p.pipe_gap)
        })
    }
}

impl Environment for FlappyGame {
    fn reset(&mut self, agents: usize) {
        self.birds = vec![Bird::new(self.params.start_y); agents];
        self.pipes.clear();
        self.frame = 0;
    }

    fn frame(&self) -> u32 {
        self.frame
    }

    fn is_alive(&self, agent: usize) -> bool {
        self.birds.get(agent).is_some_and(|b| b.alive)
    }

    /// `[y, speed, distance to next pipe, next gap top]`, each scaled to roughly `[-1, 1]`.
    fn observe(&self, agent: usize) -> Vec<f32> {
        let p = &self.params;
        let bird = &self.birds[agent];
        let (distance, gap_top) = self.next_pipe().map_or((1.0, 0.0), |pipe| {
            ((pipe.x - p.bird_x) / p.width, pipe.gap_top / p.height)
        });

        vec![bird.y / p.height, bird.speed / p.speed_scale, distance, gap_top]
    }

    fn step(&mut self, decisions: &[Option<u8>]) {
        if self.frame % self.params.pipe_interval == 0 {
            self.spawn_pipe();
        }

        let (speed, width) = (self.params.pipe_speed, self.params.pipe_width);
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }
        self.pipes.retain(|pipe| pipe.x + width >= 0.0);

        let mut birds = std::mem::take(&mut self.birds);
        for (bird, decision) in birds.iter_mut().zip(decisions) {
            if !bird.alive {
                continue;
            }
            if *decision == Some(FLAP) {
                bird.speed = -self.params.thrust;
            }
            bird.y += bird.speed;
            bird.speed += self.params.gravity;

            if self.collides(bird) {
                bird.alive = false;
            } else {
                bird.frames_survived += 1;
            }
        }
        self.birds = birds;

        self.frame += 1;
    }

    fn results(&self) -> Vec<EpisodeResult> {
        self.birds
            .iter()
            .map(|bird| EpisodeResult {
                score: bird.frames_survived as f32,
                alive: bird.alive,
            })
            .collect()
    }
}
