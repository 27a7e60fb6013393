//! Things that live on top of the grid: keys, the exit, hostiles.

/// Where collected entities are parked. Nothing can ever get within pickup range of it.
pub const REMOVED_POSITION: (f64, f64) = (-100.0, -100.0);

/// Id reserved for the exit; keys are numbered from 1.
pub const EXIT_ID: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Key,
    Exit,
    Hostile,
}

/// Reserved for hostile behaviour; nothing reads it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorState {
    Idle,
    Chase,
    Attack,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub behavior: Option<BehaviorState>,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, x: f64, y: f64) -> Self {
        Self { id, kind, x, y, behavior: None }
    }

    /// Centred on grid cell `(cx, cy)`.
    pub fn at_cell(id: u32, kind: EntityKind, cx: usize, cy: usize) -> Self {
        Self::new(id, kind, cx as f64 + 0.5, cy as f64 + 0.5)
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        (self.x, self.y) == REMOVED_POSITION
    }

    /// Logical removal: the entity keeps its slot and id but leaves the playfield.
    pub fn remove(&mut self) {
        (self.x, self.y) = REMOVED_POSITION;
    }

    #[inline]
    pub fn distance_sq_to(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        self.distance_sq_to(x, y).sqrt()
    }
}
