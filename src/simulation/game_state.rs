//! Score tracking for the following-distance game
//!
//! The player earns points for driving close to the lead car while staying
//! outside the safe distance, and loses points while inside it.

/// Points per second at the ideal gap
pub const POINTS_PER_SECOND: f32 = 10.0;

/// Points lost per second while closer than the safe distance
pub const UNSAFE_PENALTY_PER_SECOND: f32 = 5.0;

/// Gaps up to this multiple of the safe distance earn full points
pub const IDEAL_GAP_FACTOR: f32 = 1.5;

/// Gaps at or beyond this multiple of the safe distance earn nothing
pub const MAX_SCORING_GAP_FACTOR: f32 = 3.0;

/// Below this speed the player is not driving and scores nothing, in m/s
pub const MIN_SCORING_SPEED: f32 = 1.0;

/// How much a gap is worth, from 0 (too far) to 1 (ideal)
///
/// Returns `None` for gaps inside the safe distance.
pub fn closeness(gap: f32, safe_distance: f32) -> Option<f32> {
    if gap < safe_distance {
        return None;
    }
    let ideal = safe_distance * IDEAL_GAP_FACTOR;
    let limit = safe_distance * MAX_SCORING_GAP_FACTOR;
    if gap <= ideal {
        Some(1.0)
    } else if gap >= limit {
        Some(0.0)
    } else {
        Some((limit - gap) / (limit - ideal))
    }
}

/// Score and progress of one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub score: f32,

    /// Session time in seconds
    pub time: f32,

    /// Seconds spent closer than the safe distance
    pub unsafe_time: f32,

    /// Whether the session has ended in a crash
    pub is_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0.0,
            time: 0.0,
            unsafe_time: 0.0,
            is_over: false,
        }
    }

    /// Accrue score for one tick
    pub fn update(&mut self, delta_secs: f32, gap: f32, safe_distance: f32, player_speed: f32) {
        if self.is_over {
            return;
        }
        self.time += delta_secs;

        if player_speed <= MIN_SCORING_SPEED {
            return;
        }

        match closeness(gap, safe_distance) {
            Some(closeness) => {
                self.score += POINTS_PER_SECOND * closeness * delta_secs;
            }
            None => {
                self.unsafe_time += delta_secs;
                self.score = (self.score - UNSAFE_PENALTY_PER_SECOND * delta_secs).max(0.0);
            }
        }
    }

    pub fn end(&mut self) {
        self.is_over = true;
    }

    pub fn rounded_score(&self) -> i64 {
        self.score.round() as i64
    }

    /// Share of the session spent inside the safe distance, in percent
    pub fn unsafe_percentage(&self) -> f32 {
        if self.time > 0.0 {
            (self.unsafe_time / self.time * 100.0).min(100.0)
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Score: {} | Time: {:.1}s | Unsafe: {:.1}%{}",
            self.rounded_score(),
            self.time,
            self.unsafe_percentage(),
            if self.is_over { " | GAME OVER" } else { "" }
        )
    }
}
