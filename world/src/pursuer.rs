//! Delayed replay of the player's movement history.

use maze_escape_core::{CellCoord, Entity, Turn};

/// Pursuer that retraces the player's recorded moves with a fixed lag.
///
/// The pursuer never plans its own route. Once active it stands on
/// `history[turn - activation_turn]`, where `history[0]` is the player's cell
/// after the first committed move.
#[derive(Clone, Copy, Debug)]
pub struct PursuerReplay {
    entity: Entity,
    activation_turn: Turn,
}

impl PursuerReplay {
    /// Creates a dormant pursuer that wakes up on `activation_turn`.
    ///
    /// `parked_at` is only a placeholder; the pursuer reports no position
    /// until it is activated.
    #[must_use]
    pub const fn new(activation_turn: Turn, parked_at: CellCoord) -> Self {
        Self {
            entity: Entity::dormant(parked_at),
            activation_turn,
        }
    }

    /// Turn on which the pursuer activates.
    #[must_use]
    pub const fn activation_turn(&self) -> Turn {
        self.activation_turn
    }

    /// Underlying entity record.
    #[must_use]
    pub const fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Reports whether the pursuer is replaying.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.entity.is_active()
    }

    /// Cell occupied by the pursuer, or `None` while dormant.
    #[must_use]
    pub const fn position(&self) -> Option<CellCoord> {
        self.entity.position()
    }

    /// Reports whether `turn` reached the activation threshold.
    #[must_use]
    pub fn due(&self, turn: Turn) -> bool {
        turn >= self.activation_turn
    }

    /// Starts the replay.
    pub fn activate(&mut self) {
        self.entity.activate();
    }

    /// Moves the pursuer to the history entry selected by `current_turn`.
    ///
    /// A dormant pursuer ignores the call. When the lag index falls outside
    /// the recorded history the pursuer stays where it is.
    pub fn update(&mut self, history: &[CellCoord], current_turn: Turn) {
        if !self.entity.is_active() {
            return;
        }

        let Some(lag) = current_turn.get().checked_sub(self.activation_turn.get()) else {
            return;
        };
        let Ok(lag) = usize::try_from(lag) else {
            return;
        };

        if let Some(&cell) = history.get(lag) {
            self.entity.move_to(cell);
        }
    }
}
