//! Scanning light state machine.
//!
//! `step` is pure: it takes the current state and returns the next one
//! together with the port changes needed to show it. The overflow
//! handler is the only caller at runtime.

use crate::hal::gpio::LedIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards the last LED
    Forward,
    /// Towards the first LED
    Backward,
}

impl Direction {
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl ufmt::uDisplay for Direction {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        match self {
            Direction::Forward => f.write_str("fwd"),
            Direction::Backward => f.write_str("bwd"),
        }
    }
}

/// What happens when the light reaches either end
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnaroundStyle {
    /// Reverse immediately: ..8, 9, 8..
    Bounce,
    /// Hold the end LED for one extra step: ..8, 9, 9, 8..
    Dwell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationState {
    pub position: LedIndex,
    pub direction: Direction,
}

impl AnimationState {
    pub const INITIAL: AnimationState = AnimationState {
        position: LedIndex::FIRST,
        direction: Direction::Forward,
    };
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Port changes for one step. `off` is `None` when the lit LED stays put.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub off: Option<LedIndex>,
    pub on: LedIndex,
}

/// Advance the light by one position.
///
/// The direction flips before moving whenever the next position would
/// leave the array, so `position` never leaves `0..LED_COUNT`.
pub fn step(state: AnimationState, style: TurnaroundStyle) -> (AnimationState, Transition) {
    let ahead = match state.direction {
        Direction::Forward => state.position.next(),
        Direction::Backward => state.position.prev(),
    };

    let next = match (ahead, style) {
        (Some(position), _) => AnimationState {
            position,
            direction: state.direction,
        },
        (None, TurnaroundStyle::Dwell) => AnimationState {
            position: state.position,
            direction: state.direction.reversed(),
        },
        (None, TurnaroundStyle::Bounce) => {
            let direction = state.direction.reversed();
            let position = match direction {
                Direction::Forward => state.position.next(),
                Direction::Backward => state.position.prev(),
            };
            AnimationState {
                // A one-LED array has nowhere to go
                position: position.unwrap_or(state.position),
                direction,
            }
        }
    };

    let off = if next.position != state.position {
        Some(state.position)
    } else {
        None
    };

    (
        next,
        Transition {
            off,
            on: next.position,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LED_COUNT;

    fn at(position: u8, direction: Direction) -> AnimationState {
        AnimationState {
            position: LedIndex::new(position).unwrap(),
            direction,
        }
    }

    #[test]
    fn full_round_trip_from_start() {
        let mut state = AnimationState::INITIAL;
        let mut seen = vec![state.position.get()];
        for _ in 0..18 {
            state = step(state, TurnaroundStyle::Bounce).0;
            seen.push(state.position.get());
        }
        assert_eq!(
            seen,
            [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0]
        );
        assert_eq!(state.direction, Direction::Backward);
        // Next step turns around at the low end
        assert_eq!(step(state, TurnaroundStyle::Bounce).0, at(1, Direction::Forward));
    }

    #[test]
    fn flips_at_high_end() {
        let (next, t) = step(at(9, Direction::Forward), TurnaroundStyle::Bounce);
        assert_eq!(next, at(8, Direction::Backward));
        assert_eq!(t.off, LedIndex::new(9));
        assert_eq!(t.on, LedIndex::new(8).unwrap());
    }

    #[test]
    fn flips_at_low_end() {
        let (next, _) = step(at(0, Direction::Backward), TurnaroundStyle::Bounce);
        assert_eq!(next, at(1, Direction::Forward));
    }

    #[test]
    fn dwell_holds_endpoint_once() {
        let (held, t) = step(at(9, Direction::Forward), TurnaroundStyle::Dwell);
        assert_eq!(held, at(9, Direction::Backward));
        assert_eq!(t.off, None);
        assert_eq!(t.on, LedIndex::LAST);

        let (next, t) = step(held, TurnaroundStyle::Dwell);
        assert_eq!(next, at(8, Direction::Backward));
        assert_eq!(t.off, Some(LedIndex::LAST));
    }

    #[test]
    fn dwell_round_trip() {
        let mut state = AnimationState::INITIAL;
        let mut seen = vec![state.position.get()];
        for _ in 0..20 {
            state = step(state, TurnaroundStyle::Dwell).0;
            seen.push(state.position.get());
        }
        assert_eq!(
            seen,
            [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0]
        );
    }

    #[test]
    fn every_state_steps_to_a_neighbour() {
        for style in [TurnaroundStyle::Bounce, TurnaroundStyle::Dwell] {
            for index in LedIndex::all() {
                for direction in [Direction::Forward, Direction::Backward] {
                    let state = AnimationState {
                        position: index,
                        direction,
                    };
                    let (next, t) = step(state, style);
                    assert!(next.position.as_usize() < LED_COUNT);
                    let distance = next.position.get().abs_diff(index.get());
                    match style {
                        TurnaroundStyle::Bounce => assert_eq!(distance, 1),
                        TurnaroundStyle::Dwell => assert!(distance <= 1),
                    }
                    assert_eq!(t.on, next.position);
                    assert_eq!(t.off.is_some(), distance == 1);
                }
            }
        }
    }

    #[test]
    fn long_run_stays_in_bounds() {
        for style in [TurnaroundStyle::Bounce, TurnaroundStyle::Dwell] {
            for index in LedIndex::all() {
                for direction in [Direction::Forward, Direction::Backward] {
                    let mut state = AnimationState {
                        position: index,
                        direction,
                    };
                    for _ in 0..1000 {
                        let (next, _) = step(state, style);
                        // Direction only changes at the ends
                        if next.direction != state.direction {
                            assert!(
                                state.position == LedIndex::FIRST
                                    || state.position == LedIndex::LAST
                            );
                        }
                        state = next;
                        assert!(state.position <= LedIndex::LAST);
                    }
                }
            }
        }
    }
}
