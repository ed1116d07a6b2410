//! Reaction policy - the pure state machine behind every reaction change
//!
//! Given the identity's current reaction on an item and the requested one,
//! [`decide`] returns the [`Transition`] to apply. It performs no I/O, so the
//! storage layer can run it inside whatever atomic unit it provides.
//!
//! | existing  | requested | transition | likes | dislikes | result  |
//! |-----------|-----------|------------|-------|----------|---------|
//! | none      | like      | Create     | +1    | 0        | like    |
//! | none      | dislike   | Create     | 0     | +1       | dislike |
//! | like      | like      | Clear      | -1    | 0        | none    |
//! | dislike   | dislike   | Clear      | 0     | -1       | none    |
//! | dislike   | like      | Switch     | +1    | -1       | like    |
//! | like      | dislike   | Switch     | -1    | +1       | dislike |

use crate::entities::ReactionKind;

/// Transition chosen for one reaction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// No record yet: insert one
    Create { kind: ReactionKind },
    /// Same kind requested again: toggle off by deleting the record
    Clear { kind: ReactionKind },
    /// Different kind requested: rewrite the record
    Switch { from: ReactionKind, to: ReactionKind },
}

/// Mutation to apply to the reaction record set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordChange {
    Insert(ReactionKind),
    Delete,
    Update { from: ReactionKind, to: ReactionKind },
}

/// Signed change for each counter. Values are always -1, 0 or +1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub likes: i8,
    pub dislikes: i8,
}

impl CounterDelta {
    pub const fn new(likes: i8, dislikes: i8) -> Self {
        Self { likes, dislikes }
    }

    const fn for_kind(kind: ReactionKind, amount: i8) -> Self {
        match kind {
            ReactionKind::Like => Self::new(amount, 0),
            ReactionKind::Dislike => Self::new(0, amount),
        }
    }
}

impl std::ops::Add for CounterDelta {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.likes + rhs.likes, self.dislikes + rhs.dislikes)
    }
}

/// Decide the transition for `requested` given the `existing` reaction.
pub fn decide(existing: Option<ReactionKind>, requested: ReactionKind) -> Transition {
    match existing {
        None => Transition::Create { kind: requested },
        Some(current) if current == requested => Transition::Clear { kind: requested },
        Some(current) => Transition::Switch {
            from: current,
            to: requested,
        },
    }
}

impl Transition {
    /// Record mutation implied by this transition
    #[must_use]
    pub const fn record_change(&self) -> RecordChange {
        match *self {
            Self::Create { kind } => RecordChange::Insert(kind),
            Self::Clear { .. } => RecordChange::Delete,
            Self::Switch { from, to } => RecordChange::Update { from, to },
        }
    }

    /// Counter deltas implied by this transition
    #[must_use]
    pub fn delta(&self) -> CounterDelta {
        match *self {
            Self::Create { kind } => CounterDelta::for_kind(kind, 1),
            Self::Clear { kind } => CounterDelta::for_kind(kind, -1),
            Self::Switch { from, to } => {
                CounterDelta::for_kind(from, -1) + CounterDelta::for_kind(to, 1)
            }
        }
    }

    /// The identity's reaction once the transition is applied
    #[must_use]
    pub const fn resulting_reaction(&self) -> Option<ReactionKind> {
        match *self {
            Self::Create { kind } => Some(kind),
            Self::Clear { .. } => None,
            Self::Switch { to, .. } => Some(to),
        }
    }

    /// Short name used in logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Clear { .. } => "clear",
            Self::Switch { .. } => "switch",
        }
    }
}
