mod clamp_loop;
mod lock_state;
mod machine;

pub(crate) use {clamp_loop::LockSession, lock_state::LockState};

pub use {
    clamp_loop::LoopExit,
    lock_state::{LockPhase, LockSnapshot},
    machine::{LockMachine, LockTiming, ToggleOutcome},
};
