//! ECS systems for the fort siege simulation.
//!
//! Systems contain the game logic that operates on components.
//!
//! ## Tick order
//!
//! The schedule is a single chain. Every stage sees the despawns of the one
//! before it, so no stage can act on an entity removed earlier in the tick.
//!
//! 1. `tick_start_system` - advances the clock, records enemies at tick start
//! 2. `movement_system` - enemies march toward the fort
//! 3. `fort_breach_system` - enemies at the wall cost morale and are removed
//! 4. `combat_system` - ready defenders strike the first enemy in range
//! 5. `casualty_system` - dead defenders and enemies are removed
//! 6. `progression_system` - defeat, wave clear, day advance, wave countdown

pub mod clock;
pub mod combat;
pub mod morale;
pub mod movement;
pub mod progression;

pub use clock::*;
pub use combat::*;
pub use morale::*;
pub use movement::*;
pub use progression::*;
