//! Model-View-Intent (MVI) primitives.
//!
//! State owned by the runtime (form state in particular) only changes by
//! feeding an intent through a reducer.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot the rendering layer draws from
//! - **Intent**: User actions or server responses
//! - **Reducer**: Pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
