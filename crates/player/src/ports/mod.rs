//! Player port definitions.
//!
//! The client core talks to its two collaborators, the rendering layer and the
//! socket writer, only through the traits in `outbound`.

pub mod outbound;
