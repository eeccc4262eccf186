//! Stateless decoders for the three wire protocols this crate understands,
//! each translating its bytes directly into [`crate::feed::Feed`] calls.
//!
//! All three share one shape — `parse_message`/`parse_many`, PITCH
//! additionally `parse_packet` — but are not unified behind a trait: each
//! method is generic over its `Feed<H>` argument instead, so a call site
//! that already knows its protocol at compile time never pays for dynamic
//! dispatch (spec's preference for the hot path, see crate-level docs).

mod itch_shared;
mod wire;

pub mod itch41;
pub mod itch50;
pub mod pitch;

pub use itch41::Itch41Parser;
pub use itch50::Itch50Parser;
pub use pitch::PitchParser;
