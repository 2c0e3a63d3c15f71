//! Game rules for Punto
//!
//! Shared by the game loop and the engine so both agree on legality:
//! - Placement (center opening, adjacency, stacking on lower values)
//! - Win condition (N same-color cards in a row)
//! - Draw resolution when every hand runs dry

pub mod draw;
pub mod placement;
pub mod win;

// Re-exports for convenient access
pub use draw::{count_sequences, hands_exhausted, resolve_draw, SequenceTally};
pub use placement::{is_legal_placement, is_open_cell};
pub use win::{check_winner, find_winning_line, has_line_through, has_winning_line};
