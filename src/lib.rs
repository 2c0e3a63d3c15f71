//! Punto AI Engine
//!
//! An AI for Punto, a card-stacking line game for two to four players:
//! - 9x9 grid, the first card goes in the center
//! - Every later card must touch a card already on the table
//! - A card may cover another only if its value is strictly higher
//! - Five in a row wins with two players, four with three or four
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board representation with bitboards and scoped probing
//! - [`rules`]: Placement, win and draw rules shared with the game loop
//! - [`movegen`]: Legal and theoretical move generation, move ordering
//! - [`eval`]: Position evaluation and heuristics
//! - [`search`]: Threat analysis, alpha-beta and paranoid search
//! - [`engine`]: Decision cascade integrating all components
//! - [`config`], [`player`]: Tunables, AI profiles and seats
//!
//! # Quick Start
//!
//! ```
//! use punto::{AIEngine, AiLevel, AiProfile, Board, Card, Color, Player};
//!
//! let mut board = Board::new(&[Color::Red, Color::Blue]);
//! board.play(punto::Move::new(punto::CENTER, Card::new(4, Color::Blue))).unwrap();
//!
//! let mut engine = AIEngine::new();
//! let player = Player::ai(Color::Red, AiProfile::smart(AiLevel::Medium))
//!     .with_hand(vec![Card::new(2, Color::Red), Card::new(7, Color::Red)]);
//!
//! if let Some(mv) = engine.get_move(&mut board, &player) {
//!     board.play(mv).unwrap();
//!     println!("AI plays {mv}");
//! }
//! ```
//!
//! # Search Priority
//!
//! The AI engine follows this priority:
//! 1. Immediate winning move
//! 2. Block an opponent's next-turn win
//! 3. Stack on an enemy card when it pays enough
//! 4. Block an opponent run when it pays enough
//! 5. Greedy, shallow, iterative deepening or paranoid search by profile

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod movegen;
pub mod player;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError, Card, Color, Move, Pos, BOARD_SIZE, CENTER};
pub use config::{AiLevel, AiProfile, AiType, ConfigError, EngineConfig};
pub use engine::{AIEngine, MoveResult, SearchType};
pub use player::Player;
