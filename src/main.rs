//! Punto self-play demo
//!
//! Plays one seeded match between AI seats and prints a JSON summary.
//!
//! Usage: `punto [seed] [profiles]`, where `profiles` is a comma-separated
//! list such as `smart:3,paranoid:2,smart:1` (two to four seats).

use std::collections::BTreeMap;
use std::error::Error;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use punto::board::{Pos, HAND_SIZE};
use punto::player::shuffled_deck;
use punto::rules::{check_winner, find_winning_line, hands_exhausted, resolve_draw};
use punto::{AIEngine, AiProfile, Board, Color, EngineConfig, Move, Player};

const DEFAULT_SEED: u64 = 42;
const DEFAULT_PROFILES: &str = "smart:3,paranoid:2,smart:1";

#[derive(Serialize)]
struct Turn {
    color: Color,
    #[serde(rename = "move")]
    mv: Option<Move>,
    tag: &'static str,
    score: i32,
    time_ms: u64,
}

#[derive(Serialize)]
struct SeatSummary {
    color: Color,
    profile: String,
    moves: usize,
    passes: usize,
    avg_think_ms: f64,
    tags: BTreeMap<&'static str, usize>,
}

#[derive(Serialize)]
struct MatchSummary {
    seed: u64,
    winner: Option<Color>,
    /// "line", "draw" or "none"
    decided_by: &'static str,
    winning_line: Option<Vec<Pos>>,
    cards_on_board: u32,
    seats: Vec<SeatSummary>,
    turns: Vec<Turn>,
}

fn parse_args() -> Result<(u64, Vec<AiProfile>), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => DEFAULT_SEED,
    };
    let profiles = args.next().unwrap_or_else(|| DEFAULT_PROFILES.to_string());
    let profiles = profiles
        .split(',')
        .map(|p| p.trim().parse::<AiProfile>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok((seed, profiles))
}

fn main() -> Result<(), Box<dyn Error>> {
    let (seed, profiles) = parse_args()?;
    let seats: Vec<Color> = Color::ALL.iter().copied().take(profiles.len()).collect();
    let mut board = Board::try_new(&seats)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut players: Vec<Player> = seats
        .iter()
        .zip(&profiles)
        .map(|(&color, &profile)| {
            let mut player = Player::ai(color, profile).with_deck(shuffled_deck(color, &mut rng));
            player.deal(HAND_SIZE);
            player
        })
        .collect();

    let config = EngineConfig::default().with_time_limit_ms(2000);
    let mut engines = Vec::with_capacity(players.len());
    for _ in &players {
        engines.push(AIEngine::with_config(config.clone())?);
    }

    let mut turns = Vec::new();
    let mut passes_in_a_row = 0;
    let mut winner = None;

    for seat in (0..players.len()).cycle() {
        if hands_exhausted(&players) || passes_in_a_row >= players.len() {
            break;
        }

        let start = Instant::now();
        let result = engines[seat].choose_move(&mut board, &players[seat], start);
        let player = &mut players[seat];

        match result.best_move {
            Some(mv) => {
                board.play(mv)?;
                player.discard(mv.card);
                player.deal(1);
                passes_in_a_row = 0;
            }
            None => passes_in_a_row += 1,
        }
        turns.push(Turn {
            color: player.color,
            mv: result.best_move,
            tag: result.search_type.tag(),
            score: result.score,
            time_ms: result.time_ms,
        });

        if let Some(color) = check_winner(&board) {
            winner = Some(color);
            break;
        }
    }

    let (winner, decided_by, winning_line) = match winner {
        Some(color) => (Some(color), "line", find_winning_line(&board, color)),
        None => match resolve_draw(&board) {
            Some(color) => (Some(color), "draw", None),
            None => (None, "none", None),
        },
    };

    let seats = players
        .iter()
        .zip(&profiles)
        .map(|(player, profile)| {
            let own: Vec<&Turn> = turns.iter().filter(|t| t.color == player.color).collect();
            let played: Vec<&&Turn> = own.iter().filter(|t| t.mv.is_some()).collect();
            let think: u64 = played.iter().map(|t| t.time_ms).sum();
            let mut tags = BTreeMap::new();
            for turn in &played {
                *tags.entry(turn.tag).or_insert(0) += 1;
            }
            SeatSummary {
                color: player.color,
                profile: profile.to_string(),
                moves: played.len(),
                passes: own.len() - played.len(),
                avg_think_ms: if played.is_empty() {
                    0.0
                } else {
                    think as f64 / played.len() as f64
                },
                tags,
            }
        })
        .collect();

    let summary = MatchSummary {
        seed,
        winner,
        decided_by,
        winning_line,
        cards_on_board: board.card_count(),
        seats,
        turns,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
