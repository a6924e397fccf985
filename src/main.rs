//! Headless runner (default binary).
//!
//! Plays seeded games with a random placement driver: every piece gets a
//! random rotation and target column and is then hard-dropped. Useful for
//! smoke-testing rule changes and for profiling the cascade.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::Rng;

use puyo_sim::core::GameState;
use puyo_sim::types::{Direction, GameAction, GameConfig};

#[derive(Debug, Parser)]
#[command(name = "puyo-sim")]
#[command(about = "Play seeded pair-drop games without a display")]
struct Cli {
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, default_value_t = 1)]
    games: u32,
    #[arg(long, default_value_t = 500)]
    max_pieces: u32,
    #[arg(long, default_value_t = puyo_sim::types::DEFAULT_BOARD_WIDTH)]
    width: u8,
    #[arg(long, default_value_t = puyo_sim::types::DEFAULT_BOARD_HEIGHT)]
    height: u8,
    #[arg(long, default_value_t = puyo_sim::types::DEFAULT_PALETTE_SIZE)]
    colors: u8,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = GameConfig {
        width: cli.width,
        height: cli.height,
        palette_size: cli.colors,
        ..GameConfig::default()
    };
    let mut game = GameState::with_config(config, cli.seed)
        .with_context(|| format!("invalid game configuration {config:?}"))?;

    for round in 0..cli.games {
        if round > 0 {
            game.apply_action(GameAction::NewGame);
        }
        play(&mut game, cli.max_pieces);

        println!("game {}", round + 1);
        print!("{}", game.board());
        println!(
            "score {}  level {}  pieces {}  cleared {}  max chain {}  {}",
            game.score(),
            game.level(),
            game.pieces_locked(),
            game.total_cleared(),
            game.max_chain(),
            if game.is_game_over() {
                "game over"
            } else {
                "piece limit"
            }
        );
    }

    Ok(())
}

fn play(game: &mut GameState, max_pieces: u32) {
    let width = game.config().width;

    while !game.is_game_over() && game.pieces_locked() < max_pieces {
        let turns = game.rng_mut().random_range(0..4);
        let target = game.rng_mut().random_range(0..width) as i16;

        for _ in 0..turns {
            game.rotate();
        }
        while let Some(x) = game.current().map(|p| p.x) {
            let dir = if target < x {
                Direction::Left
            } else if target > x {
                Direction::Right
            } else {
                break;
            };
            if !game.move_horizontal(dir) {
                break;
            }
        }

        if let Some(event) = game.hard_drop() {
            if event.chains > 1 {
                info!("{}-chain for {} points", event.chains, event.score_gained);
            }
        }
    }
}
