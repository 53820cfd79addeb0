//! Integration tests for gridtac
//!
//! Tests the full stack: board rules, opponent engine, game session and config

use gridtac_core::{
    Board, EventLog, FirstMover, GameConfig, GameEvent, GameSession, GameStatus, Mark,
    Move, MoveEngine, MoveRejected, Tactic,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn board(text: &str) -> Board {
    text.parse().unwrap()
}

/// Random position with each cell empty, X or O
fn random_board(rng: &mut ChaCha8Rng, size: usize) -> Board {
    let rows: Vec<String> = (0..size)
        .map(|_| {
            (0..size)
                .map(|_| ['.', 'X', 'O'][rng.gen_range(0..3)])
                .collect()
        })
        .collect();
    board(&rows.join(" "))
}

/// Independent three-in-a-row check: enumerate every line segment explicitly
fn has_three(b: &Board, mark: Mark) -> bool {
    let n = b.size();
    let at = |r: usize, c: usize| b.get(r, c) == Some(mark);
    for r in 0..n {
        for c in 0..n {
            if c + 2 < n && at(r, c) && at(r, c + 1) && at(r, c + 2) {
                return true;
            }
            if r + 2 < n && at(r, c) && at(r + 1, c) && at(r + 2, c) {
                return true;
            }
            if r + 2 < n && c + 2 < n && at(r, c) && at(r + 1, c + 1) && at(r + 2, c + 2) {
                return true;
            }
            if r + 2 < n && c >= 2 && at(r, c) && at(r + 1, c - 1) && at(r + 2, c - 2) {
                return true;
            }
        }
    }
    false
}

// ============================================================================
// BOARD TESTS
// ============================================================================

#[test]
fn test_check_win_matches_line_enumeration() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for size in 3..=6 {
        for _ in 0..200 {
            let b = random_board(&mut rng, size);
            for mark in [Mark::Player, Mark::Opponent] {
                assert_eq!(b.check_win(mark), has_three(&b, mark), "{mark:?} on\n{b}");
            }
        }
    }
}

#[test]
fn test_reset_gives_empty_board() {
    for size in 3..=7 {
        let mut b = board("XOX OXO XOX");
        b.reset(size);
        assert_eq!(b.size(), size);
        assert!(!b.is_full());
        assert!(!b.check_win(Mark::Player));
        assert!(!b.check_win(Mark::Opponent));
        assert_eq!(b.empty_cells().count(), size * size);
    }
}

#[test]
fn test_full_board_without_line_is_draw() {
    assert_eq!(GameStatus::of(&board("XOX XOO OXX")), GameStatus::Draw);
    assert_eq!(GameStatus::of(&board("OXO OXX XOO")), GameStatus::Draw);
}

// ============================================================================
// ENGINE TESTS
// ============================================================================

#[test]
fn test_engine_places_exactly_one_mark() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let engine = MoveEngine::new();
    let mut checked = 0;

    while checked < 60 {
        let before = random_board(&mut rng, 3);
        if GameStatus::of(&before).is_over() {
            continue;
        }
        let mut after = before.clone();
        let decision = engine.choose_move(&mut after).unwrap();

        assert_eq!(after.empty_cells().count(), before.empty_cells().count() - 1);
        assert_eq!(before.get(decision.mv.row, decision.mv.col), Some(Mark::Empty));
        assert_eq!(after.get(decision.mv.row, decision.mv.col), Some(Mark::Opponent));
        for cell in before.empty_cells().filter(|&c| c != decision.mv) {
            assert!(after.is_empty(cell.row, cell.col));
        }
        checked += 1;
    }
}

#[test]
fn test_engine_noop_on_full_board() {
    let mut b = board("XOX OXO OXO");
    let before = b.clone();
    assert!(MoveEngine::new().choose_move(&mut b).is_none());
    assert_eq!(b, before);
}

#[test]
fn test_win_takes_precedence_over_block() {
    let engine = MoveEngine::new();
    for (text, expected) in [
        ("OO. XX. ...", Move::new(0, 2)),
        ("XX.. .... OO.. ....", Move::new(2, 2)),
        ("X.O. X.O. .... ....", Move::new(2, 2)),
    ] {
        let mut b = board(text);
        let decision = engine.choose_move(&mut b).unwrap();
        assert_eq!(decision.mv, expected, "board {text}");
        assert_eq!(decision.tactic, Tactic::Win);
        assert!(b.check_win(Mark::Opponent));
    }
}

#[test]
fn test_block_removes_player_threat() {
    let engine = MoveEngine::new();
    for text in ["X.. X.. ...", ".X. ... .X.", "..X .X. ...", "XX.. .... .... ...O"] {
        let mut b = board(text);
        let decision = engine.choose_move(&mut b).unwrap();
        assert_eq!(decision.tactic, Tactic::Block, "board {text}");

        // Single threat: no free cell completes a player line any more
        for cell in b.empty_cells() {
            let mut probe = b.clone();
            probe.place(cell.row, cell.col, Mark::Player).unwrap();
            assert!(!probe.check_win(Mark::Player), "{cell} still wins on\n{b}");
        }
    }
}

// ============================================================================
// SESSION SCENARIOS
// ============================================================================

#[test]
fn test_scenario_first_move_falls_to_search() {
    let mut session = GameSession::headless(GameConfig::new(3)).unwrap();
    let outcome = session.on_player_move(0, 0).unwrap();

    let reply = outcome.opponent_move.unwrap();
    assert!(matches!(reply.tactic, Tactic::Search { .. }));
    assert_ne!(reply.mv, Move::new(0, 0));
    assert_eq!(session.board().mark_count(), 2);
    assert_eq!(session.status(), GameStatus::InProgress);
}

#[test]
fn test_scenario_opponent_completes_row() {
    let mut b = board("OO. ... ...");
    let decision = MoveEngine::new().choose_move(&mut b).unwrap();
    assert_eq!(decision.mv, Move::new(0, 2));
    assert_eq!(GameStatus::of(&b), GameStatus::OpponentWin);
}

#[test]
fn test_scenario_opponent_blocks_row() {
    let mut b = board("XX. ... ...");
    let decision = MoveEngine::new().choose_move(&mut b).unwrap();
    assert_eq!(decision.mv, Move::new(0, 2));
    assert_eq!(decision.tactic, Tactic::Block);
    assert_eq!(GameStatus::of(&b), GameStatus::InProgress);
}

#[test]
fn test_session_events_for_one_turn() {
    let mut session = GameSession::new(GameConfig::new(3), EventLog::new()).unwrap();
    session.on_player_move(0, 0).unwrap();

    assert_eq!(
        session.observer().events(),
        &[
            GameEvent::BoardReset { size: 3 },
            GameEvent::StatusChanged { status: GameStatus::InProgress },
            GameEvent::CellChanged { mv: Move::new(0, 0), mark: Mark::Player },
            GameEvent::StatusChanged { status: GameStatus::InProgress },
            GameEvent::CellChanged { mv: Move::new(1, 1), mark: Mark::Opponent },
            GameEvent::StatusChanged { status: GameStatus::InProgress },
        ]
    );
}

#[test]
fn test_full_game_against_random_player_terminates() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for seed in 0..10 {
        let config = GameConfig::new(3)
            .with_first_mover(FirstMover::Random)
            .with_seed(seed);
        let mut session = GameSession::new(config, EventLog::new()).unwrap();

        while !session.status().is_over() {
            let cells: Vec<Move> = session.board().empty_cells().collect();
            let cell = cells[rng.gen_range(0..cells.len())];
            session.on_player_move(cell.row, cell.col).unwrap();
        }

        let status = session.status();
        assert_eq!(session.observer().last_status(), Some(status));
        let free = session.board().empty_cells().next();
        if let Some(free) = free {
            assert_eq!(
                session.on_player_move(free.row, free.col),
                Err(MoveRejected::GameOver(status))
            );
        }
    }
}

#[test]
fn test_mode_change_then_play() {
    let mut session = GameSession::headless(GameConfig::new(3)).unwrap();
    session.set_game_mode(4).unwrap();
    assert_eq!(session.size(), 4);

    // Corner on 4x4 draws the centre reply, then the open row must be blocked
    session.on_player_move(0, 0).unwrap();
    let outcome = session.on_player_move(0, 1).unwrap();
    let reply = outcome.opponent_move.unwrap();
    assert_eq!(reply.tactic, Tactic::Block);
    assert_eq!(reply.mv, Move::new(0, 2));
}

// ============================================================================
// CONFIG TESTS
// ============================================================================

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");

    let config = GameConfig::new(5)
        .with_first_mover(FirstMover::Opponent)
        .with_seed(31);
    config.save(&path).unwrap();
    assert_eq!(GameConfig::load(&path).unwrap(), config);

    std::fs::write(&path, r#"{ "size": 2 }"#).unwrap();
    assert!(GameConfig::load(&path).is_err());

    std::fs::write(&path, "not json").unwrap();
    assert!(GameConfig::load(&path).is_err());
}

#[test]
fn test_config_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

#[test]
fn test_session_from_loaded_config() {
    let config: GameConfig =
        serde_json::from_str(r#"{ "size": 3, "first_mover": "opponent" }"#).unwrap();
    let session = GameSession::headless(config).unwrap();
    assert_eq!(session.board().get(0, 0), Some(Mark::Opponent));
    assert_eq!(session.board().mark_count(), 1);
}
