use crate::engine::config::EngineConfig;
use crate::engine::search::{alpha_beta_choose, AlphaBetaEngine};
use crate::engine::tt::CachePolicy;
use crate::logic::board::{Board, Color, Outcome};
use crate::logic::eval_constants::{MINUS_INFINITY, PLUS_INFINITY, WIN_SCORE};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_position(rng: &mut StdRng, plies: usize) -> Option<Board> {
    let mut board = Board::new();
    for _ in 0..plies {
        if board.is_terminal() {
            return None;
        }
        board = board.random_move(rng);
    }
    (!board.is_terminal()).then_some(board)
}

#[test]
fn test_depth_one_takes_immediate_win_for_red() {
    // Red has three in column 3.
    let board = Board::from_moves(&[3, 0, 3, 0, 3, 1]).unwrap();
    let outcome = alpha_beta_choose(&board, 1).unwrap();
    assert_eq!(outcome.best.last_column(), Some(3));
    assert_eq!(outcome.score, WIN_SCORE);
    assert_eq!(outcome.best.winner_info().outcome(), Outcome::Win(Color::Red));
}

#[test]
fn test_depth_one_takes_immediate_win_for_yellow() {
    // Yellow has three in column 3 and is to move.
    let board = Board::from_moves(&[0, 3, 0, 3, 1, 3, 6]).unwrap();
    assert_eq!(board.next_player(), Color::Yellow);
    let outcome = alpha_beta_choose(&board, 1).unwrap();
    assert_eq!(outcome.best.last_column(), Some(3));
    assert_eq!(outcome.score, WIN_SCORE);
}

#[test]
fn test_depth_two_blocks_threat() {
    // Yellow threatens column 3; every other Red move loses at once.
    let board = Board::from_moves(&[0, 3, 1, 3, 6, 3]).unwrap();
    assert_eq!(board.next_player(), Color::Red);
    let mut engine = AlphaBetaEngine::new(&EngineConfig::default());
    let outcome = engine.search(&board, 2).unwrap();
    assert_eq!(outcome.best.last_column(), Some(3));
    assert!(outcome.score > -WIN_SCORE);
}

#[test]
fn test_empty_board_prefers_center_at_depth_one() {
    let outcome = alpha_beta_choose(&Board::new(), 1).unwrap();
    assert_eq!(outcome.best.last_column(), Some(3));
    assert_eq!(outcome.score, 28);
    assert_eq!(outcome.stats.nodes, 7);
    assert_eq!(outcome.stats.depth, 1);
}

#[test]
fn test_search_on_finished_game_returns_none() {
    let board = Board::from_moves(&[3, 0, 3, 0, 3, 0, 3]).unwrap();
    assert!(alpha_beta_choose(&board, 4).is_none());
}

#[test]
fn test_prune_returns_bound_and_child() {
    // Narrow window: the forcing win is generated first and cuts off at once.
    let board = Board::from_moves(&[3, 0, 3, 0, 3, 1]).unwrap();
    let mut engine = AlphaBetaEngine::new(&EngineConfig::default());
    let (score, best) = engine.alpha_beta(board, -10, 10, true, false, 3, 0);
    assert_eq!(score, WIN_SCORE);
    assert_eq!(best.and_then(|b| b.last_column()), Some(3));
    assert_eq!(engine.nodes_searched(), 1);
}

#[test]
fn test_minimizing_node_prunes_on_beta() {
    // Yellow to move with a win available; from Red's frame this is a min node.
    let board = Board::from_moves(&[0, 3, 0, 3, 1, 3, 6]).unwrap();
    let mut engine = AlphaBetaEngine::new(&EngineConfig::default());
    let (score, best) = engine.alpha_beta(board, -10, 10, false, false, 3, 0);
    assert_eq!(score, -WIN_SCORE);
    assert_eq!(best.and_then(|b| b.last_column()), Some(3));
}

#[test]
fn test_leaf_returns_perspective_score() {
    let board = Board::from_moves(&[0]).unwrap();
    let mut engine = AlphaBetaEngine::new(&EngineConfig::default());
    let (red, _) = engine.alpha_beta(board, MINUS_INFINITY, PLUS_INFINITY, true, false, 0, 0);
    let (yellow, _) = engine.alpha_beta(board, MINUS_INFINITY, PLUS_INFINITY, true, true, 0, 0);
    assert_eq!(red, board.score());
    assert_eq!(yellow, -board.score());
}

#[test]
fn test_cache_does_not_change_scores() {
    let config = EngineConfig::default();
    let mut rng = StdRng::seed_from_u64(31);
    let mut checked = 0;
    while checked < 25 {
        let plies = checked % 18;
        let Some(board) = random_position(&mut rng, plies) else {
            continue;
        };
        for depth in 1..=5 {
            let plain = AlphaBetaEngine::new(&config).search(&board, depth).unwrap();
            let mut cached_engine = AlphaBetaEngine::cached(&config);
            let cached = cached_engine.search(&board, depth).unwrap();
            assert_eq!(
                plain.score, cached.score,
                "depth {depth} position {board:?}\n{board}"
            );
            assert!(!cached_engine.cache().is_empty());
        }
        checked += 1;
    }
}

#[test]
fn test_mirrored_positions_score_alike() {
    let config = EngineConfig::default();
    let mut rng = StdRng::seed_from_u64(77);
    let mut checked = 0;
    while checked < 10 {
        let Some(board) = random_position(&mut rng, 6 + checked) else {
            continue;
        };
        let a = AlphaBetaEngine::cached(&config).search(&board, 4).unwrap();
        let b = AlphaBetaEngine::cached(&config)
            .search(&board.symmetric(), 4)
            .unwrap();
        assert_eq!(a.score, b.score);
        checked += 1;
    }
}
