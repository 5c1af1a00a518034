#[cfg(test)]
mod tests {
    use crate::engine::config::EngineConfig;
    use crate::engine::mcts::{monte_carlo_choose, MonteCarloTree};
    use crate::engine::search::AlphaBetaEngine;
    use crate::logic::board::Board;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn bench_opening() {
        println!("--- Benchmarking Opening ---");
        let config = EngineConfig::default();
        let board = Board::from_moves(&[3]).unwrap();

        // Warmup
        AlphaBetaEngine::cached(&config).search(&board, 2);

        for depth in [4, 6] {
            let start = std::time::Instant::now();
            let plain = AlphaBetaEngine::new(&config).search(&board, depth);
            let plain_time = start.elapsed();

            let start = std::time::Instant::now();
            let cached = AlphaBetaEngine::cached(&config).search(&board, depth);
            let cached_time = start.elapsed();

            match (plain, cached) {
                (Some(plain), Some(cached)) => {
                    println!("Depth {depth} plain: {:?} in {plain_time:?}", plain.stats);
                    println!("Depth {depth} cached: {:?} in {cached_time:?}", cached.stats);
                    assert_eq!(plain.score, cached.score);
                }
                _ => panic!("Search returned None"),
            }
        }
    }

    #[test]
    fn bench_midgame() {
        println!("--- Benchmarking Midgame ---");
        let config = EngineConfig::default();
        let board = Board::from_moves(&[3, 3, 2, 4, 4, 2, 1, 5]).unwrap();

        let start = std::time::Instant::now();
        let result = AlphaBetaEngine::cached(&config).search(&board, 6);
        let duration = start.elapsed();

        if let Some(outcome) = result {
            println!("Midgame Depth 6 stats: {:?}", outcome.stats);
            println!("Time taken: {duration:?}");
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let nps = (f64::from(outcome.stats.nodes) / duration.as_secs_f64()) as u64;
            println!("NPS: {nps}");
        } else {
            panic!("Search returned None");
        }
    }

    #[test]
    fn bench_rollouts() {
        println!("--- Benchmarking Rollouts ---");
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::from_moves(&[3]).unwrap();

        let start = std::time::Instant::now();
        let result = monte_carlo_choose(&board, 500, &mut rng);
        let duration = start.elapsed();

        let outcome = result.expect("Monte-Carlo returned None");
        println!(
            "Rollouts: 7 x 500 samples, column {:?}, score {:.4}",
            outcome.best.last_column(),
            outcome.score
        );
        println!("Time taken: {duration:?}");

        let config = EngineConfig {
            tree_samples: 50,
            ..EngineConfig::default()
        };
        let mut tree = MonteCarloTree::new(board, &config);
        let start = std::time::Instant::now();
        let value = tree.run(100, &mut rng);
        println!(
            "Tree: 100 iterations, {} nodes, {} levels, value {value:.4} in {:?}",
            tree.len(),
            tree.levels(),
            start.elapsed()
        );
    }
}
