// Creative move selection: occasionally plays a near-best alternative to
// the search's top move, favouring lively moves.

use chess_core::{gives_check, Board, Move};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::config::CreativityConfig;
use crate::search::{is_mate_score, RootCandidate};

// Number of traits that make a move exciting: capture, promotion, castle, check
fn excitement(board: &Board, mv: &Move) -> u32 {
    [mv.is_capture(), mv.is_promotion(), mv.is_castle(), gives_check(board, mv)]
        .iter()
        .filter(|trait_present| **trait_present)
        .count() as u32
}

/// Picks a move among the root candidates close to the best score, or
/// returns `None` to keep the search's choice.
pub fn select_creative_move<R: Rng>(
    board: &Board,
    candidates: &[RootCandidate],
    config: &CreativityConfig,
    rng: &mut R,
) -> Option<Move> {
    if !config.enabled {
        return None;
    }

    let best = candidates.iter().filter(|c| !c.aborted).map(|c| c.score).max()?;
    // Never gamble with a forced mate on the board, for either side
    if is_mate_score(best) {
        return None;
    }

    let mut viable: Vec<&RootCandidate> = candidates
        .iter()
        .filter(|c| !c.aborted && best - c.score <= config.threshold_centipawns)
        .collect();
    viable.sort_by(|a, b| b.score.cmp(&a.score));
    if config.candidate_count > 0 {
        viable.truncate(config.candidate_count);
    }
    if viable.len() < 2 {
        return None;
    }

    let variability = config.variability_centipawns;
    let weights: Vec<f64> = viable
        .iter()
        .map(|c| {
            let noise = rng.gen_range(-variability..=variability);
            let closeness = (config.threshold_centipawns - (best - c.score) + noise).max(0);
            let bonus = 1.0 + config.excitement_bonus * excitement(board, &c.mv) as f64;
            closeness as f64 * bonus
        })
        .collect();

    // Fails when every weight is zero
    let dist = WeightedIndex::new(&weights).ok()?;
    let pick = viable[dist.sample(rng)];

    if pick.score != best {
        log::debug!(
            "creative choice {} ({}) over best score {}",
            pick.mv.to_coordinate(),
            pick.score,
            best
        );
    }
    Some(pick.mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MATE_SCORE;
    use rand::{rngs::StdRng, SeedableRng};

    // White pawn on e4 can push to e5 or take on d5.
    const FEN: &str = "4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1";

    fn board() -> Board {
        Board::from_fen(FEN).unwrap()
    }

    fn candidate(board: &Board, notation: &str, score: i32) -> RootCandidate {
        RootCandidate { mv: board.find_move(notation).unwrap(), score, aborted: false }
    }

    fn enabled() -> CreativityConfig {
        CreativityConfig {
            enabled: true,
            threshold_centipawns: 25,
            variability_centipawns: 0,
            candidate_count: 3,
            excitement_bonus: 0.0,
        }
    }

    fn tally(board: &Board, candidates: &[RootCandidate], config: &CreativityConfig, draws: usize) -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(7);
        (0..draws)
            .filter_map(|_| select_creative_move(board, candidates, config, &mut rng))
            .map(|mv| mv.to_coordinate())
            .collect()
    }

    #[test]
    fn disabled_keeps_the_search_choice() {
        let b = board();
        let candidates = [candidate(&b, "e4e5", 0), candidate(&b, "e1d2", -1)];
        let config = CreativityConfig { enabled: false, ..enabled() };
        assert_eq!(select_creative_move(&b, &candidates, &config, &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn needs_two_viable_candidates() {
        let b = board();
        let candidates = [
            candidate(&b, "e4e5", 0),
            candidate(&b, "e1d2", -26),
            RootCandidate { aborted: true, ..candidate(&b, "e1f2", 0) },
        ];
        assert_eq!(select_creative_move(&b, &candidates, &enabled(), &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn mate_scores_are_never_gambled() {
        let b = board();
        let candidates = [candidate(&b, "e4e5", MATE_SCORE - 3), candidate(&b, "e1d2", MATE_SCORE - 5)];
        assert_eq!(select_creative_move(&b, &candidates, &enabled(), &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn zero_total_weight_keeps_the_search_choice() {
        let b = board();
        let candidates = [candidate(&b, "e4e5", 0), candidate(&b, "e1d2", 0)];
        let config = CreativityConfig { threshold_centipawns: 0, ..enabled() };
        assert_eq!(select_creative_move(&b, &candidates, &config, &mut StdRng::seed_from_u64(1)), None);
    }

    #[test]
    fn picks_only_among_close_candidates() {
        let b = board();
        let candidates = [
            candidate(&b, "e4e5", 0),
            candidate(&b, "e1d2", -5),
            candidate(&b, "e1f2", -100),
        ];
        let picks = tally(&b, &candidates, &enabled(), 300);
        assert_eq!(picks.len(), 300);
        assert!(picks.iter().all(|mv| mv == "e4e5" || mv == "e1d2"));
        assert!(picks.iter().any(|mv| mv == "e4e5"));
        assert!(picks.iter().any(|mv| mv == "e1d2"));
    }

    #[test]
    fn candidate_count_caps_the_pool() {
        let b = board();
        let candidates = [
            candidate(&b, "e4e5", 0),
            candidate(&b, "e1d2", -2),
            candidate(&b, "e1f2", -4),
        ];
        let config = CreativityConfig { candidate_count: 2, ..enabled() };
        let picks = tally(&b, &candidates, &config, 300);
        assert!(picks.iter().all(|mv| mv != "e1f2"));
    }

    #[test]
    fn exciting_moves_are_favoured() {
        let b = board();
        let candidates = [candidate(&b, "e4e5", 0), candidate(&b, "e4d5", -20)];
        let config = CreativityConfig { excitement_bonus: 100.0, ..enabled() };
        // Weights 25 for the push and 5 * 101 for the capture.
        let picks = tally(&b, &candidates, &config, 300);
        let captures = picks.iter().filter(|mv| *mv == "e4d5").count();
        assert!(captures > 240, "capture picked {} times", captures);
    }

    #[test]
    fn same_seed_same_choice() {
        let b = board();
        let candidates = [candidate(&b, "e4e5", 0), candidate(&b, "e1d2", -3), candidate(&b, "e4d5", -6)];
        let config = CreativityConfig { variability_centipawns: 10, ..enabled() };
        assert_eq!(tally(&b, &candidates, &config, 50), tally(&b, &candidates, &config, 50));
    }
}
