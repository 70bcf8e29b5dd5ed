use std::time::Instant;

use tracing::{debug, error, trace};

use crate::error::SearchError;
use crate::evaluation::Evaluate;
use crate::rules::Rules;
use crate::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult<M> {
    pub score: Score,
    pub best_move: Option<M>,
}

impl<M> SearchResult<M> {
    fn leaf(score: Score) -> Self {
        Self { score, best_move: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub alpha: Score,
    pub beta: Score,
}

impl Bounds {
    pub fn new(alpha: Score, beta: Score) -> Self {
        assert!(alpha <= beta, "inverted search window: alpha {alpha} > beta {beta}");
        Self { alpha, beta }
    }

    pub fn full() -> Self {
        Self::new(Score::MIN, Score::MAX)
    }

    pub fn raise_alpha(&mut self, score: Score) {
        self.alpha = self.alpha.max(score);
    }

    pub fn lower_beta(&mut self, score: Score) {
        self.beta = self.beta.min(score);
    }

    pub fn is_cutoff(&self) -> bool {
        self.beta <= self.alpha
    }
}

pub struct Search<'a, P: Rules, E> {
    position: &'a mut P,
    evaluator: &'a E,
    nodes_searched: u64,
}

impl<'a, P, E> Search<'a, P, E>
where
    P: Rules,
    E: Evaluate<P>,
{
    pub fn new(position: &'a mut P, evaluator: &'a E) -> Self {
        Self {
            position,
            evaluator,
            nodes_searched: 0,
        }
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    // The first move reaching the best score is kept.
    pub fn search(
        &mut self,
        depth: u32,
        alpha: Score,
        beta: Score,
        maximizing: bool,
    ) -> Result<SearchResult<P::Move>, SearchError> {
        let mut bounds = Bounds::new(alpha, beta);
        debug_assert_eq!(self.position.side_to_move().is_maximizing(), maximizing);
        self.nodes_searched += 1;

        if depth == 0 || self.position.is_game_over() {
            return Ok(SearchResult::leaf(self.evaluator.evaluate(self.position)));
        }

        let moves = self.position.legal_moves();
        if moves.is_empty() {
            error!(depth, "rules produced no legal moves for a position they consider ongoing");
            return Err(SearchError::NoLegalMoves);
        }

        let mut best = SearchResult {
            score: if maximizing { Score::MIN } else { Score::MAX },
            best_move: None,
        };

        for mv in moves {
            self.position.apply(mv);
            let child = self.search(depth - 1, bounds.alpha, bounds.beta, !maximizing);
            self.position.undo();
            let score = child?.score;

            let improves = if maximizing { score > best.score } else { score < best.score };
            if improves || best.best_move.is_none() {
                best.score = score;
                best.best_move = Some(mv);
            }

            if maximizing {
                bounds.raise_alpha(score);
            } else {
                bounds.lower_beta(score);
            }
            if bounds.is_cutoff() {
                trace!(depth, alpha = %bounds.alpha, beta = %bounds.beta, "cutoff");
                break;
            }
        }

        Ok(best)
    }
}

// Full-window search for the side to move.
pub fn find_best_move<P, E>(
    position: &mut P,
    evaluator: &E,
    depth: u32,
) -> Result<SearchResult<P::Move>, SearchError>
where
    P: Rules,
    E: Evaluate<P>,
{
    find_best_move_counting(position, evaluator, depth).map(|(result, _)| result)
}

// Like `find_best_move`, also returning the number of nodes visited.
pub fn find_best_move_counting<P, E>(
    position: &mut P,
    evaluator: &E,
    depth: u32,
) -> Result<(SearchResult<P::Move>, u64), SearchError>
where
    P: Rules,
    E: Evaluate<P>,
{
    let maximizing = position.side_to_move().is_maximizing();
    let start_time = Instant::now();
    let mut search = Search::new(position, evaluator);
    let window = Bounds::full();
    let result = search.search(depth, window.alpha, window.beta, maximizing)?;
    let nodes = search.nodes_searched();
    debug!(
        depth,
        score = %result.score,
        nodes,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "search finished"
    );
    Ok((result, nodes))
}
