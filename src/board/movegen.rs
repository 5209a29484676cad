//! Move generation: pseudo-legal generation per piece kind, the
//! simulate-then-check legality filter, and square-attack tests.

use super::types::{CastleSide, Color, Move, Piece, Square};
use super::GameState;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl GameState {
    /// All fully legal moves for the side to move.
    ///
    /// Pseudo-legal moves are generated per piece, then each is simulated
    /// and discarded if it leaves the mover's king attacked. Pins and check
    /// evasion fall out of this filter, including the en-passant capture
    /// that would expose the king along the cleared rank. Order is
    /// deterministic: rank-major board scan, piece rules in a fixed order.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let mover = self.side_to_move;
        let mut scratch = self.clone();
        self.pseudo_legal_moves()
            .into_iter()
            .filter(|m| {
                let snapshot = scratch.make_move(m);
                let safe = !scratch.in_check(mover);
                scratch.unmake_move(m, snapshot);
                safe
            })
            .collect()
    }

    /// Moves obeying piece movement rules, before the check-safety filter.
    pub(crate) fn pseudo_legal_moves(&self) -> Vec<Move> {
        let color = self.side_to_move;
        let mut moves = Vec::with_capacity(48);

        for (from, piece_color, piece) in self.grid.occupied_squares() {
            if piece_color != color {
                continue;
            }
            match piece {
                Piece::Pawn => self.pawn_moves(from, color, &mut moves),
                Piece::Knight => self.leaper_moves(from, color, Piece::Knight, &KNIGHT_OFFSETS, &mut moves),
                Piece::Bishop => self.sliding_moves(from, color, Piece::Bishop, &BISHOP_DIRECTIONS, &mut moves),
                Piece::Rook => self.sliding_moves(from, color, Piece::Rook, &ROOK_DIRECTIONS, &mut moves),
                Piece::Queen => {
                    self.sliding_moves(from, color, Piece::Queen, &ROOK_DIRECTIONS, &mut moves);
                    self.sliding_moves(from, color, Piece::Queen, &BISHOP_DIRECTIONS, &mut moves);
                }
                Piece::King => {
                    self.leaper_moves(from, color, Piece::King, &KING_OFFSETS, &mut moves);
                    self.castling_moves(from, color, &mut moves);
                }
            }
        }

        moves
    }

    fn pawn_moves(&self, from: Square, color: Color, moves: &mut Vec<Move>) {
        let dir = color.pawn_direction();
        let start_rank = match color {
            Color::White => 1,
            Color::Black => 6,
        };
        let promotion_rank = color.opponent().back_rank();

        // Single and double advances
        if let Some(one_up) = from.offset(dir, 0) {
            if self.grid.is_empty(one_up) {
                push_pawn_move(
                    Move::new(from, one_up, Piece::Pawn),
                    promotion_rank,
                    moves,
                );
                if from.rank() == start_rank {
                    if let Some(two_up) = from.offset(2 * dir, 0) {
                        if self.grid.is_empty(two_up) {
                            let mut mv = Move::new(from, two_up, Piece::Pawn);
                            mv.is_double_pawn_push = true;
                            moves.push(mv);
                        }
                    }
                }
            }
        }

        // Diagonal captures and en passant
        for df in [-1, 1] {
            let Some(target) = from.offset(dir, df) else {
                continue;
            };
            if let Some((occupant_color, occupant)) = self.grid.piece_at(target) {
                if occupant_color != color {
                    let mut mv = Move::new(from, target, Piece::Pawn);
                    mv.captured = Some(occupant);
                    push_pawn_move(mv, promotion_rank, moves);
                }
            } else if self.en_passant_target == Some(target) {
                let mut mv = Move::new(from, target, Piece::Pawn);
                mv.captured = Some(Piece::Pawn);
                mv.is_en_passant = true;
                moves.push(mv);
            }
        }
    }

    fn leaper_moves(
        &self,
        from: Square,
        color: Color,
        piece: Piece,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, df) in offsets {
            let Some(target) = from.offset(dr, df) else {
                continue;
            };
            match self.grid.piece_at(target) {
                None => moves.push(Move::new(from, target, piece)),
                Some((occupant_color, occupant)) if occupant_color != color => {
                    let mut mv = Move::new(from, target, piece);
                    mv.captured = Some(occupant);
                    moves.push(mv);
                }
                Some(_) => {}
            }
        }
    }

    fn sliding_moves(
        &self,
        from: Square,
        color: Color,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, df) in directions {
            let mut current = from;
            while let Some(target) = current.offset(dr, df) {
                match self.grid.piece_at(target) {
                    None => {
                        moves.push(Move::new(from, target, piece));
                        current = target;
                    }
                    Some((occupant_color, occupant)) => {
                        if occupant_color != color {
                            let mut mv = Move::new(from, target, piece);
                            mv.captured = Some(occupant);
                            moves.push(mv);
                        }
                        break;
                    }
                }
            }
        }
    }

    /// Castling: rights held, rook at home, intervening squares empty, and
    /// none of the king's path squares (start, transit, destination)
    /// attacked by the opponent.
    fn castling_moves(&self, from: Square, color: Color, moves: &mut Vec<Move>) {
        let rank = color.back_rank();
        if from != Square(rank, 4) {
            return;
        }
        let opponent = color.opponent();

        for (side, rook_file, empty_files, path_files) in [
            (CastleSide::KingSide, 7, &[5, 6][..], &[4, 5, 6][..]),
            (CastleSide::QueenSide, 0, &[1, 2, 3][..], &[4, 3, 2][..]),
        ] {
            if !self.castling.has(color, side) {
                continue;
            }
            if self.grid.piece_at(Square(rank, rook_file)) != Some((color, Piece::Rook)) {
                continue;
            }
            if empty_files
                .iter()
                .any(|&file| !self.grid.is_empty(Square(rank, file)))
            {
                continue;
            }
            if path_files
                .iter()
                .any(|&file| self.square_attacked(Square(rank, file), opponent))
            {
                continue;
            }
            let king_to_file = path_files[2];
            let mut mv = Move::new(from, Square(rank, king_to_file), Piece::King);
            mv.castle = Some(side);
            moves.push(mv);
        }
    }

    /// Whether the king of `color` is currently attacked.
    #[must_use]
    pub fn in_check(&self, color: Color) -> bool {
        match self.grid.king_square(color) {
            Some(king_sq) => self.square_attacked(king_sq, color.opponent()),
            None => false,
        }
    }

    /// Whether any piece of color `by` attacks `sq`.
    ///
    /// Uses direct attack templates rather than scanning full pseudo-move
    /// generation: pawn capture diagonals, knight and king offsets, and
    /// sliding rays. Castling rights play no role in attacking.
    #[must_use]
    pub fn square_attacked(&self, sq: Square, by: Color) -> bool {
        // Pawns attack diagonally forward, so look one rank backwards.
        let dir = by.pawn_direction();
        for df in [-1, 1] {
            if let Some(origin) = sq.offset(-dir, df) {
                if self.grid.piece_at(origin) == Some((by, Piece::Pawn)) {
                    return true;
                }
            }
        }

        for &(dr, df) in &KNIGHT_OFFSETS {
            if let Some(origin) = sq.offset(dr, df) {
                if self.grid.piece_at(origin) == Some((by, Piece::Knight)) {
                    return true;
                }
            }
        }

        for &(dr, df) in &KING_OFFSETS {
            if let Some(origin) = sq.offset(dr, df) {
                if self.grid.piece_at(origin) == Some((by, Piece::King)) {
                    return true;
                }
            }
        }

        self.ray_attacked(sq, by, &ROOK_DIRECTIONS, Piece::Rook)
            || self.ray_attacked(sq, by, &BISHOP_DIRECTIONS, Piece::Bishop)
    }

    fn ray_attacked(
        &self,
        sq: Square,
        by: Color,
        directions: &[(i8, i8)],
        slider: Piece,
    ) -> bool {
        for &(dr, df) in directions {
            let mut current = sq;
            while let Some(target) = current.offset(dr, df) {
                match self.grid.piece_at(target) {
                    None => current = target,
                    Some((occupant_color, occupant)) => {
                        if occupant_color == by
                            && (occupant == slider || occupant == Piece::Queen)
                        {
                            return true;
                        }
                        break;
                    }
                }
            }
        }
        false
    }

    /// Count leaf nodes of the legal game tree to the given depth.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in &moves {
            let snapshot = self.make_move(mv);
            nodes += self.perft(depth - 1);
            self.unmake_move(mv, snapshot);
        }
        nodes
    }
}

fn push_pawn_move(mv: Move, promotion_rank: usize, moves: &mut Vec<Move>) {
    if mv.to.rank() == promotion_rank {
        for target in Piece::PROMOTION_TARGETS {
            moves.push(mv.with_promotion(target));
        }
    } else {
        moves.push(mv);
    }
}
