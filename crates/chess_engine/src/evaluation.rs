use chess_core::{Board, Color, Piece, PieceType, Position};

// Standard piece values used in chess engines, measured in centipawns (100 = 1 pawn)
const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

// Side to move gets a small bonus for having the initiative
const TEMPO_BONUS: i32 = 10;
const BISHOP_PAIR_BONUS: i32 = 30;

// Piece placement
const PAWN_ADVANCE_BASE: i32 = 4;        // per rank advanced, edge files
const PAWN_ADVANCE_CENTER: i32 = 2;      // extra per rank advanced, per step toward the center
const KNIGHT_CENTRALITY: i32 = 6;
const BISHOP_CENTRALITY: i32 = 4;
const QUEEN_CENTRALITY: i32 = 2;
const UNDEVELOPED_MINOR_PENALTY: i32 = 15;
const ROOK_OPEN_FILE_BONUS: i32 = 20;
const ROOK_HALF_OPEN_FILE_BONUS: i32 = 10;
const ROOK_SEVENTH_RANK_BONUS: i32 = 20;

// Pawn structure
const DOUBLED_PAWN_PENALTY: i32 = 15;
const ISOLATED_PAWN_PENALTY: i32 = 12;
// Indexed by ranks advanced from the pawn's starting rank
const PASSED_PAWN_BONUS: [i32; 7] = [0, 10, 15, 25, 40, 60, 90];

// King safety
// Non-pawn material of both sides at or below which the king should centralize
const ENDGAME_MATERIAL_THRESHOLD: i32 = 1300;
const KING_CENTRALIZATION: i32 = 10;
const KING_DISPLACEMENT_PENALTY: i32 = 20;     // per rank away from the home rank
const KING_STUCK_IN_CENTER_PENALTY: i32 = 30;  // d/e file with no castling rights left
const SHIELD_PAWN_NEAR: i32 = 12;
const SHIELD_PAWN_FAR: i32 = 6;
const SHIELD_PAWN_MISSING: i32 = -8;

/// Returns the base material value of a piece. Kings are not counted.
pub fn piece_value(piece_type: PieceType) -> i32 {
    match piece_type {
        PieceType::Pawn => PAWN_VALUE,
        PieceType::Knight => KNIGHT_VALUE,
        PieceType::Bishop => BISHOP_VALUE,
        PieceType::Rook => ROOK_VALUE,
        PieceType::Queen => QUEEN_VALUE,
        PieceType::King => 0,
    }
}

fn side_index(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

/// Ranks a pawn of `color` on `pos` has advanced from its starting rank (0..=6).
fn pawn_advance(pos: Position, color: Color) -> usize {
    match color {
        Color::White => pos.rank.saturating_sub(2) as usize,
        Color::Black => 7usize.saturating_sub(pos.rank as usize),
    }
}

/// Rank counted from `color`'s own side of the board (1..=8).
fn relative_rank(pos: Position, color: Color) -> u8 {
    match color {
        Color::White => pos.rank,
        Color::Black => 9 - pos.rank,
    }
}

fn file_centrality(file: u8) -> i32 {
    (file - 1).min(8 - file) as i32
}

/// Pawn counts per file with a guard column on each side, so files can be
/// indexed 1..=8 and neighbours looked up without bounds checks.
type FileCounts = [[i32; 10]; 2];

struct Summary {
    pawn_files: FileCounts,
    pawns: [Vec<Position>; 2],
    bishops: [i32; 2],
    non_pawn_material: i32,
    kings: [Option<Position>; 2],
}

fn summarize(board: &Board) -> Summary {
    let mut summary = Summary {
        pawn_files: [[0; 10]; 2],
        pawns: [Vec::with_capacity(8), Vec::with_capacity(8)],
        bishops: [0; 2],
        non_pawn_material: 0,
        kings: [None; 2],
    };

    for (pos, piece) in board.pieces() {
        let side = side_index(piece.color);
        match piece.piece_type {
            PieceType::Pawn => {
                summary.pawn_files[side][pos.file as usize] += 1;
                summary.pawns[side].push(pos);
            }
            PieceType::King => summary.kings[side] = Some(pos),
            other => {
                if other == PieceType::Bishop {
                    summary.bishops[side] += 1;
                }
                summary.non_pawn_material += piece_value(other);
            }
        }
    }
    summary
}

/// Evaluates a position and returns a score from White's perspective.
/// Positive scores favor White, negative scores favor Black.
pub fn evaluate_position(board: &Board) -> i32 {
    // Dead draws score exactly zero, whatever the material says
    if board.is_fifty_move_draw() || board.has_insufficient_material() {
        return 0;
    }

    let summary = summarize(board);
    let endgame = summary.non_pawn_material <= ENDGAME_MATERIAL_THRESHOLD;

    let mut score = 0;
    for (pos, piece) in board.pieces() {
        let value = piece_value(piece.piece_type) + placement_bonus(&summary, pos, piece.piece_type, piece.color);
        score += piece.color.sign() * value;
    }

    for color in [Color::White, Color::Black] {
        let side_score = pawn_structure(&summary, color) + king_safety(board, &summary, color, endgame)
            + if summary.bishops[side_index(color)] >= 2 { BISHOP_PAIR_BONUS } else { 0 };
        score += color.sign() * side_score;
    }

    score + board.current_turn().sign() * TEMPO_BONUS
}

/// Piece-square heuristics for everything but the king.
fn placement_bonus(summary: &Summary, pos: Position, piece_type: PieceType, color: Color) -> i32 {
    match piece_type {
        PieceType::Pawn => {
            let advance = pawn_advance(pos, color) as i32;
            advance * (PAWN_ADVANCE_BASE + PAWN_ADVANCE_CENTER * file_centrality(pos.file))
        }
        PieceType::Knight | PieceType::Bishop => {
            let weight = if piece_type == PieceType::Knight { KNIGHT_CENTRALITY } else { BISHOP_CENTRALITY };
            let mut bonus = weight * pos.centrality();
            if is_minor_home_square(pos, piece_type, color) {
                bonus -= UNDEVELOPED_MINOR_PENALTY;
            }
            bonus
        }
        PieceType::Rook => {
            let file = pos.file as usize;
            let own = summary.pawn_files[side_index(color)][file];
            let theirs = summary.pawn_files[side_index(color.opposite())][file];
            let mut bonus = match (own, theirs) {
                (0, 0) => ROOK_OPEN_FILE_BONUS,
                (0, _) => ROOK_HALF_OPEN_FILE_BONUS,
                _ => 0,
            };
            if relative_rank(pos, color) == 7 {
                bonus += ROOK_SEVENTH_RANK_BONUS;
            }
            bonus
        }
        PieceType::Queen => QUEEN_CENTRALITY * pos.centrality(),
        PieceType::King => 0,
    }
}

fn is_minor_home_square(pos: Position, piece_type: PieceType, color: Color) -> bool {
    if pos.rank != color.home_rank() {
        return false;
    }
    match piece_type {
        PieceType::Knight => pos.file == 2 || pos.file == 7,
        PieceType::Bishop => pos.file == 3 || pos.file == 6,
        _ => false,
    }
}

fn pawn_structure(summary: &Summary, color: Color) -> i32 {
    let side = side_index(color);
    let own_files = &summary.pawn_files[side];
    let enemy_pawns = &summary.pawns[side_index(color.opposite())];
    let mut score = 0;

    for file in 1..=8 {
        if own_files[file] > 1 {
            score -= DOUBLED_PAWN_PENALTY * (own_files[file] - 1);
        }
    }

    for &pawn in &summary.pawns[side] {
        let file = pawn.file as usize;
        if own_files[file - 1] == 0 && own_files[file + 1] == 0 {
            score -= ISOLATED_PAWN_PENALTY;
        }

        let blocked = enemy_pawns.iter().any(|enemy| {
            (enemy.file as i32 - pawn.file as i32).abs() <= 1
                && match color {
                    Color::White => enemy.rank > pawn.rank,
                    Color::Black => enemy.rank < pawn.rank,
                }
        });
        if !blocked {
            score += PASSED_PAWN_BONUS[pawn_advance(pawn, color).min(6)];
        }
    }
    score
}

fn king_safety(board: &Board, summary: &Summary, color: Color, endgame: bool) -> i32 {
    let king = match summary.kings[side_index(color)] {
        Some(pos) => pos,
        None => return 0,
    };

    if endgame {
        return KING_CENTRALIZATION * king.centrality();
    }

    let mut score = -KING_DISPLACEMENT_PENALTY * (king.rank as i32 - color.home_rank() as i32).abs();

    if (4..=5).contains(&king.file) && !board.castling_rights().has_any(color) {
        score -= KING_STUCK_IN_CENTER_PENALTY;
    }

    let dir = color.pawn_direction();
    let own_pawn = Some(Piece::new(PieceType::Pawn, color));
    for df in -1..=1 {
        let near = king.offset(df, dir);
        let far = king.offset(df, 2 * dir);
        if near.is_none() && far.is_none() {
            continue;
        }
        score += if near.map(|sq| board.get_piece(sq)) == Some(own_pawn) {
            SHIELD_PAWN_NEAR
        } else if far.map(|sq| board.get_piece(sq)) == Some(own_pawn) {
            SHIELD_PAWN_FAR
        } else {
            SHIELD_PAWN_MISSING
        };
    }
    score
}
