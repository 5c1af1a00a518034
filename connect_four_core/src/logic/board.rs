use crate::engine::eval::HeuristicEvaluator;
use crate::engine::move_list::ColumnList;
use crate::engine::Evaluator;
use crate::logic::eval_constants::{
    BOARD_MASK, CELLS, COLS, COLUMN_BITS, CONNECT, META_COLUMN_MASK, META_PLAYER_BIT, META_SHIFT,
    NO_COLUMN, ROWS,
};
use crate::logic::rules::{try_move, MoveError};
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Yellow,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Yellow,
            Self::Yellow => Self::Red,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Yellow => 1,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Yellow => 1,
        }
    }

    const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Self::Red
        } else {
            Self::Yellow
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Red => 'X',
            Self::Yellow => 'O',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "Red"),
            Self::Yellow => write!(f, "Yellow"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Color),
    Draw,
    Ongoing,
}

impl Outcome {
    const fn code(self) -> u16 {
        match self {
            Self::Win(Color::Red) => 0,
            Self::Win(Color::Yellow) => 1,
            Self::Draw => 2,
            Self::Ongoing => 3,
        }
    }

    const fn from_code(code: u16) -> Self {
        match code & 0x03 {
            0 => Self::Win(Color::Red),
            1 => Self::Win(Color::Yellow),
            2 => Self::Draw,
            _ => Self::Ongoing,
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win(color) => write!(f, "{color} wins"),
            Self::Draw => write!(f, "draw"),
            Self::Ongoing => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal = 0,
    Vertical = 1,
    DiagonalUpRight = 2,
    DiagonalUpLeft = 3,
}

impl Direction {
    // (row step, column step)
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
            Self::DiagonalUpRight => (1, 1),
            Self::DiagonalUpLeft => (1, -1),
        }
    }

    const fn from_index(index: u16) -> Self {
        match index & 0x03 {
            0 => Self::Horizontal,
            1 => Self::Vertical,
            2 => Self::DiagonalUpRight,
            _ => Self::DiagonalUpLeft,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
}

impl Line {
    pub const fn new(row: usize, col: usize, direction: Direction) -> Self {
        Self {
            row,
            col,
            direction,
        }
    }

    pub fn cells(&self) -> [(usize, usize); CONNECT] {
        let (dr, dc) = self.direction.delta();
        let mut cells = [(self.row, self.col); CONNECT];
        for (i, cell) in cells.iter_mut().enumerate() {
            #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
            {
                let step = i as isize;
                *cell = (
                    (self.row as isize + dr * step) as usize,
                    (self.col as isize + dc * step) as usize,
                );
            }
        }
        cells
    }
}

// Scan order for winner detection: horizontal (row-major), vertical
// (column-major), then the two diagonals (row-major).
pub fn all_lines() -> impl Iterator<Item = Line> {
    let horizontal = (0..ROWS).flat_map(|row| {
        (0..=COLS - CONNECT).map(move |col| Line::new(row, col, Direction::Horizontal))
    });
    let vertical = (0..COLS).flat_map(|col| {
        (0..=ROWS - CONNECT).map(move |row| Line::new(row, col, Direction::Vertical))
    });
    let up_right = (0..=ROWS - CONNECT).flat_map(|row| {
        (0..=COLS - CONNECT).map(move |col| Line::new(row, col, Direction::DiagonalUpRight))
    });
    let up_left = (0..=ROWS - CONNECT).flat_map(|row| {
        (CONNECT - 1..COLS).map(move |col| Line::new(row, col, Direction::DiagonalUpLeft))
    });
    horizontal.chain(vertical).chain(up_right).chain(up_left)
}

// Packed as DDCCCRRRWW: WW outcome (0 = Red, 1 = Yellow, 2 = draw, 3 = not final),
// RRR start row, CCC start column, DD direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinnerInfo(u16);

impl WinnerInfo {
    const ONGOING: Self = Self(3);
    const DRAW: Self = Self(2);

    #[allow(clippy::cast_possible_truncation)]
    const fn win(color: Color, line: Line) -> Self {
        Self(
            (line.direction as u16) << 8
                | (line.col as u16) << 5
                | (line.row as u16) << 2
                | Outcome::Win(color).code(),
        )
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn outcome(self) -> Outcome {
        Outcome::from_code(self.0)
    }

    pub const fn line(self) -> Option<Line> {
        match self.outcome() {
            Outcome::Win(_) => Some(Line::new(
                ((self.0 >> 2) & 0x07) as usize,
                ((self.0 >> 5) & 0x07) as usize,
                Direction::from_index(self.0 >> 8),
            )),
            Outcome::Draw | Outcome::Ongoing => None,
        }
    }
}

const EMPTY_REP: u64 = 0x0F01_0101_0101_0101;

// Bytes 0..7: one column each, stones from the low bit up (0 = Red, 1 = Yellow)
// topped by a sentinel bit. Byte 7: last column in bits 0..3 (7 = none), last
// player in bit 3. Equality, hashing and ordering use the low seven bytes only.
#[derive(Clone, Copy)]
pub struct Board {
    rep: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Board {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Board {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.rep)
    }
}

impl Board {
    #[must_use]
    pub const fn new() -> Self {
        Self { rep: EMPTY_REP }
    }

    pub fn from_moves(columns: &[usize]) -> Result<Self, MoveError> {
        columns
            .iter()
            .try_fold(Self::new(), |board, &col| try_move(&board, col))
    }

    pub const fn key(&self) -> u64 {
        self.rep & BOARD_MASK
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn column_bits(&self, col: usize) -> u8 {
        (self.rep >> (col as u32 * COLUMN_BITS)) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    const fn meta(&self) -> u8 {
        (self.rep >> META_SHIFT) as u8
    }

    #[allow(clippy::cast_possible_truncation)]
    fn set_column_bits(&mut self, col: usize, bits: u8) {
        let shift = col as u32 * COLUMN_BITS;
        self.rep = (self.rep & !(0xFF << shift)) | (u64::from(bits) << shift);
    }

    fn set_meta(&mut self, who: Color, column: u8) {
        let meta = (who.bit() << 3) | (column & META_COLUMN_MASK);
        self.rep = (self.rep & BOARD_MASK) | (u64::from(meta) << META_SHIFT);
    }

    // Columns outside the board read as full.
    pub const fn column_height(&self, col: usize) -> usize {
        if col >= COLS {
            return ROWS;
        }
        (7 - self.column_bits(col).leading_zeros()) as usize
    }

    pub const fn get(&self, row: usize, col: usize) -> Option<Color> {
        if col >= COLS || row >= self.column_height(col) {
            return None;
        }
        Some(Color::from_bit(self.column_bits(col) >> row))
    }

    pub const fn last_player(&self) -> Color {
        if self.meta() & META_PLAYER_BIT == 0 {
            Color::Red
        } else {
            Color::Yellow
        }
    }

    pub const fn next_player(&self) -> Color {
        self.last_player().opposite()
    }

    pub const fn last_column(&self) -> Option<usize> {
        let col = self.meta() & META_COLUMN_MASK;
        if col == NO_COLUMN {
            None
        } else {
            Some(col as usize)
        }
    }

    pub fn stones(&self) -> usize {
        (0..COLS).map(|col| self.column_height(col)).sum()
    }

    pub fn empty_cells(&self) -> usize {
        CELLS - self.stones()
    }

    pub fn is_empty(&self) -> bool {
        (0..COLS).all(|col| self.column_height(col) == 0)
    }

    pub fn is_full(&self) -> bool {
        (0..COLS).all(|col| self.column_height(col) == ROWS)
    }

    pub fn legal_columns(&self) -> ColumnList {
        let mut columns = ColumnList::new();
        for col in (0..COLS).filter(|&col| self.column_height(col) < ROWS) {
            columns.push(col);
        }
        columns
    }

    // A full or out-of-range column yields an unchanged copy.
    #[must_use]
    pub fn make_move(&self, col: usize, who: Color) -> Self {
        let mut next = *self;
        next.drop(col, who);
        next
    }

    #[must_use]
    pub fn up(&self) -> Self {
        let mut prev = *self;
        prev.undrop();
        prev
    }

    fn drop(&mut self, col: usize, who: Color) -> bool {
        let height = self.column_height(col);
        if height >= ROWS {
            return false;
        }
        // Keep the stones below, then write the stone and the new sentinel.
        let kept = self.column_bits(col) & ((1u8 << height) - 1);
        self.set_column_bits(col, kept | ((2 + who.bit()) << height));
        #[allow(clippy::cast_possible_truncation)]
        self.set_meta(who, col as u8);
        true
    }

    fn undrop(&mut self) -> bool {
        let Some(col) = self.last_column() else {
            return false;
        };
        let height = self.column_height(col);
        if height == 0 {
            return false;
        }
        let top = height - 1;
        let kept = self.column_bits(col) & ((1u8 << top) - 1);
        self.set_column_bits(col, kept | (1u8 << top));
        let who = self.last_player();
        self.set_meta(who.opposite(), NO_COLUMN);
        true
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn symmetric(&self) -> Self {
        // Reversing the seven column bytes: swap all eight, then drop the
        // (zero) metadata byte that lands at the bottom.
        let columns = self.key().swap_bytes() >> COLUMN_BITS;
        let last = match self.last_column() {
            Some(col) => (COLS - 1 - col) as u8,
            None => NO_COLUMN,
        };
        let meta = (self.last_player().bit() << 3) | last;
        Self {
            rep: columns | ((meta as u64) << META_SHIFT),
        }
    }

    pub fn children(&self) -> Children {
        Children::new(*self)
    }

    // An immediately terminal move is always taken.
    #[must_use]
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let player = self.next_player();
        let columns = self.legal_columns();
        debug_assert!(!columns.is_empty(), "random_move on a full board");

        for col in columns.iter() {
            let next = self.make_move(col, player);
            if next.is_terminal() {
                return next;
            }
        }

        if columns.is_empty() {
            return *self;
        }
        columns
            .get(rng.gen_range(0..columns.len()))
            .map_or(*self, |col| self.make_move(col, player))
    }

    // (Red, Yellow) with 7 bits per column
    fn player_masks(&self) -> (u64, u64) {
        let mut red = 0u64;
        let mut yellow = 0u64;
        for col in 0..COLS {
            let stones = (1u8 << self.column_height(col)) - 1;
            let bits = self.column_bits(col);
            let shift = col * (ROWS + 1);
            red |= u64::from(!bits & stones) << shift;
            yellow |= u64::from(bits & stones) << shift;
        }
        (red, yellow)
    }

    fn has_four(mask: u64) -> bool {
        // vertical, horizontal, diagonal up-right, diagonal up-left
        [1, ROWS + 1, ROWS + 2, ROWS].iter().any(|&shift| {
            let pairs = mask & (mask >> shift);
            pairs & (pairs >> (2 * shift)) != 0
        })
    }

    pub fn is_terminal(&self) -> bool {
        let (red, yellow) = self.player_masks();
        Self::has_four(red) || Self::has_four(yellow) || self.is_full()
    }

    fn line_owner(&self, line: &Line) -> Option<Color> {
        let cells = line.cells();
        let first = self.get(line.row, line.col)?;
        cells
            .iter()
            .all(|&(r, c)| self.get(r, c) == Some(first))
            .then_some(first)
    }

    pub fn winner_info(&self) -> WinnerInfo {
        if let Some((color, line)) = all_lines()
            .find_map(|line| self.line_owner(&line).map(|color| (color, line)))
        {
            return WinnerInfo::win(color, line);
        }
        if self.is_full() {
            WinnerInfo::DRAW
        } else {
            WinnerInfo::ONGOING
        }
    }

    pub fn winner(&self) -> Outcome {
        self.winner_info().outcome()
    }

    // Red's point of view
    pub fn score(&self) -> i32 {
        HeuristicEvaluator::default().evaluate(self)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let symbol = self.get(row, col).map_or('.', Color::symbol);
                write!(f, "{symbol}  ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "0  1  2  3  4  5  6")?;
        match self.last_column() {
            Some(col) => write!(f, " last = {col}")?,
            None => write!(f, " last = -")?,
        }
        write!(f, " winner = {}", self.winner())
    }
}

pub struct Children {
    parent: Board,
    player: Color,
    order: ColumnList,
    index: usize,
}

impl Children {
    fn new(parent: Board) -> Self {
        let player = parent.next_player();
        let open = |col: usize| parent.column_height(col) < ROWS;
        // The first winning or drawing column swaps places with column 0.
        let mut order = ColumnList::all();
        let forcing = order
            .iter()
            .position(|col| open(col) && parent.make_move(col, player).is_terminal());
        if let Some(pos) = forcing {
            order.swap_to_front(pos);
        }
        order.retain(open);
        Self {
            parent,
            player,
            order,
            index: 0,
        }
    }
}

impl Iterator for Children {
    type Item = Board;

    fn next(&mut self) -> Option<Self::Item> {
        let col = self.order.get(self.index)?;
        self.index += 1;
        Some(self.parent.make_move(col, self.player))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.order.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Children {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert!(!board.is_full());
        assert_eq!(board.empty_cells(), CELLS);
        assert_eq!(board.last_column(), None);
        assert_eq!(board.next_player(), Color::Red);
        assert_eq!(board.last_player(), Color::Yellow);
        for col in 0..COLS {
            assert_eq!(board.column_height(col), 0);
        }
        assert_eq!(board.winner(), Outcome::Ongoing);
    }

    #[test]
    fn test_make_move_updates_column_and_metadata() {
        let board = Board::new().make_move(2, Color::Red);
        assert_eq!(board.column_height(2), 1);
        assert_eq!(board.get(0, 2), Some(Color::Red));
        assert_eq!(board.get(1, 2), None);
        assert_eq!(board.last_column(), Some(2));
        assert_eq!(board.last_player(), Color::Red);
        assert_eq!(board.next_player(), Color::Yellow);

        let board = board.make_move(2, Color::Yellow);
        assert_eq!(board.column_height(2), 2);
        assert_eq!(board.get(1, 2), Some(Color::Yellow));
        assert_eq!(board.empty_cells(), CELLS - 2);
    }

    #[test]
    fn test_make_move_on_full_column_is_noop() {
        let mut board = Board::new();
        for i in 0..ROWS {
            board = board.make_move(0, if i % 2 == 0 { Color::Red } else { Color::Yellow });
        }
        assert_eq!(board.column_height(0), ROWS);
        let same = board.make_move(0, Color::Red);
        assert_eq!(same, board);
        assert_eq!(same.last_column(), board.last_column());
    }

    #[test]
    fn test_up_reverses_last_move() {
        let board = Board::from_moves(&[3, 4, 3]).unwrap();
        let prev = board.up();
        assert_eq!(prev, Board::from_moves(&[3, 4]).unwrap());
        assert_eq!(prev.next_player(), Color::Red);
        assert_eq!(prev.last_column(), None);
        // No recorded move left: unchanged copy.
        assert_eq!(prev.up(), prev);
        assert_eq!(Board::new().up(), Board::new());
    }

    #[test]
    fn test_key_ignores_metadata() {
        let a = Board::from_moves(&[0, 1, 2]).unwrap();
        let b = Board::from_moves(&[2, 1, 0]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.last_column(), b.last_column());
    }

    #[test]
    fn test_symmetric_mirrors_columns() {
        let board = Board::from_moves(&[0, 0, 1, 5]).unwrap();
        let mirror = board.symmetric();
        for col in 0..COLS {
            assert_eq!(mirror.column_height(col), board.column_height(COLS - 1 - col));
            for row in 0..ROWS {
                assert_eq!(mirror.get(row, col), board.get(row, COLS - 1 - col));
            }
        }
        assert_eq!(mirror.last_column(), Some(1));
        assert_eq!(mirror.last_player(), board.last_player());
        assert_eq!(mirror.symmetric(), board);
        assert_eq!(Board::new().symmetric(), Board::new());
        assert_eq!(Board::new().symmetric().last_column(), None);
    }

    #[test]
    fn test_children_cover_open_columns() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut board = Board::new();
            while !board.is_terminal() {
                let children: Vec<Board> = board.children().collect();
                let open: Vec<usize> = (0..COLS)
                    .filter(|&c| board.column_height(c) < ROWS)
                    .collect();
                assert_eq!(children.len(), open.len());

                let mut played: Vec<usize> = children
                    .iter()
                    .map(|child| child.last_column().unwrap())
                    .collect();
                played.sort_unstable();
                assert_eq!(played, open);

                for child in &children {
                    let col = child.last_column().unwrap();
                    assert_eq!(child.column_height(col), board.column_height(col) + 1);
                    assert_eq!(child.last_player(), board.next_player());
                }
                board = board.random_move(&mut rng);
            }
        }
    }

    #[test]
    fn test_children_ascending_without_threats() {
        let board = Board::from_moves(&[3]).unwrap();
        let columns: Vec<usize> = board
            .children()
            .map(|child| child.last_column().unwrap())
            .collect();
        assert_eq!(columns, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(board.children().len(), 7);
    }

    #[test]
    fn test_random_move_takes_immediate_win() {
        // Red threatens column 3 vertically.
        let board = Board::from_moves(&[3, 0, 3, 0, 3, 1]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            let next = board.random_move(&mut rng);
            assert_eq!(next.last_column(), Some(3));
            assert_eq!(next.winner(), Outcome::Win(Color::Red));
        }
    }

    #[test]
    fn test_random_move_stays_legal() {
        let mut rng = StdRng::seed_from_u64(99);
        let board = Board::from_moves(&[0, 0, 0, 0, 0, 0]).unwrap();
        for _ in 0..100 {
            let next = board.random_move(&mut rng);
            assert_ne!(next.last_column(), Some(0));
            assert_eq!(next.stones(), board.stones() + 1);
        }
    }

    #[test]
    fn test_display_renders_rows_top_down() {
        let board = Board::from_moves(&[3, 4]).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[5], ".  .  .  X  O  .  .  ");
        assert_eq!(lines[6], "0  1  2  3  4  5  6");
        assert_eq!(lines[7], " last = 4 winner = -");
    }
}
