use rand::Rng;

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Right,
    Down,
    Left,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos { row, col }
    }
}

impl Movement {
    pub fn into_vector(self) -> (isize, isize) {
        match self {
            Movement::Up    => (-1, 0),
            Movement::Down  => ( 1, 0),
            Movement::Left  => ( 0,-1),
            Movement::Right => ( 0, 1),
        }
    }

    pub fn actions() -> [Movement; 4] {
        [Movement::Up, Movement::Down, Movement::Left, Movement::Right]
    }

    // Single step from `from` towards `to`, closing the row gap before the column gap.
    pub fn towards(from: Pos, to: Pos) -> Option<Movement> {
        use std::cmp::Ordering::*;
        match (to.row.cmp(&from.row), to.col.cmp(&from.col)) {
            (Less, _) => Some(Movement::Up),
            (Greater, _) => Some(Movement::Down),
            (Equal, Less) => Some(Movement::Left),
            (Equal, Greater) => Some(Movement::Right),
            (Equal, Equal) => None,
        }
    }
}

/// The rectangular playing field. Cells are `0 <= row < rows`, `0 <= col < cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    rows: usize,
    cols: usize,
}

impl Field {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn start_pos(&self) -> Pos {
        Pos::new(self.rows / 2, self.cols / 2)
    }

    pub fn random_pos<R: Rng + ?Sized>(&self, rng: &mut R) -> Pos
    {
        Pos::new(rng.gen_range(0..self.rows), rng.gen_range(0..self.cols))
    }

    /// Applies `movement` to `pos`, clamping at the border. The flag is set when the
    /// move ran into the border, in which case the returned position is `pos` itself.
    pub fn check_movement(&self, pos: Pos, movement: Movement) -> (Pos, bool)
    {
        let (drow, dcol) = movement.into_vector();
        let boundaries = (self.rows as isize, self.cols as isize);
        let mut new_row = pos.row as isize + drow;
        let mut new_col = pos.col as isize + dcol;
        let mut wall_hit = false;

        if new_row < 0 {
            new_row = 0;
            wall_hit = true;
        } else if new_row >= boundaries.0 {
            new_row = boundaries.0 - 1;
            wall_hit = true;
        }
        if new_col < 0 {
            new_col = 0;
            wall_hit = true;
        } else if new_col >= boundaries.1 {
            new_col = boundaries.1 - 1;
            wall_hit = true;
        }

        (Pos::new(new_row as usize, new_col as usize), wall_hit)
    }

    pub fn iter_all_coordinates(&self) -> FieldIter
    {
        FieldIter::new(self.size())
    }
}

// Row-major walk over every cell of the field.
pub struct FieldIter {
    curr_row: usize,
    curr_col: usize,
    rows: usize,
    cols: usize,
}

impl FieldIter {
    fn new((rows, cols): (usize, usize)) -> FieldIter
    {
        FieldIter {
            curr_row: 0,
            curr_col: 0,
            rows,
            cols,
        }
    }
}

impl Iterator for FieldIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        if self.cols == 0 || self.curr_row >= self.rows {
            return None;
        }
        let pos = Pos::new(self.curr_row, self.curr_col);
        self.curr_col += 1;
        if self.curr_col == self.cols {
            self.curr_col = 0;
            self.curr_row += 1;
        }
        Some(pos)
    }
}
