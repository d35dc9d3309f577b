use crate::environment::{Field, Movement, Pos};

#[derive(Debug)]
pub struct Agent {
    pos: Pos,
    score: u32,
    // Visited cells, only kept by agents whose trail is drawn.
    trail: Option<Vec<Pos>>,
}

impl Agent {
    pub fn new(field: &Field, keep_trail: bool) -> Self
    {
        Self {
            pos: field.start_pos(),
            score: 0,
            trail: if keep_trail { Some(Vec::new()) } else { None },
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn trail(&self) -> &[Pos] {
        self.trail.as_deref().unwrap_or(&[])
    }

    // false when the move would leave the field
    pub fn r#move(&mut self, field: &Field, movement: Movement) -> bool
    {
        let (new_pos, wall_hit) = field.check_movement(self.pos, movement);
        if wall_hit {
            return false;
        }
        self.pos = new_pos;
        if let Some(trail) = &mut self.trail {
            trail.push(new_pos);
        }
        true
    }

    pub fn add_score(&mut self, value: u32) {
        self.score = self.score.saturating_add(value);
    }
}
