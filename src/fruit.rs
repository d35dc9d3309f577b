use std::fmt;

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::configuration::FruitValues;
use crate::environment::{Field, Pos};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FruitKind {
    Apple,
    Mango,
    Blueberry,
}

impl FruitKind {
    pub const ALL: [FruitKind; 3] = [FruitKind::Apple, FruitKind::Mango, FruitKind::Blueberry];

    pub fn name(self) -> &'static str {
        match self {
            FruitKind::Apple => "apple",
            FruitKind::Mango => "mango",
            FruitKind::Blueberry => "blueberry",
        }
    }
}

impl fmt::Display for FruitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Distribution<FruitKind> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> FruitKind {
        match rng.gen_range(0..3) {
            0 => FruitKind::Apple,
            1 => FruitKind::Mango,
            _ => FruitKind::Blueberry,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fruit {
    pub pos: Pos,
    pub kind: FruitKind,
    pub value: u32,
}

impl Fruit {
    pub fn new(pos: Pos, kind: FruitKind, values: &FruitValues) -> Self {
        Self {
            pos,
            kind,
            value: values.value(kind),
        }
    }
}

/// The fruits currently on the field, in generation order.
///
/// Positions are not deduplicated: two fruits may share a cell, and both are
/// collected when the agent steps onto it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FruitSet {
    fruits: Vec<Fruit>,
}

impl FruitSet {
    pub fn generate<R: Rng + ?Sized>(
        field: &Field,
        values: &FruitValues,
        amount: usize,
        rng: &mut R,
    ) -> Self {
        let fruits = (0..amount)
            .map(|_| {
                let pos = field.random_pos(&mut *rng);
                let kind: FruitKind = rng.gen();
                Fruit::new(pos, kind, values)
            })
            .collect();
        Self { fruits }
    }

    pub fn len(&self) -> usize {
        self.fruits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fruits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fruit> {
        self.fruits.iter()
    }

    /// Removes and returns every fruit lying on `pos`, keeping the rest in order.
    pub fn collect_at(&mut self, pos: Pos) -> Vec<Fruit> {
        if !self.fruits.iter().any(|fruit| fruit.pos == pos) {
            return Vec::new();
        }
        let (collected, remaining) = std::mem::take(&mut self.fruits)
            .into_iter()
            .partition(|fruit| fruit.pos == pos);
        self.fruits = remaining;
        collected
    }
}

impl From<Vec<Fruit>> for FruitSet {
    fn from(fruits: Vec<Fruit>) -> Self {
        Self { fruits }
    }
}

impl<'a> IntoIterator for &'a FruitSet {
    type Item = &'a Fruit;
    type IntoIter = std::slice::Iter<'a, Fruit>;

    fn into_iter(self) -> Self::IntoIter {
        self.fruits.iter()
    }
}
