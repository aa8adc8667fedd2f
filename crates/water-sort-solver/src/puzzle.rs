//! Puzzle representation types.
//!
//! The input record matches the JSON produced by the screen reader
//! (`totalTube`, `emptyTubeNumbers`, `filledTubelist`). Everything else in
//! this module is the in-memory model the search works on.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Default number of units a tube holds.
pub const DEFAULT_CAPACITY: usize = 4;

/// Number of colors in the palette.
pub const PALETTE_SIZE: usize = 10;

/// Separates tubes inside a [`StateKey`]. Never a valid color code.
const TUBE_DELIMITER: u8 = u8::MAX;

/// Liquid color - matches the palette of the screen reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Brown,
    Cyan,
    Gray,
}

impl Color {
    pub const ALL: [Color; PALETTE_SIZE] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::Pink,
        Color::Brown,
        Color::Cyan,
        Color::Gray,
    ];

    /// Lowercase name, as used in the JSON record
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Brown => "brown",
            Color::Cyan => "cyan",
            Color::Gray => "gray",
        }
    }

    /// One-letter code for compact rendering
    pub fn letter(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Orange => 'o',
            Color::Yellow => 'y',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Purple => 'p',
            Color::Pink => 'k',
            Color::Brown => 'n',
            Color::Cyan => 'c',
            Color::Gray => 'a',
        }
    }

    pub fn from_letter(letter: char) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|c| c.letter() == letter.to_ascii_lowercase())
    }

    /// Compact numeric code used in state keys
    fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single tube, bottom unit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tube {
    units: SmallVec<[Color; 8]>,
}

impl Tube {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_units(units: &[Color]) -> Self {
        Self {
            units: SmallVec::from_slice(units),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Color] {
        &self.units
    }

    pub fn top(&self) -> Option<Color> {
        self.units.last().copied()
    }

    /// Length of the same-color block at the top of the tube
    pub fn top_run(&self) -> usize {
        match self.top() {
            None => 0,
            Some(top) => self.units.iter().rev().take_while(|&&c| c == top).count(),
        }
    }

    /// Non-empty and holding a single color
    pub fn is_pure(&self) -> bool {
        !self.is_empty() && self.top_run() == self.len()
    }

    /// Empty, or full of a single color
    pub fn is_settled(&self, capacity: usize) -> bool {
        self.is_empty() || (self.len() == capacity && self.is_pure())
    }

    /// Number of adjacent unit pairs with differing colors
    pub fn transitions(&self) -> usize {
        self.units.windows(2).filter(|w| w[0] != w[1]).count()
    }

    pub(crate) fn push_units(&mut self, color: Color, amount: usize) {
        for _ in 0..amount {
            self.units.push(color);
        }
    }

    pub(crate) fn pop_units(&mut self, amount: usize) {
        let keep = self.units.len().saturating_sub(amount);
        self.units.truncate(keep);
    }
}

impl fmt::Display for Tube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, color) in self.units.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", color)?;
        }
        f.write_str("]")
    }
}

/// A pour from one tube into another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl From<(usize, usize)> for Move {
    fn from((from, to): (usize, usize)) -> Self {
        Self { from, to }
    }
}

impl From<Move> for (usize, usize) {
    fn from(mv: Move) -> Self {
        (mv.from, mv.to)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pour tube {} -> tube {}", self.from, self.to)
    }
}

/// Exact, tube-order-preserving encoding of a [`PuzzleState`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey(Vec<u8>);

/// An arrangement of tubes sharing one capacity.
///
/// Constructed through [`crate::validator::validate`]; afterwards it is only
/// ever derived by applying moves, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    tubes: Vec<Tube>,
    capacity: usize,
}

impl PuzzleState {
    pub(crate) fn from_tubes(tubes: Vec<Tube>, capacity: usize) -> Self {
        Self { tubes, capacity }
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube(&self, index: usize) -> Option<&Tube> {
        self.tubes.get(index)
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_units(&self) -> usize {
        self.tubes.iter().map(Tube::len).sum()
    }

    /// Every tube empty or full of a single color
    pub fn is_goal(&self) -> bool {
        self.tubes.iter().all(|t| t.is_settled(self.capacity))
    }

    /// Per-color unit totals, in palette order, colors with zero units omitted
    pub fn color_counts(&self) -> Vec<(Color, usize)> {
        let mut counts = [0usize; PALETTE_SIZE];
        for tube in &self.tubes {
            for &color in tube.units() {
                counts[color as usize] += 1;
            }
        }
        Color::ALL
            .into_iter()
            .zip(counts)
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    pub fn key(&self) -> StateKey {
        let mut bytes = Vec::with_capacity(self.total_units() + self.tubes.len());
        for tube in &self.tubes {
            bytes.extend(tube.units().iter().map(|c| c.code()));
            bytes.push(TUBE_DELIMITER);
        }
        StateKey(bytes)
    }

    /// Contents as nested color lists, bottom to top
    pub fn to_stacks(&self) -> Vec<Vec<Color>> {
        self.tubes.iter().map(|t| t.units().to_vec()).collect()
    }

    pub(crate) fn tubes_mut(&mut self) -> &mut [Tube] {
        &mut self.tubes
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tube) in self.tubes.iter().enumerate() {
            if tube.is_empty() {
                writeln!(f, "Tube {}: [empty]", i)?;
            } else {
                writeln!(f, "Tube {}: {}", i, tube)?;
            }
        }
        Ok(())
    }
}

/// Puzzle record as reported by the screen reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleInput {
    pub total_tube: usize,
    pub empty_tube_numbers: usize,
    /// Tube contents, bottom to top; empty tubes are empty lists
    pub filled_tubelist: Vec<Vec<Color>>,
}

impl PuzzleInput {
    /// Build a record whose counts are derived from the stacks
    pub fn from_stacks(stacks: Vec<Vec<Color>>) -> Self {
        Self {
            total_tube: stacks.len(),
            empty_tube_numbers: stacks.iter().filter(|s| s.is_empty()).count(),
            filled_tubelist: stacks,
        }
    }
}
