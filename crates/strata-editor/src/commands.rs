use std::fmt;

use strata_core::geometry::Coords;
use strata_core::math::Vec2;

/// Vertices of the regular polygon used for circles.
pub const CIRCLE_VERTICES: usize = 48;

/// How many points a command collects before it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointAcquisition {
    /// Complete once exactly this many points are collected.
    Exactly(usize),
    /// Complete when, with at least three points collected, a new point
    /// lands within the close threshold of the first one.
    UntilClosed,
}

/// A shape-building command of the workshop.
pub trait WorkshopCommand: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Names the command can be typed as.
    fn aliases(&self) -> &'static [&'static str];

    fn acquisition(&self) -> PointAcquisition;

    /// Vertices of the finished shape.
    fn build(&self, points: &[Vec2]) -> Vec<Vec2>;

    /// Outline to preview while collecting, with `cursor` standing in for
    /// the next point.
    fn preview(&self, points: &[Vec2], cursor: Vec2) -> Vec<Vec2>;

    /// Whether completing the command immediately starts it again.
    fn repeat(&self) -> bool {
        true
    }

    /// Prompt shown when the command starts.
    fn instructions(&self) -> &'static str;

    fn matches(&self, alias: &str) -> bool {
        self.aliases().contains(&alias)
    }
}

// ══════════════════════════════════════════════════════════════════════
// Concrete Commands
// ══════════════════════════════════════════════════════════════════════

/// Axis-aligned box from two opposite corners.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectangleCommand;

impl WorkshopCommand for RectangleCommand {
    fn name(&self) -> &'static str {
        "rectangle"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["rectangle", "rect", "r"]
    }

    fn acquisition(&self) -> PointAcquisition {
        PointAcquisition::Exactly(2)
    }

    fn build(&self, points: &[Vec2]) -> Vec<Vec2> {
        match points {
            [a, b, ..] => Coords::corner_box(*a, *b),
            _ => Vec::new(),
        }
    }

    fn preview(&self, points: &[Vec2], cursor: Vec2) -> Vec<Vec2> {
        points
            .first()
            .map(|a| Coords::corner_box(*a, cursor))
            .unwrap_or_default()
    }

    fn instructions(&self) -> &'static str {
        "Rectangle: select two coordinates or press Esc to cancel..."
    }
}

/// Circle from its center and a point on the radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct CircleCommand;

impl WorkshopCommand for CircleCommand {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["circle", "c"]
    }

    fn acquisition(&self) -> PointAcquisition {
        PointAcquisition::Exactly(2)
    }

    fn build(&self, points: &[Vec2]) -> Vec<Vec2> {
        match points {
            [center, rim, ..] => Coords::circle(*center, center.distance(rim), CIRCLE_VERTICES),
            _ => Vec::new(),
        }
    }

    fn preview(&self, points: &[Vec2], cursor: Vec2) -> Vec<Vec2> {
        points
            .first()
            .map(|center| Coords::circle(*center, center.distance(&cursor), CIRCLE_VERTICES))
            .unwrap_or_default()
    }

    fn instructions(&self) -> &'static str {
        "Circle: select two coordinates or press Esc to cancel..."
    }
}

/// Free polygon, closed by clicking near its first vertex.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolyshapeCommand;

impl WorkshopCommand for PolyshapeCommand {
    fn name(&self) -> &'static str {
        "polyshape"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["polyshape", "poly", "pl"]
    }

    fn acquisition(&self) -> PointAcquisition {
        PointAcquisition::UntilClosed
    }

    fn build(&self, points: &[Vec2]) -> Vec<Vec2> {
        points.to_vec()
    }

    fn preview(&self, points: &[Vec2], cursor: Vec2) -> Vec<Vec2> {
        let mut outline = points.to_vec();
        outline.push(cursor);
        outline
    }

    fn instructions(&self) -> &'static str {
        "Polyshape: select at least three coordinates or press Esc to cancel..."
    }
}

/// The commands known to a workshop, looked up by alias.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn WorkshopCommand>>,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self { commands: Vec::new() }
    }

    pub fn register(&mut self, command: Box<dyn WorkshopCommand>) {
        self.commands.push(command);
    }

    /// Index of the first command answering to `alias`.
    pub fn find(&self, alias: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.matches(alias))
    }

    pub fn get(&self, index: usize) -> Option<&dyn WorkshopCommand> {
        self.commands.get(index).map(|c| c.as_ref())
    }

    pub fn all_aliases(&self) -> Vec<&'static str> {
        self.commands.iter().flat_map(|c| c.aliases().iter().copied()).collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(RectangleCommand));
        registry.register(Box::new(CircleCommand));
        registry.register(Box::new(PolyshapeCommand));
        registry
    }
}
