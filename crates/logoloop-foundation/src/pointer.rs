//! Pointer event types shared by platform bindings and the mounted loop.

/// A point in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Enter,
    Leave,
    Move,
    Down,
    Up,
    Cancel,
}

/// What a pointer event was delivered to.
///
/// Hover is decided on the track alone; events aimed at individual items
/// are reported so bindings can forward them, but never change hover state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    Track,
    Item { copy: usize, index: usize },
    Outside,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: u64,
    pub kind: PointerEventKind,
    pub target: PointerTarget,
    pub position: Point,
    pub global_position: Point,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, target: PointerTarget, position: Point) -> Self {
        Self {
            id: 0,
            kind,
            target,
            position,
            global_position: position,
        }
    }
}
