use crate::io::store::{NodeStore, StoreError};
use crate::ops::layout::Direction;
use crate::ops::tree::TreeIndex;

use super::{Flow, FlowEffect};

/// Front-end independent key names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Delete,
    Backspace,
    Space,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Char(char),
}

/// A key press with its modifiers. `ctrl` also stands for the platform
/// command key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        KeyInput {
            key,
            shift: false,
            ctrl: false,
        }
    }

    pub fn shift(key: Key) -> Self {
        KeyInput {
            key,
            shift: true,
            ctrl: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        KeyInput {
            key,
            shift: false,
            ctrl: true,
        }
    }

    pub fn ctrl_shift(key: Key) -> Self {
        KeyInput {
            key,
            shift: true,
            ctrl: true,
        }
    }
}

/// Tree-relative movement an arrow key maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Parent,
    FirstChild,
    PrevSibling,
    NextSibling,
}

impl Nav {
    /// Arrows follow the drawing: the key pointing toward the root goes to
    /// the parent, the opposite key to the first child.
    pub fn from_arrow(key: Key, direction: Direction) -> Option<Nav> {
        use Direction::*;
        use Key::*;
        let nav = match (direction, key) {
            (LeftRight, Left) | (RightLeft, Right) | (TopBottom, Up) | (BottomTop, Down) => {
                Nav::Parent
            }
            (LeftRight, Right) | (RightLeft, Left) | (TopBottom, Down) | (BottomTop, Up) => {
                Nav::FirstChild
            }
            (LeftRight | RightLeft, Up) | (TopBottom | BottomTop, Left) => Nav::PrevSibling,
            (LeftRight | RightLeft, Down) | (TopBottom | BottomTop, Right) => Nav::NextSibling,
            _ => return None,
        };
        Some(nav)
    }
}

impl<S: NodeStore> Flow<S> {
    /// Run the keyboard protocol. While an editor is open every shortcut is
    /// suppressed; the editor owns the keyboard.
    pub fn handle_key(&mut self, input: KeyInput) -> Result<FlowEffect, StoreError> {
        if self.is_editing() {
            return Ok(FlowEffect::None);
        }

        if input.ctrl {
            return match input.key {
                Key::Char(c) => match (c.to_ascii_lowercase(), input.shift) {
                    ('z', false) => self.undo(),
                    ('z', true) | ('y', _) => self.redo(),
                    ('c', _) => Ok(self.copy()),
                    ('v', _) => self.paste(),
                    _ => Ok(FlowEffect::None),
                },
                _ => Ok(FlowEffect::None),
            };
        }

        let selected = self.selected.clone();
        match (input.key, selected) {
            (Key::Tab, None) => {
                // With nothing selected, Tab only seeds an empty map
                if self.nodes().is_empty() && !input.shift {
                    self.add_child(None)
                } else {
                    Ok(FlowEffect::None)
                }
            }
            (Key::Tab, Some(id)) if input.shift => self.add_sibling(&id),
            (Key::Tab, Some(id)) => self.add_child(Some(&id)),
            (Key::Enter, Some(id)) if input.shift => self.add_parent(&id),
            (Key::Enter, Some(id)) => Ok(self.begin_edit(&id)),
            (Key::Delete | Key::Backspace, Some(id)) => self.delete(&id),
            (Key::Space, Some(id)) => self.toggle_collapse(&id),
            (Key::Esc, Some(_)) => {
                self.clear_selection();
                Ok(FlowEffect::Selected)
            }
            (Key::Up | Key::Down | Key::Left | Key::Right, _) => Ok(self.navigate(input.key)),
            _ => Ok(FlowEffect::None),
        }
    }

    /// Move the selection with an arrow key. With nothing selected the first
    /// root is picked.
    pub fn navigate(&mut self, key: Key) -> FlowEffect {
        let Some(nav) = Nav::from_arrow(key, self.direction) else {
            return FlowEffect::None;
        };
        let target = {
            let index = TreeIndex::new(self.store.nodes());
            match self.selected.as_deref().filter(|id| index.contains(id)) {
                None => index.roots().first().map(|r| r.to_string()),
                Some(current) => nav_target(&index, current, nav).map(String::from),
            }
        };
        match target {
            Some(id) if self.selected.as_deref() != Some(id.as_str()) => {
                self.selected = Some(id);
                FlowEffect::Selected
            }
            _ => FlowEffect::None,
        }
    }
}

fn nav_target<'a>(index: &TreeIndex<'a>, current: &str, nav: Nav) -> Option<&'a str> {
    match nav {
        Nav::Parent => index.parent(current),
        Nav::FirstChild => {
            if index.get(current).is_some_and(|n| n.is_collapsed()) {
                return None;
            }
            index.children(current).first().copied()
        }
        Nav::PrevSibling | Nav::NextSibling => {
            let siblings = index.siblings(current);
            let pos = siblings.iter().position(|s| *s == current)?;
            let next = match nav {
                Nav::PrevSibling => pos.checked_sub(1)?,
                _ => pos + 1,
            };
            siblings.get(next).copied()
        }
    }
}
