//! Header-prefixed, diffable projection of the nights list.

use crate::models::SleepNight;
use std::sync::Arc;

/// Identity reserved for the header. Night ids come from SQLite rowids and
/// are never negative, so they cannot collide with it.
pub const HEADER_ID: i64 = i64::MIN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayItem {
    Header,
    Night(SleepNight),
}

impl DisplayItem {
    pub fn id(&self) -> i64 {
        match self {
            DisplayItem::Header => HEADER_ID,
            DisplayItem::Night(night) => night.night_id,
        }
    }
}

/// `[Header]` followed by one item per night, in source order.
pub fn project(nights: Option<&[SleepNight]>) -> Vec<DisplayItem> {
    let nights = nights.unwrap_or_default();
    let mut items = Vec::with_capacity(nights.len() + 1);
    items.push(DisplayItem::Header);
    items.extend(nights.iter().cloned().map(DisplayItem::Night));
    items
}

/// Grid span of the item at `position`: the header takes the full row.
pub fn span_size(position: usize, columns: usize) -> usize {
    match position {
        0 => columns.max(1),
        _ => 1,
    }
}

pub trait ItemCallback<T> {
    /// Same underlying entity (used to detect insertions, removals, moves).
    fn are_items_the_same(&self, old: &T, new: &T) -> bool;

    /// Same entity and nothing visible changed.
    fn are_contents_the_same(&self, old: &T, new: &T) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SleepNightDiffCallback;

impl ItemCallback<DisplayItem> for SleepNightDiffCallback {
    fn are_items_the_same(&self, old: &DisplayItem, new: &DisplayItem) -> bool {
        old.id() == new.id()
    }

    fn are_contents_the_same(&self, old: &DisplayItem, new: &DisplayItem) -> bool {
        old == new
    }
}

/// One step of a list mutation. Positions refer to the list as already
/// mutated by the preceding steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUpdate {
    Removed { position: usize },
    Inserted { position: usize },
    Moved { from: usize, to: usize },
    Changed { position: usize },
}

/// Mutation script turning `old` into `new`.
///
/// Removals come first (back to front), then `new` is walked once: each
/// position is matched against the remaining old items by identity, moving,
/// updating or inserting as needed.
pub fn diff<T, C>(old: &[T], new: &[T], callback: &C) -> Vec<ListUpdate>
where
    C: ItemCallback<T>,
{
    let mut updates = Vec::new();
    let mut working: Vec<&T> = old.iter().collect();

    let mut pos = working.len();
    while pos > 0 {
        pos -= 1;
        let item = working[pos];
        if !new.iter().any(|n| callback.are_items_the_same(item, n)) {
            working.remove(pos);
            updates.push(ListUpdate::Removed { position: pos });
        }
    }

    for (i, target) in new.iter().enumerate() {
        let found = working[i..]
            .iter()
            .position(|w| callback.are_items_the_same(*w, target))
            .map(|offset| i + offset);

        match found {
            Some(j) => {
                if j != i {
                    let item = working.remove(j);
                    working.insert(i, item);
                    updates.push(ListUpdate::Moved { from: j, to: i });
                }
                if !callback.are_contents_the_same(working[i], target) {
                    working[i] = target;
                    updates.push(ListUpdate::Changed { position: i });
                }
            }
            None => {
                working.insert(i, target);
                updates.push(ListUpdate::Inserted { position: i });
            }
        }
    }

    // leftovers are duplicates of identities already placed
    while working.len() > new.len() {
        let position = working.len() - 1;
        working.pop();
        updates.push(ListUpdate::Removed { position });
    }

    updates
}

/// Replay a script produced by [`diff`] on a copy of `old`.
/// Inserted and changed items are taken from `new` at the same position.
pub fn apply_updates<T: Clone>(old: &[T], new: &[T], updates: &[ListUpdate]) -> Vec<T> {
    let mut list = old.to_vec();
    for update in updates {
        match *update {
            ListUpdate::Removed { position } => {
                list.remove(position);
            }
            ListUpdate::Inserted { position } => list.insert(position, new[position].clone()),
            ListUpdate::Moved { from, to } => {
                let item = list.remove(from);
                list.insert(to, item);
            }
            ListUpdate::Changed { position } => list[position] = new[position].clone(),
        }
    }
    list
}

/// Click handler attached to every night cell; receives the night id.
#[derive(Clone)]
pub struct SleepNightListener {
    click: Arc<dyn Fn(i64) + Send + Sync>,
}

impl SleepNightListener {
    pub fn new(click: impl Fn(i64) + Send + Sync + 'static) -> Self {
        Self {
            click: Arc::new(click),
        }
    }

    pub fn on_click(&self, night: &SleepNight) {
        (self.click)(night.night_id)
    }
}
