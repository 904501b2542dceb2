//! The [`TickLruCache`] tick-ordered intrusive list.

use std::fmt;

use gantry_core::Tick;

/// Index of an item inside a [`TickLruCache`].
///
/// Stable until the item is freed; freed ids are recycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Link sentinel: "no neighbour".
const NIL: u32 = u32::MAX;

struct Item<T> {
    /// `None` while the slot sits on the free list.
    object: Option<T>,
    tick: Tick,
    prev: u32,
    next: u32,
}

/// Doubly linked list of cached objects ordered by last-touched tick.
///
/// Items live in an index-stable pool (free-list recycled, like a slot
/// arena), and the intrusive links are pool indices rather than
/// pointers, so touching or freeing one item never invalidates another
/// item's id.
///
/// # Invariant
///
/// Walking head to tail yields non-decreasing ticks. [`insert`] appends
/// at the tail, and [`touch`] only detaches-and-reappends when the new
/// stamp actually advances the item's tick, so the invariant is
/// maintained without ever sorting.
///
/// The structure assumes ticks increase monotonically across the whole
/// program; individual out-of-order `touch` calls are tolerated by
/// rejecting non-advancing stamps.
///
/// [`insert`]: TickLruCache::insert
/// [`touch`]: TickLruCache::touch
pub struct TickLruCache<T> {
    items: Vec<Item<T>>,
    free_items: Vec<u32>,
    head: u32,
    tail: u32,
}

impl<T> TickLruCache<T> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            free_items: Vec::new(),
            head: NIL,
            tail: NIL,
        }
    }

    /// Insert an object stamped with `tick`, appending at the tail
    /// (the tail is the most recently touched end).
    pub fn insert(&mut self, object: T, tick: Tick) -> ItemId {
        let id = self.build();
        let item = &mut self.items[id as usize];
        item.object = Some(object);
        item.tick = tick;
        self.attach(id);
        ItemId(id)
    }

    /// Re-stamp an item and move it to the tail.
    ///
    /// A no-op when `tick` does not advance the item's stamp, which
    /// makes out-of-order touches with stale ticks harmless. O(1).
    pub fn touch(&mut self, id: ItemId, tick: Tick) {
        self.validate(id);
        let index = id.0;
        let item = &mut self.items[index as usize];
        if item.tick >= tick {
            return;
        }
        item.tick = tick;
        if index == self.tail {
            return;
        }
        self.detach(index);
        self.attach(index);
    }

    /// Detach an item and recycle its slot, returning the object.
    ///
    /// The cache never releases resources held by `T`; the caller owns
    /// whatever the returned object references.
    pub fn free(&mut self, id: ItemId) -> T {
        self.validate(id);
        let index = id.0;
        self.detach(index);
        let item = &mut self.items[index as usize];
        item.prev = NIL;
        item.next = NIL;
        let object = item.object.take().expect("freed a dead LRU item");
        self.free_items.push(index);
        object
    }

    /// Borrow the object at `id`.
    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.items.get(id.0 as usize)?.object.as_ref()
    }

    /// Mutably borrow the object at `id`.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut T> {
        self.items.get_mut(id.0 as usize)?.object.as_mut()
    }

    /// The stamp currently carried by `id`.
    pub fn tick_of(&self, id: ItemId) -> Option<Tick> {
        let item = self.items.get(id.0 as usize)?;
        item.object.as_ref()?;
        Some(item.tick)
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.items.len() - self.free_items.len()
    }

    /// Whether the cache holds no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every item stamped strictly before `tick`, head to tail.
    ///
    /// Stops at the first item whose stamp is not below `tick` (the
    /// start of the still-hot region), so enumeration costs O(cold
    /// items). The comparison is a signed difference, tolerating tick
    /// wraparound.
    pub fn for_each_below<F>(&self, tick: Tick, mut func: F)
    where
        F: FnMut(&T),
    {
        self.for_each_below_while(tick, |object| {
            func(object);
            false
        });
    }

    /// Like [`for_each_below`](TickLruCache::for_each_below), but the
    /// callback may stop the walk early by returning `true`.
    pub fn for_each_below_while<F>(&self, tick: Tick, mut func: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        while cursor != NIL {
            let item = &self.items[cursor as usize];
            if !item.tick.is_before(tick) {
                return;
            }
            let next = item.next;
            let object = item.object.as_ref().expect("linked item without object");
            if func(object) {
                return;
            }
            cursor = next;
        }
    }

    /// Take a recycled slot or grow the pool by one.
    fn build(&mut self) -> u32 {
        if let Some(index) = self.free_items.pop() {
            let item = &mut self.items[index as usize];
            item.prev = NIL;
            item.next = NIL;
            index
        } else {
            let index = self.items.len() as u32;
            self.items.push(Item {
                object: None,
                tick: Tick::ZERO,
                prev: NIL,
                next: NIL,
            });
            index
        }
    }

    /// Append `index` at the tail.
    fn attach(&mut self, index: u32) {
        if self.head == NIL {
            self.head = index;
        }
        if self.tail == NIL {
            self.tail = index;
        } else {
            self.items[index as usize].prev = self.tail;
            self.items[index as usize].next = NIL;
            self.items[self.tail as usize].next = index;
            self.tail = index;
        }
    }

    /// Unlink `index` from wherever it sits in the list.
    fn detach(&mut self, index: u32) {
        let (prev, next) = {
            let item = &self.items[index as usize];
            (item.prev, item.next)
        };
        if prev != NIL {
            self.items[prev as usize].next = next;
        }
        if next != NIL {
            self.items[next as usize].prev = prev;
        }
        if index == self.head {
            self.head = next;
            if self.head != NIL {
                self.items[self.head as usize].prev = NIL;
            }
        }
        if index == self.tail {
            self.tail = prev;
            if self.tail != NIL {
                self.items[self.tail as usize].next = NIL;
            }
        }
    }

    fn validate(&self, id: ItemId) {
        debug_assert!(
            (id.0 as usize) < self.items.len(),
            "LRU id {id} out of bounds"
        );
        debug_assert!(
            self.items[id.0 as usize].object.is_some(),
            "use of freed LRU id {id}"
        );
    }
}

impl<T> Default for TickLruCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
