/// Handle into an [`Arena`]. Stale handles (freed and reused slots) fail
/// lookups instead of aliasing the new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Cell<T> {
    generation: u64,
    value: Option<T>,
}

/// Slab-style storage with generation-checked handles.
#[derive(Debug)]
pub struct Arena<T> {
    cells: Vec<Cell<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let cell = &mut self.cells[index];
            cell.generation += 1;
            cell.value = Some(value);
            return SlotId {
                index,
                generation: cell.generation,
            };
        }
        self.cells.push(Cell {
            generation: 0,
            value: Some(value),
        });
        SlotId {
            index: self.cells.len() - 1,
            generation: 0,
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.cells
            .get(id.index)
            .filter(|cell| cell.generation == id.generation)
            .and_then(|cell| cell.value.as_ref())
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let cell = self.cells.get_mut(id.index)?;
        if cell.generation != id.generation {
            return None;
        }
        let value = cell.value.take()?;
        self.free.push(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
