use crate::library::Track;

/// Borrowed view of the filtered playlist: positions map to store indices.
#[derive(Debug, Clone, Copy)]
pub struct Queue<'a> {
    tracks: &'a [Track],
    order: &'a [usize],
}

impl<'a> Queue<'a> {
    pub fn new(tracks: &'a [Track], order: &'a [usize]) -> Self {
        Self { tracks, order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Track at a position of the filtered list.
    pub fn get(&self, pos: usize) -> Option<&'a Track> {
        self.order.get(pos).and_then(|&i| self.tracks.get(i))
    }
}
