/// Hands out a recorded sequence a few items at a time, one batch per frame.
pub struct Playback<'a, T> {
    items: &'a [T],
    per_frame: usize,
    position: usize,
}

impl<'a, T> Playback<'a, T> {
    pub fn new(items: &'a [T], per_frame: usize) -> Self {
        Self {
            items,
            per_frame: per_frame.max(1),
            position: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.items.len().div_ceil(self.per_frame)
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.items.len()
    }
}

impl<'a, T> Iterator for Playback<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        let end = (self.position + self.per_frame).min(self.items.len());
        let frame = &self.items[self.position..end];
        self.position = end;
        Some(frame)
    }
}
