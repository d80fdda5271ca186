use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in the Core arena.
    ///
    /// Keys are generational: once a node is freed its key never resolves
    /// again, so holding a `NodeId` never keeps a node alive.
    pub struct NodeId;
}

/// Source of the stable integer serials assigned to nodes at construction.
pub trait IdSource {
    /// Return the next serial. Must be strictly increasing.
    fn next_serial(&mut self) -> u64;
}

/// Default serial source: a counter starting at a configurable value.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    /// Next serial to hand out.
    next: u64,
}

impl SequentialIds {
    /// Construct a counter whose first serial is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl IdSource for SequentialIds {
    fn next_serial(&mut self) -> u64 {
        let serial = self.next;
        self.next += 1;
        serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_increase() {
        let mut ids = SequentialIds::starting_at(7);
        assert_eq!(ids.next_serial(), 7);
        assert_eq!(ids.next_serial(), 8);
        assert_eq!(ids.next_serial(), 9);
    }
}
