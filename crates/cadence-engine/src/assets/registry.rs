use super::{Asset, AssetKind};

/// Typed reference to a registered asset.
///
/// Handles are generation-checked: once the asset is released or drained, the
/// handle no longer resolves, even if its slot is reused.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AssetHandle {
    kind: AssetKind,
    index: u32,
    generation: u32,
}

impl AssetHandle {
    pub fn kind(&self) -> AssetKind {
        self.kind
    }
}

struct Slot {
    generation: u32,
    /// Registration sequence, for stable destruction order across slot reuse.
    seq: u64,
    asset: Option<Box<dyn Asset>>,
}

#[derive(Default)]
struct Pool {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl Pool {
    fn insert(&mut self, seq: u64, asset: Box<dyn Asset>) -> (u32, u32) {
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.seq = seq;
            slot.asset = Some(asset);
            return (index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            seq,
            asset: Some(asset),
        });
        (index, 0)
    }

    fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut Slot> {
        self.slots
            .get_mut(index as usize)
            .filter(|s| s.generation == generation && s.asset.is_some())
    }

    fn take(&mut self, index: u32, generation: u32) -> Option<Box<dyn Asset>> {
        let asset = self.get_mut(index, generation)?.asset.take()?;
        self.free.push(index);
        self.live -= 1;
        Some(asset)
    }

    /// Destroys every live asset in registration order, then empties the pool.
    ///
    /// Slots are kept so their generations keep invalidating old handles.
    fn drain(&mut self) -> usize {
        let mut live: Vec<u32> = (0..self.slots.len() as u32)
            .filter(|&i| self.slots[i as usize].asset.is_some())
            .collect();
        live.sort_by_key(|&i| self.slots[i as usize].seq);

        let mut destroyed = 0;
        for index in live {
            if let Some(mut asset) = self.slots[index as usize].asset.take() {
                asset.destroy();
                self.free.push(index);
                destroyed += 1;
            }
        }

        self.live = 0;
        destroyed
    }
}

/// Arena of live assets, one pool per [`AssetKind`].
#[derive(Default)]
pub struct AssetRegistry {
    pools: [Pool; 4],
    next_seq: u64,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: AssetKind, asset: Box<dyn Asset>) -> AssetHandle {
        let seq = self.next_seq;
        self.next_seq += 1;

        let (index, generation) = self.pools[kind.slot()].insert(seq, asset);
        log::trace!("registered {} #{index}", kind.name());

        AssetHandle {
            kind,
            index,
            generation,
        }
    }

    pub fn contains(&self, handle: AssetHandle) -> bool {
        self.pools[handle.kind.slot()]
            .slots
            .get(handle.index as usize)
            .is_some_and(|s| s.generation == handle.generation && s.asset.is_some())
    }

    /// Destroys one asset ahead of shutdown. Returns false for stale handles.
    pub fn release(&mut self, handle: AssetHandle) -> bool {
        match self.pools[handle.kind.slot()].take(handle.index, handle.generation) {
            Some(mut asset) => {
                asset.destroy();
                true
            }
            None => false,
        }
    }

    pub fn live_count(&self, kind: AssetKind) -> usize {
        self.pools[kind.slot()].live
    }

    pub fn total_live(&self) -> usize {
        self.pools.iter().map(|p| p.live).sum()
    }

    /// Destroys every live asset, kind by kind in [`AssetKind::TEARDOWN_ORDER`],
    /// clearing each kind only after its instances were destroyed.
    ///
    /// Returns the number of destroyed assets.
    pub fn drain(&mut self) -> usize {
        let mut total = 0;

        for kind in AssetKind::TEARDOWN_ORDER {
            let destroyed = self.pools[kind.slot()].drain();
            if destroyed > 0 {
                log::debug!("destroyed {destroyed} {} asset(s)", kind.name());
            }
            total += destroyed;
        }

        total
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Tracked {
        name: String,
        log: Log,
    }

    impl Asset for Tracked {
        fn destroy(&mut self) {
            self.log.borrow_mut().push(self.name.clone());
        }
    }

    fn tracked(log: &Log, name: &str) -> Box<dyn Asset> {
        Box::new(Tracked {
            name: name.to_string(),
            log: Rc::clone(log),
        })
    }

    #[test]
    fn drain_follows_dependency_order() {
        let log = Log::default();
        let mut reg = AssetRegistry::new();

        // Registered in the worst possible order.
        reg.register(AssetKind::Texture, tracked(&log, "texture"));
        reg.register(AssetKind::Shader, tracked(&log, "shader"));
        reg.register(AssetKind::Mesh, tracked(&log, "mesh"));
        reg.register(AssetKind::Model, tracked(&log, "model"));

        assert_eq!(reg.drain(), 4);
        assert_eq!(*log.borrow(), ["model", "mesh", "shader", "texture"]);
        assert_eq!(reg.total_live(), 0);
    }

    #[test]
    fn every_model_is_destroyed_before_clearing() {
        let log = Log::default();
        let mut reg = AssetRegistry::new();
        for i in 0..3 {
            reg.register(AssetKind::Model, tracked(&log, &format!("model{i}")));
        }

        reg.drain();

        assert_eq!(*log.borrow(), ["model0", "model1", "model2"]);
        assert_eq!(reg.live_count(AssetKind::Model), 0);
    }

    #[test]
    fn release_destroys_once_and_invalidates_handle() {
        let log = Log::default();
        let mut reg = AssetRegistry::new();
        let h = reg.register(AssetKind::Mesh, tracked(&log, "mesh"));

        assert!(reg.contains(h));
        assert!(reg.release(h));
        assert!(!reg.contains(h));
        assert!(!reg.release(h));
        assert_eq!(reg.drain(), 0);
        assert_eq!(*log.borrow(), ["mesh"]);
    }

    #[test]
    fn reused_slot_rejects_old_handle() {
        let log = Log::default();
        let mut reg = AssetRegistry::new();
        let old = reg.register(AssetKind::Texture, tracked(&log, "a"));
        reg.release(old);
        let new = reg.register(AssetKind::Texture, tracked(&log, "b"));

        assert_ne!(old, new);
        assert!(!reg.contains(old));
        assert!(reg.contains(new));
        assert_eq!(reg.live_count(AssetKind::Texture), 1);
    }

    #[test]
    fn drained_handle_stays_stale_after_reregister() {
        let log = Log::default();
        let mut reg = AssetRegistry::new();
        let old = reg.register(AssetKind::Mesh, tracked(&log, "first"));

        reg.drain();
        let new = reg.register(AssetKind::Mesh, tracked(&log, "second"));

        assert_ne!(old, new);
        assert!(!reg.contains(old));
        assert!(reg.contains(new));
        assert!(!reg.release(old));
        assert_eq!(*log.borrow(), ["first"]);
        assert_eq!(reg.live_count(AssetKind::Mesh), 1);
    }

    #[test]
    fn reuse_keeps_registration_order() {
        let log = Log::default();
        let mut reg = AssetRegistry::new();
        let a = reg.register(AssetKind::Shader, tracked(&log, "a"));
        reg.register(AssetKind::Shader, tracked(&log, "b"));
        reg.release(a);
        log.borrow_mut().clear();

        // Lands in slot 0 but was registered last.
        reg.register(AssetKind::Shader, tracked(&log, "c"));
        reg.drain();

        assert_eq!(*log.borrow(), ["b", "c"]);
    }
}
