//! Live asset tracking and ordered teardown.
//!
//! Asset storage itself belongs to the loaders; the engine only keeps every
//! live instance in one [`AssetRegistry`] so shutdown can destroy them in
//! dependency order. Models reference meshes, shaders and textures, so they
//! go first.

mod registry;

pub use registry::{AssetHandle, AssetRegistry};

/// Category of a tracked asset.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Model,
    Mesh,
    Shader,
    Texture,
}

impl AssetKind {
    /// Destruction order used by [`AssetRegistry::drain`]. Every kind appears
    /// after the kinds that may reference it.
    pub const TEARDOWN_ORDER: [AssetKind; 4] = [
        AssetKind::Model,
        AssetKind::Mesh,
        AssetKind::Shader,
        AssetKind::Texture,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssetKind::Model => "model",
            AssetKind::Mesh => "mesh",
            AssetKind::Shader => "shader",
            AssetKind::Texture => "texture",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            AssetKind::Model => 0,
            AssetKind::Mesh => 1,
            AssetKind::Shader => 2,
            AssetKind::Texture => 3,
        }
    }
}

/// A live asset instance. `destroy` releases whatever the loader allocated.
pub trait Asset {
    fn destroy(&mut self);
}
