//! Host rig interface and bone handles.
//!
//! The engine never owns the host's bone graph. Adapters implement [`HumanoidRig`] over
//! whatever scene representation they have and hand it to the engine at initialize time;
//! bones are resolved once into opaque [`BoneHandle`]s and addressed through them afterwards.

use hashbrown::HashMap;

use crate::bones::BoneName;
use crate::value::Euler;

/// Opaque handle to one joint in the host rig.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BoneHandle(pub u32);

/// Trait for reading and writing bone transforms on a host rig.
///
/// Handles passed to the accessors are always ones previously returned by `resolve`.
pub trait HumanoidRig {
    /// Whether the rig carries a humanoid bone mapping at all.
    fn is_humanoid(&self) -> bool {
        true
    }

    fn resolve(&mut self, bone: BoneName) -> Option<BoneHandle>;

    fn rotation(&self, handle: BoneHandle) -> Euler;
    fn set_rotation(&mut self, handle: BoneHandle, rotation: Euler);

    fn scale(&self, handle: BoneHandle) -> [f32; 3];
    fn set_scale(&mut self, handle: BoneHandle, scale: [f32; 3]);

    fn position(&self, handle: BoneHandle) -> [f32; 3];
    fn set_position(&mut self, handle: BoneHandle, position: [f32; 3]);
}

impl<R: HumanoidRig + ?Sized> HumanoidRig for &mut R {
    fn is_humanoid(&self) -> bool {
        (**self).is_humanoid()
    }
    fn resolve(&mut self, bone: BoneName) -> Option<BoneHandle> {
        (**self).resolve(bone)
    }
    fn rotation(&self, handle: BoneHandle) -> Euler {
        (**self).rotation(handle)
    }
    fn set_rotation(&mut self, handle: BoneHandle, rotation: Euler) {
        (**self).set_rotation(handle, rotation)
    }
    fn scale(&self, handle: BoneHandle) -> [f32; 3] {
        (**self).scale(handle)
    }
    fn set_scale(&mut self, handle: BoneHandle, scale: [f32; 3]) {
        (**self).set_scale(handle, scale)
    }
    fn position(&self, handle: BoneHandle) -> [f32; 3] {
        (**self).position(handle)
    }
    fn set_position(&mut self, handle: BoneHandle, position: [f32; 3]) {
        (**self).set_position(handle, position)
    }
}

/// One joint stored by [`MemoryRig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneNode {
    pub bone: BoneName,
    pub rotation: Euler,
    pub scale: [f32; 3],
    pub position: [f32; 3],
}

/// In-memory rig for headless hosts, tooling and tests.
#[derive(Clone, Debug)]
pub struct MemoryRig {
    humanoid: bool,
    nodes: Vec<BoneNode>,
    index: HashMap<BoneName, BoneHandle>,
}

impl Default for MemoryRig {
    fn default() -> Self {
        Self {
            humanoid: true,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl MemoryRig {
    /// Empty humanoid rig; add bones with [`MemoryRig::add_bone`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Rig with every canonical bone at zero rotation.
    pub fn full() -> Self {
        Self::with_bones(BoneName::ALL)
    }

    pub fn with_bones(bones: impl IntoIterator<Item = BoneName>) -> Self {
        let mut rig = Self::new();
        for bone in bones {
            rig.add_bone(bone, Euler::ZERO);
        }
        rig
    }

    /// A rig without a humanoid mapping; binding it fails.
    pub fn not_humanoid() -> Self {
        Self {
            humanoid: false,
            ..Self::default()
        }
    }

    /// Add (or reset) a bone with the given bind-time rotation.
    pub fn add_bone(&mut self, bone: BoneName, rest: Euler) -> BoneHandle {
        let node = BoneNode {
            bone,
            rotation: rest,
            scale: [1.0, 1.0, 1.0],
            position: [0.0, 0.0, 0.0],
        };
        if let Some(handle) = self.index.get(&bone) {
            self.nodes[handle.0 as usize] = node;
            return *handle;
        }
        let handle = BoneHandle(self.nodes.len() as u32);
        self.nodes.push(node);
        self.index.insert(bone, handle);
        handle
    }

    pub fn node(&self, bone: BoneName) -> Option<&BoneNode> {
        self.index
            .get(&bone)
            .and_then(|h| self.nodes.get(h.0 as usize))
    }

    pub fn rotation_of(&self, bone: BoneName) -> Option<Euler> {
        self.node(bone).map(|n| n.rotation)
    }

    pub fn scale_of(&self, bone: BoneName) -> Option<[f32; 3]> {
        self.node(bone).map(|n| n.scale)
    }

    pub fn position_of(&self, bone: BoneName) -> Option<[f32; 3]> {
        self.node(bone).map(|n| n.position)
    }

    pub fn bone_count(&self) -> usize {
        self.nodes.len()
    }
}

impl HumanoidRig for MemoryRig {
    fn is_humanoid(&self) -> bool {
        self.humanoid
    }

    fn resolve(&mut self, bone: BoneName) -> Option<BoneHandle> {
        if !self.humanoid {
            return None;
        }
        self.index.get(&bone).copied()
    }

    fn rotation(&self, handle: BoneHandle) -> Euler {
        self.nodes
            .get(handle.0 as usize)
            .map(|n| n.rotation)
            .unwrap_or_default()
    }

    fn set_rotation(&mut self, handle: BoneHandle, rotation: Euler) {
        if let Some(n) = self.nodes.get_mut(handle.0 as usize) {
            n.rotation = rotation;
        }
    }

    fn scale(&self, handle: BoneHandle) -> [f32; 3] {
        self.nodes
            .get(handle.0 as usize)
            .map(|n| n.scale)
            .unwrap_or([1.0, 1.0, 1.0])
    }

    fn set_scale(&mut self, handle: BoneHandle, scale: [f32; 3]) {
        if let Some(n) = self.nodes.get_mut(handle.0 as usize) {
            n.scale = scale;
        }
    }

    fn position(&self, handle: BoneHandle) -> [f32; 3] {
        self.nodes
            .get(handle.0 as usize)
            .map(|n| n.position)
            .unwrap_or_default()
    }

    fn set_position(&mut self, handle: BoneHandle, position: [f32; 3]) {
        if let Some(n) = self.nodes.get_mut(handle.0 as usize) {
            n.position = position;
        }
    }
}
