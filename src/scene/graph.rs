//! Scene graph nodes and resource disposal.
//!
//! A [`Node`] owns its children, an optional geometry and an optional
//! material. The graph is built once at startup and torn down exactly once
//! via [`Node::dispose`], which releases every GPU-backed resource in the
//! subtree bottom-up. There is no reference-counted auto-release: dropping a
//! node without disposing it leaks the GPU allocations until the device goes
//! away.

use cgmath::Vector3;

/// A GPU-backed resource that can be released.
///
/// `release` must be invoked at most once per resource: wgpu treats a second
/// `destroy` on the same buffer or texture as a usage error. The disposal
/// routine guarantees this structurally by moving resources out of their
/// nodes before releasing them.
pub trait Release {
    fn release(&mut self);
}

impl Release for wgpu::Buffer {
    fn release(&mut self) {
        self.destroy();
    }
}

/// Enumerates the releasable slots of a material.
///
/// Materials carry a fixed set of named optional sub-resources (uniform
/// buffer, texture maps). `for_each_resource` visits every slot that holds a
/// value, so disposal covers whatever maps a material happens to carry
/// without a per-material-kind special case.
pub trait MaterialResources {
    fn for_each_resource(&mut self, f: &mut dyn FnMut(&mut dyn Release));
}

/// A node in the scene graph.
///
/// Generic over the geometry and material types so the disposal logic can be
/// exercised without a GPU; the rendering code works with
/// [`SceneNode`](crate::scene::SceneNode), the alias over the concrete wgpu
/// resource types.
pub struct Node<G, M> {
    children: Vec<Node<G, M>>,
    pub geometry: Option<G>,
    pub material: Option<M>,
    /// Euler rotation applied to this node's model matrix, radians per axis.
    pub rotation: Vector3<f32>,
}

impl<G, M> Node<G, M> {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            geometry: None,
            material: None,
            rotation: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn with_resources(geometry: G, material: M) -> Self {
        Self {
            children: Vec::new(),
            geometry: Some(geometry),
            material: Some(material),
            rotation: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn add_child(&mut self, child: Node<G, M>) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Node<G, M>] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Node<G, M>] {
        &mut self.children
    }
}

impl<G: Release, M: MaterialResources> Node<G, M> {
    /// Release every GPU-backed resource owned transitively by this node and
    /// leave it childless.
    ///
    /// Children are drained from the front and each subtree is fully
    /// released before the child is dropped, so releases happen in
    /// post-order: no node's resources go away before all of its
    /// descendants' have. Only then are the node's own geometry and material
    /// slots released. Resources are moved out of their `Option`s first,
    /// which makes a second `dispose` on the same node a no-op rather than a
    /// double-release.
    pub fn dispose(&mut self) {
        while !self.children.is_empty() {
            let mut child = self.children.remove(0);
            child.dispose();
        }
        if let Some(mut geometry) = self.geometry.take() {
            geometry.release();
        }
        if let Some(mut material) = self.material.take() {
            material.for_each_resource(&mut |resource| resource.release());
        }
    }
}

impl<G, M> Default for Node<G, M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type ReleaseLog = Rc<RefCell<Vec<String>>>;

    struct Recorded {
        label: String,
        releases: u32,
        log: ReleaseLog,
    }

    impl Recorded {
        fn new(label: &str, log: &ReleaseLog) -> Self {
            Self {
                label: label.to_string(),
                releases: 0,
                log: log.clone(),
            }
        }
    }

    impl Release for Recorded {
        fn release(&mut self) {
            self.releases += 1;
            assert_eq!(self.releases, 1, "{} released twice", self.label);
            self.log.borrow_mut().push(self.label.clone());
        }
    }

    struct SlottedMaterial {
        slots: Vec<Recorded>,
    }

    impl MaterialResources for SlottedMaterial {
        fn for_each_resource(&mut self, f: &mut dyn FnMut(&mut dyn Release)) {
            for slot in self.slots.iter_mut() {
                f(slot);
            }
        }
    }

    fn mk_node(
        geometry: Option<&str>,
        slots: &[&str],
        log: &ReleaseLog,
    ) -> Node<Recorded, SlottedMaterial> {
        let mut node = Node::new();
        node.geometry = geometry.map(|label| Recorded::new(label, log));
        if !slots.is_empty() {
            node.material = Some(SlottedMaterial {
                slots: slots.iter().map(|label| Recorded::new(label, log)).collect(),
            });
        }
        node
    }

    #[test]
    fn releases_every_resource_exactly_once() {
        let log: ReleaseLog = Default::default();
        let mut root = mk_node(Some("g-root"), &["m-root"], &log);
        let mut mid = mk_node(Some("g-mid"), &[], &log);
        mid.add_child(mk_node(Some("g-leaf"), &["m-leaf-a", "m-leaf-b"], &log));
        root.add_child(mid);

        root.dispose();

        let mut released = log.borrow().clone();
        released.sort();
        assert_eq!(
            released,
            vec!["g-leaf", "g-mid", "g-root", "m-leaf-a", "m-leaf-b", "m-root"]
        );
    }

    #[test]
    fn root_is_childless_after_dispose() {
        let log: ReleaseLog = Default::default();
        let mut root = mk_node(None, &[], &log);
        root.add_child(mk_node(Some("a"), &[], &log));
        root.add_child(mk_node(Some("b"), &[], &log));

        root.dispose();

        assert!(root.children().is_empty());
    }

    #[test]
    fn releases_descendants_before_ancestors() {
        let log: ReleaseLog = Default::default();
        let mut root = mk_node(Some("depth0"), &[], &log);
        let mut mid = mk_node(Some("depth1"), &[], &log);
        mid.add_child(mk_node(Some("depth2"), &[], &log));
        root.add_child(mid);

        root.dispose();

        let order = log.borrow().clone();
        let at = |label: &str| order.iter().position(|l| l == label).unwrap();
        assert!(at("depth2") < at("depth1"));
        assert!(at("depth1") < at("depth0"));
    }

    #[test]
    fn bare_node_disposes_without_release_calls() {
        let log: ReleaseLog = Default::default();
        let mut root = mk_node(None, &[], &log);
        root.add_child(mk_node(None, &[], &log));

        root.dispose();

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn material_slot_count_matches_release_count() {
        for n in [0usize, 1, 3] {
            let log: ReleaseLog = Default::default();
            let labels: Vec<String> = (0..n).map(|i| format!("slot{}", i)).collect();
            let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut root = mk_node(None, &label_refs, &log);

            root.dispose();

            assert_eq!(log.borrow().len(), n);
        }
    }

    #[test]
    fn second_dispose_is_a_noop() {
        let log: ReleaseLog = Default::default();
        let mut root = mk_node(Some("g"), &["m"], &log);

        root.dispose();
        root.dispose();

        assert_eq!(log.borrow().len(), 2);
    }
}
