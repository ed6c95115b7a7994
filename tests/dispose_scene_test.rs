//! End-to-end disposal scenario exercised through the public graph API,
//! with instrumented resources standing in for GPU buffers and textures.

use std::cell::RefCell;
use std::rc::Rc;

use orbview::scene::graph::{MaterialResources, Node, Release};

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Released(&'static str),
}

type EventLog = Rc<RefCell<Vec<Event>>>;

struct TracedResource {
    label: &'static str,
    releases: u32,
    log: EventLog,
}

impl TracedResource {
    fn new(label: &'static str, log: &EventLog) -> Self {
        Self {
            label,
            releases: 0,
            log: log.clone(),
        }
    }
}

impl Release for TracedResource {
    fn release(&mut self) {
        self.releases += 1;
        assert_eq!(self.releases, 1, "{} released more than once", self.label);
        self.log.borrow_mut().push(Event::Released(self.label));
    }
}

struct TracedMaterial {
    color_map: Option<TracedResource>,
}

impl MaterialResources for TracedMaterial {
    fn for_each_resource(&mut self, f: &mut dyn FnMut(&mut dyn Release)) {
        if let Some(texture) = &mut self.color_map {
            f(texture);
        }
    }
}

/// The three-node scenario: root -> childA (geometry G1, material M1 with
/// one texture T1) -> childB (geometry G2 only). After dispose, every
/// resource is released once, T1 and G1 come from childA's subtree before
/// childA's parent-side processing finishes, and the root is childless.
#[test]
fn three_node_graph_releases_everything_in_post_order() {
    let log: EventLog = Default::default();

    let mut child_b: Node<TracedResource, TracedMaterial> = Node::new();
    child_b.geometry = Some(TracedResource::new("G2", &log));

    let mut child_a: Node<TracedResource, TracedMaterial> = Node::new();
    child_a.geometry = Some(TracedResource::new("G1", &log));
    child_a.material = Some(TracedMaterial {
        color_map: Some(TracedResource::new("T1", &log)),
    });
    child_a.add_child(child_b);

    let mut root: Node<TracedResource, TracedMaterial> = Node::new();
    root.add_child(child_a);

    root.dispose();

    let events = log.borrow().clone();
    assert_eq!(events.len(), 3, "exactly one release per resource");

    let at = |label| {
        events
            .iter()
            .position(|e| *e == Event::Released(label))
            .unwrap_or_else(|| panic!("{} was never released", label))
    };
    // childB sits below childA, so G2 is released before childA's own
    // geometry and material
    assert!(at("G2") < at("G1"));
    assert!(at("G2") < at("T1"));

    assert!(root.children().is_empty());
}

#[test]
fn material_without_occupied_slots_releases_nothing() {
    let log: EventLog = Default::default();

    let mut root: Node<TracedResource, TracedMaterial> = Node::new();
    root.material = Some(TracedMaterial { color_map: None });

    root.dispose();

    assert!(log.borrow().is_empty());
}

#[test]
fn wide_graph_is_fully_drained() {
    let log: EventLog = Default::default();

    let mut root: Node<TracedResource, TracedMaterial> = Node::new();
    for _ in 0..8 {
        let mut child: Node<TracedResource, TracedMaterial> = Node::new();
        child.geometry = Some(TracedResource::new("leaf", &log));
        root.add_child(child);
    }

    root.dispose();

    assert_eq!(log.borrow().len(), 8);
    assert!(root.children().is_empty());
}
