use a11yx_core::model::{AnnotationKind, AnnotationPayload, AriaRole, KeystopData, LabelData};
use a11yx_core::ops::AnnotationState;
use a11yx_core::{HostDocument, KeySpace, MemoryDocument};
use a11yx_core_types::NodeId;

/// A page with `containers` top-level frames, each holding `children` nodes
#[allow(dead_code)]
pub struct Page {
    pub doc: MemoryDocument,
    pub containers: Vec<NodeId>,
    pub nodes: Vec<Vec<NodeId>>,
}

#[allow(dead_code)]
pub fn page(containers: usize, children: usize) -> Page {
    let mut doc = MemoryDocument::new();
    let root = doc.page();
    let mut frames = Vec::new();
    let mut nodes = Vec::new();
    for c in 0..containers {
        let frame = doc.create_node(&root, &format!("frame-{}", c)).unwrap();
        let kids = (0..children)
            .map(|i| doc.create_node(&frame, &format!("node-{}-{}", c, i)).unwrap())
            .collect();
        frames.push(frame);
        nodes.push(kids);
    }
    Page {
        doc,
        containers: frames,
        nodes,
    }
}

#[allow(dead_code)]
pub fn new_state() -> AnnotationState {
    AnnotationState::new(KeySpace::default())
}

#[allow(dead_code)]
pub fn keystop() -> AnnotationPayload {
    AnnotationPayload::Keystop(KeystopData::default())
}

#[allow(dead_code)]
pub fn label(role: AriaRole) -> AnnotationPayload {
    AnnotationPayload::Label(LabelData { role, text: None })
}

/// Orders stored on the records of one list, in list sequence
#[allow(dead_code)]
pub fn stored_orders(
    state: &mut AnnotationState,
    doc: &MemoryDocument,
    container: &NodeId,
    kind: AnnotationKind,
) -> Vec<u32> {
    let links = state.orders.get(container, kind).to_vec();
    links
        .iter()
        .map(|link| {
            state
                .registry
                .lookup(doc, link)
                .unwrap()
                .expect("listed link should resolve")
                .order
        })
        .collect()
}

/// Every list's stored orders are exactly `0..len`
#[allow(dead_code)]
pub fn assert_all_contiguous(state: &mut AnnotationState, doc: &MemoryDocument) {
    for key in state.orders.list_keys() {
        let orders = stored_orders(state, doc, &key.container, key.kind);
        let expected: Vec<u32> = (0..orders.len() as u32).collect();
        assert_eq!(orders, expected, "list {:?} is not contiguous", key);
    }
}
