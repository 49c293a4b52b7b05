use a11yx_core::{HostDocument, MemoryDocument, PluginConfig};
use a11yx_core_types::NodeId;
use a11yx_engine::{Session, UiMessage};
use serde_json::json;

/// Page with `containers` frames of `children` nodes each, plus an open session
#[allow(dead_code)]
pub struct Fixture {
    pub doc: MemoryDocument,
    pub containers: Vec<NodeId>,
    pub nodes: Vec<Vec<NodeId>>,
    pub session: Session,
}

#[allow(dead_code)]
pub fn fixture(containers: usize, children: usize) -> Fixture {
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
    let session = Session::open(PluginConfig::default(), &mut doc).unwrap();
    Fixture {
        doc,
        containers: frames,
        nodes,
        session,
    }
}

#[allow(dead_code)]
pub fn add_stop(kind: &str) -> UiMessage {
    UiMessage::new("add-stop", json!({ "kind": kind }))
}

#[allow(dead_code)]
pub fn reorder(link_id: &str, to_index: usize) -> UiMessage {
    UiMessage::new("reorder-stop", json!({ "linkId": link_id, "toIndex": to_index }))
}

#[allow(dead_code)]
pub fn remove(link_id: &str) -> UiMessage {
    UiMessage::new("remove-stop", json!({ "linkId": link_id }))
}
