pub mod bundle;
pub mod kind;
pub mod payload;
pub mod record;

pub use bundle::Bundle;
pub use kind::AnnotationKind;
pub use payload::{
    AnnotationPayload, AriaRole, HeadingData, HeadingLevel, KeyAction, KeystopData, LabelData,
};
pub use record::{AnnotationRecord, StoredAnnotation};
