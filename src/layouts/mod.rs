// Radio memory layouts: descriptors, built-in models and detection
pub mod ar5rm;
pub mod bf888;
pub mod descriptor;
pub mod detect;
pub mod registry;
pub mod uv5r;

pub use descriptor::{
    BitField, Duplex, FieldError, FreqField, LayoutDescriptor, ModelId, NameField, NameLocation,
    PowerField, Signature, ToneField, TxField,
};
pub use detect::{detect, detect_with_metadata, DetectError, DetectedBy, Detection};
pub use registry::{find_layout, get_layout, list_layouts, list_layouts_by_vendor};
