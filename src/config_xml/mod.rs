//! Default configuration document implementation.

mod widget;

pub use widget::{WidgetDocument, WidgetDocumentParser};
