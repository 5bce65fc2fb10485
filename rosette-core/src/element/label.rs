//! Labels

use std::fmt;

use super::kind::{ElementKind, LabelData};
use super::value::ViewBridge;
use super::Element;
use crate::binder::{Binder, Getter};

/// Layout hint for a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelType {
    /// Let the view decide.
    #[default]
    Auto,
    /// Caption sits in front of an inline sub-field.
    Prefix,
}

/// A caption: constant text or a text-producing function.
#[derive(Clone)]
pub struct LabelElement {
    text: Getter<String>,
    label_type: LabelType,
}

impl LabelElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Getter::constant(text.into()),
            label_type: LabelType::Auto,
        }
    }

    /// A caption re-read every update sweep.
    pub fn from_fn<F>(text: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            text: Getter::new(text),
            label_type: LabelType::Auto,
        }
    }

    pub fn with_type(mut self, label_type: LabelType) -> Self {
        self.label_type = label_type;
        self
    }

    pub fn text(&self) -> String {
        self.text.get()
    }

    pub fn getter(&self) -> &Getter<String> {
        &self.text
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn into_element(self) -> Element {
        let LabelElement { text, label_type } = self;
        Element::with_kind(move |owner| {
            ElementKind::Label(LabelData {
                bridge: ViewBridge::new(owner, Binder::from_getter(text)),
                label_type,
            })
        })
    }
}

impl From<&str> for LabelElement {
    fn from(text: &str) -> Self {
        LabelElement::new(text)
    }
}

impl From<String> for LabelElement {
    fn from(text: String) -> Self {
        LabelElement::new(text)
    }
}

impl From<&String> for LabelElement {
    fn from(text: &String) -> Self {
        LabelElement::new(text.as_str())
    }
}

impl fmt::Debug for LabelElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelElement")
            .field("text", &self.text())
            .field("label_type", &self.label_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    #[test]
    fn literal_labels_are_constant() {
        let label: LabelElement = "Name".into();
        assert!(label.getter().is_const());
        assert_eq!(label.label_type(), LabelType::Auto);
        assert_eq!(label.into_element().caption().as_deref(), Some("Name"));
    }

    #[test]
    fn function_labels_follow_their_source() {
        let count = Arc::new(AtomicI32::new(1));
        let count_clone = count.clone();
        let label = LabelElement::from_fn(move || {
            format!("{} items", count_clone.load(Ordering::SeqCst))
        })
        .with_type(LabelType::Prefix);

        assert!(!label.getter().is_const());
        assert_eq!(label.text(), "1 items");
        count.store(2, Ordering::SeqCst);
        assert_eq!(label.text(), "2 items");
        assert_eq!(label.label_type(), LabelType::Prefix);
    }
}
