//! Element Nodes
//!
//! This module defines the element handle, its identity and the tree
//! operations shared by every element kind.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, RwLock};

use super::kind::ElementKind;
use super::state::ElementState;
use super::style::Style;
use super::{
    ButtonData, DynamicData, FieldData, FoldData, GroupKind, LabelData, ListContainer, MinMaxData,
    SliderData, WindowData,
};
use crate::error::{Result, UiError};
use crate::reactive::{Notifier, ReactiveProperty, Subscription};

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

pub(crate) struct ElementNode {
    id: ElementId,
    kind: ElementKind,
    parent: RwLock<Weak<ElementNode>>,
    children: RwLock<Vec<Element>>,

    enable: ReactiveProperty<bool>,
    self_interactable: AtomicBool,
    interactable: ReactiveProperty<bool>,
    style: OnceLock<ReactiveProperty<Style>>,
    force_update: AtomicBool,

    on_update: Notifier<Element>,
    view_value_changed: Notifier<Element>,
    detach_view: Notifier<Element>,

    /// Subscriptions that live exactly as long as this element.
    owned: Mutex<Vec<Subscription>>,
    destroyed: AtomicBool,
}

/// Handle to a node in the element graph.
///
/// Clones refer to the same node. Equality is identity.
#[derive(Clone)]
pub struct Element(Arc<ElementNode>);

/// Non-owning element handle held by a node's own payload.
#[derive(Clone, Default)]
pub struct WeakElement(Weak<ElementNode>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl fmt::Debug for WeakElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakElement")
            .field(&self.upgrade().map(|element| element.id()))
            .finish()
    }
}

impl Element {
    /// Create a node whose payload needs a weak handle to the node itself.
    pub(crate) fn with_kind<F>(make: F) -> Element
    where
        F: FnOnce(&WeakElement) -> ElementKind,
    {
        Element(Arc::new_cyclic(|weak| {
            let kind = make(&WeakElement(weak.clone()));
            ElementNode {
                id: ElementId::next(),
                kind,
                parent: RwLock::new(Weak::new()),
                children: RwLock::new(Vec::new()),
                enable: ReactiveProperty::new(true),
                self_interactable: AtomicBool::new(true),
                interactable: ReactiveProperty::new(true),
                style: OnceLock::new(),
                force_update: AtomicBool::new(false),
                on_update: Notifier::new(),
                view_value_changed: Notifier::new(),
                detach_view: Notifier::new(),
                owned: Mutex::new(Vec::new()),
                destroyed: AtomicBool::new(false),
            }
        }))
    }

    pub(crate) fn new(kind: ElementKind) -> Element {
        Self::with_kind(|_| kind)
    }

    pub fn id(&self) -> ElementId {
        self.0.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.0.kind
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Arc::downgrade(&self.0))
    }

    // --- tree ---------------------------------------------------------------

    pub fn parent(&self) -> Option<Element> {
        self.0.parent.read().upgrade().map(Element)
    }

    /// Parent, grandparent, and so on up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Element> {
        std::iter::successors(self.parent(), Element::parent)
    }

    /// Children in presentation order.
    ///
    /// For list containers these are the materialized items, in index order.
    pub fn children(&self) -> Vec<Element> {
        let mut children = match &self.0.kind {
            ElementKind::List(list) => list.materialized(),
            _ => Vec::new(),
        };
        children.extend(self.0.children.read().iter().cloned());
        children
    }

    pub fn child(&self, index: usize) -> Option<Element> {
        self.children().into_iter().nth(index)
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Append a child.
    ///
    /// Fails if `child` is `self` or one of its ancestors, or already has a
    /// parent.
    pub fn add_child(&self, child: Element) -> Result<()> {
        self.validate_child(&child)?;
        self.adopt(child);
        Ok(())
    }

    /// Insert a child at `index` (clamped to the child count).
    pub fn insert_child(&self, index: usize, child: Element) -> Result<()> {
        self.validate_child(&child)?;
        child.link_parent(self);
        {
            let mut children = self.0.children.write();
            let index = index.min(children.len());
            children.insert(index, child.clone());
        }
        child.refresh_interactable();
        Ok(())
    }

    /// Remove a direct child without destroying it.
    pub fn remove_child(&self, child: &Element) -> bool {
        let removed = {
            let mut children = self.0.children.write();
            let before = children.len();
            children.retain(|c| c != child);
            before != children.len()
        };
        if removed {
            *child.0.parent.write() = Weak::new();
            child.refresh_interactable();
        }
        removed
    }

    pub(crate) fn validate_child(&self, child: &Element) -> Result<()> {
        if child == self || self.ancestors().any(|ancestor| ancestor == *child) {
            return Err(UiError::WouldCreateCycle {
                child: child.id(),
                parent: self.id(),
            });
        }
        if let Some(parent) = child.parent() {
            return Err(UiError::AlreadyParented {
                child: child.id(),
                parent: parent.id(),
            });
        }
        Ok(())
    }

    /// Append a freshly built child that is known to be parentless.
    pub(crate) fn adopt(&self, child: Element) {
        child.link_parent(self);
        self.0.children.write().push(child.clone());
        child.refresh_interactable();
    }

    /// Point the parent link at `parent` without entering its child list.
    ///
    /// List items are owned by their container's item map instead.
    pub(crate) fn link_parent(&self, parent: &Element) {
        *self.0.parent.write() = Arc::downgrade(&parent.0);
        self.refresh_interactable();
    }

    fn unlink(&self) {
        let parent = std::mem::take(&mut *self.0.parent.write());
        if let Some(parent) = parent.upgrade() {
            if let ElementKind::List(list) = &parent.kind {
                list.forget_item(self);
            }
            parent.children.write().retain(|c| c != self);
        }
    }

    // --- lifecycle ----------------------------------------------------------

    /// Remove this element from its parent.
    ///
    /// With `detach_view`, every descendant and then this element raise their
    /// detach-from-view notification first, so views can unbind.
    pub fn detach(&self, detach_view: bool) {
        if detach_view {
            self.propagate_detach_view();
        }
        self.unlink();
        self.refresh_interactable();
    }

    fn propagate_detach_view(&self) {
        for child in self.children() {
            child.propagate_detach_view();
        }
        self.0.detach_view.notify(self);
    }

    /// Tear down this element and its whole subtree.
    ///
    /// Descendants are destroyed before this node is unlinked. All bridge and
    /// metadata subscriptions are released.
    pub fn destroy(&self) {
        if self.0.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        for child in self.children() {
            child.destroy();
        }

        self.0.detach_view.notify(self);
        self.0.kind.release();

        self.0.on_update.clear();
        self.0.view_value_changed.clear();
        self.0.detach_view.clear();
        self.0.enable.clear_subscribers();
        self.0.interactable.clear_subscribers();
        if let Some(style) = self.0.style.get() {
            style.clear_subscribers();
        }

        let owned = std::mem::take(&mut *self.0.owned.lock());
        drop(owned);

        self.unlink();
        self.0.children.write().clear();
        tracing::trace!(id = self.id().raw(), kind = self.0.kind.name(), "element destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.0.destroyed.load(Ordering::SeqCst)
    }

    /// Pull current values into this subtree.
    ///
    /// `on_update` callbacks always run. A disabled element is skipped with
    /// its whole subtree unless force-update is set. Structural changes of
    /// this element (list resync, dynamic rebuild) complete before children
    /// are visited.
    pub fn update(&self) {
        if self.is_destroyed() {
            return;
        }

        self.0.on_update.notify(self);

        if !self.is_enabled() && !self.0.force_update.load(Ordering::Relaxed) {
            return;
        }

        self.0.kind.update(self);

        for child in self.children() {
            child.update();
        }
    }

    pub fn set_force_update(&self, force: bool) {
        self.0.force_update.store(force, Ordering::Relaxed);
    }

    // --- metadata -----------------------------------------------------------

    /// Visibility and update gating.
    pub fn enable(&self) -> &ReactiveProperty<bool> {
        &self.0.enable
    }

    pub fn is_enabled(&self) -> bool {
        self.0.enable.get()
    }

    pub fn set_enable(&self, enable: bool) {
        self.0.enable.set(enable);
    }

    /// Effective interactable state: own flag AND every ancestor's.
    pub fn interactable(&self) -> &ReactiveProperty<bool> {
        &self.0.interactable
    }

    pub fn is_interactable(&self) -> bool {
        self.0.interactable.get()
    }

    pub fn is_self_interactable(&self) -> bool {
        self.0.self_interactable.load(Ordering::SeqCst)
    }

    pub fn set_interactable(&self, interactable: bool) {
        self.0.self_interactable.store(interactable, Ordering::SeqCst);
        self.refresh_interactable();
    }

    fn refresh_interactable(&self) {
        let inherited = self.parent().map_or(true, |parent| parent.is_interactable());
        let effective = self.is_self_interactable() && inherited;
        if self.0.interactable.set(effective) {
            for child in self.children() {
                child.refresh_interactable();
            }
        }
    }

    /// Style overrides, allocated on first access.
    pub fn style(&self) -> &ReactiveProperty<Style> {
        self.0.style.get_or_init(ReactiveProperty::default)
    }

    pub fn has_style(&self) -> bool {
        self.0.style.get().is_some()
    }

    /// Whether the bound location rejects writes.
    pub fn is_read_only(&self) -> bool {
        match &self.0.kind {
            ElementKind::Field(field) => field.is_read_only(),
            ElementKind::Slider(slider) => slider.is_read_only(),
            ElementKind::MinMaxSlider(slider) => slider.is_read_only(),
            ElementKind::List(list) => list.is_read_only(),
            _ => false,
        }
    }

    /// Caption text: the label itself, or a leading label child.
    pub fn caption(&self) -> Option<String> {
        if let ElementKind::Label(label) = &self.0.kind {
            return Some(label.text());
        }
        let first = self.0.children.read().first().cloned()?;
        match first.kind() {
            ElementKind::Label(label) => Some(label.text()),
            _ => None,
        }
    }

    // --- callbacks ----------------------------------------------------------

    /// Run `callback` at the start of every update sweep, even while disabled.
    pub fn on_update<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Element) + Send + Sync + 'static,
    {
        self.0.on_update.subscribe(callback)
    }

    /// Observe view-originated edits in this element or any descendant.
    ///
    /// The callback receives the element that was edited.
    pub fn subscribe_view_value_changed<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Element) + Send + Sync + 'static,
    {
        self.0.view_value_changed.subscribe(callback)
    }

    pub fn on_detach_view<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Element) + Send + Sync + 'static,
    {
        self.0.detach_view.subscribe(callback)
    }

    /// Raise the view-value-changed notification on this element and every
    /// ancestor, once each.
    pub fn notify_view_value_changed(&self) {
        let mut node = Some(self.clone());
        while let Some(current) = node {
            current.0.view_value_changed.notify(self);
            node = current.parent();
        }
    }

    /// Keep a subscription alive until this element is destroyed.
    pub fn own(&self, subscription: Subscription) {
        self.0.owned.lock().push(subscription);
    }

    /// Re-evaluate the enable flag every sweep.
    pub fn enable_if<F>(self, condition: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let subscription = self.on_update(move |element| element.set_enable(condition()));
        self.own(subscription);
        self
    }

    /// Re-evaluate the interactable flag every sweep.
    pub fn interactable_if<F>(self, condition: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let subscription = self.on_update(move |element| element.set_interactable(condition()));
        self.own(subscription);
        self
    }

    pub fn with_style(self, style: Style) -> Self {
        self.style().set(style);
        self
    }

    pub fn with_interactable(self, interactable: bool) -> Self {
        self.set_interactable(interactable);
        self
    }

    pub fn with_enable(self, enable: bool) -> Self {
        self.set_enable(enable);
        self
    }

    // --- ui state -----------------------------------------------------------

    /// Transferable UI state of this subtree.
    pub fn capture_state(&self) -> ElementState {
        let mut state = ElementState::default();
        self.collect_state(&mut state);
        state
    }

    fn collect_state(&self, state: &mut ElementState) {
        if let ElementKind::Fold(fold) = &self.0.kind {
            state.folds.push(fold.is_open());
        }
        for child in self.children() {
            child.collect_state(state);
        }
    }

    /// Replay state captured from a structurally similar subtree.
    ///
    /// Extra or missing entries are ignored.
    pub fn apply_state(&self, state: &ElementState) {
        let mut folds = state.folds.iter().copied();
        self.restore_state(&mut folds);
    }

    fn restore_state(&self, folds: &mut impl Iterator<Item = bool>) {
        if let ElementKind::Fold(fold) = &self.0.kind {
            if let Some(open) = folds.next() {
                fold.set_open(open);
            }
        }
        for child in self.children() {
            child.restore_state(folds);
        }
    }

    // --- kind accessors -----------------------------------------------------

    pub fn as_label(&self) -> Option<&LabelData> {
        match &self.0.kind {
            ElementKind::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldData> {
        match &self.0.kind {
            ElementKind::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_slider(&self) -> Option<&SliderData> {
        match &self.0.kind {
            ElementKind::Slider(slider) => Some(slider),
            _ => None,
        }
    }

    pub fn as_min_max_slider(&self) -> Option<&MinMaxData> {
        match &self.0.kind {
            ElementKind::MinMaxSlider(slider) => Some(slider),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&ButtonData> {
        match &self.0.kind {
            ElementKind::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<GroupKind> {
        match &self.0.kind {
            ElementKind::Group(group) => Some(*group),
            _ => None,
        }
    }

    pub fn as_fold(&self) -> Option<&FoldData> {
        match &self.0.kind {
            ElementKind::Fold(fold) => Some(fold),
            _ => None,
        }
    }

    pub fn as_window(&self) -> Option<&WindowData> {
        match &self.0.kind {
            ElementKind::Window(window) => Some(window),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListContainer> {
        match &self.0.kind {
            ElementKind::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dynamic(&self) -> Option<&DynamicData> {
        match &self.0.kind {
            ElementKind::Dynamic(dynamic) => Some(dynamic),
            _ => None,
        }
    }

    /// Depth-first search of this subtree, including `self`.
    pub fn find<P>(&self, predicate: P) -> Option<Element>
    where
        P: Fn(&Element) -> bool + Copy,
    {
        if predicate(self) {
            return Some(self.clone());
        }
        self.children()
            .into_iter()
            .find_map(|child| child.find(predicate))
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.0.id)
            .field("kind", &self.0.kind.name())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LabelElement;
    use crate::ui;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn element_ids_are_unique() {
        let a = ui::space();
        let b = ui::space();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn second_parent_is_rejected() {
        let child = ui::label("child");
        let first = ui::row(vec![]).unwrap();
        let second = ui::column(vec![]).unwrap();

        first.add_child(child.clone()).unwrap();
        let err = second.add_child(child.clone());

        assert!(matches!(err, Err(UiError::AlreadyParented { .. })));
        assert_eq!(first.child_count(), 1);
        assert_eq!(second.child_count(), 0);
        assert_eq!(child.parent(), Some(first));
    }

    #[test]
    fn ancestor_cannot_become_child() {
        let inner = ui::row(vec![]).unwrap();
        let outer = ui::column(vec![inner.clone()]).unwrap();

        assert!(matches!(
            inner.add_child(outer.clone()),
            Err(UiError::WouldCreateCycle { .. })
        ));
        assert!(matches!(
            inner.add_child(inner.clone()),
            Err(UiError::WouldCreateCycle { .. })
        ));
    }

    #[test]
    fn interactable_is_inherited() {
        let leaf = ui::label("leaf");
        let middle = ui::row(vec![leaf.clone()]).unwrap();
        let root = ui::column(vec![middle.clone()]).unwrap();

        root.set_interactable(false);
        assert!(!leaf.is_interactable());
        assert!(leaf.is_self_interactable());

        root.set_interactable(true);
        assert!(leaf.is_interactable());

        middle.set_interactable(false);
        assert!(!leaf.is_interactable());
        assert!(root.is_interactable());
    }

    #[test]
    fn disabled_subtree_is_skipped_but_on_update_runs() {
        let pulls = Arc::new(AtomicI32::new(0));
        let pulls_clone = pulls.clone();
        let label = LabelElement::from_fn(move || {
            pulls_clone.fetch_add(1, Ordering::SeqCst);
            "text".to_string()
        })
        .into_element();
        let root = ui::column(vec![label]).unwrap();

        let ticks = Arc::new(AtomicI32::new(0));
        let ticks_clone = ticks.clone();
        let _sub = root.on_update(move |_| {
            ticks_clone.fetch_add(1, Ordering::SeqCst);
        });

        root.update();
        assert_eq!(pulls.load(Ordering::SeqCst), 1);

        root.set_enable(false);
        root.update();
        assert_eq!(pulls.load(Ordering::SeqCst), 1);
        assert_eq!(ticks.load(Ordering::SeqCst), 2);

        root.set_force_update(true);
        root.update();
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn enable_if_is_evaluated_each_sweep() {
        let flag = Arc::new(AtomicBool::new(false));
        let flag_clone = flag.clone();
        let element = ui::space().enable_if(move || flag_clone.load(Ordering::SeqCst));

        element.update();
        assert!(!element.is_enabled());

        flag.store(true, Ordering::SeqCst);
        element.update();
        assert!(element.is_enabled());
    }

    #[test]
    fn destroy_cascades_and_unlinks() {
        let leaf = ui::label("leaf");
        let middle = ui::row(vec![leaf.clone()]).unwrap();
        let root = ui::column(vec![middle.clone()]).unwrap();

        let detached = Arc::new(AtomicI32::new(0));
        let detached_clone = detached.clone();
        let _sub = leaf.on_detach_view(move |_| {
            detached_clone.fetch_add(1, Ordering::SeqCst);
        });

        middle.destroy();

        assert!(middle.is_destroyed());
        assert!(leaf.is_destroyed());
        assert_eq!(detached.load(Ordering::SeqCst), 1);
        assert_eq!(root.child_count(), 0);
        assert!(middle.parent().is_none());
    }

    #[test]
    fn detach_keeps_the_subtree_alive() {
        let leaf = ui::label("leaf");
        let root = ui::column(vec![leaf.clone()]).unwrap();

        leaf.detach(true);

        assert!(!leaf.is_destroyed());
        assert!(leaf.parent().is_none());
        assert_eq!(root.child_count(), 0);
        ui::row(vec![]).unwrap().add_child(leaf).unwrap();
    }

    #[test]
    fn style_is_allocated_lazily() {
        let element = ui::space();
        assert!(!element.has_style());
        element.style().update(|style| style.width = Some(120.0));
        assert!(element.has_style());
        assert_eq!(element.style().get().width, Some(120.0));
    }
}
