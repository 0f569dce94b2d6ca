use super::program::AddressRange;
use crate::html::LocalName;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter;

pub trait ElementData: Default + 'static {
    type MatchPayload: PartialEq + Eq + Copy + Debug + Hash + 'static;
}

pub struct StackItem<E: ElementData> {
    pub local_name: LocalName<'static>,
    pub element_data: E,
    pub jumps: Vec<AddressRange>,
    pub hereditary_jumps: Vec<AddressRange>,
    /// Index of the nearest ancestor that has hereditary jumps.
    pub hereditary_jumps_ancestor: Option<usize>,
}

impl<E: ElementData> StackItem<E> {
    #[inline]
    pub fn new(local_name: LocalName<'_>) -> Self {
        StackItem {
            local_name: local_name.into_owned(),
            element_data: E::default(),
            jumps: Vec::default(),
            hereditary_jumps: Vec::default(),
            hereditary_jumps_ancestor: None,
        }
    }
}

/// Stack of open elements.
pub struct Stack<E: ElementData>(Vec<StackItem<E>>);

impl<E: ElementData> Default for Stack<E> {
    fn default() -> Self {
        Stack(Vec::default())
    }
}

impl<E: ElementData> Stack<E> {
    /// Pops elements up to and including the nearest open element with the
    /// given name, innermost first. Does nothing if there is no such element.
    pub fn pop_up_to(
        &mut self,
        local_name: &LocalName<'_>,
        popped_element_data_handler: impl FnMut(E),
    ) {
        if let Some(i) = self.0.iter().rposition(|item| item.local_name == *local_name) {
            self.0
                .drain(i..)
                .rev()
                .map(|item| item.element_data)
                .for_each(popped_element_data_handler);
        }
    }

    /// Pops all the elements, innermost first.
    pub fn pop_all(&mut self, popped_element_data_handler: impl FnMut(E)) {
        self.0
            .drain(..)
            .rev()
            .map(|item| item.element_data)
            .for_each(popped_element_data_handler);
    }

    #[inline]
    pub fn items(&self) -> &[StackItem<E>] {
        &self.0
    }

    /// Iterates over the open elements that have hereditary jumps, innermost
    /// first, skipping the ones that don't.
    pub fn items_with_hereditary_jumps(&self) -> impl Iterator<Item = &StackItem<E>> + '_ {
        let mut next = self.0.last().and_then(|last| {
            if last.hereditary_jumps.is_empty() {
                last.hereditary_jumps_ancestor
            } else {
                Some(self.0.len() - 1)
            }
        });

        iter::from_fn(move || {
            let item = &self.0[next?];

            next = item.hereditary_jumps_ancestor;

            Some(item)
        })
    }

    #[inline]
    pub fn current_element_data_mut(&mut self) -> Option<&mut E> {
        self.0.last_mut().map(|i| &mut i.element_data)
    }

    #[inline]
    pub fn push_item(&mut self, mut item: StackItem<E>) {
        if let Some(last) = self.0.last() {
            item.hereditary_jumps_ancestor = if last.hereditary_jumps.is_empty() {
                last.hereditary_jumps_ancestor
            } else {
                Some(self.0.len() - 1)
            };
        }

        self.0.push(item);
    }
}
