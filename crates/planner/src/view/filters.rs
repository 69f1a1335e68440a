use crate::memo::Memo;
use std::collections::BTreeSet;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxView<T> {
    pub value: T,
    pub label: String,
    pub checked: bool,
}

/// One filter option. Depends on its own value and whether that value is selected.
pub struct FilterCheckbox<T> {
    value: T,
    view: Memo<bool, CheckboxView<T>>,
}

impl<T: Clone + Display> FilterCheckbox<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            view: Memo::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn render(&mut self, checked: bool) -> CheckboxView<T> {
        self.view.get(checked, |&checked| CheckboxView {
            value: self.value.clone(),
            label: self.value.to_string(),
            checked,
        })
    }

    pub fn renders(&self) -> u64 {
        self.view.computations()
    }
}

/// A row of checkboxes backed by one set-valued filter field.
///
/// Toggling one option re-renders only that option's checkbox.
pub struct FilterGroup<T> {
    boxes: Vec<FilterCheckbox<T>>,
}

impl<T: Ord + Clone + Display> FilterGroup<T> {
    pub fn new(options: impl IntoIterator<Item = T>) -> Self {
        Self {
            boxes: options.into_iter().map(FilterCheckbox::new).collect(),
        }
    }

    pub fn render(&mut self, selected: &BTreeSet<T>) -> Vec<CheckboxView<T>> {
        self.boxes
            .iter_mut()
            .map(|checkbox| {
                let checked = selected.contains(checkbox.value());
                checkbox.render(checked)
            })
            .collect()
    }

    /// Render counts per option, in option order.
    pub fn renders(&self) -> Vec<u64> {
        self.boxes.iter().map(FilterCheckbox::renders).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_rerenders_only_toggled_option() {
        let mut group = FilterGroup::new(1..=4u8);
        let mut selected = BTreeSet::new();
        group.render(&selected);

        selected.insert(3);
        let views = group.render(&selected);
        assert!(views[2].checked);
        assert_eq!(views[2].label, "3");
        assert_eq!(group.renders(), vec![1, 1, 2, 1]);

        group.render(&selected);
        assert_eq!(group.renders(), vec![1, 1, 2, 1]);
    }
}
