// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-deep value history.

/// The latest value and the one before it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct History<T> {
    current: Option<T>,
    previous: Option<T>,
}

impl<T> History<T> {
    pub(crate) const fn new() -> Self {
        Self {
            current: None,
            previous: None,
        }
    }

    /// Makes `value` current; the old current becomes previous.
    pub(crate) fn push(&mut self, value: T) {
        self.previous = self.current.replace(value);
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub(crate) fn previous(&self) -> Option<&T> {
        self.previous.as_ref()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let history = History::<u8>::new();
        assert_eq!(history.current(), None);
        assert_eq!(history.previous(), None);
    }

    #[test]
    fn push_shifts_current_to_previous() {
        let mut history = History::new();

        history.push(1);
        assert_eq!(history.current(), Some(&1));
        assert_eq!(history.previous(), None);

        history.push(2);
        history.push(3);
        assert_eq!(history.current(), Some(&3));
        assert_eq!(history.previous(), Some(&2));
    }
}
