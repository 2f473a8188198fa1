use crate::model::LotId;

/// The one lot currently selected for editing, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<LotId>,
}

impl Selection {
    pub fn current(&self) -> Option<LotId> {
        self.current
    }

    pub fn is_selected(&self, id: LotId) -> bool {
        self.current == Some(id)
    }

    /// Selects `id`, returning the previously selected lot when it differs.
    pub fn replace(&mut self, id: LotId) -> Option<LotId> {
        let prev = self.current.replace(id);
        prev.filter(|p| *p != id)
    }

    pub fn clear(&mut self) -> Option<LotId> {
        self.current.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_reports_only_a_different_previous() {
        let mut s = Selection::default();
        assert_eq!(s.replace(1), None);
        assert_eq!(s.replace(1), None);
        assert_eq!(s.replace(2), Some(1));
        assert!(s.is_selected(2));
        assert_eq!(s.clear(), Some(2));
        assert_eq!(s.current(), None);
    }
}
