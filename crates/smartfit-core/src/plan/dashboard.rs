/// Which day of the plan is expanded on the dashboard.
///
/// At most one day is open. A fresh view opens the first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardView {
    expanded: Option<usize>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self { expanded: Some(0) }
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_expanded(&self, day_index: usize) -> bool {
        self.expanded == Some(day_index)
    }

    /// Collapse `day_index` if it is open, otherwise open it and collapse
    /// whichever day was open.
    pub fn toggle(&mut self, day_index: usize) {
        self.expanded = if self.is_expanded(day_index) {
            None
        } else {
            Some(day_index)
        };
    }
}
