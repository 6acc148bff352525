//! Coroutine 单元测试
//!
//! 测试挂起谓词、步骤过程与协程状态机

use std::cell::RefCell;
use std::rc::Rc;


/// Shared marker log closed over by test procedures.
#[derive(Debug, Clone, Default)]
pub(crate) struct Markers(Rc<RefCell<Vec<String>>>);

impl Markers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(
        &self,
        marker: &str,
    ) {
        self.0.borrow_mut().push(marker.to_string());
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Compare a marker log against string literals.
pub(crate) fn assert_markers(
    markers: &Markers,
    expected: &[&str],
) {
    assert_eq!(markers.snapshot(), expected);
}
