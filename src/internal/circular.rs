//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

// Keys currently in construction on this thread, tagged with the owning
// container so nested containers never see each other's frames.
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(usize, Key)>> = RefCell::new(Vec::new());
}

/// Guard for one frame of the thread-local resolution stack.
///
/// Entering fails with [`DiError::Circular`] when the key is already in
/// construction for the same container, and with [`DiError::DepthExceeded`]
/// when the container's stack is `max_depth` frames deep. Dropping the guard
/// pops the frame, so an error anywhere below unwinds the stack cleanly.
pub(crate) struct StackGuard {
    container: usize,
}

impl StackGuard {
    pub(crate) fn enter(container: usize, key: &Key, max_depth: usize) -> DiResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let frames = stack.iter().filter(|(owner, _)| *owner == container);

            // Circular detection BEFORE pushing the key
            if let Some(start) = frames.clone().position(|(_, k)| k == key) {
                let mut path: Vec<String> = frames
                    .skip(start)
                    .map(|(_, k)| k.to_string())
                    .collect();
                path.push(key.to_string());
                return Err(DiError::Circular(path));
            }

            let depth = frames.count();
            if depth >= max_depth {
                return Err(DiError::DepthExceeded(depth));
            }

            stack.push((container, key.clone()));
            Ok(Self { container })
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();
            debug_assert!(matches!(popped, Some((owner, _)) if owner == self.container));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentering_a_key_reports_the_cycle() {
        let a = StackGuard::enter(1, &Key::named("a"), 16).unwrap();
        let b = StackGuard::enter(1, &Key::named("b"), 16).unwrap();
        match StackGuard::enter(1, &Key::named("a"), 16) {
            Err(DiError::Circular(path)) => assert_eq!(path, vec!["a", "b", "a"]),
            _ => panic!("expected Circular"),
        }
        drop(b);
        drop(a);
        assert!(StackGuard::enter(1, &Key::named("a"), 16).is_ok());
    }

    #[test]
    fn containers_do_not_share_frames() {
        let _outer = StackGuard::enter(1, &Key::named("a"), 16).unwrap();
        assert!(StackGuard::enter(2, &Key::named("a"), 16).is_ok());
    }

    #[test]
    fn depth_limit() {
        let _a = StackGuard::enter(3, &Key::named("a"), 2).unwrap();
        let _b = StackGuard::enter(3, &Key::named("b"), 2).unwrap();
        assert!(matches!(
            StackGuard::enter(3, &Key::named("c"), 2),
            Err(DiError::DepthExceeded(2))
        ));
    }
}
