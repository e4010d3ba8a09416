//! Resolution-frame tracking for cycle detection.

use std::cell::RefCell;

use crate::error::ResolutionError;

const MAX_DEPTH: usize = 1024;

// Thread-local in-flight set. A resolution chain is a plain recursive call
// graph with no suspension points, so the frames of one chain always live on
// one thread; entries are keyed by container instance so independent
// containers never see each other's frames.
thread_local! {
    static RESOLUTION_TLS: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
    container: usize,
    id: String,
}

/// RAII mark for an identifier on the active resolution frame.
///
/// `enter` fails when the identifier is already in flight for the same
/// container (with the full path, repeat included) or when the depth limit
/// is hit. Dropping the guard pops the mark on every exit path, so a failed
/// factory or constructor never leaves its identifier poisoned as circular.
pub(crate) struct FrameGuard {
    container: usize,
    #[cfg(debug_assertions)]
    id: String,
}

impl FrameGuard {
    pub(crate) fn enter(container: usize, id: &str) -> Result<Self, ResolutionError> {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();

            if stack
                .iter()
                .any(|f| f.container == container && f.id == id)
            {
                let mut path: Vec<String> = stack
                    .iter()
                    .filter(|f| f.container == container)
                    .map(|f| f.id.clone())
                    .collect();
                path.push(id.to_string());
                return Err(ResolutionError::Circular(path));
            }

            if stack.len() >= MAX_DEPTH {
                return Err(ResolutionError::DepthExceeded(stack.len()));
            }

            stack.push(Frame {
                container,
                id: id.to_string(),
            });

            Ok(FrameGuard {
                container,
                #[cfg(debug_assertions)]
                id: id.to_string(),
            })
        })
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();
            if let Some(last) = stack.pop() {
                debug_assert_eq!(last.container, self.container);
                #[cfg(debug_assertions)]
                debug_assert_eq!(last.id, self.id);
            }
        });
    }
}
