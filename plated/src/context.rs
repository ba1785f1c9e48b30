//! Scoped construction.
//!
//! While a scope is open on a node, every node constructed on the same thread
//! is collected, and when the scope closes the collected nodes that were not
//! attached anywhere else in the meantime are added to the scope's node, in
//! construction order:
//!
//! ```rust
//! use plated::tags::{div, li, ul};
//!
//! let list = ul(());
//! {
//!     let _scope = list.enter_scope();
//!     li("one");
//!     li("two");
//!     div(li("nested"));
//! }
//! assert_eq!(list.len(), 3);
//! ```
//!
//! Each thread has its own stack of open scopes, so independent trees can be
//! built concurrently on different threads. Scopes must nest: closing one
//! that is not the innermost open scope fails with
//! [`BuildError::UnbalancedExit`].

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::attributes::Attrs;
use crate::error::{BuildError, Result};
use crate::node::Node;

struct Frame {
    id: u64,
    owner: Node,
    /// Nodes constructed while this frame was innermost.
    items: Vec<Node>,
    /// Keys of collected nodes that were attached elsewhere.
    used: HashSet<usize>,
}

thread_local! {
    /// Open scopes on this thread, innermost last.
    static STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };

    static NEXT_FRAME_ID: Cell<u64> = const { Cell::new(1) };
}

/// Open a scope on `node` and return it.
///
/// Prefer [`Node::enter_scope`], which closes the scope on every exit path.
pub fn enter(node: &Node) -> Node {
    open(node);
    node.clone()
}

fn open(node: &Node) -> u64 {
    let id = NEXT_FRAME_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(Frame {
            id,
            owner: node.clone(),
            items: Vec::new(),
            used: HashSet::new(),
        });
        debug!(tag = %node.tag_name(), depth = stack.len(), "entered scope");
    });
    id
}

/// Close the innermost scope, which must be open on `node`, and attach every
/// collected node that was not used elsewhere.
pub fn exit(node: &Node) -> Result<()> {
    close(node, None)
}

fn close(node: &Node, frame_id: Option<u64>) -> Result<()> {
    let frame = STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let balanced = stack.last().is_some_and(|top| {
            top.owner.ptr_eq(node) && frame_id.is_none_or(|id| id == top.id)
        });
        if !balanced {
            // A guard's frame never outlives the guard.
            if let Some(id) = frame_id {
                discard(&mut stack, id);
            }
            warn!(tag = %node.tag_name(), "scope closed out of order");
            return Err(BuildError::UnbalancedExit);
        }
        let frame = stack.pop().ok_or(BuildError::UnbalancedExit)?;
        if stack.is_empty() {
            *stack = Vec::new();
        }
        Ok(frame)
    })?;

    debug!(
        tag = %node.tag_name(),
        collected = frame.items.len(),
        used = frame.used.len(),
        "exiting scope"
    );

    let mut first_err = None;
    for item in frame.items {
        if frame.used.contains(&item.key()) {
            continue;
        }
        if let Err(err) = node.add(&item)
            && first_err.is_none()
        {
            first_err = Some(err);
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// Discard a frame without attaching anything, wherever it sits.
fn abandon(frame_id: u64) {
    STACK.with(|stack| discard(&mut stack.borrow_mut(), frame_id));
}

fn discard(stack: &mut Vec<Frame>, frame_id: u64) {
    if let Some(pos) = stack.iter().rposition(|f| f.id == frame_id) {
        stack.remove(pos);
    }
    if stack.is_empty() {
        *stack = Vec::new();
    }
}

/// Called by every node constructor: join the innermost open scope, if any.
pub(crate) fn register_if_active(node: &Node) {
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if let Some(frame) = stack.last_mut() {
            frame.items.push(node.clone());
            node.0.borrow_mut().frame = Some(frame.id);
        }
    });
}

/// Keep `node` from being attached by the scope it was constructed in.
///
/// Called when a node is added somewhere explicitly or turned into a
/// [`Template`](crate::Template).
pub fn mark_used(node: &Node) {
    let Some(frame_id) = node.0.borrow().frame else {
        return;
    };
    STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        if let Some(frame) = stack.iter_mut().rev().find(|f| f.id == frame_id) {
            frame.used.insert(node.key());
        }
    });
}

/// The node of the innermost open scope.
pub fn current() -> Result<Node> {
    STACK
        .with(|stack| stack.borrow().last().map(|f| f.owner.clone()))
        .ok_or(BuildError::NoActiveContext)
}

/// The node of the innermost open scope, or `default` if none is open.
pub fn current_or(default: &Node) -> Node {
    current().unwrap_or_else(|_| default.clone())
}

/// Returns true if a scope is open on this thread.
pub fn is_active() -> bool {
    STACK.with(|stack| !stack.borrow().is_empty())
}

/// Set attributes on the node of the innermost open scope.
///
/// ```rust
/// use plated::{attrs, context, tags::div};
///
/// let d = div(());
/// d.with(|| context::attr(attrs([("id", "main")]))).unwrap().unwrap();
/// assert_eq!(d.attr("id").unwrap(), "main");
/// ```
pub fn attr(attrs: Attrs) -> Result<()> {
    let node = current()?;
    for (name, value) in attrs.normalized() {
        node.0.borrow_mut().attrs.insert(name, value);
    }
    Ok(())
}

/// An open scope. Closing it attaches the collected nodes.
///
/// Dropping the guard closes the scope too; use [`Scope::exit`] to see
/// errors. If the thread is panicking the frame is discarded instead.
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct Scope {
    node: Node,
    frame_id: u64,
    closed: bool,
}

impl Scope {
    /// The node this scope attaches to.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Close the scope and return its node.
    ///
    /// If another scope opened later is still open, this fails with
    /// [`BuildError::UnbalancedExit`] and the frame is discarded without
    /// attaching anything.
    pub fn exit(mut self) -> Result<Node> {
        self.closed = true;
        close(&self.node, Some(self.frame_id))?;
        Ok(self.node.clone())
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if std::thread::panicking() {
            abandon(self.frame_id);
            return;
        }
        if let Err(_err) = close(&self.node, Some(self.frame_id)) {
            warn!(%_err, tag = %self.node.tag_name(), "scope dropped with error");
        }
    }
}

impl Node {
    /// Open a scope on this node.
    pub fn enter_scope(&self) -> Scope {
        let frame_id = open(self);
        Scope {
            node: self.clone(),
            frame_id,
            closed: false,
        }
    }

    /// Run `f` inside a scope on this node.
    pub fn with<R>(&self, f: impl FnOnce() -> R) -> Result<R> {
        let scope = self.enter_scope();
        let out = f();
        scope.exit()?;
        Ok(out)
    }
}
