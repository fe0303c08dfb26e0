//! Purpose: In-process engine that serves scripted foreign token trees.
//! Exports: `Node`, `ForeignTree`, `Reply`, `ScriptedGrammar`, `ScriptedEngine`.
//! Role: Test double for the engine boundary; builds real `#[repr(C)]` trees
//! with the same shapes the engine emits and counts every release.
//! Invariants: Each handed-out result is freed at most once; unknown or repeated
//! releases are counted and ignored.
//! Invariants: Tree memory stays valid until the owning result is released.
use std::collections::HashSet;
use std::os::raw::c_char;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::core::engine::Engine;
use crate::core::hammer::sys;

#[derive(Clone, Debug, PartialEq)]
enum Shape {
    Null,
    Tagged(sys::HTokenType),
    None,
    Bytes(Vec<u8>),
    SInt(i64),
    UInt(u64),
    Sequence(Vec<Node>),
}

/// Description of one foreign token to materialize.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    shape: Shape,
    index: usize,
    bit_offset: i8,
    spare_capacity: usize,
}

impl Node {
    fn with_shape(shape: Shape) -> Self {
        Self {
            shape,
            index: 0,
            bit_offset: 0,
            spare_capacity: 0,
        }
    }

    /// A null child pointer.
    pub fn null() -> Self {
        Self::with_shape(Shape::Null)
    }

    pub fn none() -> Self {
        Self::with_shape(Shape::None)
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::with_shape(Shape::Bytes(bytes.into()))
    }

    pub fn sint(value: i64) -> Self {
        Self::with_shape(Shape::SInt(value))
    }

    pub fn uint(value: u64) -> Self {
        Self::with_shape(Shape::UInt(value))
    }

    pub fn sequence(items: impl IntoIterator<Item = Node>) -> Self {
        Self::with_shape(Shape::Sequence(items.into_iter().collect()))
    }

    /// A token with an arbitrary tag and a zeroed payload.
    pub fn raw_tag(tag: sys::HTokenType) -> Self {
        Self::with_shape(Shape::Tagged(tag))
    }

    pub fn at(mut self, index: usize, bit_offset: i8) -> Self {
        self.index = index;
        self.bit_offset = bit_offset;
        self
    }

    /// Allocate `spare` unused (null) slots past the sequence's used count.
    pub fn with_spare_capacity(mut self, spare: usize) -> Self {
        self.spare_capacity = spare;
        self
    }
}

/// A foreign token tree laid out exactly as the engine would emit it.
#[derive(Debug)]
pub struct ForeignTree {
    root: *mut sys::HParsedToken,
    tokens: Vec<*mut sys::HParsedToken>,
    arrays: Vec<*mut sys::HCountedArray>,
    elements: Vec<*mut [*mut sys::HParsedToken]>,
    buffers: Vec<*mut [u8]>,
}

impl ForeignTree {
    pub fn build(node: &Node) -> Self {
        let mut tree = Self {
            root: ptr::null_mut(),
            tokens: Vec::new(),
            arrays: Vec::new(),
            elements: Vec::new(),
            buffers: Vec::new(),
        };
        tree.root = tree.alloc(node);
        tree
    }

    pub fn root(&self) -> *const sys::HParsedToken {
        self.root
    }

    /// Number of non-null tokens in the tree.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn alloc(&mut self, node: &Node) -> *mut sys::HParsedToken {
        let (token_type, data) = match &node.shape {
            Shape::Null => return ptr::null_mut(),
            Shape::Tagged(tag) => (*tag, sys::HTokenData { uint: 0 }),
            Shape::None => (sys::TT_NONE, sys::HTokenData { uint: 0 }),
            Shape::Bytes(bytes) => {
                let buffer = Box::into_raw(bytes.clone().into_boxed_slice());
                self.buffers.push(buffer);
                let span = sys::HBytes {
                    token: buffer as *const u8,
                    len: bytes.len(),
                };
                (sys::TT_BYTES, sys::HTokenData { bytes: span })
            }
            Shape::SInt(value) => (sys::TT_SINT, sys::HTokenData { sint: *value }),
            Shape::UInt(value) => (sys::TT_UINT, sys::HTokenData { uint: *value }),
            Shape::Sequence(items) => {
                let mut children: Vec<*mut sys::HParsedToken> =
                    items.iter().map(|item| self.alloc(item)).collect();
                let used = children.len();
                children.resize(used + node.spare_capacity, ptr::null_mut());
                let capacity = children.len();
                let elements = Box::into_raw(children.into_boxed_slice());
                self.elements.push(elements);
                let array = Box::into_raw(Box::new(sys::HCountedArray {
                    capacity,
                    used,
                    arena: ptr::null_mut(),
                    elements: elements as *mut *mut sys::HParsedToken,
                }));
                self.arrays.push(array);
                (sys::TT_SEQUENCE, sys::HTokenData { seq: array })
            }
        };

        let token = Box::into_raw(Box::new(sys::HParsedToken {
            token_type,
            data,
            index: node.index,
            bit_length: 0,
            bit_offset: node.bit_offset as c_char,
        }));
        self.tokens.push(token);
        token
    }
}

impl Drop for ForeignTree {
    fn drop(&mut self) {
        unsafe {
            for token in self.tokens.drain(..) {
                drop(Box::from_raw(token));
            }
            for array in self.arrays.drain(..) {
                drop(Box::from_raw(array));
            }
            for elements in self.elements.drain(..) {
                drop(Box::from_raw(elements));
            }
            for buffer in self.buffers.drain(..) {
                drop(Box::from_raw(buffer));
            }
        }
        self.root = ptr::null_mut();
    }
}

/// What a scripted grammar answers for one input.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    Match(Node),
    /// A result handle whose root token is null.
    NoMatch,
    /// No result handle at all.
    NullResult,
}

type Script = dyn Fn(&[u8]) -> Reply + Send + Sync;

pub struct ScriptedGrammar {
    script: Box<Script>,
}

impl ScriptedGrammar {
    pub fn new(script: impl Fn(&[u8]) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            script: Box::new(script),
        }
    }

    /// Answer every input with the same reply.
    pub fn constant(reply: Reply) -> Self {
        Self::new(move |_| reply.clone())
    }
}

impl std::fmt::Debug for ScriptedGrammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedGrammar").finish_non_exhaustive()
    }
}

#[repr(C)]
struct ScriptedResult {
    result: sys::HParseResult,
    tree: Option<ForeignTree>,
}

#[derive(Debug, Default)]
pub struct ScriptedEngine {
    runs: AtomicUsize,
    releases: AtomicUsize,
    unknown_releases: AtomicUsize,
    live: Mutex<HashSet<usize>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// Every `release_result` call, null and unknown handles included.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Releases of handles this engine does not currently own.
    pub fn unknown_releases(&self) -> usize {
        self.unknown_releases.load(Ordering::SeqCst)
    }

    /// Results handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.live.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

unsafe impl Engine for ScriptedEngine {
    type Grammar = ScriptedGrammar;

    fn run_parse(&self, grammar: &ScriptedGrammar, input: &[u8]) -> *mut sys::HParseResult {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let tree = match (grammar.script)(input) {
            Reply::NullResult => return ptr::null_mut(),
            Reply::NoMatch => None,
            Reply::Match(node) => Some(ForeignTree::build(&node)),
        };
        let ast = tree.as_ref().map_or(ptr::null(), ForeignTree::root);
        let result = Box::into_raw(Box::new(ScriptedResult {
            result: sys::HParseResult {
                ast,
                bit_length: (input.len() as i64).saturating_mul(8),
                arena: ptr::null_mut(),
            },
            tree,
        }));
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(result as usize);
        result as *mut sys::HParseResult
    }

    unsafe fn release_result(&self, result: *mut sys::HParseResult) {
        self.releases.fetch_add(1, Ordering::SeqCst);
        if result.is_null() {
            return;
        }
        let owned = self
            .live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(result as usize));
        if !owned {
            self.unknown_releases.fetch_add(1, Ordering::SeqCst);
            tracing::warn!("release of a result this engine does not own");
            return;
        }
        drop(unsafe { Box::from_raw(result as *mut ScriptedResult) });
    }
}
