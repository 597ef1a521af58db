/*****************************************************************************************[clause.rs]
Copyright (c) 2003-2006, Niklas Een, Niklas Sorensson (MiniSat)
Copyright (c) 2007-2010, Niklas Sorensson (MiniSat)
Copyright (c) 2018-2018, Masaki Hara

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or
substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
**************************************************************************************************/

use crate::intmap::{AsIndex, IntMap};
use smallvec::SmallVec;
use std::fmt;
use std::ops;

/// A solver-internal variable, an index in `[0, num_vars)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == !0 {
            write!(f, "UNDEF")
        } else {
            write!(f, "{}", self.0 + 1)
        }
    }
}

impl Var {
    pub const UNDEF: Var = Var(!0);
    #[inline(always)]
    pub(crate) fn from_idx(idx: u32) -> Self {
        debug_assert!(idx < u32::MAX / 2, "Var::from_idx: index too large");
        Var(idx)
    }
    #[inline(always)]
    pub fn idx(&self) -> u32 {
        self.0
    }
}

impl AsIndex for Var {
    fn as_index(self) -> usize {
        self.0 as usize
    }
    fn from_index(index: usize) -> Self {
        Var(index as u32)
    }
}

pub type VMap<V> = IntMap<Var, V>;

/// A literal: a variable together with a polarity, packed as `2*var + neg`.
///
/// Negation is `XOR 1`, so the two literals of a variable are adjacent
/// indices into any literal-keyed table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(u32);

impl Lit {
    #[inline(always)]
    pub fn new(var: Var, sign: bool) -> Self {
        Lit(var.0 * 2 + (!sign) as u32)
    }
    #[inline(always)]
    pub(crate) fn from_idx(idx: u32) -> Self {
        Lit(idx)
    }
    #[inline(always)]
    pub fn idx(&self) -> u32 {
        self.0
    }
    /// `true` for the positive literal, `false` for the negated one.
    #[inline(always)]
    pub fn sign(&self) -> bool {
        (self.0 & 1) == 0
    }
    #[inline(always)]
    pub fn var(&self) -> Var {
        Var(self.0 >> 1)
    }
    /// The assignment that makes this literal true.
    #[inline(always)]
    pub fn expected(&self) -> lbool {
        lbool::new(self.sign())
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", if self.sign() { "" } else { "-" }, self.0 / 2 + 1)
    }
}

impl ops::Not for Lit {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Lit(self.0 ^ 1)
    }
}

impl AsIndex for Lit {
    #[inline(always)]
    fn as_index(self) -> usize {
        self.0 as usize
    }
    #[inline(always)]
    fn from_index(index: usize) -> Self {
        Lit(index as u32)
    }
}

pub type LMap<V> = IntMap<Lit, V>;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy)]
/// A ternary boolean (true, false, undefined) used for partial assignments.
pub struct lbool(u8);

impl fmt::Debug for lbool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "TRUE")
        } else if self.0 == 1 {
            write!(f, "FALSE")
        } else if self.0 <= 3 {
            write!(f, "UNDEF")
        } else {
            // unreachable
            write!(f, "lbool({})", self.0)
        }
    }
}

impl Default for lbool {
    fn default() -> Self {
        lbool::UNDEF
    }
}

impl lbool {
    pub const TRUE: lbool = lbool(0);
    pub const FALSE: lbool = lbool(1);
    pub const UNDEF: lbool = lbool(2);
    #[inline(always)]
    pub fn new(v: bool) -> Self {
        lbool((!v) as u8)
    }
}

// from minisat:
// bool operator == (lbool b) const { return ((b.value&2) & (value&2)) | (!(b.value&2)&(value == b.value)); }
impl PartialEq for lbool {
    #[inline(always)]
    fn eq(&self, rhs: &Self) -> bool {
        self.0 == rhs.0 || (self.0 & rhs.0 & 2) != 0
    }
}

impl Eq for lbool {}

impl ops::BitXor<bool> for lbool {
    type Output = lbool;

    /// Xor of a lbool with a boolean.
    #[inline(always)]
    fn bitxor(self, rhs: bool) -> Self {
        lbool(self.0 ^ rhs as u8)
    }
}
impl ops::BitXorAssign<bool> for lbool {
    fn bitxor_assign(&mut self, rhs: bool) {
        *self = *self ^ rhs;
    }
}

/// A reference to a clause in a `ClauseDb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CRef(u32);

impl CRef {
    #[inline(always)]
    pub fn idx(&self) -> u32 {
        self.0
    }
}

/// Inline vector used for watch lists.
pub type OccVec<V> = SmallVec<[V; 4]>;

#[derive(Debug, Clone, Copy)]
struct ClauseHeader {
    offset: u32,
    size: u32,
}

/// The clause database: every clause's literals live in one shared vector,
/// addressed by offset and length. Clauses are only ever added; their
/// literals may be permuted in place as watches move.
#[derive(Debug, Default)]
pub struct ClauseDb {
    headers: Vec<ClauseHeader>,
    lits: Vec<Lit>,
}

impl ClauseDb {
    pub fn with_capacity(n_clauses: usize, n_lits: usize) -> Self {
        Self {
            headers: Vec::with_capacity(n_clauses),
            lits: Vec::with_capacity(n_lits),
        }
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn alloc(&mut self, clause: &[Lit]) -> CRef {
        let cid = self.headers.len();
        self.headers.push(ClauseHeader {
            offset: self.lits.len() as u32,
            size: clause.len() as u32,
        });
        self.lits.extend_from_slice(clause);
        CRef(cid as u32)
    }

    #[inline]
    pub fn get(&self, cref: CRef) -> &[Lit] {
        let h = self.headers[cref.0 as usize];
        &self.lits[h.offset as usize..(h.offset + h.size) as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, cref: CRef) -> &mut [Lit] {
        let h = self.headers[cref.0 as usize];
        &mut self.lits[h.offset as usize..(h.offset + h.size) as usize]
    }
}
