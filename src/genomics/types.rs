use std::fmt;

/// Simple CIGAR operation kinds describing how a read aligns to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum CigarOpKind {
    /// Consuming match/mismatch.
    Match,
    /// Insertion relative to the reference.
    Insertion,
    /// Deletion relative to the reference.
    Deletion,
}

impl CigarOpKind {
    /// SAM operation letter.
    pub fn symbol(self) -> char {
        match self {
            CigarOpKind::Match => 'M',
            CigarOpKind::Insertion => 'I',
            CigarOpKind::Deletion => 'D',
        }
    }
}

/// CIGAR operation with length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CigarOp {
    /// Operation kind.
    pub kind: CigarOpKind,
    /// Number of bases affected by the operation.
    pub len: u32,
}

impl CigarOp {
    /// Construct a new CIGAR operation.
    pub fn new(kind: CigarOpKind, len: u32) -> Self {
        Self { kind, len }
    }
}

impl fmt::Display for CigarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.len, self.kind.symbol())
    }
}

/// One column of an extended edit script.
///
/// Bases are stored as decoded ASCII characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum EditOp {
    /// Read and reference agree. Rendered as `.`.
    Match,
    /// Substitution; carries the reference base. Rendered as the base.
    Mismatch(u8),
    /// Reference base absent from the read. Rendered as `base^`.
    Deletion(u8),
    /// Read base absent from the reference. Rendered as `base#`.
    Insertion(u8),
}

impl EditOp {
    /// Whether the column consumes a read base.
    pub fn consumes_read(self) -> bool {
        !matches!(self, EditOp::Deletion(_))
    }

    /// Whether the column consumes a reference base.
    pub fn consumes_reference(self) -> bool {
        !matches!(self, EditOp::Insertion(_))
    }

    fn cigar_kind(self) -> CigarOpKind {
        match self {
            EditOp::Match | EditOp::Mismatch(_) => CigarOpKind::Match,
            EditOp::Deletion(_) => CigarOpKind::Deletion,
            EditOp::Insertion(_) => CigarOpKind::Insertion,
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EditOp::Match => f.write_str("."),
            EditOp::Mismatch(base) => write!(f, "{}", base as char),
            EditOp::Deletion(base) => write!(f, "{}^", base as char),
            EditOp::Insertion(base) => write!(f, "{}#", base as char),
        }
    }
}

/// Extended edit script, ordered left to right along the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    /// Wrap operations already in left-to-right order.
    pub fn from_ops(ops: Vec<EditOp>) -> Self {
        Self { ops }
    }

    /// The operations.
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` for an empty alignment.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Count of match columns.
    pub fn matches(&self) -> usize {
        self.count(|op| matches!(op, EditOp::Match))
    }

    /// Count of substitution columns.
    pub fn mismatches(&self) -> usize {
        self.count(|op| matches!(op, EditOp::Mismatch(_)))
    }

    /// Count of deleted reference bases.
    pub fn deletions(&self) -> usize {
        self.count(|op| matches!(op, EditOp::Deletion(_)))
    }

    /// Count of inserted read bases.
    pub fn insertions(&self) -> usize {
        self.count(|op| matches!(op, EditOp::Insertion(_)))
    }

    /// Unit-cost edit distance implied by the script.
    pub fn edit_distance(&self) -> usize {
        self.mismatches() + self.deletions() + self.insertions()
    }

    /// Read bases covered by the script.
    pub fn read_len(&self) -> usize {
        self.count(|op| op.consumes_read())
    }

    /// Reference bases covered by the script.
    pub fn reference_len(&self) -> usize {
        self.count(|op| op.consumes_reference())
    }

    fn count(&self, pred: impl Fn(EditOp) -> bool) -> usize {
        self.ops.iter().filter(|&&op| pred(op)).count()
    }

    /// Collapse into standard CIGAR operations.
    pub fn to_cigar(&self) -> Vec<CigarOp> {
        let mut cigar: Vec<CigarOp> = Vec::new();
        for op in &self.ops {
            let kind = op.cigar_kind();
            match cigar.last_mut() {
                Some(last) if last.kind == kind => last.len += 1,
                _ => cigar.push(CigarOp::new(kind, 1)),
            }
        }
        cigar
    }

    /// Render [`Self::to_cigar`] as a SAM CIGAR string.
    pub fn cigar_string(&self) -> String {
        self.to_cigar().iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for EditScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            write!(f, "{op}")?;
        }
        Ok(())
    }
}
